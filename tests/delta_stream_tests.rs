//! Integration tests for the delta frame codec
//!
//! These tests drive encoder/decoder pairs through whole frame sequences
//! using only the public API, and pin down the wire bytes and the failure
//! modes callers rely on for resynchronization.

use sparse_gray::{
    BitMatrix, DeltaDecoder, DeltaEncoder, ErrorKind, RleConfig, RunLengthCodec, SgfError,
};

mod common;
use common::XorShift;

fn pair(
    rows: usize,
    cols: usize,
    config: RleConfig,
    first: &BitMatrix,
) -> (DeltaEncoder, DeltaDecoder) {
    let mut enc = DeltaEncoder::with_config(rows, cols, config).unwrap();
    let mut dec = DeltaDecoder::with_config(rows, cols, config).unwrap();
    enc.set_initial_frame(first).unwrap();
    dec.set_initial_frame(first).unwrap();
    (enc, dec)
}

#[test]
fn test_sequence_round_trip() {
    let mut rng = XorShift(0x5eed_1234_abcd_0001);
    let (rows, cols) = (48, 64);
    let mut frame = rng.sparse_frame(rows, cols, 30);
    let (mut enc, mut dec) = pair(rows, cols, RleConfig::default(), &frame);

    for i in 0..50 {
        frame = rng.mutate(&frame, 1 + i % 7);
        let message = enc.encode(&frame).unwrap();
        let decoded = dec.decode(&message).unwrap();
        assert_eq!(decoded, frame, "frame {i}");
    }
    assert_eq!(enc.frames_encoded(), 50);
    assert_eq!(dec.frames_decoded(), 50);
}

#[test]
fn test_sequence_round_trip_wide_records() {
    let mut rng = XorShift(42);
    let (rows, cols) = (200, 320);
    let config = RleConfig::new(16, 32).unwrap();
    let mut frame = BitMatrix::new(rows, cols);
    let (mut enc, mut dec) = pair(rows, cols, config, &frame);

    for _ in 0..10 {
        frame = rng.mutate(&frame, 25);
        assert_eq!(dec.decode(&enc.encode(&frame).unwrap()).unwrap(), frame);
    }
}

#[test]
fn test_sparse_changes_compress() {
    let (rows, cols) = (64, 128);
    let first = BitMatrix::new(rows, cols);
    let mut second = first.clone();
    second.set_bit(10, 10, true).unwrap();
    second.set_bit(50, 100, true).unwrap();

    let (mut enc, _) = pair(rows, cols, RleConfig::default(), &first);
    let message = enc.encode(&second).unwrap();
    assert!(message.len() < first.packed_len() / 10, "{} bytes", message.len());
}

#[test]
fn test_wire_bytes_for_known_delta() {
    // [[1,0],[1,0]] -> [[0,1],[0,1]]: delta is [[1,1],[1,1]].
    let first = BitMatrix::from_bits(2, 2, [true, false, true, false]).unwrap();
    let second = BitMatrix::from_bits(2, 2, [false, true, false, true]).unwrap();
    let (mut enc, _) = pair(2, 2, RleConfig::default(), &first);
    assert_eq!(enc.encode(&second).unwrap(), vec![0x04, 0x00, 0x84]);
}

#[test]
fn test_codec_concrete_stream() {
    let codec = RunLengthCodec::default();
    let encoded = codec.encode_bits(&[false, true, true, true]).unwrap();
    assert_eq!(encoded, vec![0x04, 0x00, 0x01, 0x83]);
    assert_eq!(codec.decode(&encoded).unwrap(), vec![false, true, true, true]);
}

#[test]
fn test_dropped_message_goes_undetected_but_resync_recovers() {
    let mut rng = XorShift(7);
    let (rows, cols) = (16, 16);
    let f0 = rng.sparse_frame(rows, cols, 100);
    let f1 = rng.mutate(&f0, 3);
    let f2 = rng.mutate(&f1, 3);
    let f3 = rng.mutate(&f2, 3);
    let (mut enc, mut dec) = pair(rows, cols, RleConfig::default(), &f0);

    let _lost = enc.encode(&f1).unwrap();
    let m2 = enc.encode(&f2).unwrap();

    // Same size, so the length check cannot catch it.
    let wrong = dec.decode(&m2).unwrap();
    assert_ne!(wrong, f2);

    // Caller-driven resync on both sides.
    enc.set_initial_frame(&f2).unwrap();
    dec.set_initial_frame(&f2).unwrap();
    assert_eq!(dec.decode(&enc.encode(&f3).unwrap()).unwrap(), f3);
}

#[test]
fn test_mismatched_sizes_detected_as_desync() {
    let small = BitMatrix::new(4, 4);
    let big = BitMatrix::new(8, 8);
    let (mut enc, _) = pair(4, 4, RleConfig::default(), &small);
    let (_, mut dec) = pair(8, 8, RleConfig::default(), &big);

    let mut next = small.clone();
    next.set_bit(3, 3, true).unwrap();
    let err = dec.decode(&enc.encode(&next).unwrap()).unwrap_err();
    assert!(matches!(err, SgfError::Desync { expected: 64, actual: 16 }));
    assert_eq!(err.kind(), ErrorKind::Desync);
    assert_eq!(dec.latest_frame(), Some(&big));
}

#[test]
fn test_truncated_message_rejected() {
    let mut rng = XorShift(99);
    let f0 = rng.sparse_frame(8, 8, 200);
    let f1 = rng.mutate(&f0, 5);
    let (mut enc, mut dec) = pair(8, 8, RleConfig::default(), &f0);

    let message = enc.encode(&f1).unwrap();
    let truncated = &message[..message.len() - 1];
    let err = dec.decode(truncated).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Desync);

    // Baseline still f0, so the intact message still decodes.
    assert_eq!(dec.decode(&message).unwrap(), f1);
}

#[test]
fn test_state_errors_before_baseline() {
    let mut enc = DeltaEncoder::new(3, 3).unwrap();
    let mut dec = DeltaDecoder::new(3, 3).unwrap();
    assert_eq!(enc.encode(&BitMatrix::new(3, 3)).unwrap_err().kind(), ErrorKind::State);
    assert_eq!(dec.decode(&[9, 0, 9]).unwrap_err().kind(), ErrorKind::State);
}

#[test]
fn test_empty_frames() {
    let empty = BitMatrix::new(0, 0);
    let (mut enc, mut dec) = pair(0, 0, RleConfig::default(), &empty);
    let message = enc.encode(&empty).unwrap();
    assert_eq!(message, vec![0x00, 0x00]);
    assert_eq!(dec.decode(&message).unwrap(), empty);
}

#[test]
fn test_downsampled_stream() {
    let mut rng = XorShift(1234);
    let full = rng.sparse_frame(64, 64, 300);
    let mut reduced = full.clone();
    reduced.downsample(4, 4).unwrap();
    assert_eq!((reduced.rows(), reduced.cols()), (16, 16));

    let (mut enc, mut dec) = pair(16, 16, RleConfig::default(), &BitMatrix::new(16, 16));
    assert_eq!(dec.decode(&enc.encode(&reduced).unwrap()).unwrap(), reduced);
}

#[test]
fn test_view_export_feeds_receiver() {
    let mut rng = XorShift(5);
    let frame = rng.sparse_frame(10, 12, 400);
    let view = frame.view(2, 3, 5, 6);

    let mut buf = vec![0u8; view.packed_len()];
    view.copy_data_to(&mut buf).unwrap();
    let rebuilt = BitMatrix::from_packed(5, 6, &buf).unwrap();
    assert_eq!(rebuilt, view.to_matrix().unwrap());
}
