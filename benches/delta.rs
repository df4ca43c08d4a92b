use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sparse_gray::{BitMatrix, DeltaDecoder, DeltaEncoder, RleConfig};

mod common;
use common::sparse_frame;

const ROWS: usize = 1080;
const COLS: usize = 1920;

fn config() -> RleConfig {
    RleConfig::new(16, 32).expect("valid widths")
}

fn frames() -> (BitMatrix, BitMatrix) {
    let first = sparse_frame(ROWS, COLS, 20, 21);
    let changes = sparse_frame(ROWS, COLS, 2, 22);
    let second = first.xor(&changes).expect("same shape");
    (first, second)
}

fn bench_xor_1920x1080(c: &mut Criterion) {
    let (first, second) = frames();
    c.bench_function("xor_1920x1080", |b| {
        b.iter(|| black_box(&first).xor(black_box(&second)))
    });
    c.bench_function("xor_parallel_1920x1080", |b| {
        b.iter(|| black_box(&first).xor_parallel(black_box(&second)))
    });
}

fn bench_delta_encode_1920x1080(c: &mut Criterion) {
    let (first, second) = frames();
    let mut encoder =
        DeltaEncoder::with_config(ROWS, COLS, config()).expect("frame fits size field");
    c.bench_function("delta_encode_1920x1080", |b| {
        b.iter(|| {
            encoder.set_initial_frame(&first).expect("same shape");
            encoder.encode(black_box(&second))
        })
    });
}

fn bench_delta_decode_1920x1080(c: &mut Criterion) {
    let (first, second) = frames();
    let mut encoder =
        DeltaEncoder::with_config(ROWS, COLS, config()).expect("frame fits size field");
    encoder.set_initial_frame(&first).expect("same shape");
    let message = encoder.encode(&second).expect("encoder synced");

    let mut decoder =
        DeltaDecoder::with_config(ROWS, COLS, config()).expect("frame fits size field");
    c.bench_function("delta_decode_1920x1080", |b| {
        b.iter(|| {
            decoder.set_initial_frame(&first).expect("same shape");
            decoder.decode(black_box(&message))
        })
    });
}

criterion_group!(
    benches,
    bench_xor_1920x1080,
    bench_delta_encode_1920x1080,
    bench_delta_decode_1920x1080
);
criterion_main!(benches);
