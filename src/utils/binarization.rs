use crate::error::{Result, SgfError};
use crate::models::BitMatrix;

fn samples(gray: &[u8], rows: usize, cols: usize) -> Result<&[u8]> {
    let required = rows * cols;
    if gray.len() < required {
        return Err(SgfError::BufferOverrun {
            required,
            available: gray.len(),
        });
    }
    Ok(&gray[..required])
}

/// Convert 8-bit samples to a frame using Otsu's thresholding method.
/// Returns a BitMatrix where true = dark (below threshold)
pub fn otsu_binarize(gray: &[u8], rows: usize, cols: usize) -> Result<BitMatrix> {
    let threshold = calculate_otsu_threshold(samples(gray, rows, cols)?);
    threshold_binarize(gray, rows, cols, threshold)
}

/// Calculate Otsu's optimal threshold
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &sample in gray {
        histogram[sample as usize] += 1;
    }

    let total = gray.len() as f64;
    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    for threshold in 0..=255u8 {
        let mut class1_count = 0u64;
        let mut class1_sum = 0u64;
        let mut class2_count = 0u64;
        let mut class2_sum = 0u64;

        for (intensity, &count) in histogram.iter().enumerate() {
            if intensity < threshold as usize {
                class1_count += count;
                class1_sum += count * intensity as u64;
            } else {
                class2_count += count;
                class2_sum += count * intensity as u64;
            }
        }

        if class1_count == 0 || class2_count == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_count as f64;
        let class2_mean = class2_sum as f64 / class2_count as f64;

        let weight1 = class1_count as f64 / total;
        let weight2 = class2_count as f64 / total;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization, row-major `rows x cols` samples
pub fn threshold_binarize(gray: &[u8], rows: usize, cols: usize, threshold: u8) -> Result<BitMatrix> {
    let gray = samples(gray, rows, cols)?;
    BitMatrix::from_bits(rows, cols, gray.iter().map(|&s| s < threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = vec![100, 150, 200, 50]; // 2x2 frame
        let binary = threshold_binarize(&gray, 2, 2, 128).unwrap();

        // Samples < 128 should be set
        assert!(binary.get_bit(0, 0).unwrap()); // 100 < 128
        assert!(!binary.get_bit(0, 1).unwrap()); // 150 >= 128
        assert!(!binary.get_bit(1, 0).unwrap()); // 200 >= 128
        assert!(binary.get_bit(1, 1).unwrap()); // 50 < 128
    }

    #[test]
    fn test_otsu_binarize() {
        // Two-class frame: dark top half, light bottom half
        let mut gray = vec![50u8; 50];
        gray.extend(vec![200u8; 50]);

        let binary = otsu_binarize(&gray, 10, 10).unwrap();

        assert!(binary.get_bit(0, 0).unwrap()); // Dark
        assert!(!binary.get_bit(7, 0).unwrap()); // Light
        assert_eq!(binary.count_ones(), 50);
    }

    #[test]
    fn test_short_input_rejected() {
        assert!(matches!(
            threshold_binarize(&[0, 0, 0], 2, 2, 128),
            Err(SgfError::BufferOverrun { required: 4, available: 3 })
        ));
        assert!(otsu_binarize(&[], 1, 1).is_err());
    }
}
