//! Frame acquisition helpers
//!
//! Turn 8-bit sensor or image samples into 1-bit frames:
//! - Binarization (Otsu's method and threshold-based)

pub mod binarization;
