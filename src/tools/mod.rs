//! Load and save frames as image files.
//!
//! A set bit is rendered black, a clear bit white, matching the
//! "dark sample = set" convention of the binarizers.

use std::path::Path;

use image::GrayImage;
use tracing::debug;

use crate::error::{Result, SgfError};
use crate::models::BitMatrix;
use crate::utils::binarization::{otsu_binarize, threshold_binarize};

/// How to turn luma samples into bits when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threshold {
    /// Pick the threshold with Otsu's method.
    #[default]
    Otsu,
    /// Samples below this value become set bits.
    Fixed(u8),
}

/// Load any image format supported by `image` as a frame.
///
/// The image height becomes `rows` and its width `cols`.
pub fn load_frame<P: AsRef<Path>>(path: P, threshold: Threshold) -> Result<BitMatrix> {
    let path = path.as_ref();
    let luma = image::open(path)?.to_luma8();
    let (width, height) = luma.dimensions();
    let (rows, cols) = (height as usize, width as usize);

    let frame = match threshold {
        Threshold::Otsu => otsu_binarize(luma.as_raw(), rows, cols)?,
        Threshold::Fixed(t) => threshold_binarize(luma.as_raw(), rows, cols, t)?,
    };
    debug!(path = %path.display(), rows, cols, set = frame.count_ones(), "loaded frame");
    Ok(frame)
}

/// Render a frame as a black/white 8-bit image.
pub fn to_image(frame: &BitMatrix) -> Result<GrayImage> {
    let pixels: Vec<u8> = frame.bits().map(|bit| if bit { 0 } else { 255 }).collect();
    let available = pixels.len();
    GrayImage::from_raw(frame.cols() as u32, frame.rows() as u32, pixels).ok_or(
        SgfError::BufferOverrun {
            required: frame.len(),
            available,
        },
    )
}

/// Save a frame; the format follows the file extension.
pub fn save_frame<P: AsRef<Path>>(frame: &BitMatrix, path: P) -> Result<()> {
    let path = path.as_ref();
    to_image(frame)?.save(path)?;
    debug!(path = %path.display(), rows = frame.rows(), cols = frame.cols(), "saved frame");
    Ok(())
}

/// Summary statistics for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Count of set bits.
    pub set: usize,
    /// Count of clear bits.
    pub clear: usize,
    /// Set bits / total bits (0.0 for an empty frame).
    pub density: f64,
}

/// Compute set/clear counts for a frame.
pub fn frame_stats(frame: &BitMatrix) -> FrameStats {
    let total = frame.len();
    let set = frame.count_ones();
    let density = if total == 0 {
        0.0
    } else {
        set as f64 / total as f64
    };
    FrameStats {
        set,
        clear: total - set,
        density,
    }
}
