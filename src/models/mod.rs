pub mod matrix;
pub mod view;

pub use matrix::{BitMatrix, packed_len};
pub use view::{SubMatrixView, SubMatrixViewMut};
