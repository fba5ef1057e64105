//! Records: a header plus the buffers it describes.
//!
//! Each record exclusively owns its header, its numeric buffer(s), and (for
//! images) its attribute string. Shape-owning header fields are derived from
//! the buffers and protected against direct writes, so a record's header and
//! buffers can never disagree between public calls.

pub mod acquisition;
pub mod image;

pub use acquisition::Acquisition;
pub use image::{Image, ImageData, ImageElement};

use ndarray::{Array2, Array4};

use crate::error::{MrdError, Result};

/// Convert a buffer dimension into a u16 count field.
pub(crate) fn count_u16(field: &'static str, value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| MrdError::InvalidFieldValue {
        field,
        message: format!("{value} exceeds the field's u16 range"),
    })
}

/// Build a 2-D array from a flat row-major vector.
///
/// Callers guarantee `data.len() == rows * cols`.
pub(crate) fn array2_from_vec<T: Copy>(rows: usize, cols: usize, data: Vec<T>) -> Array2<T> {
    debug_assert_eq!(rows * cols, data.len());
    Array2::from_shape_fn((rows, cols), |(r, c)| data[r * cols + c])
}

/// Build a 4-D array from a flat row-major vector.
///
/// Callers guarantee `data.len()` equals the product of `dim`.
pub(crate) fn array4_from_vec<T: Copy>(
    dim: (usize, usize, usize, usize),
    data: Vec<T>,
) -> Array4<T> {
    let (_, d1, d2, d3) = dim;
    debug_assert_eq!(dim.0 * d1 * d2 * d3, data.len());
    Array4::from_shape_fn(dim, |(a, b, c, d)| data[((a * d1 + b) * d2 + c) * d3 + d])
}
