//! Fixed-layout record headers.
//!
//! Two header variants share the same packing discipline: every field is
//! written at an explicit byte offset in little-endian order, reproducing
//! the 2-byte-packed reference layout exactly. The packed byte sequence is
//! the wire contract; the Rust structs are plain owned data.

pub mod acquisition;
pub mod encoding;
pub mod fields;
pub(crate) mod pack;
pub mod image;

pub use acquisition::{ACQUISITION_HEADER_LEN, AcquisitionHeader};
pub use encoding::{ENCODING_COUNTERS_LEN, EncodingCounters};
pub use fields::{AcquisitionField, FieldValue, ImageField};
pub use image::{IMAGE_HEADER_LEN, ImageHeader};

/// Mask selecting flag bit `flag` in a 64-bit flags field.
///
/// Flag numbers are 1-based: flag `n` occupies bit `n - 1`.
///
/// # Panics
/// If `flag` is not in `1..=64`.
pub(crate) fn flag_mask(flag: u32) -> u64 {
    assert!(
        (1..=64).contains(&flag),
        "flag number must be in 1..=64, got {flag}"
    );
    1u64 << (flag - 1)
}
