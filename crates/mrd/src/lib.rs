//! MRD (MR raw data) record format.
//!
//! This crate provides the MRD record data model: fixed-layout binary
//! headers, shape-derived numeric buffers, and a byte-exact serialization
//! contract, independent of host alignment and endianness rules.
//!
//! # Records
//!
//! - [`Acquisition`]: one readout of complex sample data shaped
//!   `(active_channels, number_of_samples)`, with an optional k-space
//!   trajectory shaped `(number_of_samples, trajectory_dimensions)`.
//! - [`Image`]: a reconstructed volume shaped `(channels, nz, ny, nx)` in
//!   any of eight element kinds, with an opaque attribute string.
//!
//! Each record owns its header and buffers exclusively; the header's count
//! fields are derived from the buffer shapes and protected against direct
//! writes, so the two can never disagree.
//!
//! # Example
//!
//! ```
//! use mrd::{Acquisition, AcquisitionField, FieldValue};
//! use ndarray::Array2;
//! use num_complex::Complex32;
//!
//! let data = Array2::from_elem((32, 256), Complex32::new(1.0, -1.0));
//! let acquisition = Acquisition::from_array(
//!     data,
//!     None,
//!     &[(AcquisitionField::MeasurementUid, FieldValue::U32(42))],
//! )?;
//!
//! let bytes = acquisition.to_bytes()?;
//! let restored = Acquisition::from_bytes(&bytes)?;
//! assert_eq!(restored, acquisition);
//! # Ok::<(), mrd::MrdError>(())
//! ```
//!
//! # Wire format
//!
//! Per record, in order: the packed header (340 bytes for acquisitions,
//! 198 for images), the trajectory bytes (acquisitions only), the buffer
//! bytes in declared shape order, and the attribute-string bytes (images
//! only). All multi-byte values are little-endian. Deserialization reads
//! exactly the expected lengths and fails with
//! [`MrdError::TruncatedInput`] on a short source; trailing extra bytes
//! are deliberately not an error, so records can be framed back to back.

pub mod constants;
mod error;
pub mod header;
mod kind;
mod record;
mod wire;

pub use error::{MrdError, Result};
pub use header::{
    ACQUISITION_HEADER_LEN, AcquisitionField, AcquisitionHeader, ENCODING_COUNTERS_LEN,
    EncodingCounters, FieldValue, IMAGE_HEADER_LEN, ImageField, ImageHeader,
};
pub use kind::{DataType, Element};
pub use record::{Acquisition, Image, ImageData, ImageElement};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
