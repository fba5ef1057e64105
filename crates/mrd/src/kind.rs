//! Element-kind codec.
//!
//! Maps the enumerated storage kinds carried in image headers to their byte
//! widths and in-memory representations, and back. The codes are part of the
//! wire contract and must not change.

use num_complex::{Complex32, Complex64};

use crate::error::{MrdError, Result};

/// Storage kind of a record's numeric elements.
///
/// The discriminants are the wire codes stored in the image header's
/// `data_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DataType {
    /// 16-bit unsigned integer.
    Ushort = 1,
    /// 16-bit signed integer.
    Short = 2,
    /// 32-bit unsigned integer.
    Uint = 3,
    /// 32-bit signed integer.
    Int = 4,
    /// 32-bit float.
    Float = 5,
    /// 64-bit float.
    Double = 6,
    /// Complex of two 32-bit floats.
    CxFloat = 7,
    /// Complex of two 64-bit floats.
    CxDouble = 8,
}

impl DataType {
    /// Decode a wire code.
    ///
    /// # Errors
    /// `UnsupportedKind` if the code has no registered kind.
    pub fn from_code(code: u16) -> Result<Self> {
        match code {
            1 => Ok(Self::Ushort),
            2 => Ok(Self::Short),
            3 => Ok(Self::Uint),
            4 => Ok(Self::Int),
            5 => Ok(Self::Float),
            6 => Ok(Self::Double),
            7 => Ok(Self::CxFloat),
            8 => Ok(Self::CxDouble),
            other => Err(MrdError::UnsupportedKind { code: other }),
        }
    }

    /// The wire code for this kind.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Storage width of one element in bytes.
    #[must_use]
    pub const fn byte_width(self) -> usize {
        match self {
            Self::Ushort | Self::Short => 2,
            Self::Uint | Self::Int | Self::Float => 4,
            Self::Double | Self::CxFloat => 8,
            Self::CxDouble => 16,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A numeric element type with a registered storage kind.
///
/// Implemented for the eight supported representations only; the trait is
/// sealed so the kind set and the type set stay strict inverses of each
/// other.
pub trait Element:
    sealed::Sealed + Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static
{
    /// The kind code registered for this representation.
    const DATA_TYPE: DataType;

    /// Storage width in bytes.
    const WIDTH: usize = Self::DATA_TYPE.byte_width();

    /// Append the little-endian encoding of `self` to `out`.
    fn write_le(&self, out: &mut Vec<u8>);

    /// Decode one element from the first `WIDTH` bytes of `bytes`.
    ///
    /// Callers guarantee `bytes.len() >= WIDTH`.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_element {
    ($ty:ty, $kind:ident) => {
        impl sealed::Sealed for $ty {}

        impl Element for $ty {
            const DATA_TYPE: DataType = DataType::$kind;

            fn write_le(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..size_of::<$ty>()]);
                Self::from_le_bytes(raw)
            }
        }
    };
}

impl_scalar_element!(u16, Ushort);
impl_scalar_element!(i16, Short);
impl_scalar_element!(u32, Uint);
impl_scalar_element!(i32, Int);
impl_scalar_element!(f32, Float);
impl_scalar_element!(f64, Double);

impl sealed::Sealed for Complex32 {}

impl Element for Complex32 {
    const DATA_TYPE: DataType = DataType::CxFloat;

    fn write_le(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.re.to_le_bytes());
        out.extend_from_slice(&self.im.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        Self::new(f32::read_le(&bytes[..4]), f32::read_le(&bytes[4..8]))
    }
}

impl sealed::Sealed for Complex64 {}

impl Element for Complex64 {
    const DATA_TYPE: DataType = DataType::CxDouble;

    fn write_le(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.re.to_le_bytes());
        out.extend_from_slice(&self.im.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        Self::new(f64::read_le(&bytes[..8]), f64::read_le(&bytes[8..16]))
    }
}
