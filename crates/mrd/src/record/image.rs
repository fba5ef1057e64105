//! Image records.

use std::fmt;
use std::io::{Cursor, Read, Write};

use ndarray::{Array4, ArrayD, ArrayView4, ArrayViewMut4};
use num_complex::{Complex32, Complex64};
use tracing::trace;

use crate::error::{MrdError, Result};
use crate::header::{FieldValue, IMAGE_HEADER_LEN, ImageField, ImageHeader};
use crate::header::acquisition::AcquisitionHeader;
use crate::kind::{DataType, Element};
use crate::record::{Acquisition, array4_from_vec, count_u16};
use crate::wire;

/// Image voxel data, shaped `(channels, nz, ny, nx)`.
///
/// The variant always matches the owning header's `data_type` code.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    Ushort(Array4<u16>),
    Short(Array4<i16>),
    Uint(Array4<u32>),
    Int(Array4<i32>),
    Float(Array4<f32>),
    Double(Array4<f64>),
    CxFloat(Array4<Complex32>),
    CxDouble(Array4<Complex64>),
}

macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            ImageData::Ushort($arr) => $body,
            ImageData::Short($arr) => $body,
            ImageData::Uint($arr) => $body,
            ImageData::Int($arr) => $body,
            ImageData::Float($arr) => $body,
            ImageData::Double($arr) => $body,
            ImageData::CxFloat($arr) => $body,
            ImageData::CxDouble($arr) => $body,
        }
    };
}

fn kind_of<T: ImageElement>(_: &Array4<T>) -> DataType {
    T::DATA_TYPE
}

fn read_array4<R: Read, T: Element>(
    source: &mut R,
    dim: (usize, usize, usize, usize),
    section: &'static str,
) -> Result<Array4<T>> {
    let count = element_count(dim, T::WIDTH)?;
    let flat = wire::read_elements(source, count, section)?;
    Ok(array4_from_vec(dim, flat))
}

fn element_count(dim: (usize, usize, usize, usize), width: usize) -> Result<usize> {
    let count = dim
        .0
        .checked_mul(dim.1)
        .and_then(|n| n.checked_mul(dim.2))
        .and_then(|n| n.checked_mul(dim.3));
    // The byte total must fit too, or the read below would size its buffer
    // from a wrapped product.
    match count {
        Some(count) if count.checked_mul(width).is_some() => Ok(count),
        _ => Err(MrdError::InvalidFieldValue {
            field: "matrix_size",
            message: "element count overflows".to_string(),
        }),
    }
}

impl ImageData {
    /// A zero-filled buffer of the given kind and shape.
    #[must_use]
    pub fn zeros(data_type: DataType, dim: (usize, usize, usize, usize)) -> Self {
        match data_type {
            DataType::Ushort => Self::Ushort(Array4::zeros(dim)),
            DataType::Short => Self::Short(Array4::zeros(dim)),
            DataType::Uint => Self::Uint(Array4::zeros(dim)),
            DataType::Int => Self::Int(Array4::zeros(dim)),
            DataType::Float => Self::Float(Array4::zeros(dim)),
            DataType::Double => Self::Double(Array4::zeros(dim)),
            DataType::CxFloat => Self::CxFloat(Array4::zeros(dim)),
            DataType::CxDouble => Self::CxDouble(Array4::zeros(dim)),
        }
    }

    /// The buffer's element kind.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        with_array!(self, arr => kind_of(arr))
    }

    /// The buffer's shape as `(channels, nz, ny, nx)`.
    #[must_use]
    pub fn dim(&self) -> (usize, usize, usize, usize) {
        with_array!(self, arr => arr.dim())
    }

    fn write_into<W: Write>(&self, sink: &mut W) -> Result<()> {
        with_array!(self, arr => wire::write_elements(sink, arr.iter()))
    }

    fn read_from<R: Read>(
        source: &mut R,
        data_type: DataType,
        dim: (usize, usize, usize, usize),
        section: &'static str,
    ) -> Result<Self> {
        match data_type {
            DataType::Ushort => Ok(Self::Ushort(read_array4(source, dim, section)?)),
            DataType::Short => Ok(Self::Short(read_array4(source, dim, section)?)),
            DataType::Uint => Ok(Self::Uint(read_array4(source, dim, section)?)),
            DataType::Int => Ok(Self::Int(read_array4(source, dim, section)?)),
            DataType::Float => Ok(Self::Float(read_array4(source, dim, section)?)),
            DataType::Double => Ok(Self::Double(read_array4(source, dim, section)?)),
            DataType::CxFloat => Ok(Self::CxFloat(read_array4(source, dim, section)?)),
            DataType::CxDouble => Ok(Self::CxDouble(read_array4(source, dim, section)?)),
        }
    }
}

/// An element type that can back an image buffer.
pub trait ImageElement: Element {
    /// Wrap an owned buffer in the matching [`ImageData`] variant.
    fn wrap(array: Array4<Self>) -> ImageData;

    /// View the buffer if its kind matches `Self`.
    fn view(data: &ImageData) -> Option<ArrayView4<'_, Self>>;

    /// Mutable view of the buffer if its kind matches `Self`.
    fn view_mut(data: &mut ImageData) -> Option<ArrayViewMut4<'_, Self>>;
}

macro_rules! impl_image_element {
    ($ty:ty, $variant:ident) => {
        impl ImageElement for $ty {
            fn wrap(array: Array4<Self>) -> ImageData {
                ImageData::$variant(array)
            }

            fn view(data: &ImageData) -> Option<ArrayView4<'_, Self>> {
                match data {
                    ImageData::$variant(array) => Some(array.view()),
                    _ => None,
                }
            }

            fn view_mut(data: &mut ImageData) -> Option<ArrayViewMut4<'_, Self>> {
                match data {
                    ImageData::$variant(array) => Some(array.view_mut()),
                    _ => None,
                }
            }
        }
    };
}

impl_image_element!(u16, Ushort);
impl_image_element!(i16, Short);
impl_image_element!(u32, Uint);
impl_image_element!(i32, Int);
impl_image_element!(f32, Float);
impl_image_element!(f64, Double);
impl_image_element!(Complex32, CxFloat);
impl_image_element!(Complex64, CxDouble);

/// A reconstructed image with its header and attribute string.
///
/// The voxel buffer is shaped `(channels, nz, ny, nx)` where
/// `(nx, ny, nz) = matrix_size`; the buffer's element kind always matches
/// the header's `data_type` code, and the attribute string's byte length
/// always matches `attribute_string_len`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    head: ImageHeader,
    data: ImageData,
    attribute_string: String,
}

impl Default for Image {
    fn default() -> Self {
        let head = ImageHeader {
            data_type: DataType::CxFloat.code(),
            ..Default::default()
        };
        Self {
            head,
            data: ImageData::zeros(DataType::CxFloat, (0, 0, 0, 0)),
            attribute_string: String::new(),
        }
    }
}

impl Image {
    /// Header fields derived from the buffer and attribute string; writable
    /// only through [`Image::resize`], [`Image::set_head`], and
    /// [`Image::set_attribute_string`].
    pub const READ_ONLY_FIELDS: [ImageField; 4] = [
        ImageField::DataType,
        ImageField::MatrixSize,
        ImageField::Channels,
        ImageField::AttributeStringLen,
    ];

    /// Build an image from a header, with a zero-filled buffer at the
    /// header-declared shape and kind.
    ///
    /// # Errors
    /// - `UnsupportedKind` if `head.data_type` has no registered kind.
    /// - `InconsistentLength` if `attribute_string`'s byte length differs
    ///   from `head.attribute_string_len`. Nothing is constructed on
    ///   failure.
    pub fn from_header(head: ImageHeader, attribute_string: impl Into<String>) -> Result<Self> {
        let attribute_string = attribute_string.into();
        let declared = head.attribute_string_len as usize;
        if attribute_string.len() != declared {
            return Err(MrdError::InconsistentLength {
                expected: declared,
                actual: attribute_string.len(),
            });
        }
        let data_type = DataType::from_code(head.data_type)?;
        Ok(Self {
            data: ImageData::zeros(data_type, header_dim(&head)),
            head,
            attribute_string,
        })
    }

    /// Build an image from voxel data of 1 to 4 dimensions.
    ///
    /// The element kind comes from the array's element type. Axes map to
    /// header fields from the trailing (fastest-varying) axis outwards:
    /// the reversed shape fills `(nx, ny, nz, channels)`, with absent
    /// leading axes defaulting to 1. So a 1-D array of `n` elements becomes
    /// `(1, 1, 1, n)`, a 2-D `(a, b)` becomes `(1, 1, a, b)`, a 3-D
    /// `(a, b, c)` becomes `(1, a, b, c)`, and a 4-D array is taken as
    /// `(channels, nz, ny, nx)` directly.
    ///
    /// Spatial and timing context is copied from `acquisition`'s header
    /// when given; otherwise the header starts from defaults with
    /// `version = 1`. `overrides` are applied afterwards.
    ///
    /// # Errors
    /// `InvalidFieldValue` if the array has more than 4 dimensions, a
    /// dimension exceeds its count field's range, or an override names a
    /// derived field or mismatches its field's type or arity.
    pub fn from_array<T: ImageElement>(
        array: ArrayD<T>,
        acquisition: Option<&Acquisition>,
        overrides: &[(ImageField, FieldValue)],
    ) -> Result<Self> {
        if array.ndim() == 0 || array.ndim() > 4 {
            return Err(MrdError::InvalidFieldValue {
                field: "matrix_size",
                message: format!("expected a 1-D to 4-D array, got {}-D", array.ndim()),
            });
        }

        // Reversed shape with defaults of 1: (nx, ny, nz, channels).
        let mut reversed = [1usize; 4];
        for (slot, dim) in reversed.iter_mut().zip(array.shape().iter().rev()) {
            *slot = *dim;
        }
        let [nx, ny, nz, channels] = reversed;

        let base = match acquisition {
            Some(acquisition) => acquisition.head(),
            None => AcquisitionHeader {
                version: 1,
                ..Default::default()
            },
        };
        let mut head = ImageHeader::from_acquisition(&base, &[])?;
        head.data_type = T::DATA_TYPE.code();
        head.channels = count_u16("channels", channels)?;
        head.matrix_size = [
            count_u16("matrix_size", nx)?,
            count_u16("matrix_size", ny)?,
            count_u16("matrix_size", nz)?,
        ];

        for (field, value) in overrides {
            if Self::READ_ONLY_FIELDS.contains(field) {
                return Err(MrdError::InvalidFieldValue {
                    field: field.name(),
                    message: "derived at construction and cannot be overridden".to_string(),
                });
            }
            head.set_field(*field, value)?;
        }

        let flat: Vec<T> = array.iter().copied().collect();
        let data = T::wrap(array4_from_vec((channels, nz, ny, nx), flat));
        Ok(Self {
            head,
            data,
            attribute_string: String::new(),
        })
    }

    /// An independent copy of the header.
    #[must_use]
    pub fn head(&self) -> ImageHeader {
        self.head
    }

    /// Replace the header, resetting the buffer to a zero-filled array of
    /// the new header's kind and shape.
    ///
    /// # Errors
    /// - `UnsupportedKind` if `head.data_type` has no registered kind.
    /// - `InconsistentLength` if `head.attribute_string_len` disagrees with
    ///   the current attribute string; replace the string first (or use
    ///   [`Image::from_header`]). The image is unchanged on failure.
    pub fn set_head(&mut self, head: ImageHeader) -> Result<()> {
        let data_type = DataType::from_code(head.data_type)?;
        let declared = head.attribute_string_len as usize;
        if declared != self.attribute_string.len() {
            return Err(MrdError::InconsistentLength {
                expected: declared,
                actual: self.attribute_string.len(),
            });
        }
        self.data = ImageData::zeros(data_type, header_dim(&head));
        self.head = head;
        Ok(())
    }

    /// Reshape the buffer and update the count fields in one step.
    ///
    /// The element kind is unchanged; contents are reset to zero.
    ///
    /// # Errors
    /// `InvalidFieldValue` if a dimension exceeds its count field's range.
    pub fn resize(&mut self, channels: usize, nz: usize, ny: usize, nx: usize) -> Result<()> {
        let channels_u16 = count_u16("channels", channels)?;
        let matrix_size = [
            count_u16("matrix_size", nx)?,
            count_u16("matrix_size", ny)?,
            count_u16("matrix_size", nz)?,
        ];
        self.head.channels = channels_u16;
        self.head.matrix_size = matrix_size;
        self.data = ImageData::zeros(self.data.data_type(), (channels, nz, ny, nx));
        Ok(())
    }

    /// The voxel buffer.
    #[must_use]
    pub fn data(&self) -> &ImageData {
        &self.data
    }

    /// Typed view of the voxel buffer; `None` if `T` is not the buffer's
    /// element kind.
    #[must_use]
    pub fn view<T: ImageElement>(&self) -> Option<ArrayView4<'_, T>> {
        T::view(&self.data)
    }

    /// Typed mutable view of the voxel buffer. The shape and kind cannot
    /// change through a view.
    #[must_use]
    pub fn view_mut<T: ImageElement>(&mut self) -> Option<ArrayViewMut4<'_, T>> {
        T::view_mut(&mut self.data)
    }

    /// The buffer's element kind.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// The header's matrix size, `(nx, ny, nz)` order.
    #[must_use]
    pub fn matrix_size(&self) -> [u16; 3] {
        self.head.matrix_size
    }

    /// The header's channel count.
    #[must_use]
    pub fn channels(&self) -> u16 {
        self.head.channels
    }

    /// The attribute string.
    #[must_use]
    pub fn attribute_string(&self) -> &str {
        &self.attribute_string
    }

    /// Replace the attribute string, updating `attribute_string_len` in the
    /// same step.
    ///
    /// # Errors
    /// `InvalidFieldValue` if the string's byte length exceeds the length
    /// field's u32 range. The image is unchanged on failure.
    pub fn set_attribute_string(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let len = u32::try_from(value.len()).map_err(|_| MrdError::InvalidFieldValue {
            field: "attribute_string_len",
            message: format!("{} exceeds the field's u32 range", value.len()),
        })?;
        self.attribute_string = value;
        self.head.attribute_string_len = len;
        Ok(())
    }

    /// Read a header field as an owned value.
    #[must_use]
    pub fn get_field(&self, field: ImageField) -> FieldValue {
        self.head.get_field(field)
    }

    /// Assign a header field.
    ///
    /// # Errors
    /// - `ReadOnlyField` for the derived fields.
    /// - `InvalidFieldValue` on a type or arity mismatch.
    pub fn set_field(&mut self, field: ImageField, value: &FieldValue) -> Result<()> {
        if Self::READ_ONLY_FIELDS.contains(&field) {
            return Err(MrdError::ReadOnlyField { field: field.name() });
        }
        self.head.set_field(field, value)
    }

    /// Whether flag bit `flag` (1-based) is set.
    #[must_use]
    pub fn is_flag_set(&self, flag: u32) -> bool {
        self.head.is_flag_set(flag)
    }

    /// Set flag bit `flag`.
    pub fn set_flag(&mut self, flag: u32) {
        self.head.set_flag(flag);
    }

    /// Clear flag bit `flag`.
    pub fn clear_flag(&mut self, flag: u32) {
        self.head.clear_flag(flag);
    }

    /// Clear all flag bits.
    pub fn clear_all_flags(&mut self) {
        self.head.clear_all_flags();
    }

    /// The raw 64-bit flags field.
    #[must_use]
    pub fn flags(&self) -> u64 {
        self.head.flags
    }

    /// Write the record to `sink`: header, voxel data, then the attribute
    /// string's bytes with no terminator.
    ///
    /// # Errors
    /// Any error the sink reports.
    pub fn serialize_into<W: Write>(&self, sink: &mut W) -> Result<()> {
        trace!(
            data_type = self.head.data_type,
            channels = self.head.channels,
            matrix_size = ?self.head.matrix_size,
            attribute_string_len = self.head.attribute_string_len,
            "serializing image"
        );
        sink.write_all(&self.head.to_bytes())?;
        self.data.write_into(sink)?;
        sink.write_all(self.attribute_string.as_bytes())?;
        Ok(())
    }

    /// Read a record from `source`, sizing the buffer and attribute string
    /// from the decoded header. Bytes past the expected total are left
    /// unread.
    ///
    /// # Errors
    /// - `TruncatedInput` if `source` runs dry before a section is
    ///   complete.
    /// - `UnsupportedKind` if the decoded `data_type` has no registered
    ///   kind.
    /// - `InvalidFieldValue` if the attribute-string bytes are not valid
    ///   UTF-8.
    pub fn deserialize_from<R: Read>(source: &mut R) -> Result<Self> {
        let mut head_bytes = [0u8; IMAGE_HEADER_LEN];
        wire::read_exact(source, &mut head_bytes, "image header")?;
        let head = ImageHeader::from_bytes(&head_bytes)?;
        let data_type = DataType::from_code(head.data_type)?;
        let dim = header_dim(&head);
        trace!(?data_type, ?dim, "deserializing image");

        let data = ImageData::read_from(source, data_type, dim, "image data")?;

        let mut string_bytes = vec![0u8; head.attribute_string_len as usize];
        wire::read_exact(source, &mut string_bytes, "attribute string")?;
        let attribute_string =
            String::from_utf8(string_bytes).map_err(|_| MrdError::InvalidFieldValue {
                field: "attribute_string",
                message: "attribute-string bytes are not valid UTF-8".to_string(),
            })?;

        Ok(Self {
            head,
            data,
            attribute_string,
        })
    }

    /// Serialize to a single in-memory buffer.
    ///
    /// Equivalent to [`Image::serialize_into`] with a `Vec` sink.
    ///
    /// # Errors
    /// Never fails for an in-memory sink; the `Result` mirrors the
    /// streaming form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf)?;
        Ok(buf)
    }

    /// Deserialize from a single in-memory buffer. Trailing bytes are
    /// ignored.
    ///
    /// # Errors
    /// `TruncatedInput` if the buffer is shorter than the record.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::deserialize_from(&mut Cursor::new(data))
    }
}

fn header_dim(head: &ImageHeader) -> (usize, usize, usize, usize) {
    (
        head.channels as usize,
        head.matrix_size[2] as usize,
        head.matrix_size[1] as usize,
        head.matrix_size[0] as usize,
    )
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (channels, nz, ny, nx) = self.data.dim();
        writeln!(f, "Image (version {})", self.head.version)?;
        writeln!(
            f,
            "  data: {channels} channels x {nz}x{ny}x{nx} ({:?})",
            self.data.data_type()
        )?;
        writeln!(
            f,
            "  attribute string: {} bytes",
            self.head.attribute_string_len
        )?;
        write!(f, "  flags: {:#018x}", self.head.flags)
    }
}
