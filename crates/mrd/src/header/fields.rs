//! Named field access for the header variants.
//!
//! The reference implementation injects per-field accessor properties at
//! runtime; here the accessor set is a pair of static enums plus one value
//! enum, so a missing or renamed field is a compile error and a mistyped
//! assignment is a checked `InvalidFieldValue`.

use crate::error::{MrdError, Result};
use crate::header::acquisition::AcquisitionHeader;
use crate::header::encoding::EncodingCounters;
use crate::header::image::ImageHeader;

/// A dynamically typed header field value.
///
/// Fixed-arity array fields are carried as vectors and checked against the
/// field's declared arity on assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    U16s(Vec<u16>),
    U32s(Vec<u32>),
    U64s(Vec<u64>),
    I32s(Vec<i32>),
    F32s(Vec<f32>),
    Counters(EncodingCounters),
}

impl FieldValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::U16s(_) => "[u16]",
            Self::U32s(_) => "[u32]",
            Self::U64s(_) => "[u64]",
            Self::I32s(_) => "[i32]",
            Self::F32s(_) => "[f32]",
            Self::Counters(_) => "encoding counters",
        }
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        Self::U16(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<EncodingCounters> for FieldValue {
    fn from(value: EncodingCounters) -> Self {
        Self::Counters(value)
    }
}

fn type_mismatch(field: &'static str, expected: &str, got: &FieldValue) -> MrdError {
    MrdError::InvalidFieldValue {
        field,
        message: format!("expected {expected}, got {}", got.type_name()),
    }
}

fn expect_u16(field: &'static str, value: &FieldValue) -> Result<u16> {
    match value {
        FieldValue::U16(v) => Ok(*v),
        other => Err(type_mismatch(field, "u16", other)),
    }
}

fn expect_u32(field: &'static str, value: &FieldValue) -> Result<u32> {
    match value {
        FieldValue::U32(v) => Ok(*v),
        other => Err(type_mismatch(field, "u32", other)),
    }
}

fn expect_u64(field: &'static str, value: &FieldValue) -> Result<u64> {
    match value {
        FieldValue::U64(v) => Ok(*v),
        other => Err(type_mismatch(field, "u64", other)),
    }
}

fn expect_f32(field: &'static str, value: &FieldValue) -> Result<f32> {
    match value {
        FieldValue::F32(v) => Ok(*v),
        other => Err(type_mismatch(field, "f32", other)),
    }
}

fn expect_counters(field: &'static str, value: &FieldValue) -> Result<EncodingCounters> {
    match value {
        FieldValue::Counters(v) => Ok(*v),
        other => Err(type_mismatch(field, "encoding counters", other)),
    }
}

fn fixed_arity<T: Copy, const N: usize>(field: &'static str, values: &[T]) -> Result<[T; N]> {
    if values.len() != N {
        return Err(MrdError::InvalidFieldValue {
            field,
            message: format!("expected {N} elements, got {}", values.len()),
        });
    }
    Ok(std::array::from_fn(|i| values[i]))
}

fn expect_u16s<const N: usize>(field: &'static str, value: &FieldValue) -> Result<[u16; N]> {
    match value {
        FieldValue::U16s(v) => fixed_arity(field, v),
        other => Err(type_mismatch(field, "[u16]", other)),
    }
}

fn expect_u32s<const N: usize>(field: &'static str, value: &FieldValue) -> Result<[u32; N]> {
    match value {
        FieldValue::U32s(v) => fixed_arity(field, v),
        other => Err(type_mismatch(field, "[u32]", other)),
    }
}

fn expect_u64s<const N: usize>(field: &'static str, value: &FieldValue) -> Result<[u64; N]> {
    match value {
        FieldValue::U64s(v) => fixed_arity(field, v),
        other => Err(type_mismatch(field, "[u64]", other)),
    }
}

fn expect_i32s<const N: usize>(field: &'static str, value: &FieldValue) -> Result<[i32; N]> {
    match value {
        FieldValue::I32s(v) => fixed_arity(field, v),
        other => Err(type_mismatch(field, "[i32]", other)),
    }
}

fn expect_f32s<const N: usize>(field: &'static str, value: &FieldValue) -> Result<[f32; N]> {
    match value {
        FieldValue::F32s(v) => fixed_arity(field, v),
        other => Err(type_mismatch(field, "[f32]", other)),
    }
}

/// Every field of [`AcquisitionHeader`], in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionField {
    Version,
    Flags,
    MeasurementUid,
    ScanCounter,
    AcquisitionTimeStamp,
    PhysiologyTimeStamp,
    NumberOfSamples,
    AvailableChannels,
    ActiveChannels,
    ChannelMask,
    DiscardPre,
    DiscardPost,
    CenterSample,
    EncodingSpaceRef,
    TrajectoryDimensions,
    SampleTimeUs,
    Position,
    ReadDir,
    PhaseDir,
    SliceDir,
    PatientTablePosition,
    Idx,
    UserInt,
    UserFloat,
}

impl AcquisitionField {
    /// The field's wire-layout name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Flags => "flags",
            Self::MeasurementUid => "measurement_uid",
            Self::ScanCounter => "scan_counter",
            Self::AcquisitionTimeStamp => "acquisition_time_stamp",
            Self::PhysiologyTimeStamp => "physiology_time_stamp",
            Self::NumberOfSamples => "number_of_samples",
            Self::AvailableChannels => "available_channels",
            Self::ActiveChannels => "active_channels",
            Self::ChannelMask => "channel_mask",
            Self::DiscardPre => "discard_pre",
            Self::DiscardPost => "discard_post",
            Self::CenterSample => "center_sample",
            Self::EncodingSpaceRef => "encoding_space_ref",
            Self::TrajectoryDimensions => "trajectory_dimensions",
            Self::SampleTimeUs => "sample_time_us",
            Self::Position => "position",
            Self::ReadDir => "read_dir",
            Self::PhaseDir => "phase_dir",
            Self::SliceDir => "slice_dir",
            Self::PatientTablePosition => "patient_table_position",
            Self::Idx => "idx",
            Self::UserInt => "user_int",
            Self::UserFloat => "user_float",
        }
    }
}

/// Every field of [`ImageHeader`], in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageField {
    Version,
    DataType,
    Flags,
    MeasurementUid,
    MatrixSize,
    FieldOfView,
    Channels,
    Position,
    ReadDir,
    PhaseDir,
    SliceDir,
    PatientTablePosition,
    Average,
    Slice,
    Contrast,
    Phase,
    Repetition,
    Set,
    AcquisitionTimeStamp,
    PhysiologyTimeStamp,
    ImageType,
    ImageIndex,
    ImageSeriesIndex,
    UserInt,
    UserFloat,
    AttributeStringLen,
}

impl ImageField {
    /// The field's wire-layout name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::DataType => "data_type",
            Self::Flags => "flags",
            Self::MeasurementUid => "measurement_uid",
            Self::MatrixSize => "matrix_size",
            Self::FieldOfView => "field_of_view",
            Self::Channels => "channels",
            Self::Position => "position",
            Self::ReadDir => "read_dir",
            Self::PhaseDir => "phase_dir",
            Self::SliceDir => "slice_dir",
            Self::PatientTablePosition => "patient_table_position",
            Self::Average => "average",
            Self::Slice => "slice",
            Self::Contrast => "contrast",
            Self::Phase => "phase",
            Self::Repetition => "repetition",
            Self::Set => "set",
            Self::AcquisitionTimeStamp => "acquisition_time_stamp",
            Self::PhysiologyTimeStamp => "physiology_time_stamp",
            Self::ImageType => "image_type",
            Self::ImageIndex => "image_index",
            Self::ImageSeriesIndex => "image_series_index",
            Self::UserInt => "user_int",
            Self::UserFloat => "user_float",
            Self::AttributeStringLen => "attribute_string_len",
        }
    }
}

impl AcquisitionHeader {
    /// Read a field as an owned, independently mutable value.
    #[must_use]
    pub fn get_field(&self, field: AcquisitionField) -> FieldValue {
        match field {
            AcquisitionField::Version => FieldValue::U16(self.version),
            AcquisitionField::Flags => FieldValue::U64(self.flags),
            AcquisitionField::MeasurementUid => FieldValue::U32(self.measurement_uid),
            AcquisitionField::ScanCounter => FieldValue::U32(self.scan_counter),
            AcquisitionField::AcquisitionTimeStamp => FieldValue::U32(self.acquisition_time_stamp),
            AcquisitionField::PhysiologyTimeStamp => {
                FieldValue::U32s(self.physiology_time_stamp.to_vec())
            }
            AcquisitionField::NumberOfSamples => FieldValue::U16(self.number_of_samples),
            AcquisitionField::AvailableChannels => FieldValue::U16(self.available_channels),
            AcquisitionField::ActiveChannels => FieldValue::U16(self.active_channels),
            AcquisitionField::ChannelMask => FieldValue::U64s(self.channel_mask.to_vec()),
            AcquisitionField::DiscardPre => FieldValue::U16(self.discard_pre),
            AcquisitionField::DiscardPost => FieldValue::U16(self.discard_post),
            AcquisitionField::CenterSample => FieldValue::U16(self.center_sample),
            AcquisitionField::EncodingSpaceRef => FieldValue::U16(self.encoding_space_ref),
            AcquisitionField::TrajectoryDimensions => FieldValue::U16(self.trajectory_dimensions),
            AcquisitionField::SampleTimeUs => FieldValue::F32(self.sample_time_us),
            AcquisitionField::Position => FieldValue::F32s(self.position.to_vec()),
            AcquisitionField::ReadDir => FieldValue::F32s(self.read_dir.to_vec()),
            AcquisitionField::PhaseDir => FieldValue::F32s(self.phase_dir.to_vec()),
            AcquisitionField::SliceDir => FieldValue::F32s(self.slice_dir.to_vec()),
            AcquisitionField::PatientTablePosition => {
                FieldValue::F32s(self.patient_table_position.to_vec())
            }
            AcquisitionField::Idx => FieldValue::Counters(self.idx),
            AcquisitionField::UserInt => FieldValue::I32s(self.user_int.to_vec()),
            AcquisitionField::UserFloat => FieldValue::F32s(self.user_float.to_vec()),
        }
    }

    /// Assign a field from a dynamically typed value.
    ///
    /// # Errors
    /// `InvalidFieldValue` if the value's type or arity does not match the
    /// field's declaration. The header is unchanged on failure.
    pub fn set_field(&mut self, field: AcquisitionField, value: &FieldValue) -> Result<()> {
        let name = field.name();
        match field {
            AcquisitionField::Version => self.version = expect_u16(name, value)?,
            AcquisitionField::Flags => self.flags = expect_u64(name, value)?,
            AcquisitionField::MeasurementUid => self.measurement_uid = expect_u32(name, value)?,
            AcquisitionField::ScanCounter => self.scan_counter = expect_u32(name, value)?,
            AcquisitionField::AcquisitionTimeStamp => {
                self.acquisition_time_stamp = expect_u32(name, value)?;
            }
            AcquisitionField::PhysiologyTimeStamp => {
                self.physiology_time_stamp = expect_u32s(name, value)?;
            }
            AcquisitionField::NumberOfSamples => self.number_of_samples = expect_u16(name, value)?,
            AcquisitionField::AvailableChannels => {
                self.available_channels = expect_u16(name, value)?;
            }
            AcquisitionField::ActiveChannels => self.active_channels = expect_u16(name, value)?,
            AcquisitionField::ChannelMask => self.channel_mask = expect_u64s(name, value)?,
            AcquisitionField::DiscardPre => self.discard_pre = expect_u16(name, value)?,
            AcquisitionField::DiscardPost => self.discard_post = expect_u16(name, value)?,
            AcquisitionField::CenterSample => self.center_sample = expect_u16(name, value)?,
            AcquisitionField::EncodingSpaceRef => self.encoding_space_ref = expect_u16(name, value)?,
            AcquisitionField::TrajectoryDimensions => {
                self.trajectory_dimensions = expect_u16(name, value)?;
            }
            AcquisitionField::SampleTimeUs => self.sample_time_us = expect_f32(name, value)?,
            AcquisitionField::Position => self.position = expect_f32s(name, value)?,
            AcquisitionField::ReadDir => self.read_dir = expect_f32s(name, value)?,
            AcquisitionField::PhaseDir => self.phase_dir = expect_f32s(name, value)?,
            AcquisitionField::SliceDir => self.slice_dir = expect_f32s(name, value)?,
            AcquisitionField::PatientTablePosition => {
                self.patient_table_position = expect_f32s(name, value)?;
            }
            AcquisitionField::Idx => self.idx = expect_counters(name, value)?,
            AcquisitionField::UserInt => self.user_int = expect_i32s(name, value)?,
            AcquisitionField::UserFloat => self.user_float = expect_f32s(name, value)?,
        }
        Ok(())
    }
}

impl ImageHeader {
    /// Read a field as an owned, independently mutable value.
    #[must_use]
    pub fn get_field(&self, field: ImageField) -> FieldValue {
        match field {
            ImageField::Version => FieldValue::U16(self.version),
            ImageField::DataType => FieldValue::U16(self.data_type),
            ImageField::Flags => FieldValue::U64(self.flags),
            ImageField::MeasurementUid => FieldValue::U32(self.measurement_uid),
            ImageField::MatrixSize => FieldValue::U16s(self.matrix_size.to_vec()),
            ImageField::FieldOfView => FieldValue::F32s(self.field_of_view.to_vec()),
            ImageField::Channels => FieldValue::U16(self.channels),
            ImageField::Position => FieldValue::F32s(self.position.to_vec()),
            ImageField::ReadDir => FieldValue::F32s(self.read_dir.to_vec()),
            ImageField::PhaseDir => FieldValue::F32s(self.phase_dir.to_vec()),
            ImageField::SliceDir => FieldValue::F32s(self.slice_dir.to_vec()),
            ImageField::PatientTablePosition => {
                FieldValue::F32s(self.patient_table_position.to_vec())
            }
            ImageField::Average => FieldValue::U16(self.average),
            ImageField::Slice => FieldValue::U16(self.slice),
            ImageField::Contrast => FieldValue::U16(self.contrast),
            ImageField::Phase => FieldValue::U16(self.phase),
            ImageField::Repetition => FieldValue::U16(self.repetition),
            ImageField::Set => FieldValue::U16(self.set),
            ImageField::AcquisitionTimeStamp => FieldValue::U32(self.acquisition_time_stamp),
            ImageField::PhysiologyTimeStamp => {
                FieldValue::U32s(self.physiology_time_stamp.to_vec())
            }
            ImageField::ImageType => FieldValue::U16(self.image_type),
            ImageField::ImageIndex => FieldValue::U16(self.image_index),
            ImageField::ImageSeriesIndex => FieldValue::U16(self.image_series_index),
            ImageField::UserInt => FieldValue::I32s(self.user_int.to_vec()),
            ImageField::UserFloat => FieldValue::F32s(self.user_float.to_vec()),
            ImageField::AttributeStringLen => FieldValue::U32(self.attribute_string_len),
        }
    }

    /// Assign a field from a dynamically typed value.
    ///
    /// # Errors
    /// `InvalidFieldValue` if the value's type or arity does not match the
    /// field's declaration. The header is unchanged on failure.
    pub fn set_field(&mut self, field: ImageField, value: &FieldValue) -> Result<()> {
        let name = field.name();
        match field {
            ImageField::Version => self.version = expect_u16(name, value)?,
            ImageField::DataType => self.data_type = expect_u16(name, value)?,
            ImageField::Flags => self.flags = expect_u64(name, value)?,
            ImageField::MeasurementUid => self.measurement_uid = expect_u32(name, value)?,
            ImageField::MatrixSize => self.matrix_size = expect_u16s(name, value)?,
            ImageField::FieldOfView => self.field_of_view = expect_f32s(name, value)?,
            ImageField::Channels => self.channels = expect_u16(name, value)?,
            ImageField::Position => self.position = expect_f32s(name, value)?,
            ImageField::ReadDir => self.read_dir = expect_f32s(name, value)?,
            ImageField::PhaseDir => self.phase_dir = expect_f32s(name, value)?,
            ImageField::SliceDir => self.slice_dir = expect_f32s(name, value)?,
            ImageField::PatientTablePosition => {
                self.patient_table_position = expect_f32s(name, value)?;
            }
            ImageField::Average => self.average = expect_u16(name, value)?,
            ImageField::Slice => self.slice = expect_u16(name, value)?,
            ImageField::Contrast => self.contrast = expect_u16(name, value)?,
            ImageField::Phase => self.phase = expect_u16(name, value)?,
            ImageField::Repetition => self.repetition = expect_u16(name, value)?,
            ImageField::Set => self.set = expect_u16(name, value)?,
            ImageField::AcquisitionTimeStamp => {
                self.acquisition_time_stamp = expect_u32(name, value)?;
            }
            ImageField::PhysiologyTimeStamp => {
                self.physiology_time_stamp = expect_u32s(name, value)?;
            }
            ImageField::ImageType => self.image_type = expect_u16(name, value)?,
            ImageField::ImageIndex => self.image_index = expect_u16(name, value)?,
            ImageField::ImageSeriesIndex => self.image_series_index = expect_u16(name, value)?,
            ImageField::UserInt => self.user_int = expect_i32s(name, value)?,
            ImageField::UserFloat => self.user_float = expect_f32s(name, value)?,
            ImageField::AttributeStringLen => {
                self.attribute_string_len = expect_u32(name, value)?;
            }
        }
        Ok(())
    }
}
