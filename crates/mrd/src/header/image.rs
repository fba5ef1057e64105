//! Image header layout.
//!
//! # Layout (198 bytes, little-endian)
//!
//! | Offset | Field                  | Type     |
//! |--------|------------------------|----------|
//! | 0      | version                | u16      |
//! | 2      | data_type              | u16      |
//! | 4      | flags                  | u64      |
//! | 12     | measurement_uid        | u32      |
//! | 16     | matrix_size            | [u16; 3] |
//! | 22     | field_of_view          | [f32; 3] |
//! | 34     | channels               | u16      |
//! | 36     | position               | [f32; 3] |
//! | 48     | read_dir               | [f32; 3] |
//! | 60     | phase_dir              | [f32; 3] |
//! | 72     | slice_dir              | [f32; 3] |
//! | 84     | patient_table_position | [f32; 3] |
//! | 96     | average                | u16      |
//! | 98     | slice                  | u16      |
//! | 100    | contrast               | u16      |
//! | 102    | phase                  | u16      |
//! | 104    | repetition             | u16      |
//! | 106    | set                    | u16      |
//! | 108    | acquisition_time_stamp | u32      |
//! | 112    | physiology_time_stamp  | [u32; 3] |
//! | 124    | image_type             | u16      |
//! | 126    | image_index            | u16      |
//! | 128    | image_series_index     | u16      |
//! | 130    | user_int               | [i32; 8] |
//! | 162    | user_float             | [f32; 8] |
//! | 194    | attribute_string_len   | u32      |

use crate::constants::{DIRECTION_LENGTH, PHYS_STAMPS, POSITION_LENGTH, USER_FLOATS, USER_INTS};
use crate::error::{MrdError, Result};
use crate::header::acquisition::AcquisitionHeader;
use crate::header::fields::{FieldValue, ImageField};
use crate::header::{flag_mask, pack};

/// Byte width of the packed image header.
pub const IMAGE_HEADER_LEN: usize = 198;

/// Fixed metadata preceding one image's voxel data.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImageHeader {
    pub version: u16,
    pub data_type: u16,
    pub flags: u64,
    pub measurement_uid: u32,
    pub matrix_size: [u16; POSITION_LENGTH],
    pub field_of_view: [f32; POSITION_LENGTH],
    pub channels: u16,
    pub position: [f32; POSITION_LENGTH],
    pub read_dir: [f32; DIRECTION_LENGTH],
    pub phase_dir: [f32; DIRECTION_LENGTH],
    pub slice_dir: [f32; DIRECTION_LENGTH],
    pub patient_table_position: [f32; POSITION_LENGTH],
    pub average: u16,
    pub slice: u16,
    pub contrast: u16,
    pub phase: u16,
    pub repetition: u16,
    pub set: u16,
    pub acquisition_time_stamp: u32,
    pub physiology_time_stamp: [u32; PHYS_STAMPS],
    pub image_type: u16,
    pub image_index: u16,
    pub image_series_index: u16,
    pub user_int: [i32; USER_INTS],
    pub user_float: [f32; USER_FLOATS],
    pub attribute_string_len: u32,
}

impl ImageHeader {
    /// Build an image header from an acquisition header.
    ///
    /// Copies the spatial and timing context an image inherits from the
    /// acquisition it was reconstructed from, then applies `overrides`
    /// through [`ImageHeader::set_field`]. The copied set is fixed:
    /// version, measurement_uid, position, read_dir, phase_dir, slice_dir,
    /// patient_table_position, acquisition_time_stamp,
    /// physiology_time_stamp.
    ///
    /// # Errors
    /// `InvalidFieldValue` if an override's value does not match its
    /// field's declared type or arity.
    pub fn from_acquisition(
        acquisition: &AcquisitionHeader,
        overrides: &[(ImageField, FieldValue)],
    ) -> Result<Self> {
        let mut header = Self {
            version: acquisition.version,
            measurement_uid: acquisition.measurement_uid,
            position: acquisition.position,
            read_dir: acquisition.read_dir,
            phase_dir: acquisition.phase_dir,
            slice_dir: acquisition.slice_dir,
            patient_table_position: acquisition.patient_table_position,
            acquisition_time_stamp: acquisition.acquisition_time_stamp,
            physiology_time_stamp: acquisition.physiology_time_stamp,
            ..Self::default()
        };
        for (field, value) in overrides {
            header.set_field(*field, value)?;
        }
        Ok(header)
    }

    /// Pack the header into its exact wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; IMAGE_HEADER_LEN] {
        let mut buf = [0u8; IMAGE_HEADER_LEN];
        pack::write_u16(&mut buf, 0, self.version);
        pack::write_u16(&mut buf, 2, self.data_type);
        pack::write_u64(&mut buf, 4, self.flags);
        pack::write_u32(&mut buf, 12, self.measurement_uid);
        pack::write_u16_array(&mut buf, 16, &self.matrix_size);
        pack::write_f32_array(&mut buf, 22, &self.field_of_view);
        pack::write_u16(&mut buf, 34, self.channels);
        pack::write_f32_array(&mut buf, 36, &self.position);
        pack::write_f32_array(&mut buf, 48, &self.read_dir);
        pack::write_f32_array(&mut buf, 60, &self.phase_dir);
        pack::write_f32_array(&mut buf, 72, &self.slice_dir);
        pack::write_f32_array(&mut buf, 84, &self.patient_table_position);
        pack::write_u16(&mut buf, 96, self.average);
        pack::write_u16(&mut buf, 98, self.slice);
        pack::write_u16(&mut buf, 100, self.contrast);
        pack::write_u16(&mut buf, 102, self.phase);
        pack::write_u16(&mut buf, 104, self.repetition);
        pack::write_u16(&mut buf, 106, self.set);
        pack::write_u32(&mut buf, 108, self.acquisition_time_stamp);
        pack::write_u32_array(&mut buf, 112, &self.physiology_time_stamp);
        pack::write_u16(&mut buf, 124, self.image_type);
        pack::write_u16(&mut buf, 126, self.image_index);
        pack::write_u16(&mut buf, 128, self.image_series_index);
        pack::write_i32_array(&mut buf, 130, &self.user_int);
        pack::write_f32_array(&mut buf, 162, &self.user_float);
        pack::write_u32(&mut buf, 194, self.attribute_string_len);
        buf
    }

    /// Decode a header from its wire layout.
    ///
    /// # Errors
    /// `TruncatedInput` if `data` holds fewer than 198 bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < IMAGE_HEADER_LEN {
            return Err(MrdError::TruncatedInput {
                section: "image header",
                needed: IMAGE_HEADER_LEN,
            });
        }
        Ok(Self {
            version: pack::read_u16(data, 0),
            data_type: pack::read_u16(data, 2),
            flags: pack::read_u64(data, 4),
            measurement_uid: pack::read_u32(data, 12),
            matrix_size: pack::read_u16_array(data, 16),
            field_of_view: pack::read_f32_array(data, 22),
            channels: pack::read_u16(data, 34),
            position: pack::read_f32_array(data, 36),
            read_dir: pack::read_f32_array(data, 48),
            phase_dir: pack::read_f32_array(data, 60),
            slice_dir: pack::read_f32_array(data, 72),
            patient_table_position: pack::read_f32_array(data, 84),
            average: pack::read_u16(data, 96),
            slice: pack::read_u16(data, 98),
            contrast: pack::read_u16(data, 100),
            phase: pack::read_u16(data, 102),
            repetition: pack::read_u16(data, 104),
            set: pack::read_u16(data, 106),
            acquisition_time_stamp: pack::read_u32(data, 108),
            physiology_time_stamp: pack::read_u32_array(data, 112),
            image_type: pack::read_u16(data, 124),
            image_index: pack::read_u16(data, 126),
            image_series_index: pack::read_u16(data, 128),
            user_int: pack::read_i32_array(data, 130),
            user_float: pack::read_f32_array(data, 162),
            attribute_string_len: pack::read_u32(data, 194),
        })
    }

    /// Whether flag bit `flag` (1-based) is set.
    #[must_use]
    pub fn is_flag_set(&self, flag: u32) -> bool {
        self.flags & flag_mask(flag) != 0
    }

    /// Set flag bit `flag`. Idempotent.
    pub fn set_flag(&mut self, flag: u32) {
        self.flags |= flag_mask(flag);
    }

    /// Clear flag bit `flag`. A no-op if the bit is already clear.
    pub fn clear_flag(&mut self, flag: u32) {
        self.flags &= !flag_mask(flag);
    }

    /// Clear all 64 flag bits.
    pub fn clear_all_flags(&mut self) {
        self.flags = 0;
    }
}
