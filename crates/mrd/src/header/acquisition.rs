//! Acquisition header layout.
//!
//! # Layout (340 bytes, little-endian)
//!
//! | Offset | Field                  | Type             |
//! |--------|------------------------|------------------|
//! | 0      | version                | u16              |
//! | 2      | flags                  | u64              |
//! | 10     | measurement_uid        | u32              |
//! | 14     | scan_counter           | u32              |
//! | 18     | acquisition_time_stamp | u32              |
//! | 22     | physiology_time_stamp  | [u32; 3]         |
//! | 34     | number_of_samples      | u16              |
//! | 36     | available_channels     | u16              |
//! | 38     | active_channels        | u16              |
//! | 40     | channel_mask           | [u64; 16]        |
//! | 168    | discard_pre            | u16              |
//! | 170    | discard_post           | u16              |
//! | 172    | center_sample          | u16              |
//! | 174    | encoding_space_ref     | u16              |
//! | 176    | trajectory_dimensions  | u16              |
//! | 178    | sample_time_us         | f32              |
//! | 182    | position               | [f32; 3]         |
//! | 194    | read_dir               | [f32; 3]         |
//! | 206    | phase_dir              | [f32; 3]         |
//! | 218    | slice_dir              | [f32; 3]         |
//! | 230    | patient_table_position | [f32; 3]         |
//! | 242    | idx                    | EncodingCounters |
//! | 276    | user_int               | [i32; 8]         |
//! | 308    | user_float             | [f32; 8]         |

use crate::constants::{
    CHANNEL_MASKS, DIRECTION_LENGTH, PHYS_STAMPS, POSITION_LENGTH, USER_FLOATS, USER_INTS,
};
use crate::error::{MrdError, Result};
use crate::header::encoding::{ENCODING_COUNTERS_LEN, EncodingCounters};
use crate::header::{flag_mask, pack};

/// Byte width of the packed acquisition header.
pub const ACQUISITION_HEADER_LEN: usize = 340;

/// Fixed metadata preceding one acquisition's sample data.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AcquisitionHeader {
    pub version: u16,
    pub flags: u64,
    pub measurement_uid: u32,
    pub scan_counter: u32,
    pub acquisition_time_stamp: u32,
    pub physiology_time_stamp: [u32; PHYS_STAMPS],
    pub number_of_samples: u16,
    pub available_channels: u16,
    pub active_channels: u16,
    pub channel_mask: [u64; CHANNEL_MASKS],
    pub discard_pre: u16,
    pub discard_post: u16,
    pub center_sample: u16,
    pub encoding_space_ref: u16,
    pub trajectory_dimensions: u16,
    pub sample_time_us: f32,
    pub position: [f32; POSITION_LENGTH],
    pub read_dir: [f32; DIRECTION_LENGTH],
    pub phase_dir: [f32; DIRECTION_LENGTH],
    pub slice_dir: [f32; DIRECTION_LENGTH],
    pub patient_table_position: [f32; POSITION_LENGTH],
    pub idx: EncodingCounters,
    pub user_int: [i32; USER_INTS],
    pub user_float: [f32; USER_FLOATS],
}

impl AcquisitionHeader {
    /// Pack the header into its exact wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ACQUISITION_HEADER_LEN] {
        let mut buf = [0u8; ACQUISITION_HEADER_LEN];
        pack::write_u16(&mut buf, 0, self.version);
        pack::write_u64(&mut buf, 2, self.flags);
        pack::write_u32(&mut buf, 10, self.measurement_uid);
        pack::write_u32(&mut buf, 14, self.scan_counter);
        pack::write_u32(&mut buf, 18, self.acquisition_time_stamp);
        pack::write_u32_array(&mut buf, 22, &self.physiology_time_stamp);
        pack::write_u16(&mut buf, 34, self.number_of_samples);
        pack::write_u16(&mut buf, 36, self.available_channels);
        pack::write_u16(&mut buf, 38, self.active_channels);
        pack::write_u64_array(&mut buf, 40, &self.channel_mask);
        pack::write_u16(&mut buf, 168, self.discard_pre);
        pack::write_u16(&mut buf, 170, self.discard_post);
        pack::write_u16(&mut buf, 172, self.center_sample);
        pack::write_u16(&mut buf, 174, self.encoding_space_ref);
        pack::write_u16(&mut buf, 176, self.trajectory_dimensions);
        pack::write_f32(&mut buf, 178, self.sample_time_us);
        pack::write_f32_array(&mut buf, 182, &self.position);
        pack::write_f32_array(&mut buf, 194, &self.read_dir);
        pack::write_f32_array(&mut buf, 206, &self.phase_dir);
        pack::write_f32_array(&mut buf, 218, &self.slice_dir);
        pack::write_f32_array(&mut buf, 230, &self.patient_table_position);
        buf[242..242 + ENCODING_COUNTERS_LEN].copy_from_slice(&self.idx.to_bytes());
        pack::write_i32_array(&mut buf, 276, &self.user_int);
        pack::write_f32_array(&mut buf, 308, &self.user_float);
        buf
    }

    /// Decode a header from its wire layout.
    ///
    /// # Errors
    /// `TruncatedInput` if `data` holds fewer than 340 bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ACQUISITION_HEADER_LEN {
            return Err(MrdError::TruncatedInput {
                section: "acquisition header",
                needed: ACQUISITION_HEADER_LEN,
            });
        }
        Ok(Self {
            version: pack::read_u16(data, 0),
            flags: pack::read_u64(data, 2),
            measurement_uid: pack::read_u32(data, 10),
            scan_counter: pack::read_u32(data, 14),
            acquisition_time_stamp: pack::read_u32(data, 18),
            physiology_time_stamp: pack::read_u32_array(data, 22),
            number_of_samples: pack::read_u16(data, 34),
            available_channels: pack::read_u16(data, 36),
            active_channels: pack::read_u16(data, 38),
            channel_mask: pack::read_u64_array(data, 40),
            discard_pre: pack::read_u16(data, 168),
            discard_post: pack::read_u16(data, 170),
            center_sample: pack::read_u16(data, 172),
            encoding_space_ref: pack::read_u16(data, 174),
            trajectory_dimensions: pack::read_u16(data, 176),
            sample_time_us: pack::read_f32(data, 178),
            position: pack::read_f32_array(data, 182),
            read_dir: pack::read_f32_array(data, 194),
            phase_dir: pack::read_f32_array(data, 206),
            slice_dir: pack::read_f32_array(data, 218),
            patient_table_position: pack::read_f32_array(data, 230),
            idx: EncodingCounters::from_bytes(&data[242..242 + ENCODING_COUNTERS_LEN])?,
            user_int: pack::read_i32_array(data, 276),
            user_float: pack::read_f32_array(data, 308),
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
