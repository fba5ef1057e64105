//! Encoding loop counters.
//!
//! The secondary counter structure embedded in the acquisition header.
//!
//! # Layout (34 bytes)
//!
//! | Offset | Field                 | Type     |
//! |--------|-----------------------|----------|
//! | 0      | kspace_encode_step_1  | u16      |
//! | 2      | kspace_encode_step_2  | u16      |
//! | 4      | average               | u16      |
//! | 6      | slice                 | u16      |
//! | 8      | contrast              | u16      |
//! | 10     | phase                 | u16      |
//! | 12     | repetition            | u16      |
//! | 14     | set                   | u16      |
//! | 16     | segment               | u16      |
//! | 18     | user                  | [u16; 8] |

use crate::constants::USER_INTS;
use crate::error::{MrdError, Result};
use crate::header::pack;

/// Byte width of the packed counter structure.
pub const ENCODING_COUNTERS_LEN: usize = 34;

/// Position of an acquisition within the encoding loops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EncodingCounters {
    pub kspace_encode_step_1: u16,
    pub kspace_encode_step_2: u16,
    pub average: u16,
    pub slice: u16,
    pub contrast: u16,
    pub phase: u16,
    pub repetition: u16,
    pub set: u16,
    pub segment: u16,
    pub user: [u16; USER_INTS],
}

impl EncodingCounters {
    /// Pack the counters into their exact wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ENCODING_COUNTERS_LEN] {
        let mut buf = [0u8; ENCODING_COUNTERS_LEN];
        pack::write_u16(&mut buf, 0, self.kspace_encode_step_1);
        pack::write_u16(&mut buf, 2, self.kspace_encode_step_2);
        pack::write_u16(&mut buf, 4, self.average);
        pack::write_u16(&mut buf, 6, self.slice);
        pack::write_u16(&mut buf, 8, self.contrast);
        pack::write_u16(&mut buf, 10, self.phase);
        pack::write_u16(&mut buf, 12, self.repetition);
        pack::write_u16(&mut buf, 14, self.set);
        pack::write_u16(&mut buf, 16, self.segment);
        pack::write_u16_array(&mut buf, 18, &self.user);
        buf
    }

    /// Decode counters from their wire layout.
    ///
    /// # Errors
    /// `TruncatedInput` if `data` holds fewer than 34 bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ENCODING_COUNTERS_LEN {
            return Err(MrdError::TruncatedInput {
                section: "encoding counters",
                needed: ENCODING_COUNTERS_LEN,
            });
        }
        Ok(Self {
            kspace_encode_step_1: pack::read_u16(data, 0),
            kspace_encode_step_2: pack::read_u16(data, 2),
            average: pack::read_u16(data, 4),
            slice: pack::read_u16(data, 6),
            contrast: pack::read_u16(data, 8),
            phase: pack::read_u16(data, 10),
            repetition: pack::read_u16(data, 12),
            set: pack::read_u16(data, 14),
            segment: pack::read_u16(data, 16),
            user: pack::read_u16_array(data, 18),
        })
    }
}
