//! Fixed arities, named flag bits, and image type codes.

/// Components in a position vector.
pub const POSITION_LENGTH: usize = 3;
/// Components in a direction cosine vector.
pub const DIRECTION_LENGTH: usize = 3;
/// Physiology time stamp slots.
pub const PHYS_STAMPS: usize = 3;
/// 64-bit words in the channel mask.
pub const CHANNEL_MASKS: usize = 16;
/// User-defined integer slots.
pub const USER_INTS: usize = 8;
/// User-defined float slots.
pub const USER_FLOATS: usize = 8;

// Acquisition flag bits (1-based).
pub const ACQ_FIRST_IN_ENCODE_STEP1: u32 = 1;
pub const ACQ_LAST_IN_ENCODE_STEP1: u32 = 2;
pub const ACQ_FIRST_IN_ENCODE_STEP2: u32 = 3;
pub const ACQ_LAST_IN_ENCODE_STEP2: u32 = 4;
pub const ACQ_FIRST_IN_AVERAGE: u32 = 5;
pub const ACQ_LAST_IN_AVERAGE: u32 = 6;
pub const ACQ_FIRST_IN_SLICE: u32 = 7;
pub const ACQ_LAST_IN_SLICE: u32 = 8;
pub const ACQ_FIRST_IN_CONTRAST: u32 = 9;
pub const ACQ_LAST_IN_CONTRAST: u32 = 10;
pub const ACQ_FIRST_IN_PHASE: u32 = 11;
pub const ACQ_LAST_IN_PHASE: u32 = 12;
pub const ACQ_FIRST_IN_REPETITION: u32 = 13;
pub const ACQ_LAST_IN_REPETITION: u32 = 14;
pub const ACQ_FIRST_IN_SET: u32 = 15;
pub const ACQ_LAST_IN_SET: u32 = 16;
pub const ACQ_FIRST_IN_SEGMENT: u32 = 17;
pub const ACQ_LAST_IN_SEGMENT: u32 = 18;
pub const ACQ_IS_NOISE_MEASUREMENT: u32 = 19;
pub const ACQ_IS_PARALLEL_CALIBRATION: u32 = 20;
pub const ACQ_IS_PARALLEL_CALIBRATION_AND_IMAGING: u32 = 21;
pub const ACQ_IS_REVERSE: u32 = 22;
pub const ACQ_IS_NAVIGATION_DATA: u32 = 23;
pub const ACQ_IS_PHASECORR_DATA: u32 = 24;
pub const ACQ_LAST_IN_MEASUREMENT: u32 = 25;
pub const ACQ_IS_HPFEEDBACK_DATA: u32 = 26;
pub const ACQ_IS_DUMMYSCAN_DATA: u32 = 27;
pub const ACQ_IS_RTFEEDBACK_DATA: u32 = 28;
pub const ACQ_IS_SURFACECOILCORRECTIONSCAN_DATA: u32 = 29;

// User flag bits.
pub const ACQ_USER1: u32 = 57;
pub const ACQ_USER2: u32 = 58;
pub const ACQ_USER3: u32 = 59;
pub const ACQ_USER4: u32 = 60;
pub const ACQ_USER5: u32 = 61;
pub const ACQ_USER6: u32 = 62;
pub const ACQ_USER7: u32 = 63;
pub const ACQ_USER8: u32 = 64;

// Image type codes.
pub const IMTYPE_MAGNITUDE: u16 = 1;
pub const IMTYPE_PHASE: u16 = 2;
pub const IMTYPE_REAL: u16 = 3;
pub const IMTYPE_IMAG: u16 = 4;
pub const IMTYPE_COMPLEX: u16 = 5;
