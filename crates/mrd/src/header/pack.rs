//! Little-endian field packing helpers.
//!
//! All header layouts are written and read through these helpers with
//! explicit byte offsets, so the wire layout never depends on host struct
//! packing rules.

pub(crate) fn read_u16(data: &[u8], offset: usize) -> u16 {
    let mut raw = [0u8; 2];
    raw.copy_from_slice(&data[offset..offset + 2]);
    u16::from_le_bytes(raw)
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(raw)
}

pub(crate) fn read_i32(data: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[offset..offset + 4]);
    i32::from_le_bytes(raw)
}

pub(crate) fn read_f32(data: &[u8], offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[offset..offset + 4]);
    f32::from_le_bytes(raw)
}

pub(crate) fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn read_u16_array<const N: usize>(data: &[u8], offset: usize) -> [u16; N] {
    std::array::from_fn(|i| read_u16(data, offset + i * 2))
}

pub(crate) fn read_u32_array<const N: usize>(data: &[u8], offset: usize) -> [u32; N] {
    std::array::from_fn(|i| read_u32(data, offset + i * 4))
}

pub(crate) fn read_u64_array<const N: usize>(data: &[u8], offset: usize) -> [u64; N] {
    std::array::from_fn(|i| read_u64(data, offset + i * 8))
}

pub(crate) fn read_i32_array<const N: usize>(data: &[u8], offset: usize) -> [i32; N] {
    std::array::from_fn(|i| read_i32(data, offset + i * 4))
}

pub(crate) fn read_f32_array<const N: usize>(data: &[u8], offset: usize) -> [f32; N] {
    std::array::from_fn(|i| read_f32(data, offset + i * 4))
}

pub(crate) fn write_u16_array(buf: &mut [u8], offset: usize, values: &[u16]) {
    for (i, value) in values.iter().enumerate() {
        write_u16(buf, offset + i * 2, *value);
    }
}

pub(crate) fn write_u32_array(buf: &mut [u8], offset: usize, values: &[u32]) {
    for (i, value) in values.iter().enumerate() {
        write_u32(buf, offset + i * 4, *value);
    }
}

pub(crate) fn write_u64_array(buf: &mut [u8], offset: usize, values: &[u64]) {
    for (i, value) in values.iter().enumerate() {
        write_u64(buf, offset + i * 8, *value);
    }
}

pub(crate) fn write_i32_array(buf: &mut [u8], offset: usize, values: &[i32]) {
    for (i, value) in values.iter().enumerate() {
        write_i32(buf, offset + i * 4, *value);
    }
}

pub(crate) fn write_f32_array(buf: &mut [u8], offset: usize, values: &[f32]) {
    for (i, value) in values.iter().enumerate() {
        write_f32(buf, offset + i * 4, *value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_roundtrip() {
        let mut buf = [0u8; 16];
        write_u16(&mut buf, 0, 0xBEEF);
        write_u64(&mut buf, 2, u64::MAX - 1);
        write_f32(&mut buf, 10, -3.5);
        assert_eq!(read_u16(&buf, 0), 0xBEEF);
        assert_eq!(read_u64(&buf, 2), u64::MAX - 1);
        assert_eq!(read_f32(&buf, 10), -3.5);
    }

    #[test]
    fn test_array_roundtrip() {
        let mut buf = [0u8; 12];
        write_f32_array(&mut buf, 0, &[1.0, 2.0, 3.0]);
        assert_eq!(read_f32_array::<3>(&buf, 0), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buf = [0u8; 2];
        write_u16(&mut buf, 0, 0x0102);
        assert_eq!(buf, [0x02, 0x01]);
    }
}
