//! Byte-stream plumbing shared by the record codecs.
//!
//! Serialization and deserialization are strictly sequential: a bounded,
//! deterministic series of fixed-size writes and exact reads against
//! caller-supplied `Write`/`Read` endpoints. A source that runs dry mid-read
//! surfaces as `TruncatedInput` naming the section; every other I/O failure
//! propagates untouched.

use std::io::{Read, Write};

use crate::error::{MrdError, Result};
use crate::kind::Element;

/// Fill `buf` exactly from `source`.
pub(crate) fn read_exact(
    source: &mut impl Read,
    buf: &mut [u8],
    section: &'static str,
) -> Result<()> {
    source.read_exact(buf).map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            MrdError::TruncatedInput {
                section,
                needed: buf.len(),
            }
        } else {
            MrdError::Io(err)
        }
    })
}

/// Write elements to `sink` in iteration order, little-endian.
pub(crate) fn write_elements<'a, W, T>(
    sink: &mut W,
    elements: impl IntoIterator<Item = &'a T>,
) -> Result<()>
where
    W: Write,
    T: Element + 'a,
{
    let mut buf = Vec::new();
    for element in elements {
        element.write_le(&mut buf);
    }
    sink.write_all(&buf)?;
    Ok(())
}

/// Read exactly `count` elements from `source`.
pub(crate) fn read_elements<R, T>(
    source: &mut R,
    count: usize,
    section: &'static str,
) -> Result<Vec<T>>
where
    R: Read,
    T: Element,
{
    let mut raw = vec![0u8; count * T::WIDTH];
    read_exact(source, &mut raw, section)?;
    Ok(raw.chunks_exact(T::WIDTH).map(T::read_le).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_exact_maps_eof_to_truncated() {
        let mut source: &[u8] = &[1, 2, 3];
        let mut buf = [0u8; 8];
        let result = read_exact(&mut source, &mut buf, "test section");
        assert!(matches!(
            result,
            Err(MrdError::TruncatedInput {
                section: "test section",
                needed: 8,
            })
        ));
    }

    #[test]
    fn test_element_stream_roundtrip() {
        let values = [1.0f32, -2.5, 3.25];
        let mut buf = Vec::new();
        write_elements(&mut buf, values.iter()).unwrap();
        assert_eq!(buf.len(), 12);

        let mut source = buf.as_slice();
        let decoded: Vec<f32> = read_elements(&mut source, 3, "values").unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_short_element_stream_rejected() {
        let mut source: &[u8] = &[0u8; 10];
        let result: Result<Vec<f32>> = read_elements(&mut source, 3, "values");
        assert!(matches!(result, Err(MrdError::TruncatedInput { .. })));
    }
}
