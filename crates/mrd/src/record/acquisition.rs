//! Acquisition records.

use std::fmt;
use std::io::{Cursor, Read, Write};

use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use num_complex::Complex32;
use tracing::trace;

use crate::error::{MrdError, Result};
use crate::header::{ACQUISITION_HEADER_LEN, AcquisitionField, AcquisitionHeader, FieldValue};
use crate::record::{array2_from_vec, count_u16};
use crate::wire;

/// One readout's worth of raw sample data with its header and optional
/// k-space trajectory.
///
/// The sample buffer is shaped `(active_channels, number_of_samples)` and
/// the trajectory buffer `(number_of_samples, trajectory_dimensions)`; the
/// three count fields always agree with the buffer shapes. Sample data is
/// complex float by definition, so the header carries no element-kind field.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    head: AcquisitionHeader,
    data: Array2<Complex32>,
    traj: Array2<f32>,
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::from_header(AcquisitionHeader::default())
    }
}

impl Acquisition {
    /// Header fields derived from the buffer shapes; writable only through
    /// [`Acquisition::resize`] and [`Acquisition::set_head`].
    pub const READ_ONLY_FIELDS: [AcquisitionField; 3] = [
        AcquisitionField::NumberOfSamples,
        AcquisitionField::ActiveChannels,
        AcquisitionField::TrajectoryDimensions,
    ];

    /// Build an acquisition from a header, with zero-filled buffers at the
    /// header-declared shapes.
    #[must_use]
    pub fn from_header(head: AcquisitionHeader) -> Self {
        let samples = head.number_of_samples as usize;
        let channels = head.active_channels as usize;
        let traj_dims = head.trajectory_dimensions as usize;
        Self {
            head,
            data: Array2::zeros((channels, samples)),
            traj: Array2::zeros((samples, traj_dims)),
        }
    }

    /// Build an acquisition from sample data and an optional trajectory.
    ///
    /// The count fields are derived from the buffer shapes; `overrides` are
    /// applied afterwards. Defaults: `version = 1` and `available_channels`
    /// equal to the data's channel count.
    ///
    /// # Errors
    /// - `InconsistentLength` if the trajectory's sample axis disagrees with
    ///   the data's sample axis.
    /// - `InvalidFieldValue` if an override names a derived count field, or
    ///   its value does not match the field's type or arity.
    pub fn from_array(
        data: Array2<Complex32>,
        traj: Option<Array2<f32>>,
        overrides: &[(AcquisitionField, FieldValue)],
    ) -> Result<Self> {
        let (channels, samples) = data.dim();
        let traj = match traj {
            Some(traj) => {
                if traj.nrows() != samples {
                    return Err(MrdError::InconsistentLength {
                        expected: samples,
                        actual: traj.nrows(),
                    });
                }
                traj
            }
            None => Array2::zeros((samples, 0)),
        };

        let mut head = AcquisitionHeader {
            version: 1,
            number_of_samples: count_u16("number_of_samples", samples)?,
            active_channels: count_u16("active_channels", channels)?,
            available_channels: count_u16("available_channels", channels)?,
            trajectory_dimensions: count_u16("trajectory_dimensions", traj.ncols())?,
            ..Default::default()
        };

        for (field, value) in overrides {
            if Self::READ_ONLY_FIELDS.contains(field) {
                return Err(MrdError::InvalidFieldValue {
                    field: field.name(),
                    message: "derived from the array shape and cannot be overridden".to_string(),
                });
            }
            head.set_field(*field, value)?;
        }

        Ok(Self { head, data, traj })
    }

    /// An independent copy of the header.
    #[must_use]
    pub fn head(&self) -> AcquisitionHeader {
        self.head
    }

    /// Replace the header, resetting both buffers to zero-filled arrays at
    /// the new header's shapes.
    pub fn set_head(&mut self, head: AcquisitionHeader) {
        *self = Self::from_header(head);
    }

    /// Reshape both buffers and update the count fields in one step.
    ///
    /// Buffer contents are reset to zero.
    ///
    /// # Errors
    /// `InvalidFieldValue` if a dimension exceeds its count field's range.
    pub fn resize(&mut self, samples: usize, channels: usize, traj_dims: usize) -> Result<()> {
        let samples_u16 = count_u16("number_of_samples", samples)?;
        let channels_u16 = count_u16("active_channels", channels)?;
        let traj_dims_u16 = count_u16("trajectory_dimensions", traj_dims)?;
        self.head.number_of_samples = samples_u16;
        self.head.active_channels = channels_u16;
        self.head.trajectory_dimensions = traj_dims_u16;
        self.data = Array2::zeros((channels, samples));
        self.traj = Array2::zeros((samples, traj_dims));
        Ok(())
    }

    /// Sample data, shaped `(active_channels, number_of_samples)`.
    #[must_use]
    pub fn data(&self) -> ArrayView2<'_, Complex32> {
        self.data.view()
    }

    /// Mutable view of the sample data. The shape cannot change through a
    /// view, so the count fields stay consistent.
    #[must_use]
    pub fn data_mut(&mut self) -> ArrayViewMut2<'_, Complex32> {
        self.data.view_mut()
    }

    /// Trajectory, shaped `(number_of_samples, trajectory_dimensions)`.
    #[must_use]
    pub fn traj(&self) -> ArrayView2<'_, f32> {
        self.traj.view()
    }

    /// Mutable view of the trajectory.
    #[must_use]
    pub fn traj_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.traj.view_mut()
    }

    /// Read a header field as an owned value.
    #[must_use]
    pub fn get_field(&self, field: AcquisitionField) -> FieldValue {
        self.head.get_field(field)
    }

    /// Assign a header field.
    ///
    /// # Errors
    /// - `ReadOnlyField` for the derived count fields.
    /// - `InvalidFieldValue` on a type or arity mismatch.
    pub fn set_field(&mut self, field: AcquisitionField, value: &FieldValue) -> Result<()> {
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

    /// Write the record to `sink`: header, trajectory, then sample data.
    ///
    /// # Errors
    /// Any error the sink reports.
    pub fn serialize_into<W: Write>(&self, sink: &mut W) -> Result<()> {
        trace!(
            samples = self.head.number_of_samples,
            channels = self.head.active_channels,
            trajectory_dimensions = self.head.trajectory_dimensions,
            "serializing acquisition"
        );
        sink.write_all(&self.head.to_bytes())?;
        wire::write_elements(sink, self.traj.iter())?;
        wire::write_elements(sink, self.data.iter())?;
        Ok(())
    }

    /// Read a record from `source`, sizing the buffers from the decoded
    /// header. Bytes past the expected total are left unread.
    ///
    /// # Errors
    /// `TruncatedInput` if `source` runs dry before a section is complete.
    pub fn deserialize_from<R: Read>(source: &mut R) -> Result<Self> {
        let mut head_bytes = [0u8; ACQUISITION_HEADER_LEN];
        wire::read_exact(source, &mut head_bytes, "acquisition header")?;
        let head = AcquisitionHeader::from_bytes(&head_bytes)?;

        let samples = head.number_of_samples as usize;
        let channels = head.active_channels as usize;
        let traj_dims = head.trajectory_dimensions as usize;
        trace!(samples, channels, traj_dims, "deserializing acquisition");

        let traj_flat: Vec<f32> =
            wire::read_elements(source, samples * traj_dims, "trajectory data")?;
        let data_flat: Vec<Complex32> =
            wire::read_elements(source, channels * samples, "sample data")?;

        Ok(Self {
            head,
            data: array2_from_vec(channels, samples, data_flat),
            traj: array2_from_vec(samples, traj_dims, traj_flat),
        })
    }

    /// Serialize to a single in-memory buffer.
    ///
    /// Equivalent to [`Acquisition::serialize_into`] with a `Vec` sink.
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

impl fmt::Display for Acquisition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Acquisition (version {})", self.head.version)?;
        writeln!(
            f,
            "  data: {} channels x {} samples (complex float)",
            self.head.active_channels, self.head.number_of_samples
        )?;
        writeln!(
            f,
            "  trajectory: {} samples x {} dimensions",
            self.head.number_of_samples, self.head.trajectory_dimensions
        )?;
        write!(f, "  flags: {:#018x}", self.head.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let acq = Acquisition::default();
        assert_eq!(acq.data().dim(), (0, 0));
        assert_eq!(acq.traj().dim(), (0, 0));
        assert_eq!(acq.head(), AcquisitionHeader::default());
    }

    #[test]
    fn test_from_header_allocates_declared_shape() {
        let head = AcquisitionHeader {
            number_of_samples: 64,
            active_channels: 4,
            trajectory_dimensions: 2,
            ..Default::default()
        };
        let acq = Acquisition::from_header(head);
        assert_eq!(acq.data().dim(), (4, 64));
        assert_eq!(acq.traj().dim(), (64, 2));
        assert!(acq.data().iter().all(|v| *v == Complex32::default()));
    }

    #[test]
    fn test_from_array_trajectory_mismatch() {
        let data = Array2::<Complex32>::zeros((2, 16));
        let traj = Array2::<f32>::zeros((15, 2));
        let result = Acquisition::from_array(data, Some(traj), &[]);
        assert!(matches!(
            result,
            Err(MrdError::InconsistentLength {
                expected: 16,
                actual: 15,
            })
        ));
    }

    #[test]
    fn test_mutation_through_view() {
        let mut acq = Acquisition::from_header(AcquisitionHeader {
            number_of_samples: 8,
            active_channels: 1,
            ..Default::default()
        });
        acq.data_mut()[[0, 3]] = Complex32::new(1.0, -1.0);
        assert_eq!(acq.data()[[0, 3]], Complex32::new(1.0, -1.0));
    }

    #[test]
    fn test_head_returns_independent_copy() {
        let acq = Acquisition::default();
        let mut copy = acq.head();
        copy.version = 99;
        assert_eq!(acq.head().version, 0);
    }
}
