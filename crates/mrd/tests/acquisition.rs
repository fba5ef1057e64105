//! Integration tests for acquisition records.

use std::io::Cursor;

use mrd::{
    ACQUISITION_HEADER_LEN, Acquisition, AcquisitionField, AcquisitionHeader,
    ENCODING_COUNTERS_LEN, EncodingCounters, FieldValue, MrdError,
};
use ndarray::Array2;
use num_complex::Complex32;
use proptest::prelude::*;

fn sample_data(channels: usize, samples: usize) -> Array2<Complex32> {
    Array2::from_shape_fn((channels, samples), |(c, s)| {
        Complex32::new(c as f32 + 0.25, s as f32 - 0.5)
    })
}

fn sample_traj(samples: usize, dims: usize) -> Array2<f32> {
    Array2::from_shape_fn((samples, dims), |(s, d)| (s * 3 + d) as f32 * 0.5)
}

#[test]
fn encoding_counters_are_34_bytes() {
    assert_eq!(ENCODING_COUNTERS_LEN, 34);
    assert_eq!(EncodingCounters::default().to_bytes().len(), 34);
}

#[test]
fn header_is_340_bytes() {
    assert_eq!(ACQUISITION_HEADER_LEN, 340);
    assert_eq!(AcquisitionHeader::default().to_bytes().len(), 340);
}

#[test]
fn new_instance_is_empty() {
    let acq = Acquisition::default();
    assert_eq!(acq.head(), AcquisitionHeader::default());
    assert_eq!(acq.data().dim(), (0, 0));
    assert_eq!(acq.traj().dim(), (0, 0));
}

#[test]
fn read_only_fields_reject_writes() {
    let mut acq = Acquisition::default();
    for field in Acquisition::READ_ONLY_FIELDS {
        let result = acq.set_field(field, &FieldValue::U16(1));
        assert!(
            matches!(result, Err(MrdError::ReadOnlyField { .. })),
            "assigned to read-only field {}",
            field.name()
        );
    }
}

#[test]
fn resize_updates_header_and_buffers_together() {
    let mut acq = Acquisition::default();
    let (samples, channels, traj_dims) = (128, 8, 3);
    acq.resize(samples, channels, traj_dims).unwrap();

    assert_eq!(acq.data().dim(), (channels, samples));
    assert_eq!(acq.traj().dim(), (samples, traj_dims));

    let head = acq.head();
    assert_eq!(head.number_of_samples as usize, samples);
    assert_eq!(head.active_channels as usize, channels);
    assert_eq!(head.trajectory_dimensions as usize, traj_dims);
}

#[test]
fn set_head_reshapes_buffers() {
    let mut acq = Acquisition::default();
    let head = AcquisitionHeader {
        number_of_samples: 128,
        active_channels: 8,
        trajectory_dimensions: 3,
        ..Default::default()
    };

    acq.set_head(head);

    assert_eq!(acq.data().dim(), (8, 128));
    assert_eq!(acq.traj().dim(), (128, 3));
}

#[test]
fn flags_walk() {
    let mut acq = Acquisition::default();
    assert_eq!(acq.flags(), 0);

    for flag in 1..=64 {
        assert!(!acq.is_flag_set(flag));
    }

    for flag in 1..=64 {
        acq.set_flag(flag);
        assert!(acq.is_flag_set(flag));
    }

    for flag in 1..=64 {
        acq.clear_flag(flag);
        assert!(!acq.is_flag_set(flag));
    }
    assert_eq!(acq.flags(), 0);

    for flag in 1..=64 {
        acq.set_flag(flag);
    }
    acq.clear_all_flags();
    for flag in 1..=64 {
        assert!(!acq.is_flag_set(flag));
    }
}

#[test]
fn flag_bits_are_independent() {
    let mut acq = Acquisition::default();
    acq.set_flag(64);
    acq.set_flag(1);

    assert!(acq.is_flag_set(64));
    assert!(acq.is_flag_set(1));
    for flag in 2..=63 {
        assert!(!acq.is_flag_set(flag));
    }
    assert_eq!(acq.flags(), (1 << 63) | 1);
}

#[test]
fn from_array_preserves_data() {
    let data = sample_data(32, 256);
    let acq = Acquisition::from_array(data.clone(), None, &[]).unwrap();

    assert_eq!(acq.data(), data);
    let head = acq.head();
    assert_eq!(head.number_of_samples, 256);
    assert_eq!(head.active_channels, 32);
    assert_eq!(head.trajectory_dimensions, 0);
}

#[test]
fn from_array_preserves_trajectory() {
    let data = sample_data(32, 256);
    let traj = sample_traj(256, 2);
    let acq = Acquisition::from_array(data.clone(), Some(traj.clone()), &[]).unwrap();

    assert_eq!(acq.data(), data);
    assert_eq!(acq.traj(), traj);
    assert_eq!(acq.head().trajectory_dimensions, 2);
}

#[test]
fn from_array_sets_nonzero_version() {
    let acq = Acquisition::from_array(sample_data(4, 32), None, &[]).unwrap();
    assert_ne!(acq.head().version, 0);
}

#[test]
fn from_array_applies_header_fields() {
    let overrides = [
        (AcquisitionField::Version, FieldValue::U16(2)),
        (AcquisitionField::MeasurementUid, FieldValue::U32(123_456_789)),
        (AcquisitionField::AvailableChannels, FieldValue::U16(64)),
    ];
    let acq = Acquisition::from_array(sample_data(4, 32), None, &overrides).unwrap();

    for (field, value) in &overrides {
        assert_eq!(
            acq.get_field(*field),
            value.clone(),
            "field {} not preserved",
            field.name()
        );
    }
}

#[test]
fn from_array_rejects_mistyped_field() {
    let result = Acquisition::from_array(
        sample_data(4, 32),
        None,
        &[(AcquisitionField::Version, FieldValue::F32(1.5))],
    );
    assert!(matches!(result, Err(MrdError::InvalidFieldValue { .. })));
}

#[test]
fn from_array_rejects_derived_field_override() {
    let result = Acquisition::from_array(
        sample_data(4, 32),
        None,
        &[(AcquisitionField::NumberOfSamples, FieldValue::U16(99))],
    );
    assert!(matches!(
        result,
        Err(MrdError::InvalidFieldValue {
            field: "number_of_samples",
            ..
        })
    ));
}

#[test]
fn serialize_and_deserialize() {
    let acq = Acquisition::from_array(sample_data(32, 256), None, &[]).unwrap();

    let mut stream = Vec::new();
    acq.serialize_into(&mut stream).unwrap();

    let restored = Acquisition::deserialize_from(&mut Cursor::new(&stream)).unwrap();
    assert_eq!(restored, acq);
}

#[test]
fn to_and_from_bytes() {
    let acq = Acquisition::from_array(sample_data(32, 256), None, &[]).unwrap();
    let restored = Acquisition::from_bytes(&acq.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, acq);
}

#[test]
fn to_bytes_matches_streaming_form() {
    let acq = Acquisition::from_array(sample_data(8, 64), Some(sample_traj(64, 3)), &[]).unwrap();

    let mut streamed = Vec::new();
    acq.serialize_into(&mut streamed).unwrap();
    assert_eq!(acq.to_bytes().unwrap(), streamed);
}

#[test]
fn serialization_with_header_fields_and_trajectory() {
    let overrides = [
        (AcquisitionField::ScanCounter, FieldValue::U32(77)),
        (AcquisitionField::SampleTimeUs, FieldValue::F32(2.5)),
        (
            AcquisitionField::Position,
            FieldValue::F32s(vec![1.0, -2.0, 3.0]),
        ),
        (
            AcquisitionField::Idx,
            FieldValue::Counters(EncodingCounters {
                kspace_encode_step_1: 17,
                repetition: 3,
                ..Default::default()
            }),
        ),
    ];
    let acq =
        Acquisition::from_array(sample_data(8, 64), Some(sample_traj(64, 2)), &overrides).unwrap();

    let restored = Acquisition::from_bytes(&acq.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, acq);
    assert_eq!(restored.head().idx.kspace_encode_step_1, 17);
}

#[test]
fn roundtrip_scenario_32x256_complex() {
    let data = sample_data(32, 256);
    let acq = Acquisition::from_array(data.clone(), None, &[]).unwrap();
    let restored = Acquisition::from_bytes(&acq.to_bytes().unwrap()).unwrap();

    assert_eq!(restored.data().dim(), (32, 256));
    assert_eq!(restored.data(), data);
}

#[test]
fn deserialization_from_empty_buffer_fails() {
    let result = Acquisition::from_bytes(b"");
    assert!(matches!(
        result,
        Err(MrdError::TruncatedInput {
            section: "acquisition header",
            ..
        })
    ));
}

#[test]
fn deserialization_from_header_only_fails_when_data_declared() {
    let acq = Acquisition::from_array(sample_data(4, 32), None, &[]).unwrap();
    let bytes = acq.to_bytes().unwrap();

    let result = Acquisition::from_bytes(&bytes[..ACQUISITION_HEADER_LEN]);
    assert!(matches!(result, Err(MrdError::TruncatedInput { .. })));
}

#[test]
fn trailing_bytes_are_ignored() {
    let acq = Acquisition::from_array(sample_data(4, 32), None, &[]).unwrap();
    let mut bytes = acq.to_bytes().unwrap();
    bytes.extend_from_slice(&[0xAB; 16]);

    let restored = Acquisition::from_bytes(&bytes).unwrap();
    assert_eq!(restored, acq);
}

proptest! {
    #[test]
    fn prop_roundtrip(
        channels in 1usize..6,
        samples in 1usize..64,
        traj_dims in 0usize..4,
        scale in 0.01f32..1000.0,
        flags in any::<u64>(),
    ) {
        let data = Array2::from_shape_fn((channels, samples), |(c, s)| {
            Complex32::new(c as f32 * scale, s as f32 - scale)
        });
        let traj = (traj_dims > 0).then(|| {
            Array2::from_shape_fn((samples, traj_dims), |(s, d)| (s + d) as f32 * scale)
        });

        let acq = Acquisition::from_array(
            data,
            traj,
            &[(AcquisitionField::Flags, FieldValue::U64(flags))],
        )
        .unwrap();

        let restored = Acquisition::from_bytes(&acq.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(restored, acq);
    }
}
