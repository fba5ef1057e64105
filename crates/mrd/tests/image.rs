//! Integration tests for image records.

use mrd::{
    Acquisition, AcquisitionField, AcquisitionHeader, DataType, FieldValue, IMAGE_HEADER_LEN,
    Image, ImageField, ImageHeader, MrdError,
};
use ndarray::{ArrayD, IxDyn};
use num_complex::{Complex32, Complex64};

fn counted_voxels(shape: &[usize]) -> ArrayD<u16> {
    let total: usize = shape.iter().product();
    let values: Vec<u16> = (0..total as u16).collect();
    ArrayD::from_shape_vec(IxDyn(shape), values).unwrap()
}

#[test]
fn header_is_198_bytes() {
    assert_eq!(IMAGE_HEADER_LEN, 198);
    assert_eq!(ImageHeader::default().to_bytes().len(), 198);
}

#[test]
fn from_header_allocates_declared_shape() {
    let head = ImageHeader {
        data_type: DataType::Float.code(),
        channels: 2,
        matrix_size: [64, 32, 8],
        ..Default::default()
    };
    let image = Image::from_header(head, "").unwrap();

    assert_eq!(image.data_type(), DataType::Float);
    assert_eq!(image.data().dim(), (2, 8, 32, 64));
    assert!(image.view::<f32>().unwrap().iter().all(|v| *v == 0.0));
}

#[test]
fn from_header_rejects_inconsistent_attribute_string() {
    let head = ImageHeader {
        data_type: DataType::Float.code(),
        attribute_string_len: 4,
        ..Default::default()
    };
    let result = Image::from_header(head, "hello");
    assert!(matches!(
        result,
        Err(MrdError::InconsistentLength {
            expected: 4,
            actual: 5,
        })
    ));
}

#[test]
fn from_header_accepts_matching_attribute_string() {
    let head = ImageHeader {
        data_type: DataType::CxFloat.code(),
        attribute_string_len: 5,
        ..Default::default()
    };
    let image = Image::from_header(head, "hello").unwrap();
    assert_eq!(image.attribute_string(), "hello");
}

#[test]
fn attribute_string_updates_length_field_atomically() {
    let mut image = Image::default();
    image.set_attribute_string("<meta>spin echo</meta>").unwrap();

    assert_eq!(image.attribute_string(), "<meta>spin echo</meta>");
    assert_eq!(
        image.head().attribute_string_len as usize,
        image.attribute_string().len()
    );

    image.set_attribute_string("").unwrap();
    assert_eq!(image.head().attribute_string_len, 0);
}

#[test]
fn from_array_axis_mapping() {
    // 1-D: n -> (1, 1, 1, n)
    let image = Image::from_array(counted_voxels(&[6]), None, &[]).unwrap();
    assert_eq!(image.data().dim(), (1, 1, 1, 6));
    assert_eq!(image.matrix_size(), [6, 1, 1]);
    assert_eq!(image.channels(), 1);

    // 2-D: (a, b) -> (1, 1, a, b)
    let image = Image::from_array(counted_voxels(&[3, 4]), None, &[]).unwrap();
    assert_eq!(image.data().dim(), (1, 1, 3, 4));
    assert_eq!(image.matrix_size(), [4, 3, 1]);

    // 3-D: (a, b, c) -> (1, a, b, c)
    let image = Image::from_array(counted_voxels(&[2, 3, 4]), None, &[]).unwrap();
    assert_eq!(image.data().dim(), (1, 2, 3, 4));
    assert_eq!(image.matrix_size(), [4, 3, 2]);

    // 4-D: (channels, nz, ny, nx) taken directly.
    let image = Image::from_array(counted_voxels(&[5, 2, 3, 4]), None, &[]).unwrap();
    assert_eq!(image.data().dim(), (5, 2, 3, 4));
    assert_eq!(image.matrix_size(), [4, 3, 2]);
    assert_eq!(image.channels(), 5);
}

#[test]
fn from_array_rejects_higher_dimensions() {
    let result = Image::from_array(counted_voxels(&[2, 2, 2, 2, 2]), None, &[]);
    assert!(matches!(result, Err(MrdError::InvalidFieldValue { .. })));
}

#[test]
fn from_array_derives_kind_from_element_type() {
    let array = counted_voxels(&[2, 3, 4]);
    let image = Image::from_array(array, None, &[]).unwrap();

    assert_eq!(image.data_type(), <u16 as mrd::Element>::DATA_TYPE);
    assert_eq!(image.head().data_type, DataType::Ushort.code());
}

#[test]
fn from_array_copies_contents_exactly() {
    let array = counted_voxels(&[2, 3, 4]);
    let image = Image::from_array(array.clone(), None, &[]).unwrap();

    let view = image.view::<u16>().unwrap();
    for z in 0..2 {
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(view[[0, z, y, x]], array[[z, y, x]]);
            }
        }
    }
}

#[test]
fn from_array_applies_overrides() {
    let image = Image::from_array(
        counted_voxels(&[4, 4]),
        None,
        &[
            (ImageField::ImageType, FieldValue::U16(mrd::constants::IMTYPE_MAGNITUDE)),
            (ImageField::ImageIndex, FieldValue::U16(12)),
        ],
    )
    .unwrap();

    assert_eq!(image.head().image_type, mrd::constants::IMTYPE_MAGNITUDE);
    assert_eq!(image.head().image_index, 12);
}

#[test]
fn from_array_rejects_derived_field_override() {
    let result = Image::from_array(
        counted_voxels(&[4, 4]),
        None,
        &[(ImageField::Channels, FieldValue::U16(3))],
    );
    assert!(matches!(
        result,
        Err(MrdError::InvalidFieldValue {
            field: "channels",
            ..
        })
    ));
}

#[test]
fn from_array_copies_acquisition_context() {
    let head = AcquisitionHeader {
        version: 2,
        measurement_uid: 314,
        position: [1.0, 2.0, 3.0],
        acquisition_time_stamp: 161_803,
        physiology_time_stamp: [3, 2, 1],
        ..Default::default()
    };
    let acquisition = Acquisition::from_header(head);

    let image = Image::from_array(counted_voxels(&[4, 4]), Some(&acquisition), &[]).unwrap();
    let image_head = image.head();

    assert_eq!(image_head.version, 2);
    assert_eq!(image_head.measurement_uid, 314);
    assert_eq!(image_head.position, [1.0, 2.0, 3.0]);
    assert_eq!(image_head.acquisition_time_stamp, 161_803);
    assert_eq!(image_head.physiology_time_stamp, [3, 2, 1]);
}

#[test]
fn from_array_without_template_defaults_version() {
    let image = Image::from_array(counted_voxels(&[4, 4]), None, &[]).unwrap();
    assert_eq!(image.head().version, 1);
}

#[test]
fn read_only_fields_reject_writes() {
    let mut image = Image::default();
    for field in Image::READ_ONLY_FIELDS {
        let result = image.set_field(field, &FieldValue::U16(1));
        assert!(
            matches!(result, Err(MrdError::ReadOnlyField { .. })),
            "assigned to read-only field {}",
            field.name()
        );
    }
}

#[test]
fn resize_updates_header_and_buffer_together() {
    let mut image = Image::default();
    image.resize(2, 4, 8, 16).unwrap();

    assert_eq!(image.data().dim(), (2, 4, 8, 16));
    assert_eq!(image.head().channels, 2);
    assert_eq!(image.head().matrix_size, [16, 8, 4]);
    assert_eq!(image.data_type(), DataType::CxFloat);
}

#[test]
fn set_head_retypes_and_reshapes() {
    let mut image = Image::default();
    let head = ImageHeader {
        data_type: DataType::Double.code(),
        channels: 1,
        matrix_size: [8, 4, 2],
        ..Default::default()
    };
    image.set_head(head).unwrap();

    assert_eq!(image.data_type(), DataType::Double);
    assert_eq!(image.data().dim(), (1, 2, 4, 8));
    assert!(image.view::<f64>().unwrap().iter().all(|v| *v == 0.0));
}

#[test]
fn set_head_rejects_inconsistent_attribute_length() {
    let mut image = Image::default();
    let head = ImageHeader {
        data_type: DataType::Float.code(),
        attribute_string_len: 10,
        ..Default::default()
    };
    let result = image.set_head(head);
    assert!(matches!(result, Err(MrdError::InconsistentLength { .. })));
    // Unchanged on failure.
    assert_eq!(image.data_type(), DataType::CxFloat);
}

#[test]
fn roundtrip_with_attribute_string() {
    let head = ImageHeader {
        data_type: DataType::Ushort.code(),
        channels: 2,
        matrix_size: [4, 3, 2],
        attribute_string_len: 13,
        ..Default::default()
    };
    let mut image = Image::from_header(head, "hello, world!").unwrap();
    if let Some(mut view) = image.view_mut::<u16>() {
        view[[0, 0, 0, 0]] = 42;
        view[[1, 1, 2, 3]] = 7;
    }

    let restored = Image::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, image);
    assert_eq!(restored.attribute_string(), "hello, world!");
    assert_eq!(restored.view::<u16>().unwrap()[[1, 1, 2, 3]], 7);
}

#[test]
fn roundtrip_complex_double() {
    let values: Vec<Complex64> = (0..24)
        .map(|i| Complex64::new(f64::from(i), -0.5 * f64::from(i)))
        .collect();
    let array = ArrayD::from_shape_vec(IxDyn(&[2, 3, 4]), values).unwrap();
    let image = Image::from_array(array, None, &[]).unwrap();

    let restored = Image::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, image);
    assert_eq!(restored.data_type(), DataType::CxDouble);
}

#[test]
fn streaming_matches_in_memory_form() {
    let image = Image::from_array(counted_voxels(&[2, 3, 4]), None, &[]).unwrap();

    let mut streamed = Vec::new();
    image.serialize_into(&mut streamed).unwrap();
    assert_eq!(image.to_bytes().unwrap(), streamed);

    let restored = Image::deserialize_from(&mut std::io::Cursor::new(&streamed)).unwrap();
    assert_eq!(restored, image);
}

#[test]
fn deserialization_from_empty_buffer_fails() {
    let result = Image::from_bytes(b"");
    assert!(matches!(
        result,
        Err(MrdError::TruncatedInput {
            section: "image header",
            ..
        })
    ));
}

#[test]
fn deserialization_from_header_only_fails_when_data_declared() {
    let image = Image::from_array(counted_voxels(&[4, 4]), None, &[]).unwrap();
    let bytes = image.to_bytes().unwrap();

    let result = Image::from_bytes(&bytes[..IMAGE_HEADER_LEN]);
    assert!(matches!(
        result,
        Err(MrdError::TruncatedInput {
            section: "image data",
            ..
        })
    ));
}

#[test]
fn deserialization_rejects_unknown_data_type() {
    // An all-zero header declares data_type 0, which has no registered kind.
    let result = Image::from_bytes(&[0u8; IMAGE_HEADER_LEN]);
    assert!(matches!(result, Err(MrdError::UnsupportedKind { code: 0 })));
}

#[test]
fn roundtrip_2d_complex_image() {
    let values: Vec<Complex32> = (0..32 * 256)
        .map(|i| Complex32::new(i as f32, -(i as f32)))
        .collect();
    let array = ArrayD::from_shape_vec(IxDyn(&[32, 256]), values).unwrap();
    let image = Image::from_array(array, None, &[]).unwrap();

    let restored = Image::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.data().dim(), (1, 1, 32, 256));
    assert_eq!(restored.data_type(), DataType::CxFloat);
    assert_eq!(restored, image);
}
