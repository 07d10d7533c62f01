use nifdoc_testkit::ByteWriter;

use super::decode;
use crate::nif::blocks::common::{KeyType, Quaternion, RotationKeys, Tbc, Vector3};
use crate::nif::version::v;
use crate::nif::{BlockData, VersionContext};

#[test]
fn transform_data_reads_each_track_with_its_own_key_type() {
	let mut w = ByteWriter::new();
	// One linear rotation key.
	w.u32(1).u32(1).f32(0.0).f32s(&[1.0, 0.0, 0.0, 0.0]);
	// One quadratic translation key.
	w.u32(1).u32(2).f32(0.5).f32s(&[1.0, 2.0, 3.0]).f32s(&[0.0, 0.0, 1.0]).f32s(&[0.0, 0.0, -1.0]);
	// One TBC scale key.
	w.u32(1).u32(3).f32(1.0).f32(2.0).f32s(&[0.1, 0.2, 0.3]);

	let (data, left) = decode("NiTransformData", &w.into_bytes(), VersionContext::new(v::V20_0_0_5), &[]);
	assert_eq!(left, 0);
	let BlockData::KeyframeData(data) = data else {
		panic!("expected NiTransformData");
	};
	let RotationKeys::Quaternion { interpolation, keys } = &data.keys.rotations else {
		panic!("expected quaternion keys");
	};
	assert_eq!(*interpolation, KeyType::Linear);
	assert_eq!(keys[0].value, Quaternion::default());
	assert_eq!(keys[0].tbc, None);

	let translation = &data.keys.translations.keys[0];
	assert_eq!(translation.value, Vector3::new(1.0, 2.0, 3.0));
	assert_eq!(translation.backward, Some(Vector3::new(0.0, 0.0, -1.0)));

	assert_eq!(data.keys.scales.interpolation, Some(KeyType::Tbc));
	assert_eq!(data.keys.scales.keys[0].value, 2.0);
	assert_eq!(data.keys.scales.keys[0].tbc, Some(Tbc { t: 0.1, b: 0.2, c: 0.3 }));
}

#[test]
fn keyframe_data_up_to_10_1_skips_euler_order() {
	let mut w = ByteWriter::new();
	w.u32(1).u32(4).u32(0);
	// X, Y, Z float groups, then empty translation and scale tracks.
	w.u32(1).u32(1).f32(0.0).f32(0.5);
	w.u32(0).u32(0);
	w.u32(0).u32(0);

	let (data, left) = decode("NiKeyframeData", &w.into_bytes(), VersionContext::new(v::V10_1_0_0), &[]);
	assert_eq!(left, 0);
	let BlockData::KeyframeData(data) = data else {
		panic!("expected NiKeyframeData");
	};
	let RotationKeys::Xyz([x, y, z]) = &data.keys.rotations else {
		panic!("expected euler groups");
	};
	assert_eq!(x.keys[0].value, 0.5);
	assert!(y.keys.is_empty() && z.keys.is_empty());
	assert!(data.keys.translations.keys.is_empty());
	assert_eq!(data.keys.scales.interpolation, None);
}

#[test]
fn morph_data_up_to_10_1_keeps_weight_keys() {
	let mut w = ByteWriter::new();
	w.u32(1).u32(2).u8(1);
	// Empty key group still stores its interpolation.
	w.u32(0).u32(1);
	w.f32s(&[0.0, 0.0, 0.0]).f32s(&[1.0, 1.0, 1.0]);

	let (data, left) = decode("NiMorphData", &w.into_bytes(), VersionContext::new(v::V10_1_0_0), &[]);
	assert_eq!(left, 0);
	let BlockData::MorphData(data) = data else {
		panic!("expected NiMorphData");
	};
	assert!(data.relative_targets);
	let morph = &data.morphs[0];
	assert_eq!(morph.frame_name, None);
	assert_eq!(morph.keys.interpolation, Some(KeyType::Linear));
	assert_eq!(morph.legacy_weight, None);
	assert_eq!(morph.vectors[1], Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn morph_data_from_10_1_0_106_names_targets_and_stores_legacy_weight() {
	let mut w = ByteWriter::new();
	w.u32(1).u32(1).u8(0);
	w.sized_string("Base").f32(1.0).f32s(&[0.0, 2.0, 0.0]);

	let (data, left) = decode("NiMorphData", &w.into_bytes(), VersionContext::new(v::V20_0_0_5), &[]);
	assert_eq!(left, 0);
	let BlockData::MorphData(data) = data else {
		panic!("expected NiMorphData");
	};
	let morph = &data.morphs[0];
	assert_eq!(morph.frame_name.as_deref(), Some("Base"));
	assert!(morph.keys.keys.is_empty());
	assert_eq!(morph.legacy_weight, Some(1.0));
	assert_eq!(morph.vectors, vec![Vector3::new(0.0, 2.0, 0.0)]);
}
