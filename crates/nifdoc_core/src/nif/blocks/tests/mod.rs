use nifdoc_testkit::ByteWriter;

use super::common::Vector3;
use super::extra::ExtraValue;
use super::geometry::{VertexDesc, uses_full_precision, vertex_flags};
use super::interpolator::InterpolatorData;
use crate::nif::version::v;
use crate::nif::{Block, BlockData, NifError, NifReader, TypeRegistry, VersionContext};

mod controller;
mod keyframe;
mod property;

fn decode(type_name: &str, bytes: &[u8], version: VersionContext, strings: &[Box<str>]) -> (BlockData, usize) {
	let mut r = NifReader::new(bytes, version).with_strings(strings);
	let data = TypeRegistry::builtin()
		.construct(type_name, &mut r)
		.expect("block decodes")
		.expect("decoder registered");
	(data, r.remaining())
}

fn decode_err(type_name: &str, bytes: &[u8], version: VersionContext) -> NifError {
	let mut r = NifReader::new(bytes, version);
	TypeRegistry::builtin().construct(type_name, &mut r).expect_err("block is rejected")
}

/// Unnamed named-object layer with no extra data and no controller.
fn object_net(w: &mut ByteWriter, version: VersionContext) {
	if version.at_least(v::V20_1_0_1) {
		w.u32(u32::MAX);
	} else {
		w.sized_string("");
	}
	if version.in_range(v::V3_0, v::V4_2_2_0) {
		w.i32(-1);
	}
	if version.at_least(v::V10_0_1_0) {
		w.u32(0);
	}
	w.i32(-1);
}

fn block(type_name: &str, data: BlockData) -> Block {
	Block {
		type_name: type_name.into(),
		type_args: None,
		offset: 0,
		data,
	}
}

/// Scene-object layer of a Fallout 4 shape: no name, no properties list.
fn fallout4_av_object(w: &mut ByteWriter) {
	w.u32(u32::MAX).u32(0).i32(-1);
	w.u32(14).f32s(&[0.0, 0.0, 0.0]).identity_rotation().f32(1.0);
	w.i32(-1);
}

const POSITIONS: [[f32; 3]; 2] = [[1.0, -2.5, 0.5], [0.25, 4.0, -8.0]];

fn bs_tri_shape_bytes(desc: u64, full: bool) -> Vec<u8> {
	let mut w = ByteWriter::new();
	fallout4_av_object(&mut w);
	w.f32s(&[0.0, 0.0, 0.0, 10.0]);
	w.i32(-1).i32(-1).i32(-1);
	w.u64(desc);
	w.u32(1).u16(POSITIONS.len() as u16);
	let vertex_size = VertexDesc(desc).vertex_size();
	w.u32((vertex_size * POSITIONS.len() + 6) as u32);
	for position in POSITIONS {
		if full {
			w.f32s(&position).zeros(4);
		} else {
			for component in position {
				w.f16(component);
			}
			w.zeros(2);
		}
	}
	w.u16(0).u16(1).u16(1);
	w.into_bytes()
}

#[test]
fn bs_tri_shape_positions_match_across_precisions() {
	let version = VersionContext::new(v::V20_2_0_7).with_user(12, 130);
	let full_desc = (0x401_u64 << 44) | 4;
	let half_desc = (0x001_u64 << 44) | 2;

	let (full, full_left) = decode("BSTriShape", &bs_tri_shape_bytes(full_desc, true), version, &[]);
	let (half, half_left) = decode("BSTriShape", &bs_tri_shape_bytes(half_desc, false), version, &[]);
	assert_eq!(full_left, 0);
	assert_eq!(half_left, 0);

	let (BlockData::BsTriShape(full), BlockData::BsTriShape(half)) = (full, half) else {
		panic!("expected two BSTriShape blocks");
	};
	assert!(full.full_precision);
	assert!(!half.full_precision);
	assert_eq!(full.av.base.name, None);
	assert_eq!(full.av.flags, 14);

	let positions = |shape: &super::geometry::BsTriShape| shape.vertices.iter().map(|vertex| vertex.position).collect::<Vec<_>>();
	let expected: Vec<_> = POSITIONS.iter().map(|p| Vector3::new(p[0], p[1], p[2])).collect();
	assert_eq!(positions(&full), expected);
	assert_eq!(positions(&half), expected);
	assert_eq!(full.triangles, half.triangles);
	assert_eq!(full.triangles[0].v3, 1);
}

#[test]
fn skyrim_se_shapes_are_always_full_precision() {
	let desc = VertexDesc(0x001_u64 << 44);
	assert!(desc.has(vertex_flags::VERTEX));
	assert!(!desc.has(vertex_flags::FULL_PRECISION));
	assert!(uses_full_precision(desc, 100));
	assert!(!uses_full_precision(desc, 130));
}

fn tri_shape_data_bytes(with_triangle: bool) -> Vec<u8> {
	let mut w = ByteWriter::new();
	// No vertices, no normals, no colors, no uv sets.
	w.u16(0).u8(0).u16(0).u8(0);
	w.f32s(&[0.0, 0.0, 0.0, 1.0]);
	w.u8(0).u16(0);
	w.u16(1).u32(3);
	if with_triangle {
		w.u16(0).u16(1).u16(2);
	}
	w.u16(0);
	w.into_bytes()
}

#[test]
fn tri_shape_data_has_no_triangles_in_the_gap_band() {
	let (data, left) = decode("NiTriShapeData", &tri_shape_data_bytes(false), VersionContext::new(v::V10_0_1_3), &[]);
	assert_eq!(left, 0);
	let BlockData::TriShapeData(data) = data else {
		panic!("expected NiTriShapeData");
	};
	assert!(!data.has_triangles);
	assert!(data.triangles.is_empty());
	assert_eq!(data.num_triangles, 1);
}

#[test]
fn tri_shape_data_before_the_gap_always_has_triangles() {
	let (data, left) = decode("NiTriShapeData", &tri_shape_data_bytes(true), VersionContext::new(v::V10_0_1_2), &[]);
	assert_eq!(left, 0);
	let BlockData::TriShapeData(data) = data else {
		panic!("expected NiTriShapeData");
	};
	assert!(data.has_triangles);
	assert_eq!(data.triangles.len(), 1);
	assert_eq!(data.triangles[0].v2, 1);
}

#[test]
fn string_extra_data_reads_through_string_table() {
	let strings: Vec<Box<str>> = vec!["UPB".into(), "Mass = 10".into()];
	let mut w = ByteWriter::new();
	w.u32(0).u32(1);
	let (data, left) = decode(
		"NiStringExtraData",
		&w.into_bytes(),
		VersionContext::new(v::V20_2_0_7).with_user(11, 34),
		&strings,
	);
	assert_eq!(left, 0);

	let block = block("NiStringExtraData", data);
	assert_eq!(block.name(), Some("UPB"));
	assert!(block.extra_data().is_some());
	let BlockData::ExtraData(extra) = &block.data else {
		panic!("expected extra data");
	};
	assert_eq!(extra.value, ExtraValue::String(Some("Mass = 10".into())));
}

#[test]
fn float_interpolator_and_data_decode() {
	let version = VersionContext::new(v::V20_0_0_5);
	let mut w = ByteWriter::new();
	w.f32(0.75).i32(3);
	let (interp, _) = decode("NiFloatInterpolator", &w.into_bytes(), version, &[]);
	match interp {
		BlockData::Interpolator(InterpolatorData::Float { value, data }) => {
			assert_eq!(value, 0.75);
			assert_eq!(data.raw(), 3);
		}
		other => panic!("expected float interpolator, got {other:?}"),
	}

	// Two linear keys.
	let mut w = ByteWriter::new();
	w.u32(2).u32(1).f32s(&[0.0, 1.0, 2.0, 0.5]);
	let (data, left) = decode("NiFloatData", &w.into_bytes(), version, &[]);
	assert_eq!(left, 0);
	let BlockData::FloatData(data) = data else {
		panic!("expected NiFloatData");
	};
	assert_eq!(data.keys.keys.len(), 2);
	assert_eq!(data.keys.keys[1].time, 2.0);
	assert_eq!(data.keys.keys[1].value, 0.5);
	assert_eq!(data.keys.keys[1].forward, None);
}

#[test]
fn alpha_property_exposes_named_layer_and_category() {
	let strings: Vec<Box<str>> = vec!["Hair".into()];
	let mut w = ByteWriter::new();
	w.u32(0).u32(0).i32(-1).u16(0x00ED).u8(128);
	let (data, left) = decode("NiAlphaProperty", &w.into_bytes(), VersionContext::new(v::V20_2_0_7).with_user(12, 83), &strings);
	assert_eq!(left, 0);

	let block = block("NiAlphaProperty", data);
	assert!(block.is_property());
	assert_eq!(block.name(), Some("Hair"));
	assert!(block.object_net().is_some());
	assert!(block.av_object().is_none());
	assert!(block.node().is_none());
	let BlockData::AlphaProperty(alpha) = &block.data else {
		panic!("expected alpha property");
	};
	assert_eq!(alpha.flags, 0x00ED);
	assert_eq!(alpha.threshold, 128);
}

#[test]
fn placeholder_has_no_layers() {
	let block = block("NiMystery", BlockData::Unknown);
	assert!(block.is_placeholder());
	assert!(block.name().is_none());
	assert!(!block.is_property());
	assert!(block.object_net().is_none());
}

#[test]
fn object_layers_before_3_0_are_rejected() {
	let mut w = ByteWriter::new();
	w.sized_string("Scene Root").u32(0);
	let err = decode_err("NiNode", &w.into_bytes(), VersionContext::new(v::V2_3));
	assert!(matches!(
		err,
		NifError::UnsupportedFormatVersion {
			type_name: "NiObjectNET",
			version: v::V2_3
		}
	));
}

#[test]
fn object_layer_at_3_0_reads_the_chained_extra_link() {
	let mut w = ByteWriter::new();
	w.sized_string("Prop").i32(4).i32(-1).u16(0x10).u8(7);
	let (data, left) = decode("NiAlphaProperty", &w.into_bytes(), VersionContext::new(v::V3_0), &[]);
	assert_eq!(left, 0);
	let block = block("NiAlphaProperty", data);
	assert_eq!(block.name(), Some("Prop"));
	let net = block.object_net().expect("named object");
	assert_eq!(net.extra_data.iter().map(|link| link.raw()).collect::<Vec<_>>(), vec![4]);
	assert!(net.controller.is_null());
}
