//! Keyframe data blocks referenced by controllers and interpolators.

use crate::nif::blocks::common::{Color4, Key, KeyGroup, KeyType, TransformKeys, Vector3, read_keys};
use crate::nif::reader::NifReader;
use crate::nif::refs::concrete_block_type;
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{BlockData, Result};

/// `NiKeyframeData` and `NiTransformData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiKeyframeData {
	/// Rotation, translation, and scale tracks.
	pub keys: TransformKeys,
}

/// `NiFloatData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiFloatData {
	/// Float keys.
	pub keys: KeyGroup<f32>,
}

/// `NiPosData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiPosData {
	/// Position keys.
	pub keys: KeyGroup<Vector3>,
}

/// `NiColorData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiColorData {
	/// Color keys.
	pub keys: KeyGroup<Color4>,
}

/// `NiBoolData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiBoolData {
	/// Boolean keys stored as bytes.
	pub keys: KeyGroup<u8>,
}

/// `NiVisData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiVisData {
	/// Visibility keys without an interpolation mode.
	pub keys: Vec<Key<u8>>,
}

/// `NiUVData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiUvData {
	/// U translation, V translation, U scale, V scale.
	pub groups: [KeyGroup<f32>; 4],
}

/// One morph target.
#[derive(Debug, Clone, PartialEq)]
pub struct Morph {
	/// Target name (10.1.0.106 onward).
	pub frame_name: Option<Box<str>>,
	/// Weight keys (up to 10.1.0.0).
	pub keys: KeyGroup<f32>,
	/// Legacy weight (10.1.0.104 to 20.1.0.2, older Bethesda streams).
	pub legacy_weight: Option<f32>,
	/// Vertex offsets, one per vertex.
	pub vectors: Vec<Vector3>,
}

/// `NiMorphData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiMorphData {
	/// Declared vertex count.
	pub num_vertices: u32,
	/// Targets are relative to the base mesh.
	pub relative_targets: bool,
	/// Morph targets; the first is the base.
	pub morphs: Vec<Morph>,
}

fn read_morph(r: &mut NifReader<'_>, num_vertices: usize) -> Result<Morph> {
	let ver = *r.version();
	let frame_name = if ver.at_least(v::V10_1_0_106) { r.read_string()? } else { None };

	let mut keys = KeyGroup::default();
	if ver.at_most(v::V10_1_0_0) {
		// The interpolation mode is stored even when there are no keys.
		let count = r.read_count(8)?;
		let interpolation = KeyType::from_raw(r.read_u32()?);
		keys = KeyGroup {
			interpolation: Some(interpolation),
			keys: read_keys(r, count, interpolation, &mut read_f32_value)?,
		};
	}

	let legacy_weight = if ver.in_range(v::V10_1_0_104, v::V20_1_0_2) && ver.user_version_2 < 10 {
		Some(r.read_f32()?)
	} else {
		None
	};
	let vectors = r.read_records(num_vertices)?;
	Ok(Morph {
		frame_name,
		keys,
		legacy_weight,
		vectors,
	})
}

fn read_morph_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let num_morphs = r.read_count(12)?;
	let num_vertices = r.read_u32()?;
	let relative_targets = r.read_u8()? != 0;
	let morphs = r.read_vec(num_morphs, |r| read_morph(r, num_vertices as usize))?;
	Ok(BlockData::MorphData(NiMorphData {
		num_vertices,
		relative_targets,
		morphs,
	}))
}

fn read_vis_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let count = r.read_count(5)?;
	let keys = r.read_vec(count, |r| {
		Ok(Key {
			time: r.read_f32()?,
			value: r.read_u8()?,
			forward: None,
			backward: None,
			tbc: None,
		})
	})?;
	Ok(BlockData::VisData(NiVisData { keys }))
}

fn read_f32_value(r: &mut NifReader<'_>) -> Result<f32> {
	r.read_f32()
}

fn float_group(r: &mut NifReader<'_>) -> Result<KeyGroup<f32>> {
	KeyGroup::read(r, read_f32_value)
}

fn read_uv_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::UvData(NiUvData {
		groups: [float_group(r)?, float_group(r)?, float_group(r)?, float_group(r)?],
	}))
}

concrete_block_type! {
	NiKeyframeData => KeyframeData,
	NiFloatData => FloatData,
	NiPosData => PosData,
	NiColorData => ColorData,
	NiBoolData => BoolData,
	NiVisData => VisData,
	NiUvData => UvData,
	NiMorphData => MorphData,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	for name in ["NiKeyframeData", "NiTransformData"] {
		registry.register(name, |r| Ok(BlockData::KeyframeData(NiKeyframeData { keys: TransformKeys::read(r)? })));
	}
	registry.register("NiFloatData", |r| Ok(BlockData::FloatData(NiFloatData { keys: float_group(r)? })));
	registry.register("NiPosData", |r| {
		Ok(BlockData::PosData(NiPosData {
			keys: KeyGroup::read(r, |r| r.read_record())?,
		}))
	});
	registry.register("NiColorData", |r| {
		Ok(BlockData::ColorData(NiColorData {
			keys: KeyGroup::read(r, |r| r.read_record())?,
		}))
	});
	registry.register("NiBoolData", |r| {
		Ok(BlockData::BoolData(NiBoolData {
			keys: KeyGroup::read(r, |r| r.read_u8())?,
		}))
	});
	registry.register("NiVisData", read_vis_data);
	registry.register("NiUVData", read_uv_data);
	registry.register("NiMorphData", read_morph_data);
}
