//! Extra data attached to named objects.

use crate::nif::blocks::common::{Color4, Vector3, Vector4};
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{BlockData, Result};

/// Extra-data layer: a name, and a chain link in old files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraData {
	/// Name (10.0.1.0 onward).
	pub name: Option<Box<str>>,
	/// Next extra data in the chain (up to 4.2.2.0).
	pub next: Ref<ExtraData>,
}

impl ExtraData {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let ver = *r.version();
		let name = if ver.at_least(v::V10_0_1_0) { r.read_string()? } else { None };
		let next = if ver.at_most(v::V4_2_2_0) { r.read_ref()? } else { Ref::null() };
		Ok(Self { name, next })
	}
}

/// Furniture entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FurniturePosition {
	/// Offset from the furniture origin.
	pub offset: Vector3,
	/// Orientation (Fallout 3 and older).
	pub orientation: u16,
	/// Position references (Fallout 3 and older).
	pub position_refs: [u8; 2],
	/// Heading in radians (Skyrim onward).
	pub heading: f32,
	/// Animation type (Skyrim onward).
	pub animation_type: u16,
	/// Entry properties (Skyrim onward).
	pub entry_properties: u16,
}

/// Payload of an extra-data block, one variant per type name family.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraValue {
	/// Plain `NiExtraData`.
	None,
	/// `NiStringExtraData`.
	String(Option<Box<str>>),
	/// `NiIntegerExtraData` and `BSXFlags`.
	Integer(u32),
	/// `NiBooleanExtraData`.
	Boolean(bool),
	/// `NiFloatExtraData`.
	Float(f32),
	/// `NiBinaryExtraData`.
	Binary(Vec<u8>),
	/// `NiStringsExtraData`.
	Strings(Vec<Box<str>>),
	/// `NiIntegersExtraData`.
	Integers(Vec<u32>),
	/// `NiFloatsExtraData`.
	Floats(Vec<f32>),
	/// `NiVectorExtraData`.
	Vector(Vector4),
	/// `NiColorExtraData`.
	Color(Color4),
	/// `NiTextKeyExtraData`: `(time, text)` pairs.
	TextKeys(Vec<(f32, Option<Box<str>>)>),
	/// `BSBound`.
	Bound {
		/// Box center.
		center: Vector3,
		/// Box half extents.
		dimensions: Vector3,
	},
	/// `BSFurnitureMarker` and `BSFurnitureMarkerNode`.
	Furniture(Vec<FurniturePosition>),
	/// `BSInvMarker`.
	InvMarker {
		/// Rotation around X, Y, and Z in milliradians.
		rotation: [u16; 3],
		/// Zoom.
		zoom: f32,
	},
	/// `BSBehaviorGraphExtraData`.
	BehaviorGraph {
		/// Behavior graph path.
		file: Option<Box<str>>,
		/// Controls the base skeleton.
		controls_base_skeleton: bool,
	},
}

/// Extra-data block.
#[derive(Debug, Clone, PartialEq)]
pub struct NiExtraData {
	/// Extra-data layer.
	pub base: ExtraData,
	/// Payload.
	pub value: ExtraValue,
}

type ValueReader = fn(&mut NifReader<'_>) -> Result<ExtraValue>;

fn read_extra(r: &mut NifReader<'_>, value: ValueReader) -> Result<BlockData> {
	let base = ExtraData::read(r)?;
	let value = value(r)?;
	Ok(BlockData::ExtraData(NiExtraData { base, value }))
}

fn string(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	if r.version().at_most(v::V4_2_2_0) {
		// Bytes remaining.
		r.skip(4)?;
	}
	Ok(ExtraValue::String(r.read_string()?))
}

fn binary(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	let len = r.read_count(1)?;
	Ok(ExtraValue::Binary(r.read_byte_vec(len)?))
}

fn strings(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	let count = r.read_count(4)?;
	Ok(ExtraValue::Strings(r.read_vec(count, |r| r.read_sized_string())?))
}

fn integers(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	let count = r.read_count(4)?;
	Ok(ExtraValue::Integers(r.read_u32_vec(count)?))
}

fn floats(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	let count = r.read_count(4)?;
	Ok(ExtraValue::Floats(r.read_f32_vec(count)?))
}

fn text_keys(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	if r.version().at_most(v::V4_2_2_0) {
		r.skip(4)?;
	}
	let count = r.read_count(8)?;
	let keys = r.read_vec(count, |r| Ok((r.read_f32()?, r.read_string()?)))?;
	Ok(ExtraValue::TextKeys(keys))
}

fn furniture(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	let legacy = r.version().user2_at_most(34);
	let count = r.read_count(16)?;
	let positions = r.read_vec(count, |r| {
		let mut position = FurniturePosition {
			offset: r.read_record()?,
			..FurniturePosition::default()
		};
		if legacy {
			position.orientation = r.read_u16()?;
			position.position_refs = [r.read_u8()?, r.read_u8()?];
		} else {
			position.heading = r.read_f32()?;
			position.animation_type = r.read_u16()?;
			position.entry_properties = r.read_u16()?;
		}
		Ok(position)
	})?;
	Ok(ExtraValue::Furniture(positions))
}

fn inv_marker(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	Ok(ExtraValue::InvMarker {
		rotation: [r.read_u16()?, r.read_u16()?, r.read_u16()?],
		zoom: r.read_f32()?,
	})
}

fn behavior_graph(r: &mut NifReader<'_>) -> Result<ExtraValue> {
	Ok(ExtraValue::BehaviorGraph {
		file: r.read_string()?,
		controls_base_skeleton: r.read_byte_bool()?,
	})
}

concrete_block_type! {
	NiExtraData => ExtraData,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	registry.register("NiExtraData", |r| read_extra(r, |_| Ok(ExtraValue::None)));
	registry.register("NiStringExtraData", |r| read_extra(r, string));
	for name in ["NiIntegerExtraData", "BSXFlags"] {
		registry.register(name, |r| read_extra(r, |r| Ok(ExtraValue::Integer(r.read_u32()?))));
	}
	registry.register("NiBooleanExtraData", |r| read_extra(r, |r| Ok(ExtraValue::Boolean(r.read_byte_bool()?))));
	registry.register("NiFloatExtraData", |r| read_extra(r, |r| Ok(ExtraValue::Float(r.read_f32()?))));
	registry.register("NiBinaryExtraData", |r| read_extra(r, binary));
	registry.register("NiStringsExtraData", |r| read_extra(r, strings));
	registry.register("NiIntegersExtraData", |r| read_extra(r, integers));
	registry.register("NiFloatsExtraData", |r| read_extra(r, floats));
	registry.register("NiVectorExtraData", |r| read_extra(r, |r| Ok(ExtraValue::Vector(r.read_record()?))));
	registry.register("NiColorExtraData", |r| read_extra(r, |r| Ok(ExtraValue::Color(r.read_record()?))));
	registry.register("NiTextKeyExtraData", |r| read_extra(r, text_keys));
	registry.register("BSBound", |r| {
		read_extra(r, |r| {
			Ok(ExtraValue::Bound {
				center: r.read_record()?,
				dimensions: r.read_record()?,
			})
		})
	});
	for name in ["BSFurnitureMarker", "BSFurnitureMarkerNode"] {
		registry.register(name, |r| read_extra(r, furniture));
	}
	registry.register("BSInvMarker", |r| read_extra(r, inv_marker));
	registry.register("BSBehaviorGraphExtraData", |r| read_extra(r, behavior_graph));
}
