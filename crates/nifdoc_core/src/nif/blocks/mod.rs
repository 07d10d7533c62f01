//! Block object model.
//!
//! Every concrete block is assembled from layer structs read base-first
//! (`ObjectNet` then `AvObject` then `NiNode`, and so on). Layers are plain fields on
//! the concrete struct, so a link typed with a layer resolves for every block built on
//! top of it.

pub mod collision;
pub mod common;
pub mod controller;
pub mod extra;
pub mod geometry;
pub mod interpolator;
pub mod keyframe;
pub mod object;
pub mod property;
pub mod texture;

use crate::nif::refs::BlockType;

use self::collision::{BhkCollisionObject, BhkRigidBody, BhkShape, CollisionObject, HkPackedNiTriStripsData, NiCollisionData};
use self::controller::{NiController, NiControllerManager, NiControllerSequence, NiDefaultAvObjectPalette, NiSequenceStreamHelper, NiStringPalette, TimeController};
use self::extra::{ExtraData, NiExtraData};
use self::geometry::{BsTriShape, GeometryData, NiGeometry, NiSkinData, NiSkinInstance, NiTriShapeData, NiTriStripsData};
use self::interpolator::InterpolatorData;
use self::keyframe::{NiBoolData, NiColorData, NiFloatData, NiKeyframeData, NiMorphData, NiPosData, NiUvData, NiVisData};
use self::object::{AvObject, NiCamera, NiLight, NiNode, ObjectNet};
use self::property::{
	BsEffectShaderProperty, BsLightingShaderProperty, BsShaderProperty, NiAlphaProperty, NiFlagProperty, NiFogProperty, NiMaterialProperty, NiStencilProperty,
	NiTexturingProperty, NiVertexColorProperty, NiZBufferProperty,
};
use self::texture::{BsShaderTextureSet, NiPixelData, NiSourceTexture};

/// One entry of the block table.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
	/// Type name as stored in the header, without any `\x01` arguments.
	pub type_name: Box<str>,
	/// Argument payload following a `\x01` in the stored type name.
	pub type_args: Option<Box<str>>,
	/// Absolute offset where the block data starts.
	pub offset: usize,
	/// Decoded fields.
	pub data: BlockData,
}

/// Decoded block payload, one variant per concrete shape.
///
/// Several type names share a shape; [`Block::type_name`] keeps the exact name.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum BlockData {
	Node(NiNode),
	Camera(NiCamera),
	Light(NiLight),
	Geometry(NiGeometry),
	TriShapeData(NiTriShapeData),
	TriStripsData(NiTriStripsData),
	BsTriShape(BsTriShape),
	SkinInstance(NiSkinInstance),
	SkinData(NiSkinData),
	AlphaProperty(NiAlphaProperty),
	ZBufferProperty(NiZBufferProperty),
	VertexColorProperty(NiVertexColorProperty),
	MaterialProperty(NiMaterialProperty),
	TexturingProperty(NiTexturingProperty),
	StencilProperty(NiStencilProperty),
	FlagProperty(NiFlagProperty),
	FogProperty(NiFogProperty),
	BsShaderProperty(BsShaderProperty),
	BsLightingShaderProperty(BsLightingShaderProperty),
	BsEffectShaderProperty(BsEffectShaderProperty),
	SourceTexture(NiSourceTexture),
	PixelData(NiPixelData),
	ShaderTextureSet(BsShaderTextureSet),
	ExtraData(NiExtraData),
	Controller(NiController),
	ControllerManager(NiControllerManager),
	ControllerSequence(NiControllerSequence),
	StringPalette(NiStringPalette),
	AvObjectPalette(NiDefaultAvObjectPalette),
	SequenceStreamHelper(NiSequenceStreamHelper),
	Interpolator(InterpolatorData),
	KeyframeData(NiKeyframeData),
	FloatData(NiFloatData),
	PosData(NiPosData),
	ColorData(NiColorData),
	BoolData(NiBoolData),
	VisData(NiVisData),
	UvData(NiUvData),
	MorphData(NiMorphData),
	CollisionData(NiCollisionData),
	BhkCollisionObject(BhkCollisionObject),
	RigidBody(BhkRigidBody),
	HavokShape(BhkShape),
	PackedTriStripsData(HkPackedNiTriStripsData),
	/// Placeholder for a block that was skipped (unknown name or unsupported layout).
	Unknown,
}

impl Block {
	/// Return whether this slot is a skipped-block placeholder.
	pub fn is_placeholder(&self) -> bool {
		matches!(self.data, BlockData::Unknown)
	}

	/// Named-object layer, for every block that carries one.
	pub fn object_net(&self) -> Option<&ObjectNet> {
		Some(match &self.data {
			BlockData::Node(_) | BlockData::Camera(_) | BlockData::Light(_) | BlockData::Geometry(_) | BlockData::BsTriShape(_) => {
				&self.av_object()?.base
			}
			BlockData::AlphaProperty(p) => &p.base,
			BlockData::ZBufferProperty(p) => &p.base,
			BlockData::VertexColorProperty(p) => &p.base,
			BlockData::MaterialProperty(p) => &p.base,
			BlockData::TexturingProperty(p) => &p.base,
			BlockData::StencilProperty(p) => &p.base,
			BlockData::FlagProperty(p) => &p.base,
			BlockData::FogProperty(p) => &p.base,
			BlockData::BsShaderProperty(p) => &p.shader.base,
			BlockData::BsLightingShaderProperty(p) => &p.base,
			BlockData::BsEffectShaderProperty(p) => &p.base,
			BlockData::SourceTexture(t) => &t.base,
			BlockData::SequenceStreamHelper(h) => &h.base,
			_ => return None,
		})
	}

	/// Scene-object layer (transform, properties, collision).
	pub fn av_object(&self) -> Option<&AvObject> {
		Some(match &self.data {
			BlockData::Node(node) => &node.av,
			BlockData::Camera(camera) => &camera.av,
			BlockData::Light(light) => &light.effect.av,
			BlockData::Geometry(geometry) => &geometry.av,
			BlockData::BsTriShape(shape) => &shape.av,
			_ => return None,
		})
	}

	/// Node layer, shared by every node subtype.
	pub fn node(&self) -> Option<&NiNode> {
		match &self.data {
			BlockData::Node(node) => Some(node),
			_ => None,
		}
	}

	/// Controller layer.
	pub fn time_controller(&self) -> Option<&TimeController> {
		match &self.data {
			BlockData::Controller(c) => Some(&c.base),
			BlockData::ControllerManager(m) => Some(&m.base),
			_ => None,
		}
	}

	/// Extra-data layer.
	pub fn extra_data(&self) -> Option<&ExtraData> {
		match &self.data {
			BlockData::ExtraData(extra) => Some(&extra.base),
			_ => None,
		}
	}

	/// Shared geometry-data layer of shape and strip data.
	pub fn geometry_data(&self) -> Option<&GeometryData> {
		match &self.data {
			BlockData::TriShapeData(data) => Some(&data.geometry),
			BlockData::TriStripsData(data) => Some(&data.geometry),
			_ => None,
		}
	}

	/// Collision-object layer.
	pub fn collision_object(&self) -> Option<&CollisionObject> {
		match &self.data {
			BlockData::CollisionData(c) => Some(&c.base),
			BlockData::BhkCollisionObject(c) => Some(&c.base),
			_ => None,
		}
	}

	/// Object name, when the block carries one.
	pub fn name(&self) -> Option<&str> {
		if let Some(net) = self.object_net() {
			return net.name.as_deref();
		}
		match &self.data {
			BlockData::ExtraData(extra) => extra.base.name.as_deref(),
			BlockData::ControllerSequence(seq) => seq.name.as_deref(),
			_ => None,
		}
	}

	/// Return whether the block belongs to the property category.
	pub fn is_property(&self) -> bool {
		matches!(
			self.data,
			BlockData::AlphaProperty(_)
				| BlockData::ZBufferProperty(_)
				| BlockData::VertexColorProperty(_)
				| BlockData::MaterialProperty(_)
				| BlockData::TexturingProperty(_)
				| BlockData::StencilProperty(_)
				| BlockData::FlagProperty(_)
				| BlockData::FogProperty(_)
				| BlockData::BsShaderProperty(_)
				| BlockData::BsLightingShaderProperty(_)
				| BlockData::BsEffectShaderProperty(_)
		)
	}
}

macro_rules! layer_block_type {
	($($ty:ident => $accessor:ident),+ $(,)?) => {
		$(
			impl BlockType for $ty {
				const LABEL: &'static str = stringify!($ty);
				type Target = $ty;

				fn cast(block: &Block) -> Option<&$ty> {
					block.$accessor()
				}
			}
		)+
	};
}

layer_block_type! {
	ObjectNet => object_net,
	AvObject => av_object,
	NiNode => node,
	TimeController => time_controller,
	ExtraData => extra_data,
	GeometryData => geometry_data,
	CollisionObject => collision_object,
}

macro_rules! category_block_type {
	($($(#[$meta:meta])* $marker:ident => |$block:ident| $test:expr),+ $(,)?) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq)]
			pub enum $marker {}

			impl BlockType for $marker {
				const LABEL: &'static str = stringify!($marker);
				type Target = Block;

				fn cast($block: &Block) -> Option<&Block> {
					$test.then_some($block)
				}
			}
		)+
	};
}

category_block_type! {
	/// Any non-placeholder block.
	AnyBlock => |block| true,
	/// Any interpolator.
	Interpolator => |block| matches!(block.data, BlockData::Interpolator(_)),
	/// Any rendering property.
	Property => |block| block.is_property(),
	/// Any Havok collision shape.
	HavokShape => |block| matches!(block.data, BlockData::HavokShape(_)),
	/// Any dynamic effect (lights).
	DynamicEffect => |block| matches!(block.data, BlockData::Light(_)),
}

#[cfg(test)]
mod tests;
