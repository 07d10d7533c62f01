//! Scene objects: the shared named-object and scene-object layers, nodes, cameras, lights.

use crate::nif::blocks::common::{BoundingVolume, Color3, Matrix33, Vector3, Vector4};
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ptr, Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{AnyBlock, BlockData, CollisionObject, DynamicEffect, ExtraData, NifError, Property, Result, TimeController};

/// Named object with extra data and a controller chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNet {
	/// Object name.
	pub name: Option<Box<str>>,
	/// Attached extra data (one chained link before 10.0.1.0).
	pub extra_data: Vec<Ref<ExtraData>>,
	/// First controller.
	pub controller: Ref<TimeController>,
}

impl ObjectNet {
	/// Read the layer.
	///
	/// NetImmerse streams before 3.0 keep inline extra data here and are rejected with
	/// [`NifError::UnsupportedFormatVersion`].
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let ver = *r.version();
		if !ver.at_least(v::V3_0) {
			return Err(NifError::UnsupportedFormatVersion {
				type_name: "NiObjectNET",
				version: ver.format_version,
			});
		}
		let name = r.read_string()?;

		let mut extra_data = Vec::new();
		if ver.in_range(v::V3_0, v::V4_2_2_0) {
			let head = r.read_ref()?;
			if !head.is_null() {
				extra_data.push(head);
			}
		}
		if ver.at_least(v::V10_0_1_0) {
			extra_data = r.read_ref_list()?;
		}

		let controller = r.read_ref()?;
		Ok(Self {
			name,
			extra_data,
			controller,
		})
	}
}

/// Scene-graph object: transform, properties, bounds, and collision.
#[derive(Debug, Clone, PartialEq)]
pub struct AvObject {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Object flags (16-bit before Bethesda stream 27).
	pub flags: u32,
	/// Local translation.
	pub translation: Vector3,
	/// Local rotation.
	pub rotation: Matrix33,
	/// Local uniform scale.
	pub scale: f32,
	/// Linear velocity (up to 4.2.2.0).
	pub velocity: Vector3,
	/// Attached properties.
	pub properties: Vec<Ref<Property>>,
	/// Legacy bounding volume (3.0 to 4.2.2.0).
	pub bounding_volume: Option<BoundingVolume>,
	/// Collision object (10.0.1.0 onward).
	pub collision: Ref<CollisionObject>,
}

impl AvObject {
	/// Read the layer, including its named-object base.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let base = ObjectNet::read(r)?;
		let ver = *r.version();

		let flags = if ver.user_version_2 > 26 { r.read_u32()? } else { u32::from(r.read_u16()?) };
		let translation = r.read_record()?;
		let rotation = r.read_record()?;
		let scale = r.read_f32()?;
		let velocity = if ver.at_most(v::V4_2_2_0) { r.read_record()? } else { Vector3::default() };
		let properties = if ver.user2_at_most(34) { r.read_ref_list()? } else { Vec::new() };
		let bounding_volume = if ver.in_range(v::V3_0, v::V4_2_2_0) && r.read_bool()? {
			Some(BoundingVolume::read(r)?)
		} else {
			None
		};
		let collision = if ver.at_least(v::V10_0_1_0) { r.read_ref()? } else { Ref::null() };

		Ok(Self {
			base,
			flags,
			translation,
			rotation,
			scale,
			velocity,
			properties,
			bounding_volume,
			collision,
		})
	}
}

/// Level-of-detail switching data.
#[derive(Debug, Clone, PartialEq)]
pub enum LodData {
	/// Inline center and near/far ranges (4.0.0.2 to 10.0.1.0).
	Ranges {
		/// LOD center.
		center: Vector3,
		/// `(near, far)` per level.
		levels: Vec<(f32, f32)>,
	},
	/// Separate LOD data block (10.1.0.0 onward).
	Block(Ref<AnyBlock>),
	/// Neither form present.
	None,
}

/// Fields specific to a node subtype.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
	/// Plain grouping node (including fade, leaf-anim, root-collision, avoid, and BS animation nodes).
	Plain,
	/// `NiBillboardNode`.
	Billboard {
		/// Billboard mode.
		mode: u16,
	},
	/// `NiSwitchNode`.
	Switch {
		/// Switch flags.
		flags: u16,
		/// Active child.
		index: u32,
	},
	/// `NiLODNode`.
	Lod {
		/// Switch flags.
		flags: u16,
		/// Active child.
		index: u32,
		/// Level data.
		lod: LodData,
	},
	/// `NiSortAdjustNode`.
	SortAdjust {
		/// Sorting mode.
		mode: u32,
		/// Accumulator (up to 20.0.0.3).
		accumulator: Ref<AnyBlock>,
	},
	/// `BSMultiBoundNode`.
	MultiBound {
		/// Multi-bound block.
		multi_bound: Ref<AnyBlock>,
		/// Culling mode (Skyrim onward).
		culling_mode: u32,
	},
	/// `BSOrderedNode`.
	Ordered {
		/// Alpha sort bound.
		alpha_sort_bound: Vector4,
		/// Static bound flag.
		static_bound: bool,
	},
	/// `BSTreeNode`.
	Tree {
		/// First bone list.
		bones_1: Vec<Ref<NiNode>>,
		/// Second bone list.
		bones_2: Vec<Ref<NiNode>>,
	},
	/// `BSValueNode`.
	Value {
		/// Value.
		value: u32,
		/// Value flags.
		flags: u8,
	},
	/// `BSRangeNode` and its blast, damage-stage, and debris subtypes.
	Range {
		/// Minimum.
		min: u8,
		/// Maximum.
		max: u8,
		/// Current.
		current: u8,
	},
}

/// Grouping node; every node subtype shares this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct NiNode {
	/// Scene-object layer.
	pub av: AvObject,
	/// Child objects.
	pub children: Vec<Ref<AvObject>>,
	/// Dynamic effects (before Bethesda stream 130).
	pub effects: Vec<Ref<DynamicEffect>>,
	/// Subtype fields.
	pub kind: NodeKind,
}

type KindReader = fn(&mut NifReader<'_>) -> Result<NodeKind>;

fn read_node(r: &mut NifReader<'_>, kind: KindReader) -> Result<BlockData> {
	let av = AvObject::read(r)?;
	let children = r.read_ref_list()?;
	let effects = if r.version().user2_at_most(129) { r.read_ref_list()? } else { Vec::new() };
	let kind = kind(r)?;
	Ok(BlockData::Node(NiNode {
		av,
		children,
		effects,
		kind,
	}))
}

fn plain(_: &mut NifReader<'_>) -> Result<NodeKind> {
	Ok(NodeKind::Plain)
}

fn billboard(r: &mut NifReader<'_>) -> Result<NodeKind> {
	let mode = if r.version().at_least(v::V10_1_0_0) { r.read_u16()? } else { 0 };
	Ok(NodeKind::Billboard { mode })
}

fn switch_fields(r: &mut NifReader<'_>) -> Result<(u16, u32)> {
	let flags = if r.version().at_least(v::V10_1_0_0) { r.read_u16()? } else { 0 };
	Ok((flags, r.read_u32()?))
}

fn switch(r: &mut NifReader<'_>) -> Result<NodeKind> {
	let (flags, index) = switch_fields(r)?;
	Ok(NodeKind::Switch { flags, index })
}

fn lod(r: &mut NifReader<'_>) -> Result<NodeKind> {
	let (flags, index) = switch_fields(r)?;
	let ver = *r.version();
	let lod = if ver.in_range(v::V4_0_0_2, v::V10_0_1_0) {
		let center = r.read_record()?;
		let count = r.read_count(8)?;
		let levels = r.read_vec(count, |r| Ok((r.read_f32()?, r.read_f32()?)))?;
		LodData::Ranges { center, levels }
	} else if ver.at_least(v::V10_1_0_0) {
		LodData::Block(r.read_ref()?)
	} else {
		LodData::None
	};
	Ok(NodeKind::Lod { flags, index, lod })
}

fn sort_adjust(r: &mut NifReader<'_>) -> Result<NodeKind> {
	let mode = r.read_u32()?;
	let accumulator = if r.version().at_most(v::V20_0_0_3) { r.read_ref()? } else { Ref::null() };
	Ok(NodeKind::SortAdjust { mode, accumulator })
}

fn multi_bound(r: &mut NifReader<'_>) -> Result<NodeKind> {
	let multi_bound = r.read_ref()?;
	let culling_mode = if r.version().is_skyrim_or_later() { r.read_u32()? } else { 0 };
	Ok(NodeKind::MultiBound { multi_bound, culling_mode })
}

fn ordered(r: &mut NifReader<'_>) -> Result<NodeKind> {
	Ok(NodeKind::Ordered {
		alpha_sort_bound: r.read_record()?,
		static_bound: r.read_byte_bool()?,
	})
}

fn tree(r: &mut NifReader<'_>) -> Result<NodeKind> {
	Ok(NodeKind::Tree {
		bones_1: r.read_ref_list()?,
		bones_2: r.read_ref_list()?,
	})
}

fn value(r: &mut NifReader<'_>) -> Result<NodeKind> {
	Ok(NodeKind::Value {
		value: r.read_u32()?,
		flags: r.read_u8()?,
	})
}

fn range(r: &mut NifReader<'_>) -> Result<NodeKind> {
	Ok(NodeKind::Range {
		min: r.read_u8()?,
		max: r.read_u8()?,
		current: r.read_u8()?,
	})
}

/// `NiCamera`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiCamera {
	/// Scene-object layer.
	pub av: AvObject,
	/// Camera flags (10.1.0.0 onward).
	pub camera_flags: u16,
	/// Frustum left, right, top, bottom, near, far.
	pub frustum: [f32; 6],
	/// Orthographic projection (10.1.0.0 onward).
	pub orthographic: bool,
	/// Viewport left, right, top, bottom.
	pub viewport: [f32; 4],
	/// LOD adjust factor.
	pub lod_adjust: f32,
	/// Scene root.
	pub scene: Ref<AvObject>,
	/// Screen polygon count.
	pub screen_polygons: u32,
	/// Screen texture count (4.2.1.0 onward).
	pub screen_textures: u32,
}

fn read_camera(r: &mut NifReader<'_>) -> Result<BlockData> {
	let av = AvObject::read(r)?;
	let ver = *r.version();
	let camera_flags = if ver.at_least(v::V10_1_0_0) { r.read_u16()? } else { 0 };
	let mut frustum = [0.0; 6];
	for slot in &mut frustum {
		*slot = r.read_f32()?;
	}
	let orthographic = ver.at_least(v::V10_1_0_0) && r.read_bool()?;
	let mut viewport = [0.0; 4];
	for slot in &mut viewport {
		*slot = r.read_f32()?;
	}
	let lod_adjust = r.read_f32()?;
	let scene = r.read_ref()?;
	let screen_polygons = r.read_u32()?;
	let screen_textures = if ver.at_least(v::V4_2_1_0) { r.read_u32()? } else { 0 };
	if ver.at_most(v::V3_1) {
		r.skip(4)?;
	}

	Ok(BlockData::Camera(NiCamera {
		av,
		camera_flags,
		frustum,
		orthographic,
		viewport,
		lod_adjust,
		scene,
		screen_polygons,
		screen_textures,
	}))
}

/// Dynamic-effect layer shared by lights.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicEffectData {
	/// Scene-object layer.
	pub av: AvObject,
	/// Effect enabled.
	pub switch_state: bool,
	/// Nodes lit by this effect.
	pub affected_nodes: Vec<Ptr<NiNode>>,
}

impl DynamicEffectData {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let av = AvObject::read(r)?;
		let ver = *r.version();
		let modern = ver.user2_at_most(129);

		let switch_state = if ver.at_least(v::V10_1_0_106) && modern { r.read_bool()? } else { true };
		let affected_nodes = if ver.at_most(v::V4_0_0_2) || (ver.at_least(v::V10_1_0_0) && modern) {
			r.read_ptr_list()?
		} else {
			Vec::new()
		};
		Ok(Self {
			av,
			switch_state,
			affected_nodes,
		})
	}
}

/// Point-light attenuation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attenuation {
	/// Constant term.
	pub constant: f32,
	/// Linear term.
	pub linear: f32,
	/// Quadratic term.
	pub quadratic: f32,
}

/// Fields specific to a light subtype.
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
	/// `NiAmbientLight`.
	Ambient,
	/// `NiDirectionalLight`.
	Directional,
	/// `NiPointLight`.
	Point(Attenuation),
	/// `NiSpotLight`.
	Spot {
		/// Point-light terms.
		attenuation: Attenuation,
		/// Outer cone angle.
		outer_angle: f32,
		/// Inner cone angle (20.2.0.5 onward).
		inner_angle: f32,
		/// Falloff exponent.
		exponent: f32,
	},
}

/// Light source.
#[derive(Debug, Clone, PartialEq)]
pub struct NiLight {
	/// Dynamic-effect layer.
	pub effect: DynamicEffectData,
	/// Intensity scale.
	pub dimmer: f32,
	/// Ambient color.
	pub ambient: Color3,
	/// Diffuse color.
	pub diffuse: Color3,
	/// Specular color.
	pub specular: Color3,
	/// Subtype fields.
	pub kind: LightKind,
}

fn read_light(r: &mut NifReader<'_>, kind: fn(&mut NifReader<'_>) -> Result<LightKind>) -> Result<BlockData> {
	let effect = DynamicEffectData::read(r)?;
	let dimmer = r.read_f32()?;
	let ambient = r.read_record()?;
	let diffuse = r.read_record()?;
	let specular = r.read_record()?;
	let kind = kind(r)?;
	Ok(BlockData::Light(NiLight {
		effect,
		dimmer,
		ambient,
		diffuse,
		specular,
		kind,
	}))
}

fn attenuation(r: &mut NifReader<'_>) -> Result<Attenuation> {
	Ok(Attenuation {
		constant: r.read_f32()?,
		linear: r.read_f32()?,
		quadratic: r.read_f32()?,
	})
}

fn spot(r: &mut NifReader<'_>) -> Result<LightKind> {
	let attenuation = attenuation(r)?;
	let outer_angle = r.read_f32()?;
	let inner_angle = if r.version().at_least(v::V20_2_0_5) { r.read_f32()? } else { 0.0 };
	let exponent = r.read_f32()?;
	Ok(LightKind::Spot {
		attenuation,
		outer_angle,
		inner_angle,
		exponent,
	})
}

concrete_block_type! {
	NiCamera => Camera,
	NiLight => Light,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	for name in [
		"NiNode",
		"BSFadeNode",
		"BSLeafAnimNode",
		"RootCollisionNode",
		"AvoidNode",
		"NiBSAnimationNode",
		"NiBSParticleNode",
	] {
		registry.register(name, |r| read_node(r, plain));
	}
	registry.register("NiBillboardNode", |r| read_node(r, billboard));
	registry.register("NiSwitchNode", |r| read_node(r, switch));
	registry.register("NiLODNode", |r| read_node(r, lod));
	registry.register("NiSortAdjustNode", |r| read_node(r, sort_adjust));
	registry.register("BSMultiBoundNode", |r| read_node(r, multi_bound));
	registry.register("BSOrderedNode", |r| read_node(r, ordered));
	registry.register("BSTreeNode", |r| read_node(r, tree));
	registry.register("BSValueNode", |r| read_node(r, value));
	for name in ["BSRangeNode", "BSBlastNode", "BSDamageStage", "BSDebrisNode"] {
		registry.register(name, |r| read_node(r, range));
	}

	registry.register("NiCamera", read_camera);
	registry.register("NiAmbientLight", |r| read_light(r, |_| Ok(LightKind::Ambient)));
	registry.register("NiDirectionalLight", |r| read_light(r, |_| Ok(LightKind::Directional)));
	registry.register("NiPointLight", |r| read_light(r, |r| Ok(LightKind::Point(attenuation(r)?))));
	registry.register("NiSpotLight", |r| read_light(r, spot));
}
