//! Time controllers, controller managers, and sequences.

use crate::nif::blocks::extra::NiExtraData;
use crate::nif::blocks::keyframe::{NiFloatData, NiKeyframeData, NiMorphData, NiPosData, NiUvData, NiVisData};
use crate::nif::blocks::texture::NiSourceTexture;
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ptr, Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{AnyBlock, AvObject, BlockData, Interpolator, ObjectNet, Result};

/// Controller layer shared by every animation controller.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeController {
	/// Next controller in the chain.
	pub next: Ref<TimeController>,
	/// Cycle and activity flags.
	pub flags: u16,
	/// Time scale.
	pub frequency: f32,
	/// Time offset.
	pub phase: f32,
	/// Start time.
	pub start_time: f32,
	/// Stop time.
	pub stop_time: f32,
	/// Controlled object (3.3.0.13 onward).
	pub target: Ptr<ObjectNet>,
}

impl TimeController {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let next = r.read_ref()?;
		let flags = r.read_u16()?;
		let frequency = r.read_f32()?;
		let phase = r.read_f32()?;
		let start_time = r.read_f32()?;
		let stop_time = r.read_f32()?;
		let ver = *r.version();
		let target = if ver.at_least(v::V3_3_0_13) { r.read_ptr()? } else { Ptr::null() };
		if ver.at_most(v::V3_1) {
			r.skip(4)?;
		}
		Ok(Self {
			next,
			flags,
			frequency,
			phase,
			start_time,
			stop_time,
			target,
		})
	}
}

/// Fields specific to a controller subtype.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerKind {
	/// Keyframe and transform controllers.
	Keyframe {
		/// Keyframe data (up to 10.1.0.103).
		data: Ref<NiKeyframeData>,
		/// Second data link (`BSKeyframeController`).
		data_2: Ref<AnyBlock>,
	},
	/// `NiMultiTargetTransformController`.
	MultiTargetTransform {
		/// Additional controlled objects.
		extra_targets: Vec<Ptr<AvObject>>,
	},
	/// `NiVisController`.
	Visibility {
		/// Visibility keys (up to 10.1.0.103).
		data: Ref<NiVisData>,
	},
	/// `NiAlphaController` and `BSNiAlphaPropertyTestRefController`.
	Alpha {
		/// Float keys (up to 10.1.0.103).
		data: Ref<NiFloatData>,
	},
	/// `NiMaterialColorController`.
	MaterialColor {
		/// Controlled color slot (10.1.0.0 onward).
		target_color: u16,
		/// Color keys (up to 10.1.0.103).
		data: Ref<NiPosData>,
	},
	/// `NiFlipController`.
	Flip {
		/// Texture slot.
		texture_slot: u32,
		/// Accumulated time (3.3.0.13 to 10.1.0.103).
		accum_time: f32,
		/// Time between flips (up to 10.1.0.103).
		delta: f32,
		/// Source textures.
		sources: Vec<Ref<NiSourceTexture>>,
	},
	/// `NiUVController`.
	Uv {
		/// Texture set.
		texture_set: u16,
		/// UV keys.
		data: Ref<NiUvData>,
	},
	/// `NiGeomMorpherController`.
	GeomMorpher {
		/// Morpher flags (10.0.1.2 onward).
		morpher_flags: u16,
		/// Morph targets.
		data: Ref<NiMorphData>,
		/// Always update (4.0.0.1 onward).
		always_update: bool,
		/// Interpolator per morph target, with its weight (20.1.0.3 onward).
		interpolators: Vec<(Ref<Interpolator>, f32)>,
	},
	/// `NiTextureTransformController`.
	TextureTransform {
		/// Slot is a shader map.
		shader_map: bool,
		/// Texture slot.
		texture_slot: u32,
		/// Transform member.
		operation: u32,
		/// Float keys (up to 10.1.0.103).
		data: Ref<NiFloatData>,
	},
	/// Bethesda shader float controllers.
	ShaderFloat {
		/// Controlled variable.
		variable: u32,
	},
	/// Bethesda shader color controllers.
	ShaderColor {
		/// Controlled color.
		color: u32,
	},
	/// `bhkBlendController`.
	HavokBlend {
		/// Keys.
		keys: u32,
	},
}

/// Animation controller.
#[derive(Debug, Clone, PartialEq)]
pub struct NiController {
	/// Controller layer.
	pub base: TimeController,
	/// Driven by a controller manager (10.1.0.104 to 10.1.0.108).
	pub manager_controlled: bool,
	/// Interpolator (single-interpolator controllers, 10.1.0.104 onward).
	pub interpolator: Ref<Interpolator>,
	/// Subtype fields.
	pub kind: ControllerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
	Time,
	Interp,
	SingleInterp,
}

type KindReader = fn(&mut NifReader<'_>) -> Result<ControllerKind>;

fn read_controller(r: &mut NifReader<'_>, level: Level, kind: KindReader) -> Result<BlockData> {
	let base = TimeController::read(r)?;
	let ver = *r.version();
	let manager_controlled = level != Level::Time && ver.in_range(v::V10_1_0_104, v::V10_1_0_108) && r.read_bool()?;
	let interpolator = if level == Level::SingleInterp && ver.at_least(v::V10_1_0_104) {
		r.read_ref()?
	} else {
		Ref::null()
	};
	let kind = kind(r)?;
	Ok(BlockData::Controller(NiController {
		base,
		manager_controlled,
		interpolator,
		kind,
	}))
}

/// Read a data link that moved into the interpolator after 10.1.0.103.
fn legacy_data<T>(r: &mut NifReader<'_>) -> Result<Ref<T>> {
	if r.version().at_most(v::V10_1_0_103) { r.read_ref() } else { Ok(Ref::null()) }
}

fn keyframe(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	Ok(ControllerKind::Keyframe {
		data: legacy_data(r)?,
		data_2: Ref::null(),
	})
}

fn bs_keyframe(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	Ok(ControllerKind::Keyframe {
		data: legacy_data(r)?,
		data_2: r.read_ref()?,
	})
}

fn multi_target(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	let count = r.read_count_u16(4)?;
	Ok(ControllerKind::MultiTargetTransform {
		extra_targets: r.read_vec(count, |r| r.read_ptr())?,
	})
}

fn visibility(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	Ok(ControllerKind::Visibility { data: legacy_data(r)? })
}

fn alpha(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	Ok(ControllerKind::Alpha { data: legacy_data(r)? })
}

fn material_color(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	let target_color = if r.version().at_least(v::V10_1_0_0) { r.read_u16()? } else { 0 };
	Ok(ControllerKind::MaterialColor {
		target_color,
		data: legacy_data(r)?,
	})
}

fn flip(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	let ver = *r.version();
	let texture_slot = r.read_u32()?;
	let accum_time = if ver.in_range(v::V3_3_0_13, v::V10_1_0_103) { r.read_f32()? } else { 0.0 };
	let delta = if ver.at_most(v::V10_1_0_103) { r.read_f32()? } else { 0.0 };
	let sources = r.read_ref_list()?;
	Ok(ControllerKind::Flip {
		texture_slot,
		accum_time,
		delta,
		sources,
	})
}

fn uv(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	Ok(ControllerKind::Uv {
		texture_set: r.read_u16()?,
		data: r.read_ref()?,
	})
}

fn geom_morpher(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	let ver = *r.version();
	let morpher_flags = if ver.at_least(v::V10_0_1_2) { r.read_u16()? } else { 0 };
	let data = r.read_ref()?;
	let always_update = ver.at_least(v::V4_0_0_1) && r.read_u8()? != 0;

	let mut interpolators = Vec::new();
	if ver.at_least(v::V10_1_0_106) {
		let count = r.read_count(4)?;
		interpolators = if ver.at_least(v::V20_1_0_3) {
			r.read_vec(count, |r| Ok((r.read_ref()?, r.read_f32()?)))?
		} else {
			r.read_vec(count, |r| Ok((r.read_ref()?, 1.0)))?
		};
	}
	if ver.in_range(v::V10_2_0_0, v::V20_1_0_2) && ver.user_version_2 > 9 {
		let count = r.read_count(4)?;
		r.skip(count * 4)?;
	}
	Ok(ControllerKind::GeomMorpher {
		morpher_flags,
		data,
		always_update,
		interpolators,
	})
}

fn texture_transform(r: &mut NifReader<'_>) -> Result<ControllerKind> {
	Ok(ControllerKind::TextureTransform {
		shader_map: r.read_byte_bool()?,
		texture_slot: r.read_u32()?,
		operation: r.read_u32()?,
		data: legacy_data(r)?,
	})
}

/// `NiControllerManager`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiControllerManager {
	/// Controller layer.
	pub base: TimeController,
	/// Cumulative blending.
	pub cumulative: bool,
	/// Managed sequences.
	pub sequences: Vec<Ref<NiControllerSequence>>,
	/// Object palette (10.1.0.104 onward).
	pub object_palette: Ref<NiDefaultAvObjectPalette>,
}

fn read_manager(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = TimeController::read(r)?;
	let cumulative = r.read_bool()?;
	let sequences = r.read_ref_list()?;
	let object_palette = if r.version().at_least(v::V10_1_0_104) { r.read_ref()? } else { Ref::null() };
	Ok(BlockData::ControllerManager(NiControllerManager {
		base,
		cumulative,
		sequences,
		object_palette,
	}))
}

/// How a controlled block names its target.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlledIds {
	/// Node name, property type, controller type, controller id, interpolator id.
	Names([Option<Box<str>>; 5]),
	/// The same five as offsets into a string palette (10.1.0.113 to 20.1.0.0).
	Offsets {
		/// Palette holding the strings.
		palette: Ref<NiStringPalette>,
		/// Offsets in the order of [`ControlledIds::Names`].
		offsets: [u32; 5],
	},
	/// Neither form present (before 10.1.0.104).
	None,
}

/// One animated target of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlledBlock {
	/// Target name (up to 10.1.0.103).
	pub target_name: Option<Box<str>>,
	/// Interpolator (10.1.0.106 onward).
	pub interpolator: Ref<Interpolator>,
	/// Controller.
	pub controller: Ref<TimeController>,
	/// Blend interpolator and index (10.1.0.104 to 10.1.0.110).
	pub blend: Option<(Ref<Interpolator>, u16)>,
	/// Priority.
	pub priority: u8,
	/// Target identifiers.
	pub ids: ControlledIds,
}

fn read_controlled_block(r: &mut NifReader<'_>) -> Result<ControlledBlock> {
	let ver = *r.version();
	let target_name = if ver.at_most(v::V10_1_0_103) { r.read_string()? } else { None };
	let interpolator = if ver.at_least(v::V10_1_0_106) { r.read_ref()? } else { Ref::null() };
	let controller = r.read_ref()?;
	let blend = if ver.in_range(v::V10_1_0_104, v::V10_1_0_110) {
		Some((r.read_ref()?, r.read_u16()?))
	} else {
		None
	};
	let priority = if ver.at_least(v::V10_1_0_106) && (ver.user_version_2 > 0 || ver.at_least(v::V20_1_0_3)) {
		r.read_u8()?
	} else {
		0
	};

	let ids = if ver.in_range(v::V10_1_0_113, v::V20_1_0_0) {
		let palette = r.read_ref()?;
		let mut offsets = [0; 5];
		for offset in &mut offsets {
			*offset = r.read_u32()?;
		}
		ControlledIds::Offsets { palette, offsets }
	} else if ver.at_least(v::V10_1_0_104) {
		ControlledIds::Names([r.read_string()?, r.read_string()?, r.read_string()?, r.read_string()?, r.read_string()?])
	} else {
		ControlledIds::None
	};

	Ok(ControlledBlock {
		target_name,
		interpolator,
		controller,
		blend,
		priority,
		ids,
	})
}

/// `NiControllerSequence`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiControllerSequence {
	/// Sequence name.
	pub name: Option<Box<str>>,
	/// Accumulation root name.
	pub accum_root_name: Option<Box<str>>,
	/// Text keys.
	pub text_keys: Ref<NiExtraData>,
	/// Growth step of the controlled-block array (10.1.0.106 onward).
	pub array_grow_by: u32,
	/// Controlled blocks.
	pub controlled_blocks: Vec<ControlledBlock>,
	/// Blend weight.
	pub weight: f32,
	/// Cycle type.
	pub cycle_type: u32,
	/// Frequency.
	pub frequency: f32,
	/// Start time.
	pub start_time: f32,
	/// Stop time.
	pub stop_time: f32,
	/// Owning manager.
	pub manager: Ptr<NiControllerManager>,
	/// Accumulation flags (20.3.0.8 onward).
	pub accum_flags: u32,
	/// String palette (10.1.0.113 to 20.1.0.0).
	pub string_palette: Ref<NiStringPalette>,
	/// Animation note blocks (Bethesda streams).
	pub anim_notes: Vec<Ref<AnyBlock>>,
}

fn read_sequence(r: &mut NifReader<'_>) -> Result<BlockData> {
	let ver = *r.version();
	let name = r.read_string()?;
	let mut accum_root_name = None;
	let mut text_keys = Ref::null();
	if ver.at_most(v::V10_1_0_103) {
		accum_root_name = r.read_string()?;
		text_keys = r.read_ref()?;
	}

	let count = r.read_count(4)?;
	let array_grow_by = if ver.at_least(v::V10_1_0_106) { r.read_u32()? } else { 0 };
	let controlled_blocks = r.read_vec(count, read_controlled_block)?;

	let mut seq = NiControllerSequence {
		name,
		accum_root_name,
		text_keys,
		array_grow_by,
		controlled_blocks,
		weight: 1.0,
		cycle_type: 0,
		frequency: 1.0,
		start_time: 0.0,
		stop_time: 0.0,
		manager: Ptr::null(),
		accum_flags: 0,
		string_palette: Ref::null(),
		anim_notes: Vec::new(),
	};
	if ver.at_least(v::V10_1_0_106) {
		seq.weight = r.read_f32()?;
		seq.text_keys = r.read_ref()?;
		seq.cycle_type = r.read_u32()?;
		seq.frequency = r.read_f32()?;
		if ver.at_most(v::V10_4_0_1) {
			// Phase.
			r.skip(4)?;
		}
		seq.start_time = r.read_f32()?;
		seq.stop_time = r.read_f32()?;
		if ver.is(v::V10_1_0_106) {
			// Play backwards.
			r.skip(1)?;
		}
		seq.manager = r.read_ptr()?;
		seq.accum_root_name = r.read_string()?;
	}
	if ver.at_least(v::V20_3_0_8) {
		seq.accum_flags = r.read_u32()?;
	}
	if ver.in_range(v::V10_1_0_113, v::V20_1_0_0) {
		seq.string_palette = r.read_ref()?;
	}
	if ver.at_least(v::V20_2_0_7) {
		let uv2 = ver.user_version_2;
		if (24..=28).contains(&uv2) {
			seq.anim_notes = vec![r.read_ref()?];
		} else if uv2 > 28 {
			let count = r.read_count_u16(4)?;
			seq.anim_notes = r.read_vec(count, |r| r.read_ref())?;
		}
	}
	Ok(BlockData::ControllerSequence(seq))
}

/// `NiStringPalette`: NUL-separated strings addressed by byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct NiStringPalette {
	/// Palette bytes as text.
	pub palette: Box<str>,
	/// Stored length.
	pub length: u32,
}

impl NiStringPalette {
	/// String starting at `offset`, up to the next NUL.
	pub fn get(&self, offset: u32) -> Option<&str> {
		let tail = self.palette.get(offset as usize..)?;
		Some(tail.split('\0').next().unwrap_or(tail))
	}
}

fn read_string_palette(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::StringPalette(NiStringPalette {
		palette: r.read_sized_string()?,
		length: r.read_u32()?,
	}))
}

/// `NiDefaultAVObjectPalette`: named lookup of scene objects.
#[derive(Debug, Clone, PartialEq)]
pub struct NiDefaultAvObjectPalette {
	/// Scene root.
	pub scene: Ptr<AvObject>,
	/// `(name, object)` entries.
	pub objects: Vec<(Box<str>, Ptr<AvObject>)>,
}

fn read_object_palette(r: &mut NifReader<'_>) -> Result<BlockData> {
	let scene = r.read_ptr()?;
	let count = r.read_count(8)?;
	let objects = r.read_vec(count, |r| Ok((r.read_sized_string()?, r.read_ptr()?)))?;
	Ok(BlockData::AvObjectPalette(NiDefaultAvObjectPalette { scene, objects }))
}

/// `NiSequenceStreamHelper`: root of a legacy keyframe file.
#[derive(Debug, Clone, PartialEq)]
pub struct NiSequenceStreamHelper {
	/// Named-object layer.
	pub base: ObjectNet,
}

concrete_block_type! {
	NiController => Controller,
	NiControllerManager => ControllerManager,
	NiControllerSequence => ControllerSequence,
	NiStringPalette => StringPalette,
	NiDefaultAvObjectPalette => AvObjectPalette,
	NiSequenceStreamHelper => SequenceStreamHelper,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	for name in ["NiKeyframeController", "NiTransformController"] {
		registry.register(name, |r| read_controller(r, Level::SingleInterp, keyframe));
	}
	registry.register("BSKeyframeController", |r| read_controller(r, Level::SingleInterp, bs_keyframe));
	registry.register("NiMultiTargetTransformController", |r| read_controller(r, Level::Interp, multi_target));
	registry.register("NiVisController", |r| read_controller(r, Level::SingleInterp, visibility));
	for name in ["NiAlphaController", "BSNiAlphaPropertyTestRefController"] {
		registry.register(name, |r| read_controller(r, Level::SingleInterp, alpha));
	}
	registry.register("NiMaterialColorController", |r| read_controller(r, Level::SingleInterp, material_color));
	registry.register("NiFlipController", |r| read_controller(r, Level::SingleInterp, flip));
	registry.register("NiUVController", |r| read_controller(r, Level::Time, uv));
	registry.register("NiGeomMorpherController", |r| read_controller(r, Level::Interp, geom_morpher));
	registry.register("NiTextureTransformController", |r| read_controller(r, Level::SingleInterp, texture_transform));
	for name in ["BSEffectShaderPropertyFloatController", "BSLightingShaderPropertyFloatController"] {
		registry.register(name, |r| {
			read_controller(r, Level::SingleInterp, |r| Ok(ControllerKind::ShaderFloat { variable: r.read_u32()? }))
		});
	}
	for name in ["BSEffectShaderPropertyColorController", "BSLightingShaderPropertyColorController"] {
		registry.register(name, |r| {
			read_controller(r, Level::SingleInterp, |r| Ok(ControllerKind::ShaderColor { color: r.read_u32()? }))
		});
	}
	registry.register("bhkBlendController", |r| {
		read_controller(r, Level::Time, |r| Ok(ControllerKind::HavokBlend { keys: r.read_u32()? }))
	});

	registry.register("NiControllerManager", read_manager);
	registry.register("NiControllerSequence", read_sequence);
	registry.register("NiStringPalette", read_string_palette);
	registry.register("NiDefaultAVObjectPalette", read_object_palette);
	registry.register("NiSequenceStreamHelper", |r| {
		Ok(BlockData::SequenceStreamHelper(NiSequenceStreamHelper { base: ObjectNet::read(r)? }))
	});
}
