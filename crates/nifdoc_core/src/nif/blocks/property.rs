//! Rendering properties, from the fixed-function Gamebryo set to the Bethesda shaders.

use crate::nif::blocks::common::{Color3, Color4, Matrix22, TexCoord, TexDesc, Vector3, Vector4};
use crate::nif::blocks::texture::BsShaderTextureSet;
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{BlockData, NifError, ObjectNet, Result};

/// `NiAlphaProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiAlphaProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Blend and test flags.
	pub flags: u16,
	/// Alpha test threshold.
	pub threshold: u8,
}

/// `NiZBufferProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiZBufferProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Test and write flags.
	pub flags: u16,
	/// Depth compare function (4.1.0.12 to 20.0.0.5).
	pub function: u32,
}

/// `NiVertexColorProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiVertexColorProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Flags (carry both modes from 20.1.0.1 onward).
	pub flags: u16,
	/// Vertex color source (up to 20.0.0.5).
	pub vertex_mode: u32,
	/// Lighting mode (up to 20.0.0.5).
	pub lighting_mode: u32,
}

/// `NiMaterialProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiMaterialProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Flags (3.0 to 10.0.1.2).
	pub flags: u16,
	/// Ambient color.
	pub ambient: Color3,
	/// Diffuse color.
	pub diffuse: Color3,
	/// Specular color.
	pub specular: Color3,
	/// Emissive color.
	pub emissive: Color3,
	/// Glossiness.
	pub glossiness: f32,
	/// Alpha.
	pub alpha: f32,
	/// Emissive multiplier (Fallout 3 streams).
	pub emissive_mult: f32,
}

/// Bump-map slot with its luma and matrix terms.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpMap {
	/// Texture slot.
	pub texture: TexDesc,
	/// Luma scale.
	pub luma_scale: f32,
	/// Luma offset.
	pub luma_offset: f32,
	/// Bump matrix.
	pub matrix: Matrix22,
}

/// Shader-map slot of a texturing property.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderTexDesc {
	/// Texture slot, when present.
	pub map: Option<(TexDesc, u32)>,
}

/// `NiTexturingProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiTexturingProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Flags.
	pub flags: u16,
	/// Apply mode (3.3.0.13 to 20.1.0.1).
	pub apply_mode: u32,
	/// Declared slot count.
	pub texture_count: u32,
	/// Base map.
	pub base_texture: Option<TexDesc>,
	/// Dark map.
	pub dark_texture: Option<TexDesc>,
	/// Detail map.
	pub detail_texture: Option<TexDesc>,
	/// Gloss map.
	pub gloss_texture: Option<TexDesc>,
	/// Glow map.
	pub glow_texture: Option<TexDesc>,
	/// Bump map.
	pub bump_map: Option<BumpMap>,
	/// Normal map (20.2.0.5 onward).
	pub normal_texture: Option<TexDesc>,
	/// Parallax map and offset (20.2.0.5 onward).
	pub parallax: Option<(TexDesc, f32)>,
	/// Decal maps 0 to 3, in slot order.
	pub decals: Vec<Option<TexDesc>>,
	/// Shader maps (10.0.1.0 onward).
	pub shader_textures: Vec<ShaderTexDesc>,
}

fn optional_slot(r: &mut NifReader<'_>) -> Result<Option<TexDesc>> {
	if r.read_bool()? { Ok(Some(TexDesc::read(r)?)) } else { Ok(None) }
}

fn read_texturing(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = ObjectNet::read(r)?;
	let ver = *r.version();

	let flags = if ver.at_most(v::V10_0_1_2) || ver.at_least(v::V20_1_0_2) { r.read_u16()? } else { 0 };
	let apply_mode = if ver.in_range(v::V3_3_0_13, v::V20_1_0_1) { r.read_u32()? } else { 0 };
	let texture_count = r.read_u32()?;

	let base_texture = optional_slot(r)?;
	let dark_texture = optional_slot(r)?;
	let detail_texture = optional_slot(r)?;
	let gloss_texture = optional_slot(r)?;
	let glow_texture = optional_slot(r)?;
	let bump_map = if r.read_bool()? {
		Some(BumpMap {
			texture: TexDesc::read(r)?,
			luma_scale: r.read_f32()?,
			luma_offset: r.read_f32()?,
			matrix: r.read_record()?,
		})
	} else {
		None
	};

	let modern = ver.at_least(v::V20_2_0_5);
	let normal_texture = if modern && texture_count > 6 { optional_slot(r)? } else { None };
	let parallax = if modern && texture_count > 7 && r.read_bool()? {
		Some((TexDesc::read(r)?, r.read_f32()?))
	} else {
		None
	};

	let first_decal = if modern { 8 } else { 6 };
	let mut decals = Vec::new();
	for slot in 0..4 {
		if texture_count > first_decal + slot {
			decals.push(optional_slot(r)?);
		}
	}

	let shader_textures = if ver.at_least(v::V10_0_1_0) {
		let count = r.read_count(1)?;
		r.read_vec(count, |r| {
			let map = if r.read_bool()? { Some((TexDesc::read(r)?, r.read_u32()?)) } else { None };
			Ok(ShaderTexDesc { map })
		})?
	} else {
		Vec::new()
	};

	Ok(BlockData::TexturingProperty(NiTexturingProperty {
		base,
		flags,
		apply_mode,
		texture_count,
		base_texture,
		dark_texture,
		detail_texture,
		gloss_texture,
		glow_texture,
		bump_map,
		normal_texture,
		parallax,
		decals,
		shader_textures,
	}))
}

/// `NiStencilProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiStencilProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Packed flags (up to 10.0.1.2, and from 20.1.0.3 onward).
	pub flags: u16,
	/// Stencil test enabled (up to 20.0.0.5).
	pub enabled: bool,
	/// Compare function (up to 20.0.0.5).
	pub function: u32,
	/// Reference value.
	pub reference: u32,
	/// Mask.
	pub mask: u32,
	/// Fail, z-fail, and pass actions (up to 20.0.0.5).
	pub actions: [u32; 3],
	/// Face draw mode (up to 20.0.0.5).
	pub draw_mode: u32,
}

fn read_stencil(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = ObjectNet::read(r)?;
	let ver = *r.version();
	let mut stencil = NiStencilProperty {
		base,
		flags: 0,
		enabled: false,
		function: 0,
		reference: 0,
		mask: u32::MAX,
		actions: [0; 3],
		draw_mode: 0,
	};

	if ver.at_most(v::V10_0_1_2) {
		stencil.flags = r.read_u16()?;
	}
	if ver.at_most(v::V20_0_0_5) {
		stencil.enabled = r.read_u8()? != 0;
		stencil.function = r.read_u32()?;
		stencil.reference = r.read_u32()?;
		stencil.mask = r.read_u32()?;
		for action in &mut stencil.actions {
			*action = r.read_u32()?;
		}
		stencil.draw_mode = r.read_u32()?;
	}
	if ver.at_least(v::V20_1_0_3) {
		stencil.flags = r.read_u16()?;
		stencil.reference = r.read_u32()?;
		stencil.mask = r.read_u32()?;
	}
	Ok(BlockData::StencilProperty(stencil))
}

/// Flag-only property: specular, wireframe, dither, and shade.
#[derive(Debug, Clone, PartialEq)]
pub struct NiFlagProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Flags.
	pub flags: u16,
}

/// `NiFogProperty`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiFogProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Flags.
	pub flags: u16,
	/// Fog depth.
	pub depth: f32,
	/// Fog color.
	pub color: Color3,
}

/// Fields shared by the Fallout 3 shader properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderBase {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Shade flags.
	pub flags: u16,
	/// Shader type.
	pub shader_type: u32,
	/// First shader flag word.
	pub shader_flags: u32,
	/// Second shader flag word.
	pub shader_flags_2: u32,
	/// Environment map scale.
	pub env_map_scale: f32,
}

impl ShaderBase {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let base = ObjectNet::read(r)?;
		let legacy = r.version().user2_at_most(34);
		let flags = if legacy { r.read_u16()? } else { 0 };
		let shader_type = if legacy { r.read_u32()? } else { 0 };
		Ok(Self {
			base,
			flags,
			shader_type,
			shader_flags: r.read_u32()?,
			shader_flags_2: r.read_u32()?,
			env_map_scale: r.read_f32()?,
		})
	}
}

/// Subtype fields of a Fallout 3 shader property.
#[derive(Debug, Clone, PartialEq)]
pub enum BsShaderKind {
	/// No further fields.
	Plain,
	/// `BSShaderPPLightingProperty` and `Lighting30ShaderProperty`.
	PpLighting {
		/// Texture set.
		texture_set: Ref<BsShaderTextureSet>,
		/// Refraction strength and fire period (Bethesda stream 15 onward).
		refraction: Option<(f32, i32)>,
		/// Parallax max passes and scale (Bethesda stream 25 onward).
		parallax: Option<(f32, f32)>,
	},
	/// `BSShaderNoLightingProperty`.
	NoLighting {
		/// Texture path.
		file_name: Box<str>,
		/// Falloff start/stop angle and start/stop opacity (Bethesda stream 27 onward).
		falloff: Option<[f32; 4]>,
	},
	/// Tile and tall-grass shaders: a single texture path.
	FileName(Box<str>),
}

/// Fallout 3 shader property.
#[derive(Debug, Clone, PartialEq)]
pub struct BsShaderProperty {
	/// Shared shader fields.
	pub shader: ShaderBase,
	/// Texture clamp mode (lighting shaders).
	pub clamp_mode: Option<u32>,
	/// Subtype fields.
	pub kind: BsShaderKind,
}

type ShaderKindReader = fn(&mut NifReader<'_>) -> Result<BsShaderKind>;

fn read_bs_shader(r: &mut NifReader<'_>, lighting: bool, kind: ShaderKindReader) -> Result<BlockData> {
	let shader = ShaderBase::read(r)?;
	let clamp_mode = if lighting && r.version().user2_at_most(34) { Some(r.read_u32()?) } else { None };
	let kind = kind(r)?;
	Ok(BlockData::BsShaderProperty(BsShaderProperty { shader, clamp_mode, kind }))
}

fn plain_shader(_: &mut NifReader<'_>) -> Result<BsShaderKind> {
	Ok(BsShaderKind::Plain)
}

fn pp_lighting(r: &mut NifReader<'_>) -> Result<BsShaderKind> {
	let uv2 = r.version().user_version_2;
	let texture_set = r.read_ref()?;
	let refraction = if uv2 > 14 { Some((r.read_f32()?, r.read_i32()?)) } else { None };
	let parallax = if uv2 > 24 { Some((r.read_f32()?, r.read_f32()?)) } else { None };
	Ok(BsShaderKind::PpLighting {
		texture_set,
		refraction,
		parallax,
	})
}

fn no_lighting(r: &mut NifReader<'_>) -> Result<BsShaderKind> {
	let file_name = r.read_sized_string()?;
	let falloff = if r.version().user_version_2 > 26 {
		Some([r.read_f32()?, r.read_f32()?, r.read_f32()?, r.read_f32()?])
	} else {
		None
	};
	Ok(BsShaderKind::NoLighting { file_name, falloff })
}

fn file_name_shader(r: &mut NifReader<'_>) -> Result<BsShaderKind> {
	Ok(BsShaderKind::FileName(r.read_sized_string()?))
}

/// Lighting shader extras keyed by the shader type.
#[derive(Debug, Clone, PartialEq)]
pub enum LightingShaderExtra {
	/// No extra fields for this shader type.
	None,
	/// Type 1: environment map scale.
	EnvironmentMap {
		/// Map scale.
		scale: f32,
	},
	/// Type 5: skin tint.
	SkinTint(Color3),
	/// Type 6: hair tint.
	HairTint(Color3),
	/// Type 7: parallax occlusion.
	ParallaxOcclusion {
		/// Maximum passes.
		max_passes: f32,
		/// Scale.
		scale: f32,
	},
	/// Type 11: multi-layer parallax.
	MultiLayerParallax {
		/// Inner layer thickness.
		inner_thickness: f32,
		/// Refraction scale.
		refraction_scale: f32,
		/// Inner texture scale.
		inner_texture_scale: TexCoord,
		/// Environment map strength.
		env_map_strength: f32,
	},
	/// Type 14: sparkle snow.
	SparkleSnow(Vector4),
	/// Type 16: eye environment map.
	EyeEnvironmentMap {
		/// Cube map scale.
		scale: f32,
		/// Left eye reflection center.
		left_center: Vector3,
		/// Right eye reflection center.
		right_center: Vector3,
	},
}

impl LightingShaderExtra {
	fn read(r: &mut NifReader<'_>, shader_type: u32) -> Result<Self> {
		Ok(match shader_type {
			1 => Self::EnvironmentMap { scale: r.read_f32()? },
			5 => Self::SkinTint(r.read_record()?),
			6 => Self::HairTint(r.read_record()?),
			7 => Self::ParallaxOcclusion {
				max_passes: r.read_f32()?,
				scale: r.read_f32()?,
			},
			11 => Self::MultiLayerParallax {
				inner_thickness: r.read_f32()?,
				refraction_scale: r.read_f32()?,
				inner_texture_scale: r.read_record()?,
				env_map_strength: r.read_f32()?,
			},
			14 => Self::SparkleSnow(r.read_record()?),
			16 => Self::EyeEnvironmentMap {
				scale: r.read_f32()?,
				left_center: r.read_record()?,
				right_center: r.read_record()?,
			},
			_ => Self::None,
		})
	}
}

/// `BSLightingShaderProperty` (Skyrim layout).
#[derive(Debug, Clone, PartialEq)]
pub struct BsLightingShaderProperty {
	/// Shader type, stored ahead of the name.
	pub shader_type: u32,
	/// Named-object layer.
	pub base: ObjectNet,
	/// First shader flag word.
	pub shader_flags_1: u32,
	/// Second shader flag word.
	pub shader_flags_2: u32,
	/// UV offset.
	pub uv_offset: TexCoord,
	/// UV scale.
	pub uv_scale: TexCoord,
	/// Texture set.
	pub texture_set: Ref<BsShaderTextureSet>,
	/// Emissive color.
	pub emissive_color: Color3,
	/// Emissive multiplier.
	pub emissive_multiple: f32,
	/// Texture clamp mode.
	pub clamp_mode: u32,
	/// Alpha.
	pub alpha: f32,
	/// Refraction strength.
	pub refraction_strength: f32,
	/// Glossiness.
	pub glossiness: f32,
	/// Specular color.
	pub specular_color: Color3,
	/// Specular strength.
	pub specular_strength: f32,
	/// Lighting effect terms.
	pub lighting_effects: [f32; 2],
	/// Type-specific fields.
	pub extra: LightingShaderExtra,
}

const BS_SHADER_MODERN: u32 = 130;

fn read_lighting_shader(r: &mut NifReader<'_>) -> Result<BlockData> {
	let uv2 = r.version().user_version_2;
	if uv2 >= BS_SHADER_MODERN {
		return Err(NifError::UnsupportedLayout {
			type_name: "BSLightingShaderProperty",
			user_version_2: uv2,
		});
	}

	let shader_type = if uv2 >= 83 { r.read_u32()? } else { 0 };
	let base = ObjectNet::read(r)?;
	let shader_flags_1 = r.read_u32()?;
	let shader_flags_2 = r.read_u32()?;
	let uv_offset = r.read_record()?;
	let uv_scale = r.read_record()?;
	let texture_set = r.read_ref()?;
	let emissive_color = r.read_record()?;
	let emissive_multiple = r.read_f32()?;
	let clamp_mode = r.read_u32()?;
	let alpha = r.read_f32()?;
	let refraction_strength = r.read_f32()?;
	let glossiness = r.read_f32()?;
	let specular_color = r.read_record()?;
	let specular_strength = r.read_f32()?;
	let lighting_effects = [r.read_f32()?, r.read_f32()?];
	let extra = LightingShaderExtra::read(r, shader_type)?;

	Ok(BlockData::BsLightingShaderProperty(BsLightingShaderProperty {
		shader_type,
		base,
		shader_flags_1,
		shader_flags_2,
		uv_offset,
		uv_scale,
		texture_set,
		emissive_color,
		emissive_multiple,
		clamp_mode,
		alpha,
		refraction_strength,
		glossiness,
		specular_color,
		specular_strength,
		lighting_effects,
		extra,
	}))
}

/// `BSEffectShaderProperty` (Skyrim layout).
#[derive(Debug, Clone, PartialEq)]
pub struct BsEffectShaderProperty {
	/// Named-object layer.
	pub base: ObjectNet,
	/// First shader flag word.
	pub shader_flags_1: u32,
	/// Second shader flag word.
	pub shader_flags_2: u32,
	/// UV offset.
	pub uv_offset: TexCoord,
	/// UV scale.
	pub uv_scale: TexCoord,
	/// Source texture path.
	pub source_texture: Box<str>,
	/// Texture clamp mode.
	pub clamp_mode: u8,
	/// Lighting influence.
	pub lighting_influence: u8,
	/// Environment map minimum LOD.
	pub env_map_min_lod: u8,
	/// Falloff start/stop angle and start/stop opacity.
	pub falloff: [f32; 4],
	/// Emissive color.
	pub emissive_color: Color4,
	/// Emissive multiplier.
	pub emissive_multiple: f32,
	/// Soft falloff depth.
	pub soft_falloff_depth: f32,
	/// Greyscale palette texture path.
	pub greyscale_texture: Box<str>,
}

fn read_effect_shader(r: &mut NifReader<'_>) -> Result<BlockData> {
	let uv2 = r.version().user_version_2;
	if uv2 >= BS_SHADER_MODERN {
		return Err(NifError::UnsupportedLayout {
			type_name: "BSEffectShaderProperty",
			user_version_2: uv2,
		});
	}

	let base = ObjectNet::read(r)?;
	let shader_flags_1 = r.read_u32()?;
	let shader_flags_2 = r.read_u32()?;
	let uv_offset = r.read_record()?;
	let uv_scale = r.read_record()?;
	let source_texture = r.read_sized_string()?;
	let clamp_mode = r.read_u8()?;
	let lighting_influence = r.read_u8()?;
	let env_map_min_lod = r.read_u8()?;
	r.skip(1)?;
	let falloff = [r.read_f32()?, r.read_f32()?, r.read_f32()?, r.read_f32()?];
	let emissive_color = r.read_record()?;
	let emissive_multiple = r.read_f32()?;
	let soft_falloff_depth = r.read_f32()?;
	let greyscale_texture = r.read_sized_string()?;

	Ok(BlockData::BsEffectShaderProperty(BsEffectShaderProperty {
		base,
		shader_flags_1,
		shader_flags_2,
		uv_offset,
		uv_scale,
		source_texture,
		clamp_mode,
		lighting_influence,
		env_map_min_lod,
		falloff,
		emissive_color,
		emissive_multiple,
		soft_falloff_depth,
		greyscale_texture,
	}))
}

fn read_alpha(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::AlphaProperty(NiAlphaProperty {
		base: ObjectNet::read(r)?,
		flags: r.read_u16()?,
		threshold: r.read_u8()?,
	}))
}

fn read_zbuffer(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = ObjectNet::read(r)?;
	let flags = r.read_u16()?;
	let function = if r.version().in_range(v::V4_1_0_12, v::V20_0_0_5) { r.read_u32()? } else { 0 };
	Ok(BlockData::ZBufferProperty(NiZBufferProperty { base, flags, function }))
}

fn read_vertex_color(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = ObjectNet::read(r)?;
	let flags = r.read_u16()?;
	let (vertex_mode, lighting_mode) = if r.version().at_most(v::V20_0_0_5) {
		(r.read_u32()?, r.read_u32()?)
	} else {
		(u32::from((flags >> 4) & 0x3), u32::from((flags >> 3) & 0x1))
	};
	Ok(BlockData::VertexColorProperty(NiVertexColorProperty {
		base,
		flags,
		vertex_mode,
		lighting_mode,
	}))
}

fn read_material(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = ObjectNet::read(r)?;
	let ver = *r.version();
	let fallout_3 = ver.is(v::V20_2_0_7) && ver.user_version >= 11;
	// Ambient and diffuse move into the shader once the Bethesda stream passes 21.
	let fallout_3_new = fallout_3 && ver.user_version_2 > 21;

	let flags = if ver.in_range(v::V3_0, v::V10_0_1_2) { r.read_u16()? } else { 0 };
	let (ambient, diffuse) = if fallout_3_new {
		(Color3::default(), Color3::default())
	} else {
		(r.read_record()?, r.read_record()?)
	};
	let specular = r.read_record()?;
	let emissive = r.read_record()?;
	let glossiness = r.read_f32()?;
	let alpha = r.read_f32()?;
	let emissive_mult = if fallout_3_new { r.read_f32()? } else { 1.0 };

	Ok(BlockData::MaterialProperty(NiMaterialProperty {
		base,
		flags,
		ambient,
		diffuse,
		specular,
		emissive,
		glossiness,
		alpha,
		emissive_mult,
	}))
}

fn read_flag_property(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::FlagProperty(NiFlagProperty {
		base: ObjectNet::read(r)?,
		flags: r.read_u16()?,
	}))
}

fn read_fog(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::FogProperty(NiFogProperty {
		base: ObjectNet::read(r)?,
		flags: r.read_u16()?,
		depth: r.read_f32()?,
		color: r.read_record()?,
	}))
}

concrete_block_type! {
	NiAlphaProperty => AlphaProperty,
	NiZBufferProperty => ZBufferProperty,
	NiVertexColorProperty => VertexColorProperty,
	NiMaterialProperty => MaterialProperty,
	NiTexturingProperty => TexturingProperty,
	NiStencilProperty => StencilProperty,
	NiFlagProperty => FlagProperty,
	NiFogProperty => FogProperty,
	BsShaderProperty => BsShaderProperty,
	BsLightingShaderProperty => BsLightingShaderProperty,
	BsEffectShaderProperty => BsEffectShaderProperty,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	registry.register("NiAlphaProperty", read_alpha);
	registry.register("NiZBufferProperty", read_zbuffer);
	registry.register("NiVertexColorProperty", read_vertex_color);
	registry.register("NiMaterialProperty", read_material);
	registry.register("NiTexturingProperty", read_texturing);
	registry.register("NiStencilProperty", read_stencil);
	for name in ["NiSpecularProperty", "NiWireframeProperty", "NiDitherProperty", "NiShadeProperty"] {
		registry.register(name, read_flag_property);
	}
	registry.register("NiFogProperty", read_fog);

	registry.register("BSShaderPPLightingProperty", |r| read_bs_shader(r, true, pp_lighting));
	registry.register("Lighting30ShaderProperty", |r| read_bs_shader(r, true, pp_lighting));
	registry.register("BSShaderNoLightingProperty", |r| read_bs_shader(r, true, no_lighting));
	registry.register("TileShaderProperty", |r| read_bs_shader(r, true, file_name_shader));
	registry.register("TallGrassShaderProperty", |r| read_bs_shader(r, false, file_name_shader));
	for name in [
		"HairShaderProperty",
		"WaterShaderProperty",
		"DistantLODShaderProperty",
		"BSDistantTreeShaderProperty",
		"VolumetricFogShaderProperty",
	] {
		registry.register(name, |r| read_bs_shader(r, false, plain_shader));
	}

	registry.register("BSLightingShaderProperty", read_lighting_shader);
	registry.register("BSEffectShaderProperty", read_effect_shader);
}
