use nifdoc_testkit::ByteWriter;

use super::{decode, decode_err, object_net};
use crate::nif::blocks::common::{Color3, TexCoord};
use crate::nif::blocks::property::LightingShaderExtra;
use crate::nif::version::v;
use crate::nif::{BlockData, NifError, VersionContext};

const SPECULAR: [f32; 3] = [0.1, 0.2, 0.3];

fn material_bytes(version: VersionContext, ambient_diffuse: bool, emissive_mult: Option<f32>) -> Vec<u8> {
	let mut w = ByteWriter::new();
	object_net(&mut w, version);
	if version.in_range(v::V3_0, v::V10_0_1_2) {
		w.u16(1);
	}
	if ambient_diffuse {
		w.f32s(&[0.5, 0.5, 0.5]).f32s(&[1.0, 0.25, 0.0]);
	}
	w.f32s(&SPECULAR).f32s(&[0.0, 0.0, 0.0]);
	w.f32(10.0).f32(0.5);
	if let Some(mult) = emissive_mult {
		w.f32(mult);
	}
	w.into_bytes()
}

#[test]
fn material_keeps_ambient_and_diffuse_up_to_bethesda_stream_21() {
	let version = VersionContext::new(v::V20_2_0_7).with_user(11, 20);
	let (data, left) = decode("NiMaterialProperty", &material_bytes(version, true, None), version, &[]);
	assert_eq!(left, 0);
	let BlockData::MaterialProperty(material) = data else {
		panic!("expected NiMaterialProperty");
	};
	assert_eq!(material.ambient, Color3 { r: 0.5, g: 0.5, b: 0.5 });
	assert_eq!(material.diffuse, Color3 { r: 1.0, g: 0.25, b: 0.0 });
	assert_eq!(material.specular, Color3 { r: 0.1, g: 0.2, b: 0.3 });
	assert_eq!(material.glossiness, 10.0);
	assert_eq!(material.alpha, 0.5);
	assert_eq!(material.emissive_mult, 1.0);
}

#[test]
fn material_moves_ambient_and_diffuse_out_after_bethesda_stream_21() {
	let version = VersionContext::new(v::V20_2_0_7).with_user(11, 34);
	let (data, left) = decode("NiMaterialProperty", &material_bytes(version, false, Some(2.5)), version, &[]);
	assert_eq!(left, 0);
	let BlockData::MaterialProperty(material) = data else {
		panic!("expected NiMaterialProperty");
	};
	assert_eq!(material.ambient, Color3::default());
	assert_eq!(material.specular.b, 0.3);
	assert_eq!(material.glossiness, 10.0);
	assert_eq!(material.emissive_mult, 2.5);
}

#[test]
fn material_flags_exist_only_up_to_10_0_1_2() {
	let version = VersionContext::new(v::V10_0_1_2);
	let (data, left) = decode("NiMaterialProperty", &material_bytes(version, true, None), version, &[]);
	assert_eq!(left, 0);
	let BlockData::MaterialProperty(material) = data else {
		panic!("expected NiMaterialProperty");
	};
	assert_eq!(material.flags, 1);
	assert_eq!(material.base.name.as_deref(), Some(""));
	assert_eq!(material.diffuse.g, 0.25);
}

#[test]
fn texturing_property_before_20_1_uses_apply_mode_and_clamp_fields() {
	let version = VersionContext::new(v::V20_0_0_5);
	let mut w = ByteWriter::new();
	object_net(&mut w, version);
	w.u32(2).u32(7);
	// Base slot: source, clamp, filter, uv set, no transform.
	w.u8(1).i32(3).u32(3).u32(2).u32(1).u8(0);
	// Dark, detail, gloss, glow, bump.
	w.zeros(5);
	// Decal 0.
	w.u8(0);
	// One shader map with id 5.
	w.u32(1).u8(1).i32(-1).u32(0).u32(0).u32(0).u8(0).u32(5);

	let (data, left) = decode("NiTexturingProperty", &w.into_bytes(), version, &[]);
	assert_eq!(left, 0);
	let BlockData::TexturingProperty(texturing) = data else {
		panic!("expected NiTexturingProperty");
	};
	assert_eq!(texturing.flags, 0);
	assert_eq!(texturing.apply_mode, 2);
	let base = texturing.base_texture.expect("base slot");
	assert_eq!(base.source.raw(), 3);
	assert_eq!((base.clamp_mode, base.filter_mode, base.uv_set), (3, 2, 1));
	assert!(base.transform.is_none());
	assert!(texturing.bump_map.is_none());
	assert!(texturing.normal_texture.is_none());
	assert_eq!(texturing.decals, vec![None]);
	assert_eq!(texturing.shader_textures.len(), 1);
	assert_eq!(texturing.shader_textures[0].map.as_ref().map(|(_, id)| *id), Some(5));
}

#[test]
fn texturing_property_from_20_2_0_5_carries_normal_and_parallax_slots() {
	let version = VersionContext::new(v::V20_2_0_7).with_user(11, 34);
	let mut w = ByteWriter::new();
	object_net(&mut w, version);
	w.u16(0x4E).u32(9);
	// Base slot: source, packed flags, transform.
	w.u8(1).i32(3).u16(0x3000).u8(1);
	w.f32s(&[0.5, 0.25]).f32s(&[2.0, 2.0]).f32(1.5).u32(1).f32s(&[0.5, 0.5]);
	// Dark, detail, gloss, glow.
	w.zeros(4);
	// Bump map with luma terms and matrix.
	w.u8(1).i32(-1).u16(0).u8(0).f32(1.0).f32(0.0).f32s(&[1.0, 0.0, 0.0, 1.0]);
	// No normal map, parallax with offset.
	w.u8(0);
	w.u8(1).i32(4).u16(0).u8(0).f32(0.04);
	// Decal 0, no shader maps.
	w.u8(0).u32(0);

	let (data, left) = decode("NiTexturingProperty", &w.into_bytes(), version, &[]);
	assert_eq!(left, 0);
	let BlockData::TexturingProperty(texturing) = data else {
		panic!("expected NiTexturingProperty");
	};
	assert_eq!(texturing.flags, 0x4E);
	assert_eq!(texturing.apply_mode, 0);
	let base = texturing.base_texture.expect("base slot");
	assert_eq!(base.flags, 0x3000);
	let transform = base.transform.expect("texture transform");
	assert_eq!(transform.translation, TexCoord { u: 0.5, v: 0.25 });
	assert_eq!(transform.rotation, 1.5);
	let bump = texturing.bump_map.expect("bump slot");
	assert_eq!(bump.luma_scale, 1.0);
	assert_eq!(bump.matrix.0, [[1.0, 0.0], [0.0, 1.0]]);
	assert!(texturing.normal_texture.is_none());
	let (parallax, offset) = texturing.parallax.expect("parallax slot");
	assert_eq!(parallax.source.raw(), 4);
	assert_eq!(offset, 0.04);
	assert_eq!(texturing.decals, vec![None]);
	assert!(texturing.shader_textures.is_empty());
}

fn lighting_shader_bytes(version: VersionContext, shader_type: u32) -> Vec<u8> {
	let mut w = ByteWriter::new();
	w.u32(shader_type);
	object_net(&mut w, version);
	w.u32(0x8240_0301).u32(0x0000_8021);
	w.f32s(&[0.0, 0.0]).f32s(&[1.0, 1.0]);
	w.i32(4);
	w.f32s(&[0.0, 0.0, 0.0]).f32(1.0);
	w.u32(3);
	w.f32(1.0).f32(0.0).f32(80.0);
	w.f32s(&[1.0, 1.0, 1.0]).f32(1.0);
	w.f32(0.3).f32(2.0);
	w.f32s(&[0.9, 0.7, 0.6]);
	w.into_bytes()
}

#[test]
fn lighting_shader_reads_skin_tint_extra() {
	let version = VersionContext::new(v::V20_2_0_7).with_user(12, 83);
	let (data, left) = decode("BSLightingShaderProperty", &lighting_shader_bytes(version, 5), version, &[]);
	assert_eq!(left, 0);
	let BlockData::BsLightingShaderProperty(shader) = data else {
		panic!("expected BSLightingShaderProperty");
	};
	assert_eq!(shader.shader_type, 5);
	assert_eq!(shader.shader_flags_1, 0x8240_0301);
	assert_eq!(shader.uv_scale, TexCoord { u: 1.0, v: 1.0 });
	assert_eq!(shader.texture_set.raw(), 4);
	assert_eq!(shader.clamp_mode, 3);
	assert_eq!(shader.glossiness, 80.0);
	assert_eq!(shader.lighting_effects, [0.3, 2.0]);
	assert_eq!(shader.extra, LightingShaderExtra::SkinTint(Color3 { r: 0.9, g: 0.7, b: 0.6 }));
}

#[test]
fn lighting_shader_rejects_fallout_4_layout() {
	let version = VersionContext::new(v::V20_2_0_7).with_user(12, 130);
	let err = decode_err("BSLightingShaderProperty", &lighting_shader_bytes(version, 0), version);
	assert!(matches!(
		err,
		NifError::UnsupportedLayout {
			type_name: "BSLightingShaderProperty",
			user_version_2: 130
		}
	));
}
