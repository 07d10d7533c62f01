use super::{TypeRegistry, split_type_args, type_name_hash};
use crate::nif::version::{VersionContext, v};
use crate::nif::{BlockData, NifReader, Result};

const SAMPLE: &[&str] = &[
	"NiNode",
	"BSFadeNode",
	"NiCamera",
	"NiSpotLight",
	"NiTriShape",
	"BSTriShape",
	"BSDismemberSkinInstance",
	"NiAlphaProperty",
	"BSLightingShaderProperty",
	"TallGrassShaderProperty",
	"NiSourceTexture",
	"BSShaderTextureSet",
	"NiStringExtraData",
	"BSXFlags",
	"BSFurnitureMarkerNode",
	"NiControllerSequence",
	"NiDefaultAVObjectPalette",
	"NiBlendTransformInterpolator",
	"NiPathInterpolator",
	"NiTransformData",
	"NiUVData",
	"bhkCollisionObject",
	"bhkRigidBodyT",
	"bhkMoppBvTreeShape",
	"hkPackedNiTriStripsData",
	"bhkBlendController",
];

#[test]
fn builtin_covers_the_catalogue() {
	let registry = TypeRegistry::builtin();
	for name in SAMPLE {
		assert!(registry.contains(name), "{name} is not registered");
	}
	assert!(!registry.contains("NiTotallyMadeUp"));
	assert_eq!(registry.len(), registry.names().len());
}

#[test]
fn names_are_sorted_and_unique() {
	let names = TypeRegistry::builtin().names();
	assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn lookup_ignores_type_arguments() {
	assert_eq!(split_type_args("NiNode\x01Arg\x01More"), ("NiNode", Some("Arg\x01More")));
	assert_eq!(split_type_args("NiNode"), ("NiNode", None));
	assert!(TypeRegistry::builtin().contains("NiNode\x01Arg"));
}

#[test]
fn hash_is_fnv1a() {
	assert_eq!(type_name_hash(""), 0x811C_9DC5);
	assert_eq!(type_name_hash("a"), 0xE40C_292C);
	let registry = TypeRegistry::builtin();
	assert_eq!(registry.name_for_hash(type_name_hash("NiNode")), Some("NiNode"));
	assert_eq!(registry.name_for_hash(0xDEAD_BEEF), None);
}

#[test]
fn explicit_hash_overrides_computed_one() {
	let mut registry = TypeRegistry::with_builtin();
	registry.register_hash(0x1234_5678, "NiNode");
	assert_eq!(registry.name_for_hash(0x1234_5678), Some("NiNode"));
}

fn empty_block(_: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::Unknown)
}

#[test]
fn register_replaces_builtin_decoder() {
	let mut registry = TypeRegistry::with_builtin();
	let before = registry.len();
	registry.register("NiNode", empty_block);
	assert_eq!(registry.len(), before);

	let mut r = NifReader::new(&[], VersionContext::new(v::V20_2_0_7));
	let data = registry.construct("NiNode", &mut r).expect("decoder runs");
	assert_eq!(data, Some(BlockData::Unknown));
}

#[test]
fn construct_without_decoder_is_none() {
	let registry = TypeRegistry::new();
	assert!(registry.is_empty());
	let mut r = NifReader::new(&[1, 2, 3], VersionContext::new(v::V20_2_0_7));
	assert_eq!(registry.construct("NiNode", &mut r).expect("no error"), None);
	assert_eq!(r.pos(), 0);
}
