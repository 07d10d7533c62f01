use crate::nif::blocks::common::Vector3;
use crate::nif::blocks::interpolator::InterpolatorData;
use crate::nif::blocks::property::NiAlphaProperty;
use crate::nif::{AnyBlock, Block, BlockData, BlockTable, Interpolator, NifError, ObjectNet, Property, Ptr, Ref};

fn block(type_name: &str, data: BlockData) -> Block {
	Block {
		type_name: type_name.into(),
		type_args: None,
		offset: 0,
		data,
	}
}

fn alpha() -> Block {
	block(
		"NiAlphaProperty",
		BlockData::AlphaProperty(NiAlphaProperty {
			base: ObjectNet {
				name: Some("Glass".into()),
				..ObjectNet::default()
			},
			flags: 0x00ED,
			threshold: 0,
		}),
	)
}

fn interpolator() -> Block {
	block(
		"NiPoint3Interpolator",
		BlockData::Interpolator(InterpolatorData::Point3 {
			value: Vector3::new(1.0, 2.0, 3.0),
			data: Ref::null(),
		}),
	)
}

fn table() -> BlockTable {
	BlockTable::new(vec![alpha(), interpolator(), block("NiMystery", BlockData::Unknown)])
}

#[test]
fn null_link_resolves_to_none() {
	let table = table();
	let link: Ref<Property> = Ref::null();
	assert!(link.is_null());
	assert_eq!(link.index(&table).expect("null index"), None);
	assert!(link.resolve(&table).expect("null resolves").is_none());
	assert_eq!(Ref::<Property>::default(), link);
}

#[test]
fn category_links_check_the_target_shape() {
	let table = table();
	let property: Ref<Property> = Ref::from_raw(0);
	let resolved = property.resolve(&table).expect("property").expect("present");
	assert_eq!(&*resolved.type_name, "NiAlphaProperty");

	let interp: Ref<Interpolator> = Ref::from_raw(1);
	assert!(interp.resolve(&table).expect("interpolator").is_some());

	let wrong: Ref<Interpolator> = Ref::from_raw(0);
	match wrong.resolve(&table) {
		Err(NifError::TypeMismatch { index, expected, got }) => {
			assert_eq!(index, 0);
			assert_eq!(expected, "Interpolator");
			assert_eq!(got, "NiAlphaProperty");
		}
		other => panic!("expected type mismatch, got {other:?}"),
	}
}

#[test]
fn concrete_and_layer_links_reach_fields() {
	let table = table();
	let concrete: Ref<NiAlphaProperty> = Ref::from_raw(0);
	assert_eq!(concrete.resolve(&table).expect("alpha").map(|a| a.flags), Some(0x00ED));

	let layer: Ptr<ObjectNet> = Ptr::from_raw(0);
	assert_eq!(layer.resolve(&table).expect("layer").and_then(|net| net.name.as_deref()), Some("Glass"));

	let recast: Ref<AnyBlock> = concrete.cast();
	assert_eq!(recast.raw(), 0);
	assert!(recast.resolve(&table).expect("any block").is_some());
}

#[test]
fn placeholder_target_resolves_to_none() {
	let table = table();
	let link: Ref<Property> = Ref::from_raw(2);
	assert_eq!(link.index(&table).expect("slot exists"), Some(2));
	assert!(link.resolve(&table).expect("placeholder tolerated").is_none());
	assert!(link.block(&table).expect("raw block").is_some_and(Block::is_placeholder));
}

#[test]
fn out_of_range_links_are_errors() {
	let table = table();
	for raw in [3, 100, -2] {
		let link: Ref<AnyBlock> = Ref::from_raw(raw);
		assert!(matches!(link.resolve(&table), Err(NifError::RefOutOfRange { len: 3, .. })), "raw {raw}");
	}
}

#[test]
fn address_tables_resolve_by_address() {
	let table = BlockTable::with_addresses(vec![alpha(), interpolator()], vec![0x0040_1000, 0x0040_2000]);
	assert!(table.uses_addresses());
	assert_eq!(table.slot(0x0040_2000).expect("known address"), Some(1));
	assert_eq!(table.slot(0).expect("zero is null"), None);
	assert_eq!(table.slot(-1).expect("minus one is null"), None);
	assert!(matches!(table.slot(1), Err(NifError::RefOutOfRange { raw: 1, .. })));

	let link: Ref<Interpolator> = Ref::from_raw(0x0040_2000);
	assert!(link.resolve(&table).expect("address link").is_some());
}

#[test]
fn debug_output_shows_raw_value() {
	let link: Ptr<AnyBlock> = Ptr::from_raw(7);
	assert_eq!(format!("{link:?}"), "Ptr(7)");
}
