use nifdoc_testkit::ByteWriter;

use super::decode;
use crate::nif::blocks::controller::{ControlledIds, ControllerKind};
use crate::nif::version::v;
use crate::nif::{BlockData, VersionContext};

fn time_controller(w: &mut ByteWriter) {
	w.i32(-1).u16(0x0C);
	w.f32(1.0).f32(0.0).f32(0.0).f32(2.0);
	w.i32(5);
}

#[test]
fn transform_controller_up_to_10_1_0_103_links_keyframe_data() {
	let mut w = ByteWriter::new();
	time_controller(&mut w);
	w.i32(7);

	let (data, left) = decode("NiTransformController", &w.into_bytes(), VersionContext::new(v::V10_1_0_103), &[]);
	assert_eq!(left, 0);
	let BlockData::Controller(controller) = data else {
		panic!("expected NiTransformController");
	};
	assert_eq!(controller.base.flags, 0x0C);
	assert_eq!(controller.base.stop_time, 2.0);
	assert_eq!(controller.base.target.raw(), 5);
	assert!(!controller.manager_controlled);
	assert!(controller.interpolator.is_null());
	let ControllerKind::Keyframe { data, data_2 } = &controller.kind else {
		panic!("expected keyframe controller");
	};
	assert_eq!(data.raw(), 7);
	assert!(data_2.is_null());
}

#[test]
fn transform_controller_between_10_1_0_104_and_108_flags_manager_control() {
	let mut w = ByteWriter::new();
	time_controller(&mut w);
	w.u8(1).i32(3);

	let (data, left) = decode("NiTransformController", &w.into_bytes(), VersionContext::new(v::V10_1_0_106), &[]);
	assert_eq!(left, 0);
	let BlockData::Controller(controller) = data else {
		panic!("expected NiTransformController");
	};
	assert!(controller.manager_controlled);
	assert_eq!(controller.interpolator.raw(), 3);
	assert!(matches!(&controller.kind, ControllerKind::Keyframe { data, .. } if data.is_null()));
}

#[test]
fn transform_controller_from_20_links_only_the_interpolator() {
	let mut w = ByteWriter::new();
	time_controller(&mut w);
	w.i32(3);

	let version = VersionContext::new(v::V20_2_0_7).with_user(11, 34);
	let (data, left) = decode("NiTransformController", &w.into_bytes(), version, &[]);
	assert_eq!(left, 0);
	let BlockData::Controller(controller) = data else {
		panic!("expected NiTransformController");
	};
	assert!(!controller.manager_controlled);
	assert_eq!(controller.interpolator.raw(), 3);
}

#[test]
fn sequence_before_10_1_0_104_names_targets_inline() {
	let mut w = ByteWriter::new();
	w.sized_string("Idle").sized_string("Bip01").i32(4);
	w.u32(1);
	w.sized_string("Bip01 Head").i32(6);

	let (data, left) = decode("NiControllerSequence", &w.into_bytes(), VersionContext::new(v::V10_1_0_103), &[]);
	assert_eq!(left, 0);
	let BlockData::ControllerSequence(seq) = data else {
		panic!("expected NiControllerSequence");
	};
	assert_eq!(seq.name.as_deref(), Some("Idle"));
	assert_eq!(seq.accum_root_name.as_deref(), Some("Bip01"));
	assert_eq!(seq.text_keys.raw(), 4);
	assert_eq!(seq.array_grow_by, 0);
	let block = &seq.controlled_blocks[0];
	assert_eq!(block.target_name.as_deref(), Some("Bip01 Head"));
	assert_eq!(block.controller.raw(), 6);
	assert!(block.blend.is_none());
	assert_eq!(block.ids, ControlledIds::None);
	assert_eq!(seq.weight, 1.0);
}

#[test]
fn sequence_between_10_1_0_113_and_20_1_uses_string_palette_offsets() {
	let mut w = ByteWriter::new();
	w.sized_string("Walk");
	w.u32(1).u32(1);
	// Interpolator, controller, palette, five offsets.
	w.i32(2).i32(-1).i32(5);
	w.u32(0).u32(u32::MAX).u32(6).u32(u32::MAX).u32(u32::MAX);
	w.f32(1.0).i32(-1).u32(2).f32(1.0).f32(0.0).f32(3.5);
	w.i32(0).sized_string("Bip01");
	w.i32(5);

	let (data, left) = decode("NiControllerSequence", &w.into_bytes(), VersionContext::new(v::V20_0_0_5), &[]);
	assert_eq!(left, 0);
	let BlockData::ControllerSequence(seq) = data else {
		panic!("expected NiControllerSequence");
	};
	assert_eq!(seq.array_grow_by, 1);
	let block = &seq.controlled_blocks[0];
	assert_eq!(block.target_name, None);
	assert_eq!(block.interpolator.raw(), 2);
	assert_eq!(block.priority, 0);
	let ControlledIds::Offsets { palette, offsets } = &block.ids else {
		panic!("expected palette offsets");
	};
	assert_eq!(palette.raw(), 5);
	assert_eq!(offsets[2], 6);
	assert_eq!(seq.cycle_type, 2);
	assert_eq!(seq.stop_time, 3.5);
	assert_eq!(seq.manager.raw(), 0);
	assert_eq!(seq.accum_root_name.as_deref(), Some("Bip01"));
	assert_eq!(seq.string_palette.raw(), 5);
	assert!(seq.anim_notes.is_empty());
}

#[test]
fn bethesda_sequence_reads_priority_names_and_anim_note_list() {
	let strings: Vec<Box<str>> = vec!["Idle".into(), "Bip01".into(), "NiTransformController".into()];
	let version = VersionContext::new(v::V20_2_0_7).with_user(11, 34);
	let mut w = ByteWriter::new();
	w.u32(0);
	w.u32(1).u32(1);
	w.i32(2).i32(3).u8(26);
	w.u32(1).u32(u32::MAX).u32(2).u32(u32::MAX).u32(u32::MAX);
	w.f32(1.0).i32(4).u32(0).f32(1.0).f32(0.0).f32(1.0);
	w.i32(0).u32(1);
	// Anim note count is a u16 after Bethesda stream 28.
	w.u16(1).i32(9);

	let (data, left) = decode("NiControllerSequence", &w.into_bytes(), version, &strings);
	assert_eq!(left, 0);
	let BlockData::ControllerSequence(seq) = data else {
		panic!("expected NiControllerSequence");
	};
	assert_eq!(seq.name.as_deref(), Some("Idle"));
	let block = &seq.controlled_blocks[0];
	assert_eq!(block.priority, 26);
	assert_eq!(
		block.ids,
		ControlledIds::Names([Some("Bip01".into()), None, Some("NiTransformController".into()), None, None])
	);
	assert_eq!(seq.text_keys.raw(), 4);
	assert_eq!(seq.accum_root_name.as_deref(), Some("Bip01"));
	assert!(seq.string_palette.is_null());
	assert_eq!(seq.anim_notes.iter().map(|note| note.raw()).collect::<Vec<_>>(), vec![9]);
}

#[test]
fn string_palette_resolves_offsets_up_to_the_next_nul() {
	let mut w = ByteWriter::new();
	w.sized_string("Bip01\0NiTransformController\0").u32(28);

	let (data, left) = decode("NiStringPalette", &w.into_bytes(), VersionContext::new(v::V20_0_0_5), &[]);
	assert_eq!(left, 0);
	let BlockData::StringPalette(palette) = data else {
		panic!("expected NiStringPalette");
	};
	assert_eq!(palette.length, 28);
	assert_eq!(palette.get(0), Some("Bip01"));
	assert_eq!(palette.get(6), Some("NiTransformController"));
	assert_eq!(palette.get(100), None);
}
