use nifdoc_testkit::NifBuilder;

use crate::nif::version::v;
use crate::nif::{Diagnostic, Endianness, Header, NifError, NifReader, TypeRegistry, VersionContext, type_name_hash};

fn read_header(bytes: &[u8]) -> crate::nif::Result<(Header, usize)> {
	let mut reader = NifReader::new(bytes, VersionContext::new(0));
	let header = Header::read(&mut reader, TypeRegistry::builtin())?;
	Ok((header, reader.pos()))
}

#[test]
fn morrowind_header_has_inline_names_only() {
	let bytes = NifBuilder::new(v::V4_0_0_2).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(&*header.signature, "NetImmerse File Format, Version 4.0.0.2");
	assert_eq!(header.version.format_version, v::V4_0_0_2);
	assert_eq!(header.raw_version, Some(v::V4_0_0_2));
	assert_eq!(header.num_blocks, Some(0));
	assert!(header.block_types.is_empty());
	assert!(header.strings.is_empty());
	assert!(!header.has_block_sizes());
	assert!(header.version_mismatch().is_none());
}

#[test]
fn copyright_lines_precede_old_streams() {
	let bytes = NifBuilder::new(v::V3_03).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(header.copyright.len(), 3);
	assert_eq!(&*header.copyright[1], "Copyright (c) 1996-2000");
	assert_eq!(header.raw_version, None);
	assert_eq!(header.num_blocks, None);
}

#[test]
fn fallout3_header_reads_export_info_and_tables() {
	let builder = NifBuilder::new(v::V20_2_0_7)
		.user(11, 34)
		.export_info("bob", "proc", "export")
		.string("Scene Root")
		.block("NiNode", vec![0; 8])
		.block("NiNode", vec![0; 4])
		.block("NiAlphaProperty", vec![0; 2]);
	let bytes = builder.build();
	let (header, end) = read_header(&bytes).expect("header parses");

	assert_eq!(header.version.user_version, 11);
	assert_eq!(header.version.user_version_2, 34);
	let export = header.export_info.as_ref().expect("export info");
	assert_eq!(&*export.author, "bob");
	assert_eq!(export.process_script.as_deref(), Some("proc"));
	assert_eq!(&*export.export_script, "export");
	assert_eq!(export.max_filepath, None);
	assert_eq!(export.unknown, None);

	assert_eq!(header.block_types.len(), 2);
	assert_eq!(header.block_type_index, vec![0, 0, 1]);
	assert_eq!(header.block_type_name(2), Some("NiAlphaProperty"));
	assert_eq!(header.block_sizes, vec![8, 4, 2]);
	assert_eq!(header.strings.len(), 1);
	assert_eq!(header.max_string_length, 10);
	assert_eq!(end, bytes.len() - 14 - 4);
}

#[test]
fn fallout4_header_reads_max_filepath() {
	let bytes = NifBuilder::new(v::V20_2_0_7).user(12, 130).max_filepath("C:\\meshes\\a.max").build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert!(header.version.is_skyrim_or_later());
	let export = header.export_info.expect("export info");
	assert_eq!(export.max_filepath.as_deref(), Some("C:\\meshes\\a.max"));
	assert!(export.process_script.is_some());
}

#[test]
fn fallout4_76_header_swaps_process_script_for_unknown_int() {
	let bytes = NifBuilder::new(v::V20_2_0_7).user(12, 155).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	let export = header.export_info.expect("export info");
	assert_eq!(export.unknown, Some(0));
	assert_eq!(export.process_script, None);
	assert!(export.max_filepath.is_some());
}

#[test]
fn low_user_version_skips_bethesda_header() {
	let bytes = NifBuilder::new(v::V20_2_0_7).user(2, 0).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert!(header.export_info.is_none());
	assert_eq!(header.version.user_version_2, 0);
}

#[test]
fn big_endian_flag_applies_to_following_fields() {
	let bytes = NifBuilder::new(v::V20_0_0_5).big_endian().block("NiNode", vec![]).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(header.version.endianness, Endianness::Big);
	assert_eq!(header.num_blocks, Some(1));
	assert_eq!(header.block_type_name(0), Some("NiNode"));
}

#[test]
fn hashed_types_resolve_through_registry() {
	let bytes = NifBuilder::new(v::V20_3_1_2)
		.type_hashes(type_name_hash)
		.block("NiNode", vec![])
		.block("NiMysteryBlock", vec![])
		.build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(header.block_type_hashes, vec![type_name_hash("NiNode"), type_name_hash("NiMysteryBlock")]);
	assert_eq!(header.block_type_name(0), Some("NiNode"));
	let unknown = header.block_type_name(1).expect("placeholder name");
	assert!(unknown.starts_with('#'), "{unknown}");
}

#[test]
fn raw_version_disagreement_is_a_diagnostic() {
	let bytes = NifBuilder::new(v::V20_0_0_5).raw_version(v::V20_0_0_4).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(header.version.format_version, v::V20_0_0_5);
	assert_eq!(
		header.version_mismatch(),
		Some(Diagnostic::VersionMismatch {
			signature: v::V20_0_0_5,
			raw: v::V20_0_0_4,
		})
	);
}

#[test]
fn metadata_is_read_from_version_30() {
	let bytes = NifBuilder::new(v::V30_0_0_0).metadata(b"meta").build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(header.metadata, b"meta");
}

#[test]
fn groups_follow_the_string_table() {
	let bytes = NifBuilder::new(v::V20_1_0_3).group(7).group(9).build();
	let (header, _) = read_header(&bytes).expect("header parses");
	assert_eq!(header.groups, vec![7, 9]);
}

#[test]
fn rejects_foreign_signature() {
	let err = read_header(b"BLENDER17-01v0500\n").expect_err("not a nif");
	assert!(matches!(err, NifError::InvalidHeader { .. }));
}

#[test]
fn rejects_missing_signature_terminator() {
	let err = read_header(b"Gamebryo File Format, Version 20.2.0.7").expect_err("no newline");
	assert!(matches!(err, NifError::InvalidHeader { .. }));
}

#[test]
fn rejects_type_index_past_type_table() {
	let mut bytes = NifBuilder::new(v::V20_0_0_5).block("NiNode", vec![]).build();
	// Footer root count, then the group count, then the type index.
	let idx_at = bytes.len() - 4 - 4 - 2;
	bytes[idx_at] = 3;
	let err = read_header(&bytes).expect_err("index out of range");
	assert!(matches!(err, NifError::InvalidValue { what: "block type index", value: 3, .. }));
}
