use crate::nif::bytes::{Cursor, LengthPrefix};
use crate::nif::{Endianness, NifError};

#[test]
fn reads_advance_by_exact_width() {
	let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
	let mut cursor = Cursor::new(&bytes);

	assert_eq!(cursor.read_u8().expect("u8"), 0x01);
	assert_eq!(cursor.read_u16(Endianness::Little).expect("u16"), 0x0302);
	assert_eq!(cursor.read_u32(Endianness::Big).expect("u32"), 0x0405_0607);
	assert!(cursor.at_end());
}

#[test]
fn short_read_reports_offset_and_remaining() {
	let bytes = [0_u8; 3];
	let mut cursor = Cursor::new(&bytes);
	cursor.read_u8().expect("first byte");

	let err = cursor.read_u32_le().expect_err("not enough bytes");
	assert!(matches!(err, NifError::UnexpectedEof { at: 1, need: 4, rem: 2 }));
	assert_eq!(cursor.pos(), 1, "failed read must not move the cursor");
}

#[test]
fn half_float_widens_to_f32() {
	let one = half::f16::from_f32(1.5).to_bits().to_le_bytes();
	let mut cursor = Cursor::new(&one);
	assert_eq!(cursor.read_f16(Endianness::Little).expect("f16"), 1.5);
}

#[test]
fn prefixed_strings_honor_prefix_width() {
	let mut bytes = vec![3_u8];
	bytes.extend_from_slice(b"ab\0");
	bytes.extend_from_slice(&2_u16.to_le_bytes());
	bytes.extend_from_slice(b"cd");
	bytes.extend_from_slice(&1_u32.to_le_bytes());
	bytes.extend_from_slice(b"e");

	let mut cursor = Cursor::new(&bytes);
	assert_eq!(&*cursor.read_prefixed_string(LengthPrefix::U8, Endianness::Little).expect("u8 prefix"), "ab");
	assert_eq!(&*cursor.read_prefixed_string(LengthPrefix::U16, Endianness::Little).expect("u16 prefix"), "cd");
	assert_eq!(&*cursor.read_prefixed_string(LengthPrefix::U32, Endianness::Little).expect("u32 prefix"), "e");
}

#[test]
fn oversized_length_prefix_fails_before_reading() {
	let bytes = 0xFFFF_FFF0_u32.to_le_bytes();
	let mut cursor = Cursor::new(&bytes);
	let err = cursor.read_prefixed_bytes(LengthPrefix::U32, Endianness::Little).expect_err("length exceeds input");
	assert!(matches!(err, NifError::UnexpectedEof { at: 0, .. }));
}

#[test]
fn fixed_string_stops_at_nul() {
	let bytes = *b"abc\0xyz\0";
	let mut cursor = Cursor::new(&bytes);
	assert_eq!(&*cursor.read_fixed_string(8).expect("fixed"), "abc");
	assert!(cursor.at_end());
}

#[test]
fn line_read_requires_terminator_within_bound() {
	let bytes = b"Gamebryo File Format, Version 20.2.0.7\nrest";
	let mut cursor = Cursor::new(bytes);
	let line = cursor.read_line(128).expect("line");
	assert_eq!(line, b"Gamebryo File Format, Version 20.2.0.7");
	assert_eq!(cursor.remaining(), 4);

	let mut short = Cursor::new(b"no newline here");
	assert!(short.read_line(8).is_err());
}
