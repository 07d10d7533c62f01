use crate::nif::bytes::Cursor;
use crate::nif::{Endianness, NifError, Result};

/// Primitive element kinds a layout tag can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	/// `b`: signed byte.
	I8,
	/// `B`: unsigned byte.
	U8,
	/// `h`: signed 16-bit.
	I16,
	/// `H`: unsigned 16-bit.
	U16,
	/// `i`: signed 32-bit.
	I32,
	/// `I`: unsigned 32-bit.
	U32,
	/// `f`: 32-bit float.
	F32,
	/// `e`: 16-bit float, widened on read.
	F16,
}

impl ScalarKind {
	const fn from_code(code: u8) -> Option<Self> {
		Some(match code {
			b'b' => Self::I8,
			b'B' => Self::U8,
			b'h' => Self::I16,
			b'H' => Self::U16,
			b'i' => Self::I32,
			b'I' => Self::U32,
			b'f' => Self::F32,
			b'e' => Self::F16,
			_ => return None,
		})
	}

	/// Encoded width in bytes.
	pub const fn width(self) -> usize {
		match self {
			Self::I8 | Self::U8 => 1,
			Self::I16 | Self::U16 | Self::F16 => 2,
			Self::I32 | Self::U32 | Self::F32 => 4,
		}
	}
}

/// One decoded layout element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
	/// Signed byte.
	I8(i8),
	/// Unsigned byte.
	U8(u8),
	/// Signed 16-bit.
	I16(i16),
	/// Unsigned 16-bit.
	U16(u16),
	/// Signed 32-bit.
	I32(i32),
	/// Unsigned 32-bit.
	U32(u32),
	/// Float, including widened half floats.
	F32(f32),
}

impl Scalar {
	/// Numeric value as `f32`.
	pub fn as_f32(self) -> f32 {
		match self {
			Self::I8(v) => f32::from(v),
			Self::U8(v) => f32::from(v),
			Self::I16(v) => f32::from(v),
			Self::U16(v) => f32::from(v),
			Self::I32(v) => v as f32,
			Self::U32(v) => v as f32,
			Self::F32(v) => v,
		}
	}

	/// Integer value truncated to `u32`; floats truncate toward zero.
	pub fn as_u32(self) -> u32 {
		match self {
			Self::I8(v) => v as u32,
			Self::U8(v) => u32::from(v),
			Self::I16(v) => v as u32,
			Self::U16(v) => u32::from(v),
			Self::I32(v) => v as u32,
			Self::U32(v) => v,
			Self::F32(v) => v as u32,
		}
	}

	/// Integer value truncated to `u16`.
	pub fn as_u16(self) -> u16 {
		self.as_u32() as u16
	}

	/// Integer value truncated to `u8`.
	pub fn as_u8(self) -> u8 {
		self.as_u32() as u8
	}
}

/// Parsed compact layout tag such as `"3f"` or `"2H4B"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	kinds: [ScalarKind; Layout::MAX_SCALARS],
	len: usize,
	width: usize,
}

impl Layout {
	/// Most scalars one record may carry.
	pub const MAX_SCALARS: usize = 32;

	/// Parse a tag made of `[count]code` groups.
	pub fn parse(tag: &'static str) -> Result<Self> {
		Self::from_tag(tag).ok_or(NifError::InvalidLayoutTag { tag })
	}

	/// Compile-time form of [`Layout::parse`]; `None` for malformed tags.
	pub const fn from_tag(tag: &str) -> Option<Self> {
		let bytes = tag.as_bytes();
		let mut kinds = [ScalarKind::U8; Self::MAX_SCALARS];
		let mut len = 0;
		let mut width = 0;
		let mut count = 0_usize;
		let mut has_count = false;

		let mut idx = 0;
		while idx < bytes.len() {
			let byte = bytes[idx];
			idx += 1;
			if byte.is_ascii_digit() {
				count = count.saturating_mul(10).saturating_add((byte - b'0') as usize);
				has_count = true;
				continue;
			}

			let Some(kind) = ScalarKind::from_code(byte) else {
				return None;
			};
			let repeat = if has_count { count } else { 1 };
			if repeat == 0 || repeat > Self::MAX_SCALARS - len {
				return None;
			}
			let mut n = 0;
			while n < repeat {
				kinds[len] = kind;
				len += 1;
				width += kind.width();
				n += 1;
			}
			count = 0;
			has_count = false;
		}

		if has_count || len == 0 {
			return None;
		}
		Some(Self { kinds, len, width })
	}

	/// Scalar kinds in declared order.
	pub fn kinds(&self) -> &[ScalarKind] {
		&self.kinds[..self.len]
	}

	/// Encoded width of one record in bytes.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Number of scalars in one record.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Return whether the layout has no scalars (never true for parsed layouts).
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Decode one record, appending its scalars to `out`.
	pub fn read_into(&self, cursor: &mut Cursor<'_>, endianness: Endianness, out: &mut Vec<Scalar>) -> Result<()> {
		for kind in self.kinds() {
			out.push(match kind {
				ScalarKind::I8 => Scalar::I8(cursor.read_i8()?),
				ScalarKind::U8 => Scalar::U8(cursor.read_u8()?),
				ScalarKind::I16 => Scalar::I16(cursor.read_i16(endianness)?),
				ScalarKind::U16 => Scalar::U16(cursor.read_u16(endianness)?),
				ScalarKind::I32 => Scalar::I32(cursor.read_i32(endianness)?),
				ScalarKind::U32 => Scalar::U32(cursor.read_u32(endianness)?),
				ScalarKind::F32 => Scalar::F32(cursor.read_f32(endianness)?),
				ScalarKind::F16 => Scalar::F32(cursor.read_f16(endianness)?),
			});
		}
		Ok(())
	}
}

/// Fixed-size record whose wire shape is declared by a layout tag.
///
/// Arrays of records are bounds-checked as `count * width` before any element is read.
pub trait Record: Sized {
	/// Layout tag describing one record.
	const LAYOUT: &'static str;

	/// `LAYOUT`, parsed once per record type at compile time.
	const PARSED: Option<Layout> = Layout::from_tag(Self::LAYOUT);

	/// Build a record from exactly `Layout::parse(LAYOUT)?.len()` scalars.
	fn from_scalars(values: &[Scalar]) -> Self;

	/// Parsed layout of this record type.
	fn layout() -> Result<Layout> {
		Self::PARSED.ok_or(NifError::InvalidLayoutTag { tag: Self::LAYOUT })
	}
}
