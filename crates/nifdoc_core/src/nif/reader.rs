use crate::nif::bytes::{Cursor, LengthPrefix};
use crate::nif::layout::Record;
use crate::nif::refs::{Ptr, Ref};
use crate::nif::version::{VersionContext, v};
use crate::nif::{NifError, Result};

/// Largest element count accepted for a single array unless options say otherwise.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 24;

/// Version-aware field reader handed to block decoders.
///
/// Wraps the byte cursor together with the version context and the header string
/// table, so decoders ask one object both "is this field present" and "read it".
#[derive(Debug, Clone)]
pub struct NifReader<'a> {
	cursor: Cursor<'a>,
	version: VersionContext,
	strings: &'a [Box<str>],
	max_array_len: usize,
}

impl<'a> NifReader<'a> {
	/// Reader at offset 0 with an empty string table.
	pub fn new(bytes: &'a [u8], version: VersionContext) -> Self {
		Self {
			cursor: Cursor::new(bytes),
			version,
			strings: &[],
			max_array_len: DEFAULT_MAX_ARRAY_LEN,
		}
	}

	/// Attach the header string table used by indexed strings.
	pub fn with_strings(mut self, strings: &'a [Box<str>]) -> Self {
		self.strings = strings;
		self
	}

	/// Override the per-array element cap.
	pub fn with_max_array_len(mut self, max_array_len: usize) -> Self {
		self.max_array_len = max_array_len;
		self
	}

	/// Version context in effect.
	pub fn version(&self) -> &VersionContext {
		&self.version
	}

	pub(crate) fn set_version(&mut self, version: VersionContext) {
		self.version = version;
	}

	/// Header string table.
	pub fn strings(&self) -> &'a [Box<str>] {
		self.strings
	}

	/// Underlying byte cursor.
	pub fn cursor(&mut self) -> &mut Cursor<'a> {
		&mut self.cursor
	}

	/// Current absolute offset.
	pub fn pos(&self) -> usize {
		self.cursor.pos()
	}

	/// Unread byte count.
	pub fn remaining(&self) -> usize {
		self.cursor.remaining()
	}

	/// Move to an absolute offset.
	pub fn seek(&mut self, pos: usize) -> Result<()> {
		self.cursor.seek(pos)
	}

	/// Skip `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		self.cursor.skip(n)
	}

	/// Read a raw byte run.
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
		self.cursor.read_exact(n)
	}

	/// Read an unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		self.cursor.read_u8()
	}

	/// Read a signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		self.cursor.read_i8()
	}

	/// Read a `u16` in stream byte order.
	pub fn read_u16(&mut self) -> Result<u16> {
		self.cursor.read_u16(self.version.endianness)
	}

	/// Read an `i16` in stream byte order.
	pub fn read_i16(&mut self) -> Result<i16> {
		self.cursor.read_i16(self.version.endianness)
	}

	/// Read a `u32` in stream byte order.
	pub fn read_u32(&mut self) -> Result<u32> {
		self.cursor.read_u32(self.version.endianness)
	}

	/// Read an `i32` in stream byte order.
	pub fn read_i32(&mut self) -> Result<i32> {
		self.cursor.read_i32(self.version.endianness)
	}

	/// Read a `u64` in stream byte order.
	pub fn read_u64(&mut self) -> Result<u64> {
		self.cursor.read_u64(self.version.endianness)
	}

	/// Read an `f32` in stream byte order.
	pub fn read_f32(&mut self) -> Result<f32> {
		self.cursor.read_f32(self.version.endianness)
	}

	/// Read a half float widened to `f32`.
	pub fn read_f16(&mut self) -> Result<f32> {
		self.cursor.read_f16(self.version.endianness)
	}

	/// Read a boolean: 32-bit up to 4.0.0.2, one byte afterwards.
	pub fn read_bool(&mut self) -> Result<bool> {
		if self.version.at_most(v::V4_0_0_2) {
			Ok(self.read_u32()? != 0)
		} else {
			Ok(self.read_u8()? != 0)
		}
	}

	/// Read a one-byte boolean regardless of version.
	pub fn read_byte_bool(&mut self) -> Result<bool> {
		Ok(self.read_u8()? != 0)
	}

	/// Read a string with a 32-bit length prefix.
	pub fn read_sized_string(&mut self) -> Result<Box<str>> {
		self.cursor.read_prefixed_string(LengthPrefix::U32, self.version.endianness)
	}

	/// Read a string with an 8-bit length prefix.
	pub fn read_short_string(&mut self) -> Result<Box<str>> {
		self.cursor.read_prefixed_string(LengthPrefix::U8, self.version.endianness)
	}

	/// Read a string field: inline before 20.1.0.1, a string-table index afterwards.
	///
	/// Returns `None` for the `0xFFFFFFFF` "no string" index.
	pub fn read_string(&mut self) -> Result<Option<Box<str>>> {
		if self.version.at_least(v::V20_1_0_1) {
			let at = self.pos();
			let index = self.read_u32()?;
			self.lookup_string(index, at)
		} else {
			Ok(Some(self.read_sized_string()?))
		}
	}

	fn lookup_string(&self, index: u32, at: usize) -> Result<Option<Box<str>>> {
		if index == u32::MAX {
			return Ok(None);
		}

		self.strings
			.get(index as usize)
			.cloned()
			.map(Some)
			.ok_or(NifError::InvalidStringIndex {
				index,
				at,
				len: self.strings.len(),
			})
	}

	/// Read an owning link.
	pub fn read_ref<T>(&mut self) -> Result<Ref<T>> {
		Ok(Ref::from_raw(self.read_i32()?))
	}

	/// Read a non-owning link.
	pub fn read_ptr<T>(&mut self) -> Result<Ptr<T>> {
		Ok(Ptr::from_raw(self.read_i32()?))
	}

	/// Read a `u32` count followed by that many links.
	pub fn read_ref_list<T>(&mut self) -> Result<Vec<Ref<T>>> {
		let count = self.read_count(4)?;
		self.read_vec(count, |r| r.read_ref())
	}

	/// Read a `u32` count followed by that many non-owning links.
	pub fn read_ptr_list<T>(&mut self) -> Result<Vec<Ptr<T>>> {
		let count = self.read_count(4)?;
		self.read_vec(count, |r| r.read_ptr())
	}

	/// Read a `u32` element count and check it against the remaining input.
	///
	/// `elem_width` is the minimum encoded size of one element; pass 0 when elements
	/// may be empty.
	pub fn read_count(&mut self, elem_width: usize) -> Result<usize> {
		let count = self.read_u32()?;
		self.check_count(u64::from(count), elem_width)
	}

	/// Read a `u16` element count and check it against the remaining input.
	pub fn read_count_u16(&mut self, elem_width: usize) -> Result<usize> {
		let count = self.read_u16()?;
		self.check_count(u64::from(count), elem_width)
	}

	/// Validate an element count read elsewhere.
	pub fn check_count(&self, count: u64, elem_width: usize) -> Result<usize> {
		let by_bytes = match elem_width {
			0 => usize::MAX,
			width => self.remaining() / width,
		};
		let max = by_bytes.min(self.max_array_len);
		if count > max as u64 {
			return Err(NifError::ArrayTooLarge {
				at: self.pos(),
				count,
				max: max as u64,
			});
		}
		Ok(count as usize)
	}

	/// Read `count` elements with a per-element closure.
	pub fn read_vec<T>(&mut self, count: usize, mut read: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
		let mut out = Vec::with_capacity(count.min(self.remaining().max(1)));
		for _ in 0..count {
			out.push(read(self)?);
		}
		Ok(out)
	}

	/// Read one fixed-layout record.
	pub fn read_record<T: Record>(&mut self) -> Result<T> {
		let layout = T::layout()?;
		let mut scalars = Vec::with_capacity(layout.len());
		layout.read_into(&mut self.cursor, self.version.endianness, &mut scalars)?;
		Ok(T::from_scalars(&scalars))
	}

	/// Read `count` fixed-layout records after checking their total width.
	pub fn read_records<T: Record>(&mut self, count: usize) -> Result<Vec<T>> {
		let layout = T::layout()?;
		let count = self.check_count(count as u64, layout.width())?;
		let mut out = Vec::with_capacity(count);
		let mut scalars = Vec::with_capacity(layout.len());
		for _ in 0..count {
			scalars.clear();
			layout.read_into(&mut self.cursor, self.version.endianness, &mut scalars)?;
			out.push(T::from_scalars(&scalars));
		}
		Ok(out)
	}

	/// Read `count` floats.
	pub fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>> {
		let count = self.check_count(count as u64, 4)?;
		self.read_vec(count, |r| r.read_f32())
	}

	/// Read `count` unsigned 16-bit values.
	pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>> {
		let count = self.check_count(count as u64, 2)?;
		self.read_vec(count, |r| r.read_u16())
	}

	/// Read `count` unsigned 32-bit values.
	pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>> {
		let count = self.check_count(count as u64, 4)?;
		self.read_vec(count, |r| r.read_u32())
	}

	/// Read `count` raw bytes into an owned buffer.
	pub fn read_byte_vec(&mut self, count: usize) -> Result<Vec<u8>> {
		let count = self.check_count(count as u64, 1)?;
		Ok(self.read_bytes(count)?.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::NifReader;
	use crate::nif::NifError;
	use crate::nif::version::{VersionContext, v};

	#[test]
	fn bool_width_follows_version() {
		let bytes = [1, 0, 0, 0, 1];
		let mut old = NifReader::new(&bytes, VersionContext::new(v::V4_0_0_2));
		assert!(old.read_bool().expect("u32 bool"));
		assert_eq!(old.pos(), 4);

		let mut new = NifReader::new(&bytes, VersionContext::new(v::V4_1_0_12));
		assert!(new.read_bool().expect("u8 bool"));
		assert_eq!(new.pos(), 1);
	}

	#[test]
	fn string_field_switches_to_table_index() {
		let mut inline = 3_u32.to_le_bytes().to_vec();
		inline.extend_from_slice(b"abc");
		let mut reader = NifReader::new(&inline, VersionContext::new(v::V20_0_0_5));
		assert_eq!(reader.read_string().expect("inline").as_deref(), Some("abc"));

		let table: Vec<Box<str>> = vec!["Scene Root".into()];
		let mut indexed = 0_u32.to_le_bytes().to_vec();
		indexed.extend_from_slice(&u32::MAX.to_le_bytes());
		indexed.extend_from_slice(&5_u32.to_le_bytes());
		let mut reader = NifReader::new(&indexed, VersionContext::new(v::V20_2_0_7)).with_strings(&table);
		assert_eq!(reader.read_string().expect("index 0").as_deref(), Some("Scene Root"));
		assert_eq!(reader.read_string().expect("none"), None);
		let err = reader.read_string().expect_err("out of range");
		assert!(matches!(err, NifError::InvalidStringIndex { index: 5, at: 8, len: 1 }));
	}

	#[test]
	fn counts_larger_than_input_fail_before_allocation() {
		let bytes = 1000_u32.to_le_bytes();
		let mut reader = NifReader::new(&bytes, VersionContext::new(v::V20_2_0_7));
		let err = reader.read_count(4).expect_err("count exceeds input");
		assert!(matches!(err, NifError::ArrayTooLarge { count: 1000, max: 0, .. }));
	}

	#[test]
	fn max_array_len_caps_counts() {
		let mut bytes = 3_u32.to_le_bytes().to_vec();
		bytes.extend_from_slice(&[0; 12]);
		let mut reader = NifReader::new(&bytes, VersionContext::new(v::V20_2_0_7)).with_max_array_len(2);
		assert!(reader.read_count(4).is_err());
	}

	#[test]
	fn ref_list_reads_raw_indices() {
		let mut bytes = 2_u32.to_le_bytes().to_vec();
		bytes.extend_from_slice(&4_i32.to_le_bytes());
		bytes.extend_from_slice(&(-1_i32).to_le_bytes());
		let mut reader = NifReader::new(&bytes, VersionContext::new(v::V20_2_0_7));
		let refs = reader.read_ref_list::<crate::nif::AnyBlock>().expect("refs");
		assert_eq!(refs.iter().map(|r| r.raw()).collect::<Vec<_>>(), vec![4, -1]);
	}
}
