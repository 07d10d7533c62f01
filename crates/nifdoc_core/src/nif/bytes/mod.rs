use crate::nif::{Endianness, NifError, Result};

/// Width of the length prefix in front of a string or byte run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPrefix {
	/// One-byte length.
	U8,
	/// Two-byte length.
	U16,
	/// Four-byte length.
	U32,
}

/// Bounded cursor over an immutable byte slice.
///
/// Positions are absolute offsets into the slice handed to [`Cursor::new`], so errors
/// report the same offsets a hex viewer shows for the whole file.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return `true` once every byte has been consumed.
	pub fn at_end(&self) -> bool {
		self.remaining() == 0
	}

	/// Move to an absolute offset inside the slice.
	pub fn seek(&mut self, pos: usize) -> Result<()> {
		if pos > self.bytes.len() {
			return Err(NifError::UnexpectedEof {
				at: self.pos,
				need: pos.saturating_sub(self.pos),
				rem: self.remaining(),
			});
		}
		self.pos = pos;
		Ok(())
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(NifError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Advance past `n` bytes without looking at them.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read one signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(self.read_u8()? as i8)
	}

	/// Read a `u16` using the selected endianness.
	pub fn read_u16(&mut self, endianness: Endianness) -> Result<u16> {
		let buf = self.read_array::<2>()?;
		Ok(match endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read an `i16` using the selected endianness.
	pub fn read_i16(&mut self, endianness: Endianness) -> Result<i16> {
		Ok(self.read_u16(endianness)? as i16)
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		self.read_u32(Endianness::Little)
	}

	/// Read a `u32` using the selected endianness.
	pub fn read_u32(&mut self, endianness: Endianness) -> Result<u32> {
		let buf = self.read_array::<4>()?;
		Ok(match endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read an `i32` using the selected endianness.
	pub fn read_i32(&mut self, endianness: Endianness) -> Result<i32> {
		Ok(self.read_u32(endianness)? as i32)
	}

	/// Read a `u64` using the selected endianness.
	pub fn read_u64(&mut self, endianness: Endianness) -> Result<u64> {
		let buf = self.read_array::<8>()?;
		Ok(match endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an IEEE `f32` using the selected endianness.
	pub fn read_f32(&mut self, endianness: Endianness) -> Result<f32> {
		Ok(f32::from_bits(self.read_u32(endianness)?))
	}

	/// Read an IEEE half float and widen it to `f32`.
	pub fn read_f16(&mut self, endianness: Endianness) -> Result<f32> {
		let bits = self.read_u16(endianness)?;
		Ok(half::f16::from_bits(bits).to_f32())
	}

	/// Read a length prefix of the given width.
	pub fn read_length(&mut self, prefix: LengthPrefix, endianness: Endianness) -> Result<usize> {
		Ok(match prefix {
			LengthPrefix::U8 => usize::from(self.read_u8()?),
			LengthPrefix::U16 => usize::from(self.read_u16(endianness)?),
			LengthPrefix::U32 => self.read_u32(endianness)? as usize,
		})
	}

	/// Read a length-prefixed byte run.
	pub fn read_prefixed_bytes(&mut self, prefix: LengthPrefix, endianness: Endianness) -> Result<&'a [u8]> {
		let at = self.pos;
		let len = self.read_length(prefix, endianness)?;
		if len > self.remaining() {
			return Err(NifError::UnexpectedEof {
				at,
				need: len,
				rem: self.remaining(),
			});
		}
		self.read_exact(len)
	}

	/// Read a length-prefixed string, dropping trailing NUL padding.
	pub fn read_prefixed_string(&mut self, prefix: LengthPrefix, endianness: Endianness) -> Result<Box<str>> {
		let bytes = self.read_prefixed_bytes(prefix, endianness)?;
		Ok(lossy_trimmed(bytes))
	}

	/// Read a fixed-capacity string of exactly `len` bytes, stopping at the first NUL.
	pub fn read_fixed_string(&mut self, len: usize) -> Result<Box<str>> {
		let bytes = self.read_exact(len)?;
		let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
		Ok(String::from_utf8_lossy(&bytes[..end]).into_owned().into_boxed_str())
	}

	/// Read bytes up to a `\n` terminator, consuming the terminator.
	///
	/// Fails when no terminator appears within `max_len` bytes.
	pub fn read_line(&mut self, max_len: usize) -> Result<&'a [u8]> {
		let start = self.pos;
		let window = &self.bytes[start..self.bytes.len().min(start.saturating_add(max_len))];
		let Some(rel_end) = window.iter().position(|byte| *byte == b'\n') else {
			return Err(NifError::UnexpectedEof {
				at: start,
				need: window.len() + 1,
				rem: self.remaining(),
			});
		};

		self.pos = start + rel_end + 1;
		Ok(&self.bytes[start..start + rel_end])
	}
}

/// Decode bytes as lossy UTF-8 after stripping trailing NULs.
pub(crate) fn lossy_trimmed(bytes: &[u8]) -> Box<str> {
	let end = bytes.iter().rposition(|byte| *byte != 0).map_or(0, |idx| idx + 1);
	String::from_utf8_lossy(&bytes[..end]).into_owned().into_boxed_str()
}

#[cfg(test)]
mod tests;
