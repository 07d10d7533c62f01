use half::f16;

/// Append-only little- or big-endian field writer.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
	buf: Vec<u8>,
	big_endian: bool,
}

macro_rules! write_num {
	($($name:ident: $ty:ty),+ $(,)?) => {
		$(
			#[doc = concat!("Append a `", stringify!($ty), "` in writer byte order.")]
			pub fn $name(&mut self, value: $ty) -> &mut Self {
				if self.big_endian {
					self.buf.extend_from_slice(&value.to_be_bytes());
				} else {
					self.buf.extend_from_slice(&value.to_le_bytes());
				}
				self
			}
		)+
	};
}

impl ByteWriter {
	/// Little-endian writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Writer with the given byte order.
	pub fn with_big_endian(big_endian: bool) -> Self {
		Self {
			buf: Vec::new(),
			big_endian,
		}
	}

	write_num! {
		u16: u16,
		i16: i16,
		u32: u32,
		i32: i32,
		u64: u64,
		f32: f32,
	}

	/// Append one byte.
	pub fn u8(&mut self, value: u8) -> &mut Self {
		self.buf.push(value);
		self
	}

	/// Append a half float.
	pub fn f16(&mut self, value: f32) -> &mut Self {
		self.u16(f16::from_f32(value).to_bits())
	}

	/// Append consecutive floats.
	pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
		for value in values {
			self.f32(*value);
		}
		self
	}

	/// Append raw bytes.
	pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Append `n` zero bytes.
	pub fn zeros(&mut self, n: usize) -> &mut Self {
		self.buf.resize(self.buf.len() + n, 0);
		self
	}

	/// Append a string with a 32-bit length prefix.
	pub fn sized_string(&mut self, text: &str) -> &mut Self {
		self.u32(text.len() as u32);
		self.bytes(text.as_bytes())
	}

	/// Append a NUL-terminated string with an 8-bit length prefix that counts the NUL.
	pub fn short_string(&mut self, text: &str) -> &mut Self {
		self.u8(text.len() as u8 + 1);
		self.bytes(text.as_bytes());
		self.u8(0)
	}

	/// Append a `\n`-terminated line.
	pub fn line(&mut self, text: &str) -> &mut Self {
		self.bytes(text.as_bytes());
		self.u8(b'\n')
	}

	/// Append the identity 3x3 rotation.
	pub fn identity_rotation(&mut self) -> &mut Self {
		self.f32s(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
	}

	/// Bytes written so far.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Return whether nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Copy of the bytes written so far.
	pub fn to_vec(&self) -> Vec<u8> {
		self.buf.clone()
	}

	/// Consume the writer.
	pub fn into_bytes(self) -> Vec<u8> {
		self.buf
	}
}
