use std::io::Read;

use crate::nif::{NifError, Result};

const NIF_SIGNATURES: &[&[u8]] = &[b"NetImmerse File Format", b"Gamebryo File Format", b"NDSNIF", b"NS"];
const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;
/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed stream.
	None,
	/// zstd-compressed stream.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
///
/// Anything that is not a zstd frame passes through untouched; the header decoder
/// rejects it if it is not a NIF stream either.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}

	Ok((Compression::None, raw))
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(NifError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	if !has_nif_signature(&out) {
		return Err(NifError::InvalidHeader {
			reason: "decompressed stream has no NIF signature".to_owned(),
		});
	}

	Ok(out)
}

fn has_nif_signature(bytes: &[u8]) -> bool {
	NIF_SIGNATURES.iter().any(|sig| bytes.starts_with(sig))
}

#[cfg(test)]
mod tests {
	use super::{Compression, decode_bytes};
	use crate::nif::NifError;

	#[test]
	fn raw_input_passes_through() {
		let raw = b"Gamebryo File Format, Version 20.2.0.7\n".to_vec();
		let (mode, out) = decode_bytes(raw.clone()).expect("raw input");
		assert_eq!(mode, Compression::None);
		assert_eq!(out, raw);
	}

	#[test]
	fn zstd_input_is_decoded() {
		let raw = b"NetImmerse File Format, Version 4.0.0.2\n".to_vec();
		let packed = zstd::encode_all(raw.as_slice(), 3).expect("encode");
		let (mode, out) = decode_bytes(packed).expect("zstd input");
		assert_eq!(mode, Compression::Zstd);
		assert_eq!(out, raw);
		assert_eq!(mode.as_str(), "zstd");
	}

	#[test]
	fn zstd_payload_must_be_nif() {
		let packed = zstd::encode_all(&b"not a scene graph"[..], 3).expect("encode");
		let err = decode_bytes(packed).expect_err("non-nif payload");
		assert!(matches!(err, NifError::InvalidHeader { .. }));
	}
}
