use crate::nif::{NifError, Result};

/// Byte order for multi-byte fields after the header endian flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian (the default for every known build).
	Little,
	/// Big-endian (console builds).
	Big,
}

impl Endianness {
	/// Render as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Named format versions used by field gates.
///
/// Values pack one byte per dotted component, most significant first.
pub mod v {
	#![allow(missing_docs)]

	pub const V2_3: u32 = 0x0203_0000;
	pub const V3_0: u32 = 0x0300_0000;
	pub const V3_03: u32 = 0x0300_0300;
	pub const V3_1: u32 = 0x0301_0000;
	pub const V3_1_0_1: u32 = 0x0301_0001;
	pub const V3_3_0_13: u32 = 0x0303_000D;
	pub const V4_0_0_0: u32 = 0x0400_0000;
	pub const V4_0_0_1: u32 = 0x0400_0001;
	pub const V4_0_0_2: u32 = 0x0400_0002;
	pub const V4_1_0_12: u32 = 0x0401_000C;
	pub const V4_2_0_2: u32 = 0x0402_0002;
	pub const V4_2_1_0: u32 = 0x0402_0100;
	pub const V4_2_2_0: u32 = 0x0402_0200;
	pub const V5_0_0_1: u32 = 0x0500_0001;
	pub const V5_0_0_6: u32 = 0x0500_0006;
	pub const V10_0_1_0: u32 = 0x0A00_0100;
	pub const V10_0_1_2: u32 = 0x0A00_0102;
	pub const V10_0_1_3: u32 = 0x0A00_0103;
	pub const V10_0_1_8: u32 = 0x0A00_0108;
	pub const V10_1_0_0: u32 = 0x0A01_0000;
	pub const V10_1_0_101: u32 = 0x0A01_0065;
	pub const V10_1_0_103: u32 = 0x0A01_0067;
	pub const V10_1_0_104: u32 = 0x0A01_0068;
	pub const V10_1_0_106: u32 = 0x0A01_006A;
	pub const V10_1_0_108: u32 = 0x0A01_006C;
	pub const V10_1_0_109: u32 = 0x0A01_006D;
	pub const V10_1_0_110: u32 = 0x0A01_006E;
	pub const V10_1_0_111: u32 = 0x0A01_006F;
	pub const V10_1_0_112: u32 = 0x0A01_0070;
	pub const V10_1_0_113: u32 = 0x0A01_0071;
	pub const V10_1_0_114: u32 = 0x0A01_0072;
	pub const V10_2_0_0: u32 = 0x0A02_0000;
	pub const V10_4_0_1: u32 = 0x0A04_0001;
	pub const V10_4_0_2: u32 = 0x0A04_0002;
	pub const V20_0_0_3: u32 = 0x1400_0003;
	pub const V20_0_0_4: u32 = 0x1400_0004;
	pub const V20_0_0_5: u32 = 0x1400_0005;
	pub const V20_1_0_0: u32 = 0x1401_0000;
	pub const V20_1_0_1: u32 = 0x1401_0001;
	pub const V20_1_0_2: u32 = 0x1401_0002;
	pub const V20_1_0_3: u32 = 0x1401_0003;
	pub const V20_2_0_4: u32 = 0x1402_0004;
	pub const V20_2_0_5: u32 = 0x1402_0005;
	pub const V20_2_0_7: u32 = 0x1402_0007;
	pub const V20_3_0_4: u32 = 0x1403_0004;
	pub const V20_3_0_8: u32 = 0x1403_0008;
	pub const V20_3_0_9: u32 = 0x1403_0009;
	pub const V20_3_1_2: u32 = 0x1403_0102;
	pub const V20_5_0_4: u32 = 0x1405_0004;
	pub const V30_0_0_0: u32 = 0x1E00_0000;

	/// Every named version in ascending order.
	pub const ALL: &[u32] = &[
		V2_3,
		V3_0,
		V3_03,
		V3_1,
		V3_1_0_1,
		V3_3_0_13,
		V4_0_0_0,
		V4_0_0_1,
		V4_0_0_2,
		V4_1_0_12,
		V4_2_0_2,
		V4_2_1_0,
		V4_2_2_0,
		V5_0_0_1,
		V5_0_0_6,
		V10_0_1_0,
		V10_0_1_2,
		V10_0_1_3,
		V10_0_1_8,
		V10_1_0_0,
		V10_1_0_101,
		V10_1_0_103,
		V10_1_0_104,
		V10_1_0_106,
		V10_1_0_108,
		V10_1_0_109,
		V10_1_0_110,
		V10_1_0_111,
		V10_1_0_112,
		V10_1_0_113,
		V10_1_0_114,
		V10_2_0_0,
		V10_4_0_1,
		V10_4_0_2,
		V20_0_0_3,
		V20_0_0_4,
		V20_0_0_5,
		V20_1_0_0,
		V20_1_0_1,
		V20_1_0_2,
		V20_1_0_3,
		V20_2_0_4,
		V20_2_0_5,
		V20_2_0_7,
		V20_3_0_4,
		V20_3_0_8,
		V20_3_0_9,
		V20_3_1_2,
		V20_5_0_4,
		V30_0_0_0,
	];
}

/// Version triple plus byte order, fixed once the header has been read.
///
/// Every field decoder asks this value whether a field exists for the stream at hand.
/// All range predicates are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionContext {
	/// Packed format version from the signature line.
	pub format_version: u32,
	/// Licensee version; 0 when absent.
	pub user_version: u32,
	/// Bethesda stream version; 0 when absent.
	pub user_version_2: u32,
	/// Byte order for multi-byte fields.
	pub endianness: Endianness,
}

impl VersionContext {
	/// Little-endian context with both user versions zero.
	pub fn new(format_version: u32) -> Self {
		Self {
			format_version,
			user_version: 0,
			user_version_2: 0,
			endianness: Endianness::Little,
		}
	}

	/// Return a copy with the given user versions.
	pub fn with_user(self, user_version: u32, user_version_2: u32) -> Self {
		Self {
			user_version,
			user_version_2,
			..self
		}
	}

	/// `format_version >= v`.
	pub fn at_least(&self, v: u32) -> bool {
		self.format_version >= v
	}

	/// `format_version <= v`.
	pub fn at_most(&self, v: u32) -> bool {
		self.format_version <= v
	}

	/// `lo <= format_version <= hi`.
	pub fn in_range(&self, lo: u32, hi: u32) -> bool {
		self.at_least(lo) && self.at_most(hi)
	}

	/// `format_version == v`.
	pub fn is(&self, v: u32) -> bool {
		self.format_version == v
	}

	/// `user_version >= uv`.
	pub fn user_at_least(&self, uv: u32) -> bool {
		self.user_version >= uv
	}

	/// `user_version <= uv`.
	pub fn user_at_most(&self, uv: u32) -> bool {
		self.user_version <= uv
	}

	/// `user_version_2 >= uv2`.
	pub fn user2_at_least(&self, uv2: u32) -> bool {
		self.user_version_2 >= uv2
	}

	/// `user_version_2 <= uv2`.
	pub fn user2_at_most(&self, uv2: u32) -> bool {
		self.user_version_2 <= uv2
	}

	/// `lo <= user_version_2 <= hi`.
	pub fn user2_in_range(&self, lo: u32, hi: u32) -> bool {
		self.user2_at_least(lo) && self.user2_at_most(hi)
	}

	/// Bethesda streams from Skyrim onward (`user_version_2 >= 83`).
	pub fn is_skyrim_or_later(&self) -> bool {
		self.user2_at_least(83)
	}
}

const SIGNATURE_PREFIXES: &[&str] = &["NetImmerse File Format", "Gamebryo File Format", "NDSNIF....@....@...."];
const VERSION_MARKER: &str = ", Version ";
/// Version assigned to NeoSteam files, whose signature carries no version token.
pub const NEOSTEAM_VERSION: u32 = v::V10_1_0_0;

/// Parse the signature line into `(raw_text, format_version)`.
///
/// `text` is the line without its `\n` terminator.
pub fn parse_header_signature(text: &str) -> Result<(Box<str>, u32)> {
	if text.starts_with("NS") {
		return Ok((text.into(), NEOSTEAM_VERSION));
	}

	if !SIGNATURE_PREFIXES.iter().any(|prefix| text.starts_with(prefix)) {
		return Err(NifError::InvalidHeader {
			reason: format!("unrecognized signature {:?}", truncate(text, 40)),
		});
	}

	let Some(marker) = text.find(VERSION_MARKER) else {
		return Err(NifError::InvalidHeader {
			reason: "signature has no version token".to_owned(),
		});
	};

	let token = text[marker + VERSION_MARKER.len()..].trim_end_matches(['\r', '\0', ' ']);
	let version = parse_version_token(token)?;
	Ok((text.into(), version))
}

/// Parse a bare dotted version token such as `20.2.0.7`.
pub fn parse_version_token(token: &str) -> Result<u32> {
	match token {
		"3.03" => return Ok(v::V3_03),
		"3.1" => return Ok(v::V3_1),
		_ => {}
	}

	let unsupported = || NifError::UnsupportedVersion { token: token.to_owned() };
	let parts: Vec<&str> = token.split('.').collect();
	if !(2..=4).contains(&parts.len()) {
		return Err(unsupported());
	}

	let mut packed = 0_u32;
	for (idx, part) in parts.iter().enumerate() {
		let byte: u8 = part.parse().map_err(|_| unsupported())?;
		packed |= u32::from(byte) << (24 - 8 * idx);
	}
	Ok(packed)
}

/// Render a packed version as `a.b.c.d`.
pub fn format_version_string(version: u32) -> String {
	let [a, b, c, d] = version.to_be_bytes();
	format!("{a}.{b}.{c}.{d}")
}

fn truncate(text: &str, max: usize) -> &str {
	match text.char_indices().nth(max) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}

#[cfg(test)]
mod tests;
