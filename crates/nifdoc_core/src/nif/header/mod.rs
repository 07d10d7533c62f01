use crate::nif::bytes::lossy_trimmed;
use crate::nif::version::{parse_header_signature, v};
use crate::nif::{Diagnostic, Endianness, NifError, NifReader, Result, TypeRegistry, VersionContext};

const MAX_SIGNATURE_LEN: usize = 128;
const MAX_COPYRIGHT_LEN: usize = 256;
const TYPE_INDEX_MASK: u16 = 0x7FFF;

/// Exporter details written by Bethesda tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportInfo {
	/// Author name.
	pub author: Box<str>,
	/// Unnamed value present when `user_version_2 > 130`.
	pub unknown: Option<u32>,
	/// Process script (`user_version_2 < 131`).
	pub process_script: Option<Box<str>>,
	/// Export script.
	pub export_script: Box<str>,
	/// Source file path (`user_version_2 >= 103`).
	pub max_filepath: Option<Box<str>>,
}

/// Parsed file header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
	/// Signature line without its terminator.
	pub signature: Box<str>,
	/// Version context used for every field after the header.
	pub version: VersionContext,
	/// Version stored in the binary field (3.1.0.1 onward).
	pub raw_version: Option<u32>,
	/// Copyright lines (3.1 and older).
	pub copyright: Vec<Box<str>>,
	/// Declared block count; `None` before 3.1.0.1, where blocks run to an end marker.
	pub num_blocks: Option<u32>,
	/// Bethesda export info.
	pub export_info: Option<ExportInfo>,
	/// Metadata byte array (30.0.0.0 onward).
	pub metadata: Vec<u8>,
	/// Distinct block type names, possibly carrying `\x01` arguments.
	pub block_types: Vec<Box<str>>,
	/// Stored type hashes (20.3.1.2 only), parallel to `block_types`.
	pub block_type_hashes: Vec<u32>,
	/// Per-block index into `block_types`, high bit already masked.
	pub block_type_index: Vec<u16>,
	/// Per-block byte sizes (20.2.0.5 onward).
	pub block_sizes: Vec<u32>,
	/// Longest string-table entry as declared.
	pub max_string_length: u32,
	/// String table (20.1.0.1 onward).
	pub strings: Vec<Box<str>>,
	/// Group table (5.0.0.6 onward).
	pub groups: Vec<u32>,
}

impl Header {
	/// Read the header from the start of `r`, which must be positioned at offset 0.
	///
	/// The reader's version context is updated as the version fields are read; on
	/// success it matches [`Header::version`].
	pub fn read(r: &mut NifReader<'_>, registry: &TypeRegistry) -> Result<Self> {
		let line = r.cursor().read_line(MAX_SIGNATURE_LEN).map_err(|_| NifError::InvalidHeader {
			reason: "no signature line".to_owned(),
		})?;
		let (signature, format_version) = parse_header_signature(&lossy_trimmed(line))?;
		let mut version = VersionContext::new(format_version);
		r.set_version(version);

		let mut copyright = Vec::new();
		if version.at_most(v::V3_1) {
			for _ in 0..3 {
				copyright.push(lossy_trimmed(r.cursor().read_line(MAX_COPYRIGHT_LEN)?));
			}
		}

		let raw_version = if version.at_least(v::V3_1_0_1) { Some(r.read_u32()?) } else { None };

		if version.at_least(v::V20_0_0_3) {
			version.endianness = match r.read_u8()? {
				0 => Endianness::Big,
				1 => Endianness::Little,
				other => {
					return Err(NifError::InvalidValue {
						what: "endian flag",
						value: i64::from(other),
						at: r.pos() - 1,
					});
				}
			};
			r.set_version(version);
		}

		if version.at_least(v::V10_0_1_8) {
			version.user_version = r.read_u32()?;
			r.set_version(version);
		}

		let num_blocks = if version.at_least(v::V3_1_0_1) { Some(r.read_u32()?) } else { None };

		let mut export_info = None;
		if has_bethesda_header(&version) {
			version.user_version_2 = r.read_u32()?;
			r.set_version(version);
			export_info = Some(read_export_info(r)?);
		}

		let metadata = if version.at_least(v::V30_0_0_0) {
			let len = r.read_count(1)?;
			r.read_byte_vec(len)?
		} else {
			Vec::new()
		};

		let mut block_types = Vec::new();
		let mut block_type_hashes = Vec::new();
		let mut block_type_index = Vec::new();
		if version.at_least(v::V5_0_0_1) {
			let num_types = r.read_count_u16(4)?;
			if version.is(v::V20_3_1_2) {
				block_type_hashes = r.read_u32_vec(num_types)?;
				block_types = block_type_hashes.iter().map(|hash| hashed_type_name(registry, *hash)).collect();
			} else {
				block_types = r.read_vec(num_types, |r| r.read_sized_string())?;
			}

			let count = num_blocks.unwrap_or(0) as usize;
			let at = r.pos();
			block_type_index = r.read_u16_vec(count)?.into_iter().map(|idx| idx & TYPE_INDEX_MASK).collect();
			if let Some(bad) = block_type_index.iter().find(|idx| usize::from(**idx) >= block_types.len()) {
				return Err(NifError::InvalidValue {
					what: "block type index",
					value: i64::from(*bad),
					at,
				});
			}
		}

		let block_sizes = if version.at_least(v::V20_2_0_5) {
			r.read_u32_vec(num_blocks.unwrap_or(0) as usize)?
		} else {
			Vec::new()
		};

		let mut max_string_length = 0;
		let mut strings = Vec::new();
		if version.at_least(v::V20_1_0_1) {
			let count = r.read_count(4)?;
			max_string_length = r.read_u32()?;
			strings = r.read_vec(count, |r| r.read_sized_string())?;
		}

		let groups = if version.at_least(v::V5_0_0_6) {
			let count = r.read_count(4)?;
			r.read_u32_vec(count)?
		} else {
			Vec::new()
		};

		Ok(Self {
			signature,
			version,
			raw_version,
			copyright,
			num_blocks,
			export_info,
			metadata,
			block_types,
			block_type_hashes,
			block_type_index,
			block_sizes,
			max_string_length,
			strings,
			groups,
		})
	}

	/// Stored type name of block `index`, including any `\x01` arguments.
	///
	/// Returns `None` for files older than 5.0.0.1, which name blocks inline.
	pub fn block_type_name(&self, index: usize) -> Option<&str> {
		let type_index = self.block_type_index.get(index)?;
		self.block_types.get(usize::from(*type_index)).map(AsRef::as_ref)
	}

	/// Declared byte size of block `index`.
	pub fn block_size(&self, index: usize) -> Option<u32> {
		self.block_sizes.get(index).copied()
	}

	/// Return whether the header carries per-block sizes.
	pub fn has_block_sizes(&self) -> bool {
		!self.block_sizes.is_empty()
	}

	/// Diagnostic for a binary version field that disagrees with the signature.
	pub fn version_mismatch(&self) -> Option<Diagnostic> {
		let raw = self.raw_version?;
		(raw != self.version.format_version).then_some(Diagnostic::VersionMismatch {
			signature: self.version.format_version,
			raw,
		})
	}
}

fn has_bethesda_header(version: &VersionContext) -> bool {
	let band = version.is(v::V10_0_1_2)
		|| version.is(v::V20_2_0_7)
		|| version.is(v::V20_0_0_5)
		|| (version.in_range(v::V10_1_0_0, v::V20_0_0_4) && version.user_at_most(11));
	band && version.user_at_least(3)
}

fn read_export_info(r: &mut NifReader<'_>) -> Result<ExportInfo> {
	let uv2 = r.version().user_version_2;
	let author = r.read_short_string()?;
	let unknown = if uv2 > 130 { Some(r.read_u32()?) } else { None };
	let process_script = if uv2 < 131 { Some(r.read_short_string()?) } else { None };
	let export_script = r.read_short_string()?;
	let max_filepath = if uv2 >= 103 { Some(r.read_short_string()?) } else { None };
	Ok(ExportInfo {
		author,
		unknown,
		process_script,
		export_script,
		max_filepath,
	})
}

fn hashed_type_name(registry: &TypeRegistry, hash: u32) -> Box<str> {
	match registry.name_for_hash(hash) {
		Some(name) => name.into(),
		None => format!("#{hash:08X}").into_boxed_str(),
	}
}

#[cfg(test)]
mod tests;
