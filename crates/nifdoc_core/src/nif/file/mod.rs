use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::nif::compression::decode_bytes;
use crate::nif::reader::DEFAULT_MAX_ARRAY_LEN;
use crate::nif::registry::split_type_args;
use crate::nif::version::v;
use crate::nif::{
	Block, BlockData, BlockTable, Compression, Diagnostic, DiagnosticSink, Footer, Header, NifError, NifReader, Result, TracingSink, TypeRegistry,
	VersionContext,
};

const TOP_LEVEL_MARKER: &str = "Top Level Object";
const END_MARKER: &str = "End Of File";
const SEPARATOR_BAND: (u32, u32) = (0x0A00_0000, 0x0A02_0000);

/// Switches controlling how strictly a file is decoded.
///
/// No option makes an unregistered block type recoverable on its own. Skipping
/// one needs the header's block-size table (20.2.0.5 onward); in older streams
/// decoding stops with [`NifError::UnknownBlockType`] whatever these switches say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
	/// Fail when a block consumes a different byte count than the header declares.
	///
	/// When `false` the mismatch becomes a diagnostic and decoding resumes at the
	/// declared end of the block.
	pub strict_block_sizes: bool,
	/// Largest element count accepted for a single array.
	pub max_array_len: usize,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			strict_block_sizes: true,
			max_array_len: DEFAULT_MAX_ARRAY_LEN,
		}
	}
}

impl ParseOptions {
	/// Options that reposition on block-size mismatches instead of failing.
	pub fn lenient() -> Self {
		Self {
			strict_block_sizes: false,
			..Self::default()
		}
	}
}

/// Fully decoded `.nif` file.
#[derive(Debug, Clone, PartialEq)]
pub struct NifFile {
	/// Parsed header.
	pub header: Header,
	/// Blocks in file order.
	pub blocks: BlockTable,
	/// Root list.
	pub footer: Footer,
	/// Recoverable conditions observed while decoding, in order.
	pub diagnostics: Vec<Diagnostic>,
	/// Compression detected on the source bytes.
	pub compression: Compression,
}

impl NifFile {
	/// Read and decode a file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		debug!(path = %path.display(), "opening nif");
		Self::from_bytes(fs::read(path)?, &ParseOptions::default())
	}

	/// Read a whole stream into memory and decode it.
	pub fn from_reader(mut source: impl Read) -> Result<Self> {
		let mut raw = Vec::new();
		source.read_to_end(&mut raw)?;
		Self::from_bytes(raw, &ParseOptions::default())
	}

	/// Decode raw or zstd-wrapped bytes with the built-in registry.
	///
	/// Diagnostics are forwarded to `tracing` and kept on the result.
	pub fn from_bytes(raw: Vec<u8>, options: &ParseOptions) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		let mut file = Self::parse_with(&bytes, TypeRegistry::builtin(), options, &mut TracingSink)?;
		file.compression = compression;
		Ok(file)
	}

	/// Decode uncompressed bytes with the built-in registry and default options.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		Self::parse_with(bytes, TypeRegistry::builtin(), &ParseOptions::default(), &mut TracingSink)
	}

	/// Decode uncompressed bytes with an explicit registry, options, and diagnostics sink.
	pub fn parse_with(bytes: &[u8], registry: &TypeRegistry, options: &ParseOptions, sink: &mut dyn DiagnosticSink) -> Result<Self> {
		let mut diagnostics = Vec::new();
		let mut emit = |diagnostic: Diagnostic| {
			sink.report(&diagnostic);
			diagnostics.push(diagnostic);
		};

		let mut header_reader = NifReader::new(bytes, VersionContext::new(0)).with_max_array_len(options.max_array_len);
		let header = Header::read(&mut header_reader, registry)?;
		if let Some(mismatch) = header.version_mismatch() {
			emit(mismatch);
		}
		debug!(
			version = %crate::nif::version::format_version_string(header.version.format_version),
			user_version = header.version.user_version,
			user_version_2 = header.version.user_version_2,
			num_blocks = ?header.num_blocks,
			"header parsed"
		);

		let mut r = NifReader::new(bytes, header.version)
			.with_strings(&header.strings)
			.with_max_array_len(options.max_array_len);
		r.seek(header_reader.pos())?;

		let mut decoder = BlockDecoder {
			header: &header,
			registry,
			options,
			blocks: Vec::new(),
			addresses: Vec::new(),
		};
		decoder.run(&mut r, &mut emit)?;
		let BlockDecoder { blocks, addresses, .. } = decoder;

		let blocks = if header.version.at_least(v::V3_3_0_13) {
			BlockTable::new(blocks)
		} else {
			BlockTable::with_addresses(blocks, addresses)
		};
		let footer = Footer::read(&mut r)?;
		debug!(blocks = blocks.len(), roots = footer.roots.len(), "nif parsed");

		Ok(Self {
			header,
			blocks,
			footer,
			diagnostics,
			compression: Compression::None,
		})
	}

	/// Block at `index`.
	pub fn block(&self, index: usize) -> Option<&Block> {
		self.blocks.get(index)
	}

	/// Footer roots resolved to blocks; null and placeholder roots are skipped.
	pub fn roots(&self) -> Result<Vec<&Block>> {
		let mut out = Vec::with_capacity(self.footer.roots.len());
		for root in &self.footer.roots {
			if let Some(block) = root.resolve(&self.blocks)? {
				out.push(block);
			}
		}
		Ok(out)
	}

	/// Number of blocks per type name, sorted by name.
	pub fn type_counts(&self) -> BTreeMap<&str, usize> {
		let mut counts = BTreeMap::new();
		for block in &self.blocks {
			*counts.entry(block.type_name.as_ref()).or_insert(0) += 1;
		}
		counts
	}
}

struct BlockDecoder<'h> {
	header: &'h Header,
	registry: &'h TypeRegistry,
	options: &'h ParseOptions,
	blocks: Vec<Block>,
	addresses: Vec<u32>,
}

impl BlockDecoder<'_> {
	fn run(&mut self, r: &mut NifReader<'_>, emit: &mut impl FnMut(Diagnostic)) -> Result<()> {
		let header = self.header;
		let ver = header.version;
		if ver.at_least(v::V5_0_0_1) {
			for index in 0..header.num_blocks.unwrap_or(0) as usize {
				let Some(stored) = header.block_type_name(index) else {
					return Err(NifError::InvalidHeader {
						reason: format!("block {index} has no type table entry"),
					});
				};
				read_separator(r, index, stored, emit)?;
				self.read_block(r, index, stored.into(), emit)?;
			}
			return Ok(());
		}

		// Inline type names; old streams end at a marker instead of a count.
		let legacy = !ver.at_least(v::V3_3_0_13);
		let mut index = 0;
		loop {
			if !legacy && Some(index as u32) == header.num_blocks {
				return Ok(());
			}
			let mut name = r.read_sized_string()?;
			if legacy {
				if &*name == TOP_LEVEL_MARKER {
					name = r.read_sized_string()?;
				} else if &*name == END_MARKER {
					return Ok(());
				}
				self.addresses.push(r.read_u32()?);
			}
			self.read_block(r, index, name, emit)?;
			index += 1;
		}
	}

	fn read_block(&mut self, r: &mut NifReader<'_>, index: usize, stored: Box<str>, emit: &mut impl FnMut(Diagnostic)) -> Result<()> {
		let (name, args) = split_type_args(&stored);
		let type_name: Box<str> = name.into();
		let type_args = args.map(Into::into);
		let offset = r.pos();
		let declared = self.header.block_size(index);
		debug!(index, type_name = %type_name, offset, ?declared, "decoding block");

		let data = match self.registry.construct(&type_name, r) {
			Ok(Some(data)) => data,
			Ok(None) => {
				let Some(size) = declared else {
					return Err(NifError::UnknownBlockType {
						index,
						type_name: type_name.into(),
						offset,
					});
				};
				r.seek(offset)?;
				r.skip(size as usize)?;
				emit(Diagnostic::UnknownBlockType {
					index,
					type_name: type_name.to_string(),
					offset,
					skipped: size as usize,
				});
				BlockData::Unknown
			}
			Err(NifError::UnsupportedLayout { user_version_2, .. }) if declared.is_some() => {
				r.seek(offset + declared.unwrap_or(0) as usize)?;
				emit(Diagnostic::UnsupportedLayout {
					index,
					type_name: type_name.to_string(),
					user_version_2,
				});
				BlockData::Unknown
			}
			Err(source) => {
				return Err(NifError::Block {
					index,
					type_name: type_name.into(),
					offset,
					source: Box::new(source),
				});
			}
		};

		if let Some(expected) = declared {
			let consumed = r.pos() - offset;
			if consumed != expected as usize {
				if self.options.strict_block_sizes {
					return Err(NifError::BlockSizeMismatch {
						index,
						type_name: type_name.into(),
						expected,
						consumed,
					});
				}
				emit(Diagnostic::BlockSizeMismatch {
					index,
					type_name: type_name.to_string(),
					expected,
					consumed,
				});
				r.seek(offset + expected as usize)?;
			}
		}

		self.blocks.push(Block {
			type_name,
			type_args,
			offset,
			data,
		});
		Ok(())
	}
}

/// Legacy builds write a u32 before every block except PhysX ones.
fn read_separator(r: &mut NifReader<'_>, index: usize, stored: &str, emit: &mut impl FnMut(Diagnostic)) -> Result<()> {
	let ver = r.version().format_version;
	if !(SEPARATOR_BAND.0..SEPARATOR_BAND.1).contains(&ver) || stored.starts_with("NiPhysX") {
		return Ok(());
	}

	let offset = r.pos();
	let value = r.read_u32()?;
	if value != 0 {
		emit(Diagnostic::NonZeroSeparator { index, value, offset });
	}
	Ok(())
}
