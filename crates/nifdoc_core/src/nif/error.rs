use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, NifError>;

/// Errors produced while reading, decoding, and resolving `.nif` data.
#[derive(Debug, Error)]
pub enum NifError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Signature line or header field could not be interpreted.
	#[error("invalid header: {reason}")]
	InvalidHeader {
		/// Short description of what did not parse.
		reason: String,
	},
	/// Signature line parsed but names a version this decoder does not handle.
	#[error("unsupported version token {token:?}")]
	UnsupportedVersion {
		/// Version token as found in the signature line.
		token: String,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Absolute byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Element count read from the stream cannot fit in the remaining bytes.
	#[error("array too large at offset {at}: count={count}, max={max}")]
	ArrayTooLarge {
		/// Offset of the element data.
		at: usize,
		/// Requested element count.
		count: u64,
		/// Largest count that could still fit.
		max: u64,
	},
	/// Packed record layout tag did not parse.
	#[error("invalid layout tag {tag:?}")]
	InvalidLayoutTag {
		/// Offending tag text.
		tag: &'static str,
	},
	/// String-table index points past the header string table.
	#[error("string index {index} at offset {at} out of range (table has {len})")]
	InvalidStringIndex {
		/// Raw index read from the stream.
		index: u32,
		/// Offset of the index field.
		at: usize,
		/// Number of header strings.
		len: usize,
	},
	/// A field carried a value the decoder cannot continue from.
	#[error("invalid {what} value {value} at offset {at}")]
	InvalidValue {
		/// Field description.
		what: &'static str,
		/// Raw value.
		value: i64,
		/// Offset of the field.
		at: usize,
	},
	/// Block decoder does not implement the layout used by this stream.
	#[error("unsupported {type_name} layout for user version 2 = {user_version_2}")]
	UnsupportedLayout {
		/// Block type name.
		type_name: &'static str,
		/// Stream user version 2.
		user_version_2: u32,
	},
	/// Stream predates the oldest layout a block decoder implements.
	#[error("unsupported {type_name} layout for format version {version:#010x}")]
	UnsupportedFormatVersion {
		/// Layer or block type name.
		type_name: &'static str,
		/// Stream format version.
		version: u32,
	},
	/// Block type name is not registered and no block size allows skipping it.
	#[error("unknown block type {type_name:?} at block {index} (offset {offset})")]
	UnknownBlockType {
		/// Block index in file order.
		index: usize,
		/// Unregistered type name.
		type_name: String,
		/// Offset where the block data starts.
		offset: usize,
	},
	/// A block decoder failed; wraps the inner cause with block context.
	#[error("block {index} ({type_name}) at offset {offset}: {source}")]
	Block {
		/// Block index in file order.
		index: usize,
		/// Block type name.
		type_name: String,
		/// Offset where the block data starts.
		offset: usize,
		/// Underlying decode failure.
		#[source]
		source: Box<NifError>,
	},
	/// Block decoder consumed a different byte count than the header declared.
	#[error("block {index} ({type_name}) consumed {consumed} bytes, header declares {expected}")]
	BlockSizeMismatch {
		/// Block index in file order.
		index: usize,
		/// Block type name.
		type_name: String,
		/// Size from the header block-size table.
		expected: u32,
		/// Bytes actually consumed.
		consumed: usize,
	},
	/// Reference index or legacy address does not name a block in the table.
	#[error("reference {raw} out of range (table has {len} blocks)")]
	RefOutOfRange {
		/// Raw stored link value.
		raw: i32,
		/// Number of blocks in the table.
		len: usize,
	},
	/// Reference resolved to a block of a different shape than expected.
	#[error("reference to block {index} expected {expected}, got {got}")]
	TypeMismatch {
		/// Resolved block index.
		index: usize,
		/// Expected target label.
		expected: &'static str,
		/// Actual block type name.
		got: String,
	},
	/// Requested block index is past the end of the table.
	#[error("block {index} not found (file has {len} blocks)")]
	BlockNotFound {
		/// Requested index.
		index: usize,
		/// Number of blocks in the table.
		len: usize,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
}
