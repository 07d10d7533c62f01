use std::fmt;

use tracing::warn;

use crate::nif::version::format_version_string;

/// Recoverable condition observed while decoding.
///
/// Diagnostics never stop a parse; hard failures are [`crate::nif::NifError`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
	/// Block type name has no registered decoder; the block was skipped via its size.
	UnknownBlockType {
		/// Block index in file order.
		index: usize,
		/// Unregistered type name.
		type_name: String,
		/// Offset where the block data starts.
		offset: usize,
		/// Bytes skipped.
		skipped: usize,
	},
	/// Legacy per-block separator carried a non-zero value.
	NonZeroSeparator {
		/// Block index in file order.
		index: usize,
		/// Separator value.
		value: u32,
		/// Offset of the separator.
		offset: usize,
	},
	/// Raw header version disagrees with the signature line.
	VersionMismatch {
		/// Version parsed from the signature line (used for decoding).
		signature: u32,
		/// Version stored in the binary header field.
		raw: u32,
	},
	/// Decoder consumed a different byte count than declared; lenient mode repositioned.
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
	/// Decoder does not implement this stream's layout; the block was skipped via its size.
	UnsupportedLayout {
		/// Block index in file order.
		index: usize,
		/// Block type name.
		type_name: String,
		/// Stream user version 2.
		user_version_2: u32,
	},
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnknownBlockType {
				index,
				type_name,
				offset,
				skipped,
			} => write!(f, "block {index}: unknown type {type_name:?} at offset {offset}, skipped {skipped} bytes"),
			Self::NonZeroSeparator { index, value, offset } => {
				write!(f, "block {index}: non-zero separator {value:#x} at offset {offset}")
			}
			Self::VersionMismatch { signature, raw } => write!(
				f,
				"header version {} disagrees with signature version {}",
				format_version_string(*raw),
				format_version_string(*signature)
			),
			Self::BlockSizeMismatch {
				index,
				type_name,
				expected,
				consumed,
			} => write!(f, "block {index} ({type_name}) consumed {consumed} bytes, header declares {expected}"),
			Self::UnsupportedLayout {
				index,
				type_name,
				user_version_2,
			} => write!(f, "block {index}: {type_name} layout for user version 2 = {user_version_2} not supported, skipped"),
		}
	}
}

/// Receiver for diagnostics emitted during a parse.
pub trait DiagnosticSink {
	/// Observe one diagnostic.
	fn report(&mut self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
	F: FnMut(&Diagnostic),
{
	fn report(&mut self, diagnostic: &Diagnostic) {
		self(diagnostic)
	}
}

/// Sink that forwards every diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn report(&mut self, diagnostic: &Diagnostic) {
		match diagnostic {
			Diagnostic::UnknownBlockType {
				index,
				type_name,
				offset,
				skipped,
			} => warn!(index, type_name = %type_name, offset, skipped, "unknown block type"),
			Diagnostic::NonZeroSeparator { index, value, offset } => warn!(index, value, offset, "non-zero block separator"),
			Diagnostic::VersionMismatch { signature, raw } => warn!(
				signature = %format_version_string(*signature),
				raw = %format_version_string(*raw),
				"header version mismatch"
			),
			Diagnostic::BlockSizeMismatch {
				index,
				type_name,
				expected,
				consumed,
			} => warn!(index, type_name = %type_name, expected, consumed, "block size mismatch"),
			Diagnostic::UnsupportedLayout {
				index,
				type_name,
				user_version_2,
			} => warn!(index, type_name = %type_name, user_version_2, "unsupported block layout"),
		}
	}
}
