use std::fs;
use std::path::Path;

use nifdoc::nif::{Block, NifFile, ParseOptions, Result};
use tracing::debug;

/// Read and decode `path`, honoring the global `--lenient` flag.
pub(crate) fn load(path: &Path, lenient: bool) -> Result<NifFile> {
	let options = if lenient { ParseOptions::lenient() } else { ParseOptions::default() };
	debug!(path = %path.display(), lenient, "loading nif");
	NifFile::from_bytes(fs::read(path)?, &options)
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// One-line block label: `[index] Type "name"`.
pub(crate) fn block_label(index: usize, block: &Block) -> String {
	let mut out = format!("[{index}] {}", block.type_name);
	if let Some(name) = block.name().filter(|name| !name.is_empty()) {
		out.push_str(&format!(" {name:?}"));
	}
	if block.is_placeholder() {
		out.push_str(" (skipped)");
	}
	out
}

/// Render optional text, `-` when absent.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
	value.unwrap_or("-")
}
