//! Shared test helpers for workspace crates.
//!
//! [`ByteWriter`] writes primitive fields, and [`NifBuilder`] assembles a complete
//! synthetic `.nif` stream (header, blocks, footer) for a chosen version triple.

mod builder;
mod writer;

use std::path::{Path, PathBuf};

pub use builder::NifBuilder;
pub use writer::ByteWriter;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Write `bytes` to a fresh file under `<target>/nifdoc-scratch` and return its path.
///
/// `name` should be unique per test so parallel tests do not race.
pub fn write_scratch(name: &str, bytes: &[u8]) -> PathBuf {
	let dir = target_dir().join("nifdoc-scratch");
	std::fs::create_dir_all(&dir).expect("scratch dir");
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("scratch file");
	path
}

/// Render a packed version the way signature lines spell it.
pub fn version_token(version: u32) -> String {
	match version {
		0x0300_0300 => "3.03".to_owned(),
		0x0301_0000 => "3.1".to_owned(),
		_ => {
			let [a, b, c, d] = version.to_be_bytes();
			format!("{a}.{b}.{c}.{d}")
		}
	}
}
