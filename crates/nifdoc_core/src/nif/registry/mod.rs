use std::collections::HashMap;
use std::sync::OnceLock;

use crate::nif::blocks::{collision, controller, extra, geometry, interpolator, keyframe, object, property, texture};
use crate::nif::reader::NifReader;
use crate::nif::{BlockData, Result};

/// Decoder for one block type: reads the block body at the reader's position.
pub type BlockConstructor = fn(&mut NifReader<'_>) -> Result<BlockData>;

/// Name-keyed table of block decoders, plus the hash table used by 20.3.1.2 headers.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
	ctors: HashMap<&'static str, BlockConstructor>,
	hashes: HashMap<u32, Box<str>>,
}

impl TypeRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Process-wide registry with every built-in decoder.
	pub fn builtin() -> &'static Self {
		static BUILTIN: OnceLock<TypeRegistry> = OnceLock::new();
		BUILTIN.get_or_init(Self::with_builtin)
	}

	/// Fresh registry pre-populated with the built-in decoders, for callers that extend it.
	pub fn with_builtin() -> Self {
		let mut registry = Self::new();
		object::register(&mut registry);
		geometry::register(&mut registry);
		property::register(&mut registry);
		texture::register(&mut registry);
		extra::register(&mut registry);
		controller::register(&mut registry);
		interpolator::register(&mut registry);
		keyframe::register(&mut registry);
		collision::register(&mut registry);
		registry
	}

	/// Register or replace the decoder for `name`.
	///
	/// Also records the name's hash so 20.3.1.2 headers can name it.
	pub fn register(&mut self, name: &'static str, ctor: BlockConstructor) {
		self.ctors.insert(name, ctor);
		self.hashes.insert(type_name_hash(name), name.into());
	}

	/// Map a stored type hash to a name.
	pub fn register_hash(&mut self, hash: u32, name: impl Into<Box<str>>) {
		self.hashes.insert(hash, name.into());
	}

	/// Decoder registered for `type_name`, ignoring any `\x01` argument suffix.
	pub fn constructor(&self, type_name: &str) -> Option<BlockConstructor> {
		self.ctors.get(split_type_args(type_name).0).copied()
	}

	/// Return whether a decoder exists for `type_name`.
	pub fn contains(&self, type_name: &str) -> bool {
		self.constructor(type_name).is_some()
	}

	/// Decode one block body; `Ok(None)` when no decoder is registered.
	pub fn construct(&self, type_name: &str, reader: &mut NifReader<'_>) -> Result<Option<BlockData>> {
		match self.constructor(type_name) {
			Some(ctor) => ctor(reader).map(Some),
			None => Ok(None),
		}
	}

	/// Name registered for a stored type hash.
	pub fn name_for_hash(&self, hash: u32) -> Option<&str> {
		self.hashes.get(&hash).map(AsRef::as_ref)
	}

	/// Registered type names in sorted order.
	pub fn names(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.ctors.keys().copied().collect();
		names.sort_unstable();
		names
	}

	/// Return number of registered decoders.
	pub fn len(&self) -> usize {
		self.ctors.len()
	}

	/// Return whether no decoders are registered.
	pub fn is_empty(&self) -> bool {
		self.ctors.is_empty()
	}
}

/// Split a stored type name at the first `\x01` into `(name, args)`.
pub fn split_type_args(stored: &str) -> (&str, Option<&str>) {
	match stored.split_once('\x01') {
		Some((name, args)) => (name, Some(args)),
		None => (stored, None),
	}
}

/// Hash used by 20.3.1.2 headers in place of type names (32-bit FNV-1a over the name).
pub fn type_name_hash(name: &str) -> u32 {
	name.bytes().fold(0x811C_9DC5_u32, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193))
}

#[cfg(test)]
mod tests;
