use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::nif::{Block, NifError, Result};

/// Shape a link may point at: a concrete block struct, a shared layer, or a category.
pub trait BlockType {
	/// Name used in type-mismatch errors.
	const LABEL: &'static str;
	/// Value handed back by a successful resolution.
	type Target;

	/// View `block` as this shape, or `None` when the block has another shape.
	fn cast(block: &Block) -> Option<&Self::Target>;
}

/// Flat, index-addressable block table.
///
/// Files older than 3.3.0.13 link blocks by their stored memory address instead of
/// by index; for those the table also keeps an address to slot map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockTable {
	blocks: Vec<Block>,
	addresses: Vec<u32>,
	by_address: HashMap<u32, usize>,
}

impl BlockTable {
	/// Table whose links are plain indices.
	pub fn new(blocks: Vec<Block>) -> Self {
		Self {
			blocks,
			addresses: Vec::new(),
			by_address: HashMap::new(),
		}
	}

	/// Table whose links are legacy addresses, one per block.
	pub fn with_addresses(blocks: Vec<Block>, addresses: Vec<u32>) -> Self {
		let by_address = addresses.iter().enumerate().map(|(idx, addr)| (*addr, idx)).collect();
		Self {
			blocks,
			addresses,
			by_address,
		}
	}

	/// Return number of blocks.
	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	/// Return whether the table holds no blocks.
	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	/// Block at `index`.
	pub fn get(&self, index: usize) -> Option<&Block> {
		self.blocks.get(index)
	}

	/// Blocks in file order.
	pub fn iter(&self) -> std::slice::Iter<'_, Block> {
		self.blocks.iter()
	}

	/// Blocks as a slice.
	pub fn as_slice(&self) -> &[Block] {
		&self.blocks
	}

	/// Return whether links in this table are legacy addresses.
	pub fn uses_addresses(&self) -> bool {
		!self.addresses.is_empty()
	}

	/// Stored legacy address of block `index`.
	pub fn address_of(&self, index: usize) -> Option<u32> {
		self.addresses.get(index).copied()
	}

	/// Map a raw stored link to a table slot; `Ok(None)` means null.
	pub fn slot(&self, raw: i32) -> Result<Option<usize>> {
		if self.uses_addresses() {
			if raw == 0 || raw == -1 {
				return Ok(None);
			}
			return self
				.by_address
				.get(&(raw as u32))
				.copied()
				.map(Some)
				.ok_or(NifError::RefOutOfRange { raw, len: self.len() });
		}

		if raw == -1 {
			return Ok(None);
		}

		match usize::try_from(raw) {
			Ok(index) if index < self.blocks.len() => Ok(Some(index)),
			_ => Err(NifError::RefOutOfRange { raw, len: self.len() }),
		}
	}
}

impl<'a> IntoIterator for &'a BlockTable {
	type Item = &'a Block;
	type IntoIter = std::slice::Iter<'a, Block>;

	fn into_iter(self) -> Self::IntoIter {
		self.blocks.iter()
	}
}

fn resolve_in<T: BlockType>(table: &BlockTable, raw: i32) -> Result<Option<&T::Target>> {
	let Some(index) = table.slot(raw)? else {
		return Ok(None);
	};
	let Some(block) = table.get(index) else {
		return Err(NifError::RefOutOfRange { raw, len: table.len() });
	};
	if block.is_placeholder() {
		return Ok(None);
	}

	T::cast(block).map(Some).ok_or_else(|| NifError::TypeMismatch {
		index,
		expected: T::LABEL,
		got: block.type_name.to_string(),
	})
}

macro_rules! link_type {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		pub struct $name<T> {
			raw: i32,
			_target: PhantomData<fn() -> T>,
		}

		impl<T> $name<T> {
			/// Wrap a raw stored link value.
			pub const fn from_raw(raw: i32) -> Self {
				Self { raw, _target: PhantomData }
			}

			/// Null link (`-1`).
			pub const fn null() -> Self {
				Self::from_raw(-1)
			}

			/// Raw stored value.
			pub fn raw(&self) -> i32 {
				self.raw
			}

			/// Return whether the stored value is the `-1` null marker.
			///
			/// Address-linked tables also treat `0` as null; use [`Self::index`] there.
			pub fn is_null(&self) -> bool {
				self.raw == -1
			}

			/// Table slot this link names, if any.
			pub fn index(&self, table: &BlockTable) -> Result<Option<usize>> {
				table.slot(self.raw)
			}

			/// Target block without a shape check.
			pub fn block<'t>(&self, table: &'t BlockTable) -> Result<Option<&'t Block>> {
				Ok(self.index(table)?.and_then(|index| table.get(index)))
			}

			/// Same link viewed as a different target shape.
			pub fn cast<U>(self) -> $name<U> {
				$name::from_raw(self.raw)
			}
		}

		impl<T: BlockType> $name<T> {
			/// Resolve through `table`.
			///
			/// Null links and placeholder blocks resolve to `None`; a block of another
			/// shape is [`NifError::TypeMismatch`].
			pub fn resolve<'t>(&self, table: &'t BlockTable) -> Result<Option<&'t T::Target>> {
				resolve_in::<T>(table, self.raw)
			}
		}

		impl<T> Clone for $name<T> {
			fn clone(&self) -> Self {
				*self
			}
		}

		impl<T> Copy for $name<T> {}

		impl<T> PartialEq for $name<T> {
			fn eq(&self, other: &Self) -> bool {
				self.raw == other.raw
			}
		}

		impl<T> Eq for $name<T> {}

		impl<T> Hash for $name<T> {
			fn hash<H: Hasher>(&self, state: &mut H) {
				self.raw.hash(state);
			}
		}

		impl<T> Default for $name<T> {
			fn default() -> Self {
				Self::null()
			}
		}

		impl<T> fmt::Debug for $name<T> {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, concat!(stringify!($name), "({})"), self.raw)
			}
		}
	};
}

link_type! {
	/// Owning link to another block, tagged with the expected target shape.
	Ref
}

link_type! {
	/// Non-owning back link (parent, skeleton root, target), tagged like [`Ref`].
	Ptr
}

/// Implement [`BlockType`] for a concrete struct stored in one `BlockData` variant.
macro_rules! concrete_block_type {
	($($ty:ident => $variant:ident),+ $(,)?) => {
		$(
			impl $crate::nif::refs::BlockType for $ty {
				const LABEL: &'static str = stringify!($ty);
				type Target = $ty;

				fn cast(block: &$crate::nif::Block) -> Option<&$ty> {
					match &block.data {
						$crate::nif::BlockData::$variant(data) => Some(data),
						_ => None,
					}
				}
			}
		)+
	};
}

pub(crate) use concrete_block_type;

#[cfg(test)]
mod tests;
