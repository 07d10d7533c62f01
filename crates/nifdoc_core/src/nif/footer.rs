use crate::nif::version::v;
use crate::nif::{AnyBlock, NifReader, Ref, Result};

/// Root objects listed after the last block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footer {
	/// Roots in stored order; empty for files older than 3.3.0.13.
	pub roots: Vec<Ref<AnyBlock>>,
}

impl Footer {
	/// Read the footer at the reader's position.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		if !r.version().at_least(v::V3_3_0_13) {
			return Ok(Self::default());
		}

		Ok(Self { roots: r.read_ref_list()? })
	}
}
