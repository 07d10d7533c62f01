use std::path::PathBuf;

use nifdoc::nif::{NifError, Result};

use crate::cmd::util::{load, or_dash};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub index: usize,
}

/// Dump every decoded field of one block.
pub fn run(args: Args, lenient: bool) -> Result<()> {
	let Args { path, index } = args;

	let nif = load(&path, lenient)?;
	let block = nif.block(index).ok_or(NifError::BlockNotFound {
		index,
		len: nif.blocks.len(),
	})?;

	println!("path: {}", path.display());
	println!("index: {index}");
	println!("type: {}", block.type_name);
	if let Some(args) = &block.type_args {
		println!("type_args: {args}");
	}
	println!("offset: {:#x}", block.offset);
	println!("name: {}", or_dash(block.name()));
	println!("data: {:#?}", block.data);

	Ok(())
}
