use std::path::PathBuf;

use nifdoc::nif::Result;

use crate::cmd::util::{emit_json, load, or_dash};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Only list blocks whose type name matches exactly.
	#[arg(long = "type")]
	pub type_name: Option<String>,
}

/// List blocks in file order with type, offset, and name.
pub fn run(args: Args, lenient: bool) -> Result<()> {
	let Args { path, json, type_name } = args;

	let nif = load(&path, lenient)?;
	let rows: Vec<BlockJson> = nif
		.blocks
		.iter()
		.enumerate()
		.filter(|(_, block)| type_name.as_deref().is_none_or(|wanted| &*block.type_name == wanted))
		.map(|(index, block)| BlockJson {
			index,
			type_name: block.type_name.to_string(),
			type_args: block.type_args.as_deref().map(str::to_owned),
			offset: block.offset,
			name: block.name().map(str::to_owned),
			skipped: block.is_placeholder(),
		})
		.collect();

	if json {
		emit_json(&BlocksJson {
			path: path.display().to_string(),
			count: rows.len(),
			blocks: rows,
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("count: {}", rows.len());
	for row in &rows {
		let skipped = if row.skipped { " (skipped)" } else { "" };
		println!(
			"  {:>5}  {:#010x}  {}  {}{skipped}",
			row.index,
			row.offset,
			row.type_name,
			or_dash(row.name.as_deref())
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct BlocksJson {
	path: String,
	count: usize,
	blocks: Vec<BlockJson>,
}

#[derive(serde::Serialize)]
struct BlockJson {
	index: usize,
	#[serde(rename = "type")]
	type_name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	type_args: Option<String>,
	offset: usize,
	name: Option<String>,
	skipped: bool,
}

#[cfg(test)]
mod tests;
