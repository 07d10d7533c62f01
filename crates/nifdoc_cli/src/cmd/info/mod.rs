use std::path::PathBuf;

use nifdoc::nif::version::format_version_string;
use nifdoc::nif::{NifFile, Result};

use crate::cmd::util::{emit_json, load, or_dash};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

const TOP_TYPES: usize = 12;

/// Print header fields, block statistics, and roots.
pub fn run(args: Args, lenient: bool) -> Result<()> {
	let Args { path, json } = args;

	let nif = load(&path, lenient)?;
	let header = &nif.header;
	let version = header.version;
	let roots = root_indices(&nif)?;

	let mut types: Vec<_> = nif.type_counts().into_iter().collect();
	types.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(right.0)));

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			compression: nif.compression.as_str(),
			signature: header.signature.to_string(),
			version: format_version_string(version.format_version),
			user_version: version.user_version,
			user_version_2: version.user_version_2,
			endianness: version.endianness.as_str(),
			export_info: header.export_info.as_ref().map(|info| ExportInfoJson {
				author: info.author.to_string(),
				process_script: info.process_script.as_deref().map(str::to_owned),
				export_script: info.export_script.to_string(),
				max_filepath: info.max_filepath.as_deref().map(str::to_owned),
			}),
			block_count: nif.blocks.len(),
			string_count: header.strings.len(),
			has_block_sizes: header.has_block_sizes(),
			roots,
			diagnostics: nif.diagnostics.iter().map(ToString::to_string).collect(),
			top_types: types
				.iter()
				.take(TOP_TYPES)
				.map(|(name, count)| TypeCountJson {
					type_name: (*name).to_owned(),
					count: *count,
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("compression: {}", nif.compression.as_str());
	println!("signature: {}", header.signature);
	println!("version: {}", format_version_string(version.format_version));
	println!("user_version: {}", version.user_version);
	println!("user_version_2: {}", version.user_version_2);
	println!("endianness: {}", version.endianness.as_str());
	if let Some(info) = &header.export_info {
		println!("author: {}", info.author);
		println!("process_script: {}", or_dash(info.process_script.as_deref()));
		println!("export_script: {}", info.export_script);
		if let Some(max_filepath) = &info.max_filepath {
			println!("max_filepath: {max_filepath}");
		}
	}
	println!("block_count: {}", nif.blocks.len());
	println!("string_count: {}", header.strings.len());
	println!("has_block_sizes: {}", header.has_block_sizes());
	println!("roots: {roots:?}");
	println!("diagnostics: {}", nif.diagnostics.len());
	for diagnostic in &nif.diagnostics {
		println!("  {diagnostic}");
	}

	println!("top_types:");
	for (name, count) in types.into_iter().take(TOP_TYPES) {
		println!("  {name}: {count}");
	}

	Ok(())
}

fn root_indices(nif: &NifFile) -> Result<Vec<usize>> {
	let mut out = Vec::new();
	for root in &nif.footer.roots {
		if let Some(index) = root.index(&nif.blocks)? {
			out.push(index);
		}
	}
	Ok(out)
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	signature: String,
	version: String,
	user_version: u32,
	user_version_2: u32,
	endianness: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	export_info: Option<ExportInfoJson>,
	block_count: usize,
	string_count: usize,
	has_block_sizes: bool,
	roots: Vec<usize>,
	diagnostics: Vec<String>,
	top_types: Vec<TypeCountJson>,
}

#[derive(serde::Serialize)]
struct ExportInfoJson {
	author: String,
	process_script: Option<String>,
	export_script: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	max_filepath: Option<String>,
}

#[derive(serde::Serialize)]
struct TypeCountJson {
	#[serde(rename = "type")]
	type_name: String,
	count: usize,
}
