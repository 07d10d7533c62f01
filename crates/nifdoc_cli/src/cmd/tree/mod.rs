use std::path::PathBuf;

use nifdoc::nif::{NifFile, Result};

use crate::cmd::util::{block_label, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Stop descending below this many levels under each root.
	#[arg(long)]
	pub depth: Option<usize>,
}

/// Print the scene graph below each footer root.
///
/// Files without a root list (pre-3.3.0.13) are walked from the first block.
pub fn run(args: Args, lenient: bool) -> Result<()> {
	let Args { path, depth } = args;

	let nif = load(&path, lenient)?;
	let mut roots = Vec::with_capacity(nif.footer.roots.len());
	for root in &nif.footer.roots {
		if let Some(index) = root.index(&nif.blocks)? {
			roots.push(index);
		}
	}
	if nif.footer.roots.is_empty() && !nif.blocks.is_empty() {
		roots.push(0);
	}

	println!("path: {}", path.display());
	let mut walker = TreeWalker {
		nif: &nif,
		max_depth: depth,
		ancestors: Vec::new(),
	};
	for root in roots {
		walker.walk(root, 0)?;
	}
	Ok(())
}

struct TreeWalker<'a> {
	nif: &'a NifFile,
	max_depth: Option<usize>,
	ancestors: Vec<usize>,
}

impl TreeWalker<'_> {
	fn walk(&mut self, index: usize, level: usize) -> Result<()> {
		let indent = "  ".repeat(level);
		let Some(block) = self.nif.blocks.get(index) else {
			println!("{indent}[{index}] <missing>");
			return Ok(());
		};
		if self.ancestors.contains(&index) {
			println!("{indent}{} (cycle)", block_label(index, block));
			return Ok(());
		}
		println!("{indent}{}", block_label(index, block));

		let Some(node) = block.node() else {
			return Ok(());
		};
		if self.max_depth.is_some_and(|max| level >= max) {
			if !node.children.is_empty() {
				println!("{indent}  ... {} children", node.children.len());
			}
			return Ok(());
		}

		self.ancestors.push(index);
		for child in &node.children {
			if let Some(child) = child.index(&self.nif.blocks)? {
				self.walk(child, level + 1)?;
			}
		}
		self.ancestors.pop();
		Ok(())
	}
}
