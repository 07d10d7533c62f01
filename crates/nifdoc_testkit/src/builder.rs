use crate::{ByteWriter, version_token};

const V3_0: u32 = 0x0300_0000;
const V3_1: u32 = 0x0301_0000;
const V3_1_0_1: u32 = 0x0301_0001;
const V3_3_0_13: u32 = 0x0303_000D;
const V4_0_0_2: u32 = 0x0400_0002;
const V4_2_2_0: u32 = 0x0402_0200;
const V5_0_0_1: u32 = 0x0500_0001;
const V5_0_0_6: u32 = 0x0500_0006;
const V10_0_1_0: u32 = 0x0A00_0100;
const V10_0_1_2: u32 = 0x0A00_0102;
const V10_0_1_8: u32 = 0x0A00_0108;
const V10_1_0_0: u32 = 0x0A01_0000;
const V10_2_0_0: u32 = 0x0A02_0000;
const V10_0_0_0: u32 = 0x0A00_0000;
const V20_0_0_3: u32 = 0x1400_0003;
const V20_0_0_4: u32 = 0x1400_0004;
const V20_0_0_5: u32 = 0x1400_0005;
const V20_1_0_1: u32 = 0x1401_0001;
const V20_2_0_5: u32 = 0x1402_0005;
const V20_2_0_7: u32 = 0x1402_0007;
const V20_3_1_2: u32 = 0x1403_0102;
const V30_0_0_0: u32 = 0x1E00_0000;

#[derive(Debug, Clone)]
struct BlockSpec {
	type_name: String,
	body: Vec<u8>,
	declared_size: Option<u32>,
	separator: u32,
	address: u32,
	top_level: bool,
}

#[derive(Debug, Clone)]
struct ExportSpec {
	author: String,
	unknown: u32,
	process_script: String,
	export_script: String,
	max_filepath: String,
}

/// Builder for synthetic `.nif` streams.
///
/// Header fields are emitted under the same version gates the decoder reads them
/// with, so a builder configured for a version produces a well-formed file for it.
#[derive(Debug, Clone)]
pub struct NifBuilder {
	version: u32,
	user_version: u32,
	user_version_2: u32,
	big_endian: bool,
	raw_version: Option<u32>,
	export: ExportSpec,
	type_hash: Option<fn(&str) -> u32>,
	metadata: Vec<u8>,
	strings: Vec<String>,
	groups: Vec<u32>,
	blocks: Vec<BlockSpec>,
	roots: Vec<i32>,
}

impl NifBuilder {
	/// Builder for `version` with both user versions zero.
	pub fn new(version: u32) -> Self {
		Self {
			version,
			user_version: 0,
			user_version_2: 0,
			big_endian: false,
			raw_version: None,
			export: ExportSpec {
				author: "nifdoc".to_owned(),
				unknown: 0,
				process_script: String::new(),
				export_script: String::new(),
				max_filepath: String::new(),
			},
			type_hash: None,
			metadata: Vec::new(),
			strings: Vec::new(),
			groups: Vec::new(),
			blocks: Vec::new(),
			roots: Vec::new(),
		}
	}

	/// Set user version and user version 2.
	pub fn user(mut self, user_version: u32, user_version_2: u32) -> Self {
		self.user_version = user_version;
		self.user_version_2 = user_version_2;
		self
	}

	/// Write multi-byte fields after the endian flag big-endian.
	pub fn big_endian(mut self) -> Self {
		self.big_endian = true;
		self
	}

	/// Override the binary version field.
	pub fn raw_version(mut self, raw: u32) -> Self {
		self.raw_version = Some(raw);
		self
	}

	/// Set export-info author and scripts.
	pub fn export_info(mut self, author: &str, process_script: &str, export_script: &str) -> Self {
		self.export.author = author.to_owned();
		self.export.process_script = process_script.to_owned();
		self.export.export_script = export_script.to_owned();
		self
	}

	/// Set the export-info source path (`user_version_2 >= 103`).
	pub fn max_filepath(mut self, path: &str) -> Self {
		self.export.max_filepath = path.to_owned();
		self
	}

	/// Store type hashes instead of names (20.3.1.2).
	pub fn type_hashes(mut self, hash: fn(&str) -> u32) -> Self {
		self.type_hash = Some(hash);
		self
	}

	/// Set the metadata byte array (30.0.0.0 onward).
	pub fn metadata(mut self, bytes: &[u8]) -> Self {
		self.metadata = bytes.to_vec();
		self
	}

	/// Append a string-table entry.
	pub fn string(mut self, text: &str) -> Self {
		self.strings.push(text.to_owned());
		self
	}

	/// Append a group-table entry.
	pub fn group(mut self, value: u32) -> Self {
		self.groups.push(value);
		self
	}

	/// Append a block whose declared size matches its body.
	pub fn block(mut self, type_name: &str, body: Vec<u8>) -> Self {
		let address = 0x1000 + 0x100 * (self.blocks.len() as u32 + 1);
		self.blocks.push(BlockSpec {
			type_name: type_name.to_owned(),
			body,
			declared_size: None,
			separator: 0,
			address,
			top_level: false,
		});
		self
	}

	/// Override the declared size of the last block.
	pub fn declared_size(mut self, size: u32) -> Self {
		if let Some(block) = self.blocks.last_mut() {
			block.declared_size = Some(size);
		}
		self
	}

	/// Set the legacy separator written before the last block.
	pub fn separator(mut self, value: u32) -> Self {
		if let Some(block) = self.blocks.last_mut() {
			block.separator = value;
		}
		self
	}

	/// Set the legacy address of the last block.
	pub fn address(mut self, address: u32) -> Self {
		if let Some(block) = self.blocks.last_mut() {
			block.address = address;
		}
		self
	}

	/// Mark the last block with a `Top Level Object` prefix (before 5.0.0.1).
	pub fn top_level(mut self) -> Self {
		if let Some(block) = self.blocks.last_mut() {
			block.top_level = true;
		}
		self
	}

	/// Append a footer root link.
	pub fn root(mut self, raw: i32) -> Self {
		self.roots.push(raw);
		self
	}

	/// Append a plain `NiNode` with the given children and nothing else attached.
	pub fn node(self, name: &str, children: &[i32]) -> Self {
		self.typed_node("NiNode", name, children)
	}

	/// Append a node of any plain node type name.
	pub fn typed_node(mut self, type_name: &str, name: &str, children: &[i32]) -> Self {
		let body = self.node_body(name, children);
		self.block(type_name, body)
	}

	/// Body of a plain node laid out for this builder's version triple.
	///
	/// The name is written inline, or as a string-table index (added on demand) from
	/// 20.1.0.1 onward.
	pub fn node_body(&mut self, name: &str, children: &[i32]) -> Vec<u8> {
		let v = self.version;
		let uv2 = self.user_version_2;
		let mut w = self.writer();

		self.write_name(&mut w, name);
		if (V3_0..=V4_2_2_0).contains(&v) {
			w.i32(-1);
		}
		if v >= V10_0_1_0 {
			w.u32(0);
		}
		if v >= V3_0 {
			w.i32(-1);
		}
		if uv2 > 26 {
			w.u32(14);
		} else if v >= V3_0 {
			w.u16(14);
		}
		w.f32s(&[0.0, 0.0, 0.0]).identity_rotation().f32(1.0);
		if v <= V4_2_2_0 {
			w.f32s(&[0.0, 0.0, 0.0]);
		}
		if uv2 <= 34 {
			w.u32(0);
		}
		if (V3_0..=V4_2_2_0).contains(&v) {
			if v <= V4_0_0_2 {
				w.u32(0);
			} else {
				w.u8(0);
			}
		}
		if v >= V10_0_1_0 {
			w.i32(-1);
		}
		w.u32(children.len() as u32);
		for child in children {
			w.i32(*child);
		}
		if uv2 <= 129 {
			w.u32(0);
		}
		w.into_bytes()
	}

	/// Write a string field: inline before 20.1.0.1, a string-table index afterwards.
	pub fn write_name(&mut self, w: &mut ByteWriter, name: &str) {
		if self.version < V20_1_0_1 {
			w.sized_string(name);
			return;
		}
		let index = match self.strings.iter().position(|text| text == name) {
			Some(index) => index,
			None => {
				self.strings.push(name.to_owned());
				self.strings.len() - 1
			}
		};
		w.u32(index as u32);
	}

	/// Field writer using the stream's byte order, for block bodies.
	pub fn writer(&self) -> ByteWriter {
		ByteWriter::with_big_endian(self.big_endian)
	}

	/// Assemble the stream.
	pub fn build(&self) -> Vec<u8> {
		let mut w = ByteWriter::new();
		let family = if self.version >= V10_1_0_0 {
			"Gamebryo File Format"
		} else {
			"NetImmerse File Format"
		};
		w.line(&format!("{family}, Version {}", version_token(self.version)));
		if self.version <= V3_1 {
			w.line("Numerical Design Limited, Chapel Hill, NC 27514");
			w.line("Copyright (c) 1996-2000");
			w.line("All Rights Reserved");
		}
		if self.version >= V3_1_0_1 {
			w.u32(self.raw_version.unwrap_or(self.version));
		}
		if self.version >= V20_0_0_3 {
			w.u8(if self.big_endian { 0 } else { 1 });
		}

		let mut w = {
			let mut body = self.writer();
			body.bytes(&w.into_bytes());
			body
		};

		if self.version >= V10_0_1_8 {
			w.u32(self.user_version);
		}
		if self.version >= V3_1_0_1 {
			w.u32(self.blocks.len() as u32);
		}
		if self.has_bethesda_header() {
			self.write_export_info(&mut w);
		}
		if self.version >= V30_0_0_0 {
			w.u32(self.metadata.len() as u32);
			w.bytes(&self.metadata);
		}

		let mut types: Vec<&str> = Vec::new();
		let mut type_index = Vec::with_capacity(self.blocks.len());
		for block in &self.blocks {
			let idx = match types.iter().position(|name| *name == block.type_name) {
				Some(idx) => idx,
				None => {
					types.push(&block.type_name);
					types.len() - 1
				}
			};
			type_index.push(idx as u16);
		}

		if self.version >= V5_0_0_1 {
			w.u16(types.len() as u16);
			for name in &types {
				match self.type_hash {
					Some(hash) if self.version == V20_3_1_2 => w.u32(hash(name)),
					_ => w.sized_string(name),
				};
			}
			for idx in &type_index {
				w.u16(*idx);
			}
		}
		if self.version >= V20_2_0_5 {
			for block in &self.blocks {
				w.u32(block.declared_size.unwrap_or(block.body.len() as u32));
			}
		}
		if self.version >= V20_1_0_1 {
			w.u32(self.strings.len() as u32);
			w.u32(self.strings.iter().map(String::len).max().unwrap_or(0) as u32);
			for text in &self.strings {
				w.sized_string(text);
			}
		}
		if self.version >= V5_0_0_6 {
			w.u32(self.groups.len() as u32);
			for group in &self.groups {
				w.u32(*group);
			}
		}

		for block in &self.blocks {
			self.write_block(&mut w, block);
		}

		if self.version < V3_3_0_13 {
			w.sized_string("End Of File");
		} else {
			w.u32(self.roots.len() as u32);
			for root in &self.roots {
				w.i32(*root);
			}
		}
		w.into_bytes()
	}

	fn write_block(&self, w: &mut ByteWriter, block: &BlockSpec) {
		if (V10_0_0_0..V10_2_0_0).contains(&self.version) && !block.type_name.starts_with("NiPhysX") {
			w.u32(block.separator);
		}
		if self.version < V5_0_0_1 {
			if block.top_level {
				w.sized_string("Top Level Object");
			}
			w.sized_string(&block.type_name);
			if self.version < V3_3_0_13 {
				w.u32(block.address);
			}
		}
		w.bytes(&block.body);
	}

	fn has_bethesda_header(&self) -> bool {
		let v = self.version;
		let band = v == V10_0_1_2 || v == V20_2_0_7 || v == V20_0_0_5 || ((V10_1_0_0..=V20_0_0_4).contains(&v) && self.user_version <= 11);
		band && self.user_version >= 3
	}

	fn write_export_info(&self, w: &mut ByteWriter) {
		let uv2 = self.user_version_2;
		w.u32(uv2);
		w.short_string(&self.export.author);
		if uv2 > 130 {
			w.u32(self.export.unknown);
		}
		if uv2 < 131 {
			w.short_string(&self.export.process_script);
		}
		w.short_string(&self.export.export_script);
		if uv2 >= 103 {
			w.short_string(&self.export.max_filepath);
		}
	}
}
