//! Texture sources, embedded pixel data, and Bethesda texture sets.

use crate::nif::reader::NifReader;
use crate::nif::refs::{Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{AnyBlock, BlockData, ObjectNet, Result};

/// Where a source texture keeps its pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
	/// Texture file on disk.
	External {
		/// File path.
		file_name: Option<Box<str>>,
		/// Trailing link (10.1.0.0 onward).
		unknown: Ref<AnyBlock>,
	},
	/// Pixels embedded in the file.
	Internal {
		/// Original file path (10.1.0.0 onward).
		file_name: Option<Box<str>>,
		/// Pixel data block.
		pixel_data: Ref<NiPixelData>,
	},
}

/// `NiSourceTexture`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiSourceTexture {
	/// Named-object layer.
	pub base: ObjectNet,
	/// Pixel source.
	pub source: TextureSource,
	/// Pixel layout, mipmap, and alpha format preferences.
	pub format_prefs: [u32; 3],
	/// Static texture.
	pub is_static: bool,
	/// Direct render (10.1.0.103 onward).
	pub direct_render: bool,
	/// Persist render data (20.2.0.4 onward).
	pub persist_render_data: bool,
}

fn read_source_texture(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = ObjectNet::read(r)?;
	let ver = *r.version();

	let source = if r.read_u8()? != 0 {
		let file_name = r.read_string()?;
		let unknown = if ver.at_least(v::V10_1_0_0) { r.read_ref()? } else { Ref::null() };
		TextureSource::External { file_name, unknown }
	} else {
		if ver.at_most(v::V10_0_1_0) {
			r.skip(1)?;
		}
		let file_name = if ver.at_least(v::V10_1_0_0) { r.read_string()? } else { None };
		TextureSource::Internal {
			file_name,
			pixel_data: r.read_ref()?,
		}
	};

	let format_prefs = [r.read_u32()?, r.read_u32()?, r.read_u32()?];
	let is_static = r.read_u8()? != 0;
	let direct_render = ver.at_least(v::V10_1_0_103) && r.read_bool()?;
	let persist_render_data = ver.at_least(v::V20_2_0_4) && r.read_bool()?;

	Ok(BlockData::SourceTexture(NiSourceTexture {
		base,
		source,
		format_prefs,
		is_static,
		direct_render,
		persist_render_data,
	}))
}

/// One channel description of a modern pixel format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelChannel {
	/// Component type.
	pub kind: u32,
	/// Value convention.
	pub convention: u32,
	/// Bits per channel.
	pub bits: u8,
	/// Signed values.
	pub is_signed: bool,
}

/// Pixel format description; its shape changed at 10.4.0.2.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelLayout {
	/// Channel masks (up to 10.4.0.1).
	Masks {
		/// Red, green, blue, and alpha masks.
		masks: [u32; 4],
		/// Bits per pixel.
		bits_per_pixel: u32,
		/// Tiling (10.1.0.0 onward).
		tiling: u32,
	},
	/// Per-channel descriptors (10.4.0.2 onward).
	Channels {
		/// Bits per pixel.
		bits_per_pixel: u8,
		/// Renderer hint.
		renderer_hint: u32,
		/// Extra data.
		extra_data: u32,
		/// Format flags.
		flags: u8,
		/// Tiling.
		tiling: u32,
		/// sRGB color space (20.3.0.4 onward).
		srgb: bool,
		/// Channel descriptors.
		channels: [PixelChannel; 4],
	},
}

/// One mipmap level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MipMap {
	/// Width in pixels.
	pub width: u32,
	/// Height in pixels.
	pub height: u32,
	/// Byte offset into the pixel data.
	pub offset: u32,
}

/// `NiPixelData`.
#[derive(Debug, Clone, PartialEq)]
pub struct NiPixelData {
	/// Pixel format code.
	pub pixel_format: u32,
	/// Format description.
	pub layout: PixelLayout,
	/// Palette block.
	pub palette: Ref<AnyBlock>,
	/// Bytes per pixel.
	pub bytes_per_pixel: u32,
	/// Mipmap levels.
	pub mipmaps: Vec<MipMap>,
	/// Face count (10.4.0.2 onward; 1 before).
	pub num_faces: u32,
	/// Raw pixel bytes for every face.
	pub pixels: Vec<u8>,
}

fn read_pixel_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let ver = *r.version();
	let pixel_format = r.read_u32()?;

	let layout = if ver.at_most(v::V10_4_0_1) {
		let masks = [r.read_u32()?, r.read_u32()?, r.read_u32()?, r.read_u32()?];
		let bits_per_pixel = r.read_u32()?;
		// Fast compare.
		r.skip(8)?;
		let tiling = if ver.at_least(v::V10_1_0_0) { r.read_u32()? } else { 0 };
		PixelLayout::Masks {
			masks,
			bits_per_pixel,
			tiling,
		}
	} else {
		let bits_per_pixel = r.read_u8()?;
		let renderer_hint = r.read_u32()?;
		let extra_data = r.read_u32()?;
		let flags = r.read_u8()?;
		let tiling = r.read_u32()?;
		let srgb = ver.at_least(v::V20_3_0_4) && r.read_bool()?;
		let mut channels = [PixelChannel::default(); 4];
		for channel in &mut channels {
			*channel = PixelChannel {
				kind: r.read_u32()?,
				convention: r.read_u32()?,
				bits: r.read_u8()?,
				is_signed: r.read_bool()?,
			};
		}
		PixelLayout::Channels {
			bits_per_pixel,
			renderer_hint,
			extra_data,
			flags,
			tiling,
			srgb,
			channels,
		}
	};

	let palette = r.read_ref()?;
	let mip_count = r.read_count(12)?;
	let bytes_per_pixel = r.read_u32()?;
	let mipmaps = r.read_vec(mip_count, |r| {
		Ok(MipMap {
			width: r.read_u32()?,
			height: r.read_u32()?,
			offset: r.read_u32()?,
		})
	})?;
	let num_pixels = r.read_u32()?;
	let num_faces = if ver.at_least(v::V10_4_0_2) { r.read_u32()? } else { 1 };
	let total = u64::from(num_pixels) * u64::from(num_faces);
	let total = r.check_count(total, 1)?;
	let pixels = r.read_byte_vec(total)?;

	Ok(BlockData::PixelData(NiPixelData {
		pixel_format,
		layout,
		palette,
		bytes_per_pixel,
		mipmaps,
		num_faces,
		pixels,
	}))
}

/// `BSShaderTextureSet`: texture paths by slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BsShaderTextureSet {
	/// Paths, one per slot; empty slots are empty strings.
	pub textures: Vec<Box<str>>,
}

fn read_texture_set(r: &mut NifReader<'_>) -> Result<BlockData> {
	let count = r.read_count(4)?;
	let textures = r.read_vec(count, |r| r.read_sized_string())?;
	Ok(BlockData::ShaderTextureSet(BsShaderTextureSet { textures }))
}

concrete_block_type! {
	NiSourceTexture => SourceTexture,
	NiPixelData => PixelData,
	BsShaderTextureSet => ShaderTextureSet,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	registry.register("NiSourceTexture", read_source_texture);
	registry.register("NiPixelData", read_pixel_data);
	registry.register("BSShaderTextureSet", read_texture_set);
}
