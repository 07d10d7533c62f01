//! Triangle geometry, packed Bethesda shapes, and skinning.

use crate::nif::blocks::common::{ByteColor4, Color4, NiBound, NiTransform, TexCoord, Triangle, Vector3, Vector4, read_u16_list};
use crate::nif::blocks::property::NiAlphaProperty;
use crate::nif::layout::{Record, Scalar};
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ptr, Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{AnyBlock, AvObject, BlockData, NiNode, Property, Result};

/// Shader and material slots attached to a geometry object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialData {
	/// Shader name and extra data (10.0.1.0 to 20.1.0.3).
	pub shader: Option<(Option<Box<str>>, i32)>,
	/// `(name, extra data)` per material (20.2.0.5 onward).
	pub materials: Vec<(Option<Box<str>>, i32)>,
	/// Active material index, `-1` when none.
	pub active_material: i32,
	/// Material needs update (20.2.0.7 onward).
	pub needs_update: bool,
}

impl MaterialData {
	fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let ver = *r.version();
		let mut data = Self {
			active_material: -1,
			..Self::default()
		};

		if ver.in_range(v::V10_0_1_0, v::V20_1_0_3) && r.read_bool()? {
			data.shader = Some((r.read_string()?, r.read_i32()?));
		}
		if ver.at_least(v::V20_2_0_5) {
			let count = r.read_count(8)?;
			let names = r.read_vec(count, |r| r.read_string())?;
			let extras = r.read_vec(count, |r| r.read_i32())?;
			data.materials = names.into_iter().zip(extras).collect();
			data.active_material = r.read_i32()?;
		}
		if ver.in_range(v::V10_2_0_0, v::V10_4_0_1) && ver.user_version == 1 {
			r.skip(1)?;
		}
		if ver.at_least(v::V20_2_0_7) {
			data.needs_update = r.read_bool()?;
		}
		Ok(data)
	}
}

/// Fields specific to a geometry subtype.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
	/// `NiTriShape`.
	TriShape,
	/// `NiTriStrips`.
	TriStrips,
	/// `BSLODTriShape`.
	LodTriShape {
		/// Triangle counts per LOD level.
		lod_sizes: [u32; 3],
	},
}

/// Geometry object referencing a shared data block.
#[derive(Debug, Clone, PartialEq)]
pub struct NiGeometry {
	/// Scene-object layer.
	pub av: AvObject,
	/// Geometry data.
	pub data: Ref<GeometryData>,
	/// Skin binding (3.3.0.13 onward).
	pub skin_instance: Ref<NiSkinInstance>,
	/// Material slots.
	pub material: MaterialData,
	/// Shader property (Bethesda stream 35 onward).
	pub shader_property: Ref<Property>,
	/// Alpha property (Bethesda stream 35 onward).
	pub alpha_property: Ref<NiAlphaProperty>,
	/// Subtype fields.
	pub kind: GeometryKind,
}

fn read_geometry(r: &mut NifReader<'_>, lod: bool) -> Result<NiGeometry> {
	let av = AvObject::read(r)?;
	let data = r.read_ref()?;
	let skin_instance = if r.version().at_least(v::V3_3_0_13) { r.read_ref()? } else { Ref::null() };
	let material = MaterialData::read(r)?;
	let (shader_property, alpha_property) = if r.version().user_version_2 > 34 {
		(r.read_ref()?, r.read_ref()?)
	} else {
		(Ref::null(), Ref::null())
	};
	let kind = if lod {
		GeometryKind::LodTriShape {
			lod_sizes: [r.read_u32()?, r.read_u32()?, r.read_u32()?],
		}
	} else {
		GeometryKind::TriShape
	};
	Ok(NiGeometry {
		av,
		data,
		skin_instance,
		material,
		shader_property,
		alpha_property,
		kind,
	})
}

/// Vertex streams shared by triangle-shape and triangle-strip data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
	/// Group id (10.1.0.114 onward).
	pub group_id: i32,
	/// Declared vertex count.
	pub num_vertices: u16,
	/// Keep flags (10.1.0.0 onward).
	pub keep_flags: u8,
	/// Compress flags (10.1.0.0 onward).
	pub compress_flags: u8,
	/// Vertex positions.
	pub vertices: Vec<Vector3>,
	/// UV-set count and tangent-space flags (10.0.1.0 onward).
	pub data_flags: u16,
	/// Material CRC (user version 12 streams).
	pub material_crc: u32,
	/// Vertex normals.
	pub normals: Vec<Vector3>,
	/// Vertex tangents.
	pub tangents: Vec<Vector3>,
	/// Vertex bitangents.
	pub bitangents: Vec<Vector3>,
	/// Bounding sphere.
	pub bound: NiBound,
	/// Vertex colors.
	pub vertex_colors: Vec<Color4>,
	/// UV sets, each with one coordinate per vertex.
	pub uv_sets: Vec<Vec<TexCoord>>,
	/// Consistency flags (10.0.1.0 onward).
	pub consistency_flags: u16,
	/// Additional geometry data (20.0.0.4 onward).
	pub additional_data: Ref<AnyBlock>,
}

const TANGENT_SPACE_FLAG: u16 = 0x1000;

impl GeometryData {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let ver = *r.version();
		let mut data = Self {
			group_id: if ver.at_least(v::V10_1_0_114) { r.read_i32()? } else { 0 },
			num_vertices: r.read_u16()?,
			..Self::default()
		};
		let nv = usize::from(data.num_vertices);

		if ver.at_least(v::V10_1_0_0) {
			data.keep_flags = r.read_u8()?;
			data.compress_flags = r.read_u8()?;
		}
		if r.read_bool()? {
			data.vertices = r.read_records(nv)?;
		}
		if ver.at_least(v::V10_0_1_0) {
			data.data_flags = r.read_u16()?;
		}
		if ver.at_least(v::V20_2_0_7) && ver.user_version == 12 {
			data.material_crc = r.read_u32()?;
		}

		let has_normals = r.read_bool()?;
		if has_normals {
			data.normals = r.read_records(nv)?;
			if ver.at_least(v::V10_1_0_0) && data.data_flags & TANGENT_SPACE_FLAG != 0 {
				data.tangents = r.read_records(nv)?;
				data.bitangents = r.read_records(nv)?;
			}
		}
		if ver.is(v::V20_3_0_9) && ver.user_version == 0x20000 {
			r.skip(26)?;
		}

		data.bound = r.read_record()?;
		if r.read_bool()? {
			data.vertex_colors = r.read_records(nv)?;
		}

		let mut uv_count = 0_usize;
		if ver.at_most(v::V4_2_2_0) {
			uv_count = usize::from(r.read_u16()? & 0x3F);
		}
		if ver.at_most(v::V4_0_0_2) && !r.read_bool()? {
			uv_count = 0;
		}
		if ver.at_least(v::V10_0_1_0) {
			let bethesda = ver.is(v::V20_2_0_7) && ver.user_version_2 > 0;
			uv_count = usize::from(if bethesda { data.data_flags & 1 } else { data.data_flags & 0x3F });
		}
		let uv_count = r.check_count(uv_count as u64, nv.saturating_mul(8))?;
		data.uv_sets = r.read_vec(uv_count, |r| r.read_records(nv))?;

		if ver.at_least(v::V10_0_1_0) {
			data.consistency_flags = r.read_u16()?;
		}
		if ver.at_least(v::V20_0_0_4) {
			data.additional_data = r.read_ref()?;
		}
		Ok(data)
	}
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct NiTriShapeData {
	/// Shared vertex streams.
	pub geometry: GeometryData,
	/// Declared triangle count.
	pub num_triangles: u16,
	/// Declared index count.
	pub num_triangle_points: u32,
	/// Whether the triangle list was stored.
	pub has_triangles: bool,
	/// Triangles.
	pub triangles: Vec<Triangle>,
	/// Groups of coincident vertices.
	pub match_groups: Vec<Vec<u16>>,
}

fn read_tri_shape_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let geometry = GeometryData::read(r)?;
	let num_triangles = r.read_u16()?;
	let num_triangle_points = r.read_u32()?;

	let ver = *r.version();
	// Neither the flag nor the list exists in [10.0.1.3, 10.1.0.0).
	let has_triangles = if ver.at_least(v::V10_1_0_0) {
		r.read_bool()?
	} else {
		ver.at_most(v::V10_0_1_2)
	};
	let triangles = if has_triangles {
		r.read_records(usize::from(num_triangles))?
	} else {
		Vec::new()
	};

	let groups = r.read_count_u16(2)?;
	let match_groups = r.read_vec(groups, read_u16_list)?;
	Ok(BlockData::TriShapeData(NiTriShapeData {
		geometry,
		num_triangles,
		num_triangle_points,
		has_triangles,
		triangles,
		match_groups,
	}))
}

/// Triangle strips.
#[derive(Debug, Clone, PartialEq)]
pub struct NiTriStripsData {
	/// Shared vertex streams.
	pub geometry: GeometryData,
	/// Declared triangle count.
	pub num_triangles: u16,
	/// Length of each strip.
	pub strip_lengths: Vec<u16>,
	/// Whether strip indices were stored.
	pub has_points: bool,
	/// Strip indices.
	pub points: Vec<Vec<u16>>,
}

fn read_tri_strips_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let geometry = GeometryData::read(r)?;
	let num_triangles = r.read_u16()?;
	let strips = r.read_count_u16(2)?;
	let strip_lengths = r.read_u16_vec(strips)?;
	let has_points = if r.version().at_least(v::V10_0_1_3) { r.read_bool()? } else { true };
	let points = if has_points {
		let mut points = Vec::with_capacity(strip_lengths.len());
		for len in &strip_lengths {
			points.push(r.read_u16_vec(usize::from(*len))?);
		}
		points
	} else {
		Vec::new()
	};

	Ok(BlockData::TriStripsData(NiTriStripsData {
		geometry,
		num_triangles,
		strip_lengths,
		has_points,
		points,
	}))
}

/// Bits of the vertex attribute mask (descriptor bits 44..56).
pub mod vertex_flags {
	/// Position present.
	pub const VERTEX: u16 = 0x001;
	/// UV present.
	pub const UVS: u16 = 0x002;
	/// Second UV set.
	pub const UVS_2: u16 = 0x004;
	/// Normal and bitangent Y present.
	pub const NORMALS: u16 = 0x008;
	/// Tangent, bitangent X and Z present.
	pub const TANGENTS: u16 = 0x010;
	/// Vertex color present.
	pub const COLORS: u16 = 0x020;
	/// Bone weights and indices present.
	pub const SKINNED: u16 = 0x040;
	/// Landscape data.
	pub const LAND_DATA: u16 = 0x080;
	/// Eye data present.
	pub const EYE_DATA: u16 = 0x100;
	/// Instance data.
	pub const INSTANCE: u16 = 0x200;
	/// Positions stored as 32-bit floats.
	pub const FULL_PRECISION: u16 = 0x400;
}

/// Packed 64-bit vertex format descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexDesc(pub u64);

impl VertexDesc {
	/// Attribute mask (bits 44..56).
	pub fn attributes(self) -> u16 {
		((self.0 >> 44) & 0xFFF) as u16
	}

	/// Return whether every bit of `flag` is set.
	pub fn has(self, flag: u16) -> bool {
		self.attributes() & flag == flag
	}

	/// Encoded vertex size in bytes.
	pub fn vertex_size(self) -> usize {
		((self.0 & 0xF) * 4) as usize
	}
}

/// One vertex of a packed Bethesda shape.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BsVertex {
	/// Position.
	pub position: Vector3,
	/// Bitangent X (tangent-space vertices).
	pub bitangent_x: f32,
	/// Texture coordinate.
	pub uv: Option<TexCoord>,
	/// Unit normal.
	pub normal: Option<Vector3>,
	/// Bitangent Y.
	pub bitangent_y: f32,
	/// Unit tangent.
	pub tangent: Option<Vector3>,
	/// Bitangent Z.
	pub bitangent_z: f32,
	/// Vertex color.
	pub color: Option<ByteColor4>,
	/// Bone weights.
	pub bone_weights: [f32; 4],
	/// Bone indices.
	pub bone_indices: [u8; 4],
	/// Eye data.
	pub eye_data: f32,
}

/// Map a byte in `0..=255` to `-1.0..=1.0`.
fn norm_byte(byte: u8) -> f32 {
	f32::from(byte) / 255.0 * 2.0 - 1.0
}

struct ByteVector3(Vector3);

impl Record for ByteVector3 {
	const LAYOUT: &'static str = "3B";

	fn from_scalars(values: &[Scalar]) -> Self {
		let component = |idx: usize| values.get(idx).map_or(0.0, |value| norm_byte(value.as_u8()));
		Self(Vector3::new(component(0), component(1), component(2)))
	}
}

struct HalfVector3(Vector3);

impl Record for HalfVector3 {
	const LAYOUT: &'static str = "3e";

	fn from_scalars(values: &[Scalar]) -> Self {
		let component = |idx: usize| values.get(idx).map_or(0.0, |value| value.as_f32());
		Self(Vector3::new(component(0), component(1), component(2)))
	}
}

fn read_vertex(r: &mut NifReader<'_>, desc: VertexDesc, full_precision: bool) -> Result<BsVertex> {
	use self::vertex_flags::*;

	let mut vertex = BsVertex::default();
	if desc.has(VERTEX) {
		if full_precision {
			vertex.position = r.read_record()?;
			if desc.has(TANGENTS) {
				vertex.bitangent_x = r.read_f32()?;
			} else {
				r.skip(4)?;
			}
		} else {
			vertex.position = r.read_record::<HalfVector3>()?.0;
			if desc.has(TANGENTS) {
				vertex.bitangent_x = r.read_f16()?;
			} else {
				r.skip(2)?;
			}
		}
	}
	if desc.has(UVS) {
		vertex.uv = Some(TexCoord {
			u: r.read_f16()?,
			v: r.read_f16()?,
		});
	}
	if desc.has(NORMALS) {
		vertex.normal = Some(r.read_record::<ByteVector3>()?.0);
		vertex.bitangent_y = norm_byte(r.read_u8()?);
		if desc.has(TANGENTS) {
			vertex.tangent = Some(r.read_record::<ByteVector3>()?.0);
			vertex.bitangent_z = norm_byte(r.read_u8()?);
		}
	}
	if desc.has(COLORS) {
		vertex.color = Some(r.read_record()?);
	}
	if desc.has(SKINNED) {
		for weight in &mut vertex.bone_weights {
			*weight = r.read_f16()?;
		}
		vertex.bone_indices.copy_from_slice(r.read_bytes(4)?);
	}
	if desc.has(EYE_DATA) {
		vertex.eye_data = r.read_f32()?;
	}
	Ok(vertex)
}

/// Particle streams carried by Skyrim SE shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleData {
	/// Particle positions.
	pub vertices: Vec<Vector3>,
	/// Particle normals.
	pub normals: Vec<Vector3>,
	/// Particle triangles.
	pub triangles: Vec<Triangle>,
}

/// Fields specific to a packed-shape subtype.
#[derive(Debug, Clone, PartialEq)]
pub enum BsTriShapeKind {
	/// `BSTriShape`.
	Plain,
	/// `BSMeshLODTriShape`.
	MeshLod {
		/// Triangle counts per LOD level.
		lod_sizes: [u32; 3],
	},
	/// `BSDynamicTriShape`.
	Dynamic {
		/// Dynamic vertex positions.
		vertices: Vec<Vector4>,
	},
}

/// Packed Bethesda shape with inline vertex and triangle data.
#[derive(Debug, Clone, PartialEq)]
pub struct BsTriShape {
	/// Scene-object layer.
	pub av: AvObject,
	/// Bounding sphere.
	pub bound: NiBound,
	/// Bounding box min and max (Bethesda stream 155).
	pub bound_min_max: Option<[f32; 6]>,
	/// Skin binding.
	pub skin: Ref<AnyBlock>,
	/// Shader property.
	pub shader_property: Ref<Property>,
	/// Alpha property.
	pub alpha_property: Ref<NiAlphaProperty>,
	/// Vertex format descriptor.
	pub vertex_desc: VertexDesc,
	/// Declared triangle count.
	pub num_triangles: u32,
	/// Declared vertex count.
	pub num_vertices: u16,
	/// Byte size of the inline vertex and triangle data.
	pub data_size: u32,
	/// Whether positions were stored as 32-bit floats.
	pub full_precision: bool,
	/// Vertices.
	pub vertices: Vec<BsVertex>,
	/// Triangles.
	pub triangles: Vec<Triangle>,
	/// Particle streams (Skyrim SE).
	pub particles: Option<ParticleData>,
	/// Subtype fields.
	pub kind: BsTriShapeKind,
}

const SKYRIM_SE: u32 = 100;
const FALLOUT_76: u32 = 155;

/// Return whether packed positions are 32-bit floats for this descriptor and stream.
pub fn uses_full_precision(desc: VertexDesc, user_version_2: u32) -> bool {
	desc.has(vertex_flags::FULL_PRECISION) || user_version_2 == SKYRIM_SE
}

fn read_bs_tri_shape(r: &mut NifReader<'_>) -> Result<BsTriShape> {
	let av = AvObject::read(r)?;
	let uv2 = r.version().user_version_2;

	let bound = r.read_record()?;
	let bound_min_max = if uv2 == FALLOUT_76 {
		let mut values = [0.0; 6];
		for value in &mut values {
			*value = r.read_f32()?;
		}
		Some(values)
	} else {
		None
	};
	let skin = r.read_ref()?;
	let shader_property = r.read_ref()?;
	let alpha_property = r.read_ref()?;
	let vertex_desc = VertexDesc(r.read_u64()?);
	let num_triangles = if uv2 >= 130 { r.read_u32()? } else { u32::from(r.read_u16()?) };
	let num_vertices = r.read_u16()?;
	let data_size = r.read_u32()?;
	let full_precision = uses_full_precision(vertex_desc, uv2);

	let (vertices, triangles) = if data_size > 0 {
		let count = r.check_count(u64::from(num_vertices), vertex_desc.vertex_size())?;
		let vertices = r.read_vec(count, |r| read_vertex(r, vertex_desc, full_precision))?;
		let triangles = r.read_records(num_triangles as usize)?;
		(vertices, triangles)
	} else {
		(Vec::new(), Vec::new())
	};

	let particles = if uv2 == SKYRIM_SE && r.read_u32()? > 0 {
		let nv = usize::from(num_vertices);
		Some(ParticleData {
			vertices: r.read_records::<HalfVector3>(nv)?.into_iter().map(|h| h.0).collect(),
			normals: r.read_records::<HalfVector3>(nv)?.into_iter().map(|h| h.0).collect(),
			triangles: r.read_records(num_triangles as usize)?,
		})
	} else {
		None
	};

	Ok(BsTriShape {
		av,
		bound,
		bound_min_max,
		skin,
		shader_property,
		alpha_property,
		vertex_desc,
		num_triangles,
		num_vertices,
		data_size,
		full_precision,
		vertices,
		triangles,
		particles,
		kind: BsTriShapeKind::Plain,
	})
}

fn read_mesh_lod_tri_shape(r: &mut NifReader<'_>) -> Result<BlockData> {
	let mut shape = read_bs_tri_shape(r)?;
	shape.kind = BsTriShapeKind::MeshLod {
		lod_sizes: [r.read_u32()?, r.read_u32()?, r.read_u32()?],
	};
	Ok(BlockData::BsTriShape(shape))
}

fn read_dynamic_tri_shape(r: &mut NifReader<'_>) -> Result<BlockData> {
	let mut shape = read_bs_tri_shape(r)?;
	let size = r.read_u32()? as usize;
	shape.kind = BsTriShapeKind::Dynamic {
		vertices: r.read_records(size / 16)?,
	};
	Ok(BlockData::BsTriShape(shape))
}

/// Dismemberment partition entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyPart {
	/// Partition flags.
	pub part_flag: u16,
	/// Body part id.
	pub body_part: u16,
}

/// Skin binding of a geometry object to a skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct NiSkinInstance {
	/// Bind data.
	pub data: Ref<NiSkinData>,
	/// Skin partition (10.1.0.101 onward).
	pub skin_partition: Ref<AnyBlock>,
	/// Skeleton root.
	pub skeleton_root: Ptr<NiNode>,
	/// Bones.
	pub bones: Vec<Ptr<NiNode>>,
	/// Dismemberment partitions (`BSDismemberSkinInstance` only).
	pub partitions: Option<Vec<BodyPart>>,
}

fn read_skin_instance(r: &mut NifReader<'_>, dismember: bool) -> Result<BlockData> {
	let data = r.read_ref()?;
	let skin_partition = if r.version().at_least(v::V10_1_0_101) { r.read_ref()? } else { Ref::null() };
	let skeleton_root = r.read_ptr()?;
	let bones = r.read_ptr_list()?;
	let partitions = if dismember {
		let count = r.read_count(4)?;
		Some(r.read_vec(count, |r| {
			Ok(BodyPart {
				part_flag: r.read_u16()?,
				body_part: r.read_u16()?,
			})
		})?)
	} else {
		None
	};
	Ok(BlockData::SkinInstance(NiSkinInstance {
		data,
		skin_partition,
		skeleton_root,
		bones,
		partitions,
	}))
}

/// Vertex influence of one bone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoneVertData {
	/// Vertex index.
	pub index: u16,
	/// Weight.
	pub weight: f32,
}

impl Record for BoneVertData {
	const LAYOUT: &'static str = "Hf";

	fn from_scalars(values: &[Scalar]) -> Self {
		Self {
			index: values.first().map_or(0, |value| value.as_u16()),
			weight: values.get(1).map_or(0.0, |value| value.as_f32()),
		}
	}
}

/// Bind pose and weights of one bone.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneData {
	/// Bone-space transform.
	pub transform: NiTransform,
	/// Bounding sphere in bone space.
	pub bound: NiBound,
	/// Vertex weights.
	pub vertex_weights: Vec<BoneVertData>,
}

/// Skinning bind data.
#[derive(Debug, Clone, PartialEq)]
pub struct NiSkinData {
	/// Overall skin transform.
	pub skin_transform: NiTransform,
	/// Skin partition (4.0.0.2 to 10.1.0.0).
	pub skin_partition: Ref<AnyBlock>,
	/// Whether per-bone weights were stored.
	pub has_vertex_weights: bool,
	/// Bones.
	pub bones: Vec<BoneData>,
}

fn read_skin_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let ver = *r.version();
	let skin_transform = r.read_record()?;
	let num_bones = r.read_count(0)?;
	let skin_partition = if ver.in_range(v::V4_0_0_2, v::V10_1_0_0) { r.read_ref()? } else { Ref::null() };
	let has_vertex_weights = if ver.at_least(v::V4_2_1_0) { r.read_u8()? != 0 } else { true };

	let bones = r.read_vec(num_bones, |r| {
		let transform = r.read_record()?;
		let bound = r.read_record()?;
		if ver.is(v::V20_3_0_9) && ver.user_version == 0x20000 {
			r.skip(26)?;
		}
		let count = usize::from(r.read_u16()?);
		let vertex_weights = if has_vertex_weights || ver.at_most(v::V4_2_0_2) {
			r.read_records(count)?
		} else {
			Vec::new()
		};
		Ok(BoneData {
			transform,
			bound,
			vertex_weights,
		})
	})?;

	Ok(BlockData::SkinData(NiSkinData {
		skin_transform,
		skin_partition,
		has_vertex_weights,
		bones,
	}))
}

concrete_block_type! {
	NiGeometry => Geometry,
	NiTriShapeData => TriShapeData,
	NiTriStripsData => TriStripsData,
	BsTriShape => BsTriShape,
	NiSkinInstance => SkinInstance,
	NiSkinData => SkinData,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	registry.register("NiTriShape", |r| Ok(BlockData::Geometry(read_geometry(r, false)?)));
	registry.register("NiTriStrips", |r| {
		let mut geometry = read_geometry(r, false)?;
		geometry.kind = GeometryKind::TriStrips;
		Ok(BlockData::Geometry(geometry))
	});
	registry.register("BSLODTriShape", |r| Ok(BlockData::Geometry(read_geometry(r, true)?)));
	registry.register("NiTriShapeData", read_tri_shape_data);
	registry.register("NiTriStripsData", read_tri_strips_data);
	registry.register("BSTriShape", |r| Ok(BlockData::BsTriShape(read_bs_tri_shape(r)?)));
	registry.register("BSMeshLODTriShape", read_mesh_lod_tri_shape);
	registry.register("BSDynamicTriShape", read_dynamic_tri_shape);
	registry.register("NiSkinInstance", |r| read_skin_instance(r, false));
	registry.register("BSDismemberSkinInstance", |r| read_skin_instance(r, true));
	registry.register("NiSkinData", read_skin_data);
}
