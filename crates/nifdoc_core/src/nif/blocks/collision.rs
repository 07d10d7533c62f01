//! Collision objects, Havok rigid bodies, and Havok shapes.

use crate::nif::blocks::common::{BoundingVolume, HkQuaternion, Quaternion, Triangle, Vector3, Vector4};
use crate::nif::blocks::geometry::NiTriStripsData;
use crate::nif::layout::{Record, Scalar};
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ptr, Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{AnyBlock, AvObject, BlockData, HavokShape, Result};

/// Collision-object layer: the scene object it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionObject {
	/// Owning scene object.
	pub target: Ptr<AvObject>,
}

impl CollisionObject {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		Ok(Self { target: r.read_ptr()? })
	}
}

/// `NiCollisionData`: bounding-volume collision.
#[derive(Debug, Clone, PartialEq)]
pub struct NiCollisionData {
	/// Collision-object layer.
	pub base: CollisionObject,
	/// Propagation mode.
	pub propagation_mode: u32,
	/// Collision mode (10.1.0.0 onward).
	pub collision_mode: u32,
	/// Alternate bounding volume.
	pub bounding_volume: Option<BoundingVolume>,
}

fn read_collision_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let base = CollisionObject::read(r)?;
	let propagation_mode = r.read_u32()?;
	let collision_mode = if r.version().at_least(v::V10_1_0_0) { r.read_u32()? } else { 0 };
	let bounding_volume = if r.read_u8()? != 0 { Some(BoundingVolume::read(r)?) } else { None };
	Ok(BlockData::CollisionData(NiCollisionData {
		base,
		propagation_mode,
		collision_mode,
		bounding_volume,
	}))
}

/// Havok collision object linking a scene object to a rigid body.
#[derive(Debug, Clone, PartialEq)]
pub struct BhkCollisionObject {
	/// Collision-object layer.
	pub base: CollisionObject,
	/// Flags.
	pub flags: u16,
	/// Rigid body.
	pub body: Ref<AnyBlock>,
	/// Heir and velocity gains (`bhkBlendCollisionObject`).
	pub blend_gains: Option<(f32, f32)>,
}

fn read_bhk_collision_object(r: &mut NifReader<'_>, blend: bool) -> Result<BlockData> {
	let base = CollisionObject::read(r)?;
	let flags = r.read_u16()?;
	let body = r.read_ref()?;
	let blend_gains = if blend {
		let gains = (r.read_f32()?, r.read_f32()?);
		if r.version().user_version_2 < 9 {
			r.skip(8)?;
		}
		Some(gains)
	} else {
		None
	};
	Ok(BlockData::BhkCollisionObject(BhkCollisionObject {
		base,
		flags,
		body,
		blend_gains,
	}))
}

/// Collision layer, flags, and group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HavokFilter {
	/// Collision layer.
	pub layer: u8,
	/// Flags and part number.
	pub flags: u8,
	/// Group.
	pub group: u16,
}

impl Record for HavokFilter {
	const LAYOUT: &'static str = "2BH";

	fn from_scalars(values: &[Scalar]) -> Self {
		Self {
			layer: values.first().map_or(0, |value| value.as_u8()),
			flags: values.get(1).map_or(0, |value| value.as_u8()),
			group: values.get(2).map_or(0, |value| value.as_u16()),
		}
	}
}

/// Rigid-body construction info.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RigidBodyInfo {
	/// Collision response.
	pub collision_response: u8,
	/// Contact callback delay.
	pub process_contact_callback_delay: u16,
	/// Translation.
	pub translation: Vector4,
	/// Rotation.
	pub rotation: Quaternion,
	/// Linear velocity.
	pub linear_velocity: Vector4,
	/// Angular velocity.
	pub angular_velocity: Vector4,
	/// Inertia tensor rows.
	pub inertia_tensor: [f32; 12],
	/// Center of mass.
	pub center: Vector4,
	/// Mass.
	pub mass: f32,
	/// Linear damping.
	pub linear_damping: f32,
	/// Angular damping.
	pub angular_damping: f32,
	/// Time factor (Skyrim layout).
	pub time_factor: f32,
	/// Gravity factor (Skyrim layout).
	pub gravity_factor: f32,
	/// Friction.
	pub friction: f32,
	/// Rolling friction multiplier (Skyrim layout).
	pub rolling_friction_multiplier: f32,
	/// Restitution.
	pub restitution: f32,
	/// Maximum linear velocity.
	pub max_linear_velocity: f32,
	/// Maximum angular velocity.
	pub max_angular_velocity: f32,
	/// Penetration depth.
	pub penetration_depth: f32,
	/// Motion system.
	pub motion_system: u8,
	/// Deactivator type.
	pub deactivator_type: u8,
	/// Solver deactivation.
	pub solver_deactivation: u8,
	/// Quality type.
	pub quality_type: u8,
}

fn read_rigid_body_info(r: &mut NifReader<'_>, skyrim: bool) -> Result<RigidBodyInfo> {
	let mut info = RigidBodyInfo::default();
	// Unused, filter copy, unused.
	r.skip(12)?;
	if skyrim {
		r.skip(4)?;
	}
	info.collision_response = r.read_u8()?;
	r.skip(1)?;
	info.process_contact_callback_delay = r.read_u16()?;
	if !skyrim {
		r.skip(4)?;
	}

	info.translation = r.read_record()?;
	info.rotation = r.read_record::<HkQuaternion>()?.0;
	info.linear_velocity = r.read_record()?;
	info.angular_velocity = r.read_record()?;
	for value in &mut info.inertia_tensor {
		*value = r.read_f32()?;
	}
	info.center = r.read_record()?;
	info.mass = r.read_f32()?;
	info.linear_damping = r.read_f32()?;
	info.angular_damping = r.read_f32()?;
	if skyrim {
		info.time_factor = r.read_f32()?;
		info.gravity_factor = r.read_f32()?;
	}
	info.friction = r.read_f32()?;
	if skyrim {
		info.rolling_friction_multiplier = r.read_f32()?;
	}
	info.restitution = r.read_f32()?;
	info.max_linear_velocity = r.read_f32()?;
	info.max_angular_velocity = r.read_f32()?;
	info.penetration_depth = r.read_f32()?;
	info.motion_system = r.read_u8()?;
	info.deactivator_type = r.read_u8()?;
	info.solver_deactivation = r.read_u8()?;
	info.quality_type = r.read_u8()?;
	if skyrim {
		// Auto remove level, response modifier flags, shape keys, force-collide flag.
		r.skip(4)?;
	}
	r.skip(12)?;
	Ok(info)
}

/// `bhkRigidBody` and `bhkRigidBodyT`.
#[derive(Debug, Clone, PartialEq)]
pub struct BhkRigidBody {
	/// Collision shape.
	pub shape: Ref<HavokShape>,
	/// Collision filter.
	pub filter: HavokFilter,
	/// Broad-phase type.
	pub broad_phase_type: u8,
	/// Construction info.
	pub info: RigidBodyInfo,
	/// Constraints.
	pub constraints: Vec<Ref<AnyBlock>>,
	/// Body flags (16-bit from Bethesda stream 76).
	pub body_flags: u32,
}

fn read_rigid_body(r: &mut NifReader<'_>) -> Result<BlockData> {
	let ver = *r.version();
	let shape = r.read_ref()?;
	if ver.at_most(v::V10_0_1_2) {
		r.skip(4)?;
	}
	let filter = r.read_record()?;
	r.skip(4)?;
	let broad_phase_type = r.read_u8()?;
	// Unused, then the world-object property.
	r.skip(15)?;

	let info = read_rigid_body_info(r, ver.is_skyrim_or_later())?;
	let constraints = r.read_ref_list()?;
	let body_flags = if ver.user_version_2 < 76 { r.read_u32()? } else { u32::from(r.read_u16()?) };
	Ok(BlockData::RigidBody(BhkRigidBody {
		shape,
		filter,
		broad_phase_type,
		info,
		constraints,
		body_flags,
	}))
}

/// Sub-shape record of packed Oblivion-era strips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubShape {
	/// Collision filter.
	pub filter: HavokFilter,
	/// Vertex count.
	pub num_vertices: u32,
	/// Havok material.
	pub material: u32,
}

fn read_sub_shape(r: &mut NifReader<'_>) -> Result<SubShape> {
	Ok(SubShape {
		filter: r.read_record()?,
		num_vertices: r.read_u32()?,
		material: r.read_u32()?,
	})
}

/// Havok collision shape, one variant per shape family.
#[derive(Debug, Clone, PartialEq)]
pub enum BhkShape {
	/// `bhkSphereShape`.
	Sphere {
		/// Havok material.
		material: u32,
		/// Radius.
		radius: f32,
	},
	/// `bhkBoxShape`.
	Box {
		/// Havok material.
		material: u32,
		/// Convex radius.
		radius: f32,
		/// Half extents.
		dimensions: Vector3,
	},
	/// `bhkCapsuleShape`.
	Capsule {
		/// Havok material.
		material: u32,
		/// Convex radius.
		radius: f32,
		/// Segment endpoints and their radii.
		points: [(Vector3, f32); 2],
	},
	/// `bhkConvexVerticesShape`.
	ConvexVertices {
		/// Havok material.
		material: u32,
		/// Convex radius.
		radius: f32,
		/// Hull vertices.
		vertices: Vec<Vector4>,
		/// Hull plane equations.
		normals: Vec<Vector4>,
	},
	/// `bhkTransformShape` and `bhkConvexTransformShape`.
	Transform {
		/// Wrapped shape.
		shape: Ref<HavokShape>,
		/// Havok material.
		material: u32,
		/// Convex radius.
		radius: f32,
		/// Column-major 4x4 transform.
		transform: [f32; 16],
	},
	/// `bhkListShape`.
	List {
		/// Child shapes.
		sub_shapes: Vec<Ref<HavokShape>>,
		/// Havok material.
		material: u32,
		/// Trailing integers.
		unknown_ints: Vec<u32>,
	},
	/// `bhkMoppBvTreeShape`.
	Mopp {
		/// Wrapped shape.
		shape: Ref<HavokShape>,
		/// Shape scale.
		shape_scale: f32,
		/// MOPP origin (10.1.0.0 onward).
		origin: Vector3,
		/// MOPP scale (10.1.0.0 onward).
		scale: f32,
		/// Build type (Bethesda stream 35 onward).
		build_type: u8,
		/// MOPP byte code.
		code: Vec<u8>,
	},
	/// `bhkNiTriStripsShape`.
	NiTriStrips {
		/// Havok material.
		material: u32,
		/// Convex radius.
		radius: f32,
		/// Grow-by step.
		grow_by: u32,
		/// Scale (10.1.0.0 onward).
		scale: Vector4,
		/// Strip data blocks.
		strips: Vec<Ref<NiTriStripsData>>,
		/// Filter per strip.
		data_layers: Vec<HavokFilter>,
	},
	/// `bhkPackedNiTriStripsShape`.
	PackedNiTriStrips {
		/// Sub-shapes (up to 20.0.0.5).
		sub_shapes: Vec<SubShape>,
		/// User data.
		user_data: u32,
		/// Convex radius.
		radius: f32,
		/// Scale.
		scale: Vector4,
		/// Packed strip data.
		data: Ref<HkPackedNiTriStripsData>,
	},
}

fn read_material(r: &mut NifReader<'_>) -> Result<u32> {
	if r.version().at_most(v::V10_0_1_2) {
		r.skip(4)?;
	}
	r.read_u32()
}

fn sphere(r: &mut NifReader<'_>) -> Result<BhkShape> {
	Ok(BhkShape::Sphere {
		material: read_material(r)?,
		radius: r.read_f32()?,
	})
}

fn box_shape(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let material = read_material(r)?;
	let radius = r.read_f32()?;
	r.skip(8)?;
	let dimensions = r.read_record()?;
	r.skip(4)?;
	Ok(BhkShape::Box {
		material,
		radius,
		dimensions,
	})
}

fn capsule(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let material = read_material(r)?;
	let radius = r.read_f32()?;
	r.skip(8)?;
	let first = (r.read_record()?, r.read_f32()?);
	let second = (r.read_record()?, r.read_f32()?);
	Ok(BhkShape::Capsule {
		material,
		radius,
		points: [first, second],
	})
}

fn convex_vertices(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let material = read_material(r)?;
	let radius = r.read_f32()?;
	// Vertex and normal world-object properties.
	r.skip(24)?;
	let count = r.read_count(16)?;
	let vertices = r.read_records(count)?;
	let count = r.read_count(16)?;
	let normals = r.read_records(count)?;
	Ok(BhkShape::ConvexVertices {
		material,
		radius,
		vertices,
		normals,
	})
}

fn transform_shape(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let shape = r.read_ref()?;
	let material = read_material(r)?;
	let radius = r.read_f32()?;
	r.skip(8)?;
	let mut transform = [0.0; 16];
	for value in &mut transform {
		*value = r.read_f32()?;
	}
	Ok(BhkShape::Transform {
		shape,
		material,
		radius,
		transform,
	})
}

fn list_shape(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let sub_shapes = r.read_ref_list()?;
	let material = read_material(r)?;
	// Child shape and child filter properties.
	r.skip(24)?;
	let count = r.read_count(4)?;
	let unknown_ints = r.read_u32_vec(count)?;
	Ok(BhkShape::List {
		sub_shapes,
		material,
		unknown_ints,
	})
}

fn mopp(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let ver = *r.version();
	let shape = r.read_ref()?;
	r.skip(12)?;
	let shape_scale = r.read_f32()?;
	let size = r.read_count(1)?;
	let (origin, scale) = if ver.at_least(v::V10_1_0_0) {
		(r.read_record()?, r.read_f32()?)
	} else {
		(Vector3::default(), 1.0)
	};
	let build_type = if ver.user_version_2 > 34 { r.read_u8()? } else { 0 };
	let code = r.read_byte_vec(size)?;
	Ok(BhkShape::Mopp {
		shape,
		shape_scale,
		origin,
		scale,
		build_type,
		code,
	})
}

fn ni_tri_strips_shape(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let material = read_material(r)?;
	let radius = r.read_f32()?;
	r.skip(20)?;
	let grow_by = r.read_u32()?;
	let scale = if r.version().at_least(v::V10_1_0_0) {
		r.read_record()?
	} else {
		Vector4 {
			x: 1.0,
			y: 1.0,
			z: 1.0,
			w: 0.0,
		}
	};
	let strips = r.read_ref_list()?;
	let count = r.read_count(4)?;
	let data_layers = r.read_records(count)?;
	Ok(BhkShape::NiTriStrips {
		material,
		radius,
		grow_by,
		scale,
		strips,
		data_layers,
	})
}

fn packed_ni_tri_strips_shape(r: &mut NifReader<'_>) -> Result<BhkShape> {
	let sub_shapes = if r.version().at_most(v::V20_0_0_5) {
		let count = r.read_count_u16(12)?;
		r.read_vec(count, read_sub_shape)?
	} else {
		Vec::new()
	};
	let user_data = r.read_u32()?;
	r.skip(4)?;
	let radius = r.read_f32()?;
	r.skip(4)?;
	let scale = r.read_record()?;
	// Radius and scale copies.
	r.skip(20)?;
	let data = r.read_ref()?;
	Ok(BhkShape::PackedNiTriStrips {
		sub_shapes,
		user_data,
		radius,
		scale,
		data,
	})
}

/// Triangle of packed collision strips.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PackedTriangle {
	/// Vertex indices.
	pub triangle: Triangle,
	/// Welding info.
	pub welding_info: u16,
	/// Face normal (up to 20.0.0.5).
	pub normal: Option<Vector3>,
}

/// `hkPackedNiTriStripsData`.
#[derive(Debug, Clone, PartialEq)]
pub struct HkPackedNiTriStripsData {
	/// Triangles.
	pub triangles: Vec<PackedTriangle>,
	/// Vertices were stored as half floats (20.2.0.7 onward).
	pub compressed: bool,
	/// Vertices.
	pub vertices: Vec<Vector3>,
	/// Sub-shapes (20.2.0.7 onward).
	pub sub_shapes: Vec<SubShape>,
}

fn read_packed_data(r: &mut NifReader<'_>) -> Result<BlockData> {
	let ver = *r.version();
	let with_normals = ver.at_most(v::V20_0_0_5);
	let count = r.read_count(if with_normals { 20 } else { 8 })?;
	let triangles = r.read_vec(count, |r| {
		Ok(PackedTriangle {
			triangle: r.read_record()?,
			welding_info: r.read_u16()?,
			normal: if with_normals { Some(r.read_record()?) } else { None },
		})
	})?;

	let num_vertices = r.read_u32()?;
	let compressed = ver.at_least(v::V20_2_0_7) && r.read_u8()? != 0;
	let vertices = if compressed {
		let count = r.check_count(u64::from(num_vertices), 6)?;
		r.read_vec(count, |r| Ok(Vector3::new(r.read_f16()?, r.read_f16()?, r.read_f16()?)))?
	} else {
		r.read_records(num_vertices as usize)?
	};
	let sub_shapes = if ver.at_least(v::V20_2_0_7) {
		let count = r.read_count_u16(12)?;
		r.read_vec(count, read_sub_shape)?
	} else {
		Vec::new()
	};

	Ok(BlockData::PackedTriStripsData(HkPackedNiTriStripsData {
		triangles,
		compressed,
		vertices,
		sub_shapes,
	}))
}

type ShapeReader = fn(&mut NifReader<'_>) -> Result<BhkShape>;

fn read_shape(r: &mut NifReader<'_>, shape: ShapeReader) -> Result<BlockData> {
	Ok(BlockData::HavokShape(shape(r)?))
}

concrete_block_type! {
	NiCollisionData => CollisionData,
	BhkCollisionObject => BhkCollisionObject,
	BhkRigidBody => RigidBody,
	BhkShape => HavokShape,
	HkPackedNiTriStripsData => PackedTriStripsData,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	registry.register("NiCollisionData", read_collision_data);
	for name in ["bhkCollisionObject", "bhkSPCollisionObject"] {
		registry.register(name, |r| read_bhk_collision_object(r, false));
	}
	registry.register("bhkBlendCollisionObject", |r| read_bhk_collision_object(r, true));
	for name in ["bhkRigidBody", "bhkRigidBodyT"] {
		registry.register(name, read_rigid_body);
	}

	registry.register("bhkSphereShape", |r| read_shape(r, sphere));
	registry.register("bhkBoxShape", |r| read_shape(r, box_shape));
	registry.register("bhkCapsuleShape", |r| read_shape(r, capsule));
	registry.register("bhkConvexVerticesShape", |r| read_shape(r, convex_vertices));
	for name in ["bhkTransformShape", "bhkConvexTransformShape"] {
		registry.register(name, |r| read_shape(r, transform_shape));
	}
	registry.register("bhkListShape", |r| read_shape(r, list_shape));
	registry.register("bhkMoppBvTreeShape", |r| read_shape(r, mopp));
	registry.register("bhkNiTriStripsShape", |r| read_shape(r, ni_tri_strips_shape));
	registry.register("bhkPackedNiTriStripsShape", |r| read_shape(r, packed_ni_tri_strips_shape));
	registry.register("hkPackedNiTriStripsData", read_packed_data);
}
