//! Compound values shared by several block decoders.

use crate::nif::layout::{Record, Scalar};
use crate::nif::reader::NifReader;
use crate::nif::refs::Ref;
use crate::nif::version::v;
use crate::nif::{NifError, Result};

fn floats<const N: usize>(values: &[Scalar]) -> [f32; N] {
	let mut out = [0.0; N];
	for (slot, value) in out.iter_mut().zip(values) {
		*slot = value.as_f32();
	}
	out
}

/// Three-component float vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
	/// X.
	pub x: f32,
	/// Y.
	pub y: f32,
	/// Z.
	pub z: f32,
}

impl Vector3 {
	/// Build from components.
	pub const fn new(x: f32, y: f32, z: f32) -> Self {
		Self { x, y, z }
	}
}

impl Record for Vector3 {
	const LAYOUT: &'static str = "3f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [x, y, z] = floats(values);
		Self { x, y, z }
	}
}

/// Four-component float vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector4 {
	/// X.
	pub x: f32,
	/// Y.
	pub y: f32,
	/// Z.
	pub z: f32,
	/// W.
	pub w: f32,
}

impl Record for Vector4 {
	const LAYOUT: &'static str = "4f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [x, y, z, w] = floats(values);
		Self { x, y, z, w }
	}
}

/// Rotation quaternion, stored `w` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
	/// W.
	pub w: f32,
	/// X.
	pub x: f32,
	/// Y.
	pub y: f32,
	/// Z.
	pub z: f32,
}

impl Default for Quaternion {
	fn default() -> Self {
		Self {
			w: 1.0,
			x: 0.0,
			y: 0.0,
			z: 0.0,
		}
	}
}

impl Record for Quaternion {
	const LAYOUT: &'static str = "4f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [w, x, y, z] = floats(values);
		Self { w, x, y, z }
	}
}

/// Havok quaternion, stored `x` first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HkQuaternion(pub Quaternion);

impl Record for HkQuaternion {
	const LAYOUT: &'static str = "4f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [x, y, z, w] = floats(values);
		Self(Quaternion { w, x, y, z })
	}
}

/// Row-major 3x3 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix33(pub [[f32; 3]; 3]);

impl Default for Matrix33 {
	fn default() -> Self {
		Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
	}
}

impl Record for Matrix33 {
	const LAYOUT: &'static str = "9f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let m: [f32; 9] = floats(values);
		Self([[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]])
	}
}

/// Row-major 2x2 matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Matrix22(pub [[f32; 2]; 2]);

impl Record for Matrix22 {
	const LAYOUT: &'static str = "4f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [a, b, c, d] = floats(values);
		Self([[a, b], [c, d]])
	}
}

/// Linear RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color3 {
	/// Red.
	pub r: f32,
	/// Green.
	pub g: f32,
	/// Blue.
	pub b: f32,
}

impl Record for Color3 {
	const LAYOUT: &'static str = "3f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [r, g, b] = floats(values);
		Self { r, g, b }
	}
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color4 {
	/// Red.
	pub r: f32,
	/// Green.
	pub g: f32,
	/// Blue.
	pub b: f32,
	/// Alpha.
	pub a: f32,
}

impl Record for Color4 {
	const LAYOUT: &'static str = "4f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [r, g, b, a] = floats(values);
		Self { r, g, b, a }
	}
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteColor4 {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha.
	pub a: u8,
}

impl Record for ByteColor4 {
	const LAYOUT: &'static str = "4B";

	fn from_scalars(values: &[Scalar]) -> Self {
		let byte = |idx: usize| values.get(idx).map_or(0, |value| value.as_u8());
		Self {
			r: byte(0),
			g: byte(1),
			b: byte(2),
			a: byte(3),
		}
	}
}

/// Texture coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TexCoord {
	/// U.
	pub u: f32,
	/// V.
	pub v: f32,
}

impl Record for TexCoord {
	const LAYOUT: &'static str = "2f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [u, v] = floats(values);
		Self { u, v }
	}
}

/// Texture coordinate stored as two half floats.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HalfTexCoord(pub TexCoord);

impl Record for HalfTexCoord {
	const LAYOUT: &'static str = "2e";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [u, v] = floats(values);
		Self(TexCoord { u, v })
	}
}

/// Triangle as three vertex indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triangle {
	/// First vertex.
	pub v1: u16,
	/// Second vertex.
	pub v2: u16,
	/// Third vertex.
	pub v3: u16,
}

impl Record for Triangle {
	const LAYOUT: &'static str = "3H";

	fn from_scalars(values: &[Scalar]) -> Self {
		let index = |idx: usize| values.get(idx).map_or(0, |value| value.as_u16());
		Self {
			v1: index(0),
			v2: index(1),
			v3: index(2),
		}
	}
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NiBound {
	/// Center.
	pub center: Vector3,
	/// Radius.
	pub radius: f32,
}

impl Record for NiBound {
	const LAYOUT: &'static str = "4f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [x, y, z, radius] = floats(values);
		Self {
			center: Vector3 { x, y, z },
			radius,
		}
	}
}

/// Rotation, translation, and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NiTransform {
	/// Rotation.
	pub rotation: Matrix33,
	/// Translation.
	pub translation: Vector3,
	/// Uniform scale.
	pub scale: f32,
}

impl Default for NiTransform {
	fn default() -> Self {
		Self {
			rotation: Matrix33::default(),
			translation: Vector3::default(),
			scale: 1.0,
		}
	}
}

impl Record for NiTransform {
	const LAYOUT: &'static str = "13f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let f: [f32; 13] = floats(values);
		Self {
			rotation: Matrix33([[f[0], f[1], f[2]], [f[3], f[4], f[5]], [f[6], f[7], f[8]]]),
			translation: Vector3::new(f[9], f[10], f[11]),
			scale: f[12],
		}
	}
}

/// Translation, quaternion rotation, and scale used by interpolators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatTransform {
	/// Translation.
	pub translation: Vector3,
	/// Rotation.
	pub rotation: Quaternion,
	/// Uniform scale.
	pub scale: f32,
}

impl Record for QuatTransform {
	const LAYOUT: &'static str = "8f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let f: [f32; 8] = floats(values);
		Self {
			translation: Vector3::new(f[0], f[1], f[2]),
			rotation: Quaternion {
				w: f[3],
				x: f[4],
				y: f[5],
				z: f[6],
			},
			scale: f[7],
		}
	}
}

impl QuatTransform {
	/// Read the transform; streams up to 10.1.0.109 append three validity booleans.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let transform = r.read_record::<Self>()?;
		if r.version().at_most(v::V10_1_0_109) {
			r.skip(3)?;
		}
		Ok(transform)
	}
}

/// Tagged bounding volume union.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundingVolume {
	/// Type `0xFFFFFFFF`: no volume.
	Base,
	/// Type 0.
	Sphere(NiBound),
	/// Type 1.
	Box {
		/// Center.
		center: Vector3,
		/// Box axes.
		axes: [Vector3; 3],
		/// Half extents along each axis.
		extents: [f32; 3],
	},
	/// Type 2.
	Capsule {
		/// Center.
		center: Vector3,
		/// Segment origin.
		origin: Vector3,
		/// Segment extent.
		extent: f32,
		/// Radius.
		radius: f32,
	},
	/// Type 4.
	Union(Vec<BoundingVolume>),
	/// Type 5.
	HalfSpace {
		/// Plane normal.
		normal: Vector3,
		/// Plane constant.
		constant: f32,
		/// Center.
		center: Vector3,
	},
}

impl BoundingVolume {
	/// Read a tagged volume.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let at = r.pos();
		let kind = r.read_u32()?;
		Ok(match kind {
			u32::MAX => Self::Base,
			0 => Self::Sphere(r.read_record()?),
			1 => {
				let center = r.read_record()?;
				let axes = [r.read_record()?, r.read_record()?, r.read_record()?];
				let extents = [r.read_f32()?, r.read_f32()?, r.read_f32()?];
				Self::Box { center, axes, extents }
			}
			2 => Self::Capsule {
				center: r.read_record()?,
				origin: r.read_record()?,
				extent: r.read_f32()?,
				radius: r.read_f32()?,
			},
			4 => {
				let count = r.read_count(4)?;
				Self::Union(r.read_vec(count, Self::read)?)
			}
			5 => Self::HalfSpace {
				normal: r.read_record()?,
				constant: r.read_f32()?,
				center: r.read_record()?,
			},
			other => {
				return Err(NifError::InvalidValue {
					what: "bounding volume type",
					value: i64::from(other),
					at,
				});
			}
		})
	}
}

/// Optional texture transform carried by a texture slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TexTransform {
	/// UV translation.
	pub translation: TexCoord,
	/// UV scale.
	pub scale: TexCoord,
	/// Rotation in radians.
	pub rotation: f32,
	/// Transform method.
	pub method: u32,
	/// Rotation center.
	pub center: TexCoord,
}

/// One texture slot of a texturing property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TexDesc {
	/// Source texture block.
	pub source: Ref<crate::nif::NiSourceTexture>,
	/// Clamp mode (before 20.1.0.3).
	pub clamp_mode: u32,
	/// Filter mode (before 20.1.0.3).
	pub filter_mode: u32,
	/// Packed clamp/filter/uv-set flags (20.1.0.3 onward).
	pub flags: u16,
	/// Maximum anisotropy (20.5.0.4 onward).
	pub max_anisotropy: u16,
	/// UV set index.
	pub uv_set: u32,
	/// Texture transform, when present.
	pub transform: Option<TexTransform>,
}

impl TexDesc {
	/// Read one slot.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let mut desc = Self {
			source: r.read_ref()?,
			..Self::default()
		};
		let ver = *r.version();

		if ver.at_most(v::V20_0_0_5) {
			desc.clamp_mode = r.read_u32()?;
			desc.filter_mode = r.read_u32()?;
		}
		if ver.at_least(v::V20_1_0_3) {
			desc.flags = r.read_u16()?;
		}
		if ver.at_least(v::V20_5_0_4) {
			desc.max_anisotropy = r.read_u16()?;
		}
		if ver.at_most(v::V20_0_0_5) {
			desc.uv_set = r.read_u32()?;
		}
		if ver.at_most(v::V10_4_0_1) {
			// PS2 L and K.
			r.skip(4)?;
		}
		if ver.at_most(v::V4_1_0_12) {
			r.skip(2)?;
		}
		if ver.at_least(v::V10_1_0_0) && r.read_bool()? {
			desc.transform = Some(TexTransform {
				translation: r.read_record()?,
				scale: r.read_record()?,
				rotation: r.read_f32()?,
				method: r.read_u32()?,
				center: r.read_record()?,
			});
		}
		Ok(desc)
	}
}

/// Interpolation mode of a key group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
	/// 1.
	Linear,
	/// 2: keys carry forward and backward tangents.
	Quadratic,
	/// 3: keys carry tension, bias, continuity.
	Tbc,
	/// 4: rotations stored as three euler float groups.
	XyzRotation,
	/// 5.
	Const,
	/// Value outside the known set.
	Other(u32),
}

impl KeyType {
	/// Map the stored value.
	pub fn from_raw(raw: u32) -> Self {
		match raw {
			1 => Self::Linear,
			2 => Self::Quadratic,
			3 => Self::Tbc,
			4 => Self::XyzRotation,
			5 => Self::Const,
			other => Self::Other(other),
		}
	}
}

/// Tension, bias, continuity triple.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tbc {
	/// Tension.
	pub t: f32,
	/// Bias.
	pub b: f32,
	/// Continuity.
	pub c: f32,
}

impl Record for Tbc {
	const LAYOUT: &'static str = "3f";

	fn from_scalars(values: &[Scalar]) -> Self {
		let [t, b, c] = floats(values);
		Self { t, b, c }
	}
}

/// One animation key.
#[derive(Debug, Clone, PartialEq)]
pub struct Key<T> {
	/// Key time.
	pub time: f32,
	/// Key value.
	pub value: T,
	/// Forward tangent (quadratic keys).
	pub forward: Option<T>,
	/// Backward tangent (quadratic keys).
	pub backward: Option<T>,
	/// TBC parameters (TBC keys).
	pub tbc: Option<Tbc>,
}

/// Keys sharing one interpolation mode.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyGroup<T> {
	/// Interpolation mode; `None` when the group is empty.
	pub interpolation: Option<KeyType>,
	/// Keys in stored order.
	pub keys: Vec<Key<T>>,
}

impl<T> Default for KeyGroup<T> {
	fn default() -> Self {
		Self {
			interpolation: None,
			keys: Vec::new(),
		}
	}
}

impl<T> KeyGroup<T> {
	/// Read a counted key group, reading each value with `value`.
	pub fn read(r: &mut NifReader<'_>, mut value: impl FnMut(&mut NifReader<'_>) -> Result<T>) -> Result<Self> {
		let count = r.read_count(8)?;
		if count == 0 {
			return Ok(Self::default());
		}

		let interpolation = KeyType::from_raw(r.read_u32()?);
		let keys = read_keys(r, count, interpolation, &mut value)?;
		Ok(Self {
			interpolation: Some(interpolation),
			keys,
		})
	}
}

pub(crate) fn read_keys<T>(
	r: &mut NifReader<'_>,
	count: usize,
	interpolation: KeyType,
	value: &mut impl FnMut(&mut NifReader<'_>) -> Result<T>,
) -> Result<Vec<Key<T>>> {
	r.read_vec(count, |r| {
		let time = r.read_f32()?;
		let key_value = value(r)?;
		let (forward, backward) = if interpolation == KeyType::Quadratic {
			(Some(value(r)?), Some(value(r)?))
		} else {
			(None, None)
		};
		let tbc = if interpolation == KeyType::Tbc { Some(r.read_record()?) } else { None };
		Ok(Key {
			time,
			value: key_value,
			forward,
			backward,
			tbc,
		})
	})
}

/// One rotation key.
#[derive(Debug, Clone, PartialEq)]
pub struct QuatKey {
	/// Key time.
	pub time: f32,
	/// Rotation.
	pub value: Quaternion,
	/// TBC parameters (TBC keys).
	pub tbc: Option<Tbc>,
}

/// Rotation track: quaternion keys, or three euler float groups for type 4.
#[derive(Debug, Clone, PartialEq)]
pub enum RotationKeys {
	/// No rotation keys.
	None,
	/// Quaternion keys.
	Quaternion {
		/// Interpolation mode.
		interpolation: KeyType,
		/// Keys.
		keys: Vec<QuatKey>,
	},
	/// Euler X, Y, Z float groups.
	Xyz([KeyGroup<f32>; 3]),
}

impl RotationKeys {
	/// Read a rotation track.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let count = r.read_count(0)?;
		if count == 0 {
			return Ok(Self::None);
		}

		let interpolation = KeyType::from_raw(r.read_u32()?);
		if interpolation == KeyType::XyzRotation {
			if r.version().at_most(v::V10_1_0_0) {
				// Euler order.
				r.skip(4)?;
			}
			return Ok(Self::Xyz([float_group(r)?, float_group(r)?, float_group(r)?]));
		}

		let count = r.check_count(count as u64, 20)?;
		let keys = r.read_vec(count, |r| {
			let time = r.read_f32()?;
			let value = r.read_record()?;
			let tbc = if interpolation == KeyType::Tbc { Some(r.read_record()?) } else { None };
			Ok(QuatKey { time, value, tbc })
		})?;
		Ok(Self::Quaternion { interpolation, keys })
	}
}

fn float_group(r: &mut NifReader<'_>) -> Result<KeyGroup<f32>> {
	KeyGroup::read(r, |r| r.read_f32())
}

/// Translation, rotation, and scale key tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformKeys {
	/// Rotation track.
	pub rotations: RotationKeys,
	/// Translation keys.
	pub translations: KeyGroup<Vector3>,
	/// Scale keys.
	pub scales: KeyGroup<f32>,
}

impl TransformKeys {
	/// Read the three tracks in stored order.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		Ok(Self {
			rotations: RotationKeys::read(r)?,
			translations: KeyGroup::read(r, |r| r.read_record())?,
			scales: KeyGroup::read(r, |r| r.read_f32())?,
		})
	}
}

/// Read a counted list of `u16` vertex indices.
pub(crate) fn read_u16_list(r: &mut NifReader<'_>) -> Result<Vec<u16>> {
	let count = r.read_count_u16(2)?;
	r.read_u16_vec(count)
}

#[cfg(test)]
mod tests {
	use super::{BoundingVolume, KeyGroup, KeyType, RotationKeys, Vector3};
	use crate::nif::NifError;
	use crate::nif::reader::NifReader;
	use crate::nif::version::{VersionContext, v};

	fn floats(values: &[f32]) -> Vec<u8> {
		values.iter().flat_map(|value| value.to_le_bytes()).collect()
	}

	#[test]
	fn quadratic_keys_carry_tangents() {
		let mut bytes = 1_u32.to_le_bytes().to_vec();
		bytes.extend_from_slice(&2_u32.to_le_bytes());
		bytes.extend_from_slice(&floats(&[0.5, 1.0, 2.0, 3.0]));

		let mut r = NifReader::new(&bytes, VersionContext::new(v::V20_2_0_7));
		let group = KeyGroup::read(&mut r, |r| r.read_f32()).expect("group");
		assert_eq!(group.interpolation, Some(KeyType::Quadratic));
		assert_eq!(group.keys[0].time, 0.5);
		assert_eq!(group.keys[0].forward, Some(2.0));
		assert_eq!(group.keys[0].backward, Some(3.0));
		assert_eq!(r.remaining(), 0);
	}

	#[test]
	fn empty_key_group_has_no_interpolation_field() {
		let bytes = 0_u32.to_le_bytes();
		let mut r = NifReader::new(&bytes, VersionContext::new(v::V20_2_0_7));
		let group: KeyGroup<Vector3> = KeyGroup::read(&mut r, |r| r.read_record()).expect("group");
		assert!(group.keys.is_empty());
		assert_eq!(r.remaining(), 0);
	}

	#[test]
	fn xyz_rotation_switches_to_float_groups() {
		let mut bytes = 1_u32.to_le_bytes().to_vec();
		bytes.extend_from_slice(&4_u32.to_le_bytes());
		for _ in 0..3 {
			bytes.extend_from_slice(&1_u32.to_le_bytes());
			bytes.extend_from_slice(&1_u32.to_le_bytes());
			bytes.extend_from_slice(&floats(&[0.0, 0.25]));
		}

		let mut r = NifReader::new(&bytes, VersionContext::new(v::V20_2_0_7));
		let RotationKeys::Xyz(groups) = RotationKeys::read(&mut r).expect("rotation") else {
			panic!("expected euler groups");
		};
		assert!(groups.iter().all(|group| group.keys.len() == 1 && group.keys[0].value == 0.25));
		assert_eq!(r.remaining(), 0);
	}

	#[test]
	fn bounding_volume_union_nests() {
		let mut bytes = 4_u32.to_le_bytes().to_vec();
		bytes.extend_from_slice(&1_u32.to_le_bytes());
		bytes.extend_from_slice(&0_u32.to_le_bytes());
		bytes.extend_from_slice(&floats(&[1.0, 2.0, 3.0, 4.0]));

		let mut r = NifReader::new(&bytes, VersionContext::new(v::V4_0_0_2));
		let BoundingVolume::Union(parts) = BoundingVolume::read(&mut r).expect("volume") else {
			panic!("expected union");
		};
		assert!(matches!(parts.as_slice(), [BoundingVolume::Sphere(bound)] if bound.radius == 4.0));
	}

	#[test]
	fn unknown_bounding_volume_tag_is_rejected() {
		let bytes = 3_u32.to_le_bytes();
		let mut r = NifReader::new(&bytes, VersionContext::new(v::V4_0_0_2));
		let err = BoundingVolume::read(&mut r).expect_err("tag 3 is undefined");
		assert!(matches!(err, NifError::InvalidValue { value: 3, at: 0, .. }));
	}
}
