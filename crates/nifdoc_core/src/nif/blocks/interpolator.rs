//! Interpolators: the value sources that drive controllers from 10.1.0.104 onward.

use crate::nif::blocks::common::{QuatTransform, Vector3};
use crate::nif::blocks::keyframe::{NiBoolData, NiFloatData, NiKeyframeData, NiPosData};
use crate::nif::reader::NifReader;
use crate::nif::refs::{Ref, concrete_block_type};
use crate::nif::registry::TypeRegistry;
use crate::nif::version::v;
use crate::nif::{BlockData, Interpolator, Result};

/// One weighted entry of a blend interpolator.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpBlendItem {
	/// Blended interpolator.
	pub interpolator: Ref<Interpolator>,
	/// Weight.
	pub weight: f32,
	/// Normalized weight.
	pub normalized_weight: f32,
	/// Priority.
	pub priority: i32,
	/// Ease spinner.
	pub ease_spinner: f32,
}

/// Blend-interpolator layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlendInterpolator {
	/// Blend flags (10.1.0.112 onward); bit 0 marks manager control.
	pub flags: u8,
	/// Declared array size.
	pub array_size: u16,
	/// Weight threshold.
	pub weight_threshold: f32,
	/// Driven by a controller manager.
	pub manager_controlled: bool,
	/// Use only the highest weight (up to 10.1.0.111).
	pub only_use_highest_weight: bool,
	/// Blend entries.
	pub items: Vec<InterpBlendItem>,
	/// Active entry count.
	pub interp_count: u16,
	/// Single active index.
	pub single_index: u16,
	/// Single active interpolator (10.1.0.108 to 10.1.0.111).
	pub single_interpolator: Ref<Interpolator>,
	/// Single time.
	pub single_time: f32,
	/// Highest priority.
	pub high_priority: i32,
	/// Next highest priority.
	pub next_high_priority: i32,
}

const MANAGER_CONTROLLED: u8 = 0x1;

impl BlendInterpolator {
	/// Read the layer.
	pub fn read(r: &mut NifReader<'_>) -> Result<Self> {
		let ver = *r.version();
		let wide = ver.at_most(v::V10_1_0_109);

		let mut blend = Self::default();
		if ver.at_least(v::V10_1_0_112) {
			blend.flags = r.read_u8()?;
		}
		blend.array_size = read_index(r, wide)?;
		if wide {
			// Array grow-by.
			r.skip(2)?;
		}

		if ver.at_least(v::V10_1_0_112) {
			blend.weight_threshold = r.read_f32()?;
			blend.manager_controlled = blend.flags & MANAGER_CONTROLLED != 0;
			if !blend.manager_controlled {
				blend.interp_count = u16::from(r.read_u8()?);
				blend.single_index = u16::from(r.read_u8()?);
				blend.high_priority = i32::from(r.read_i8()?);
				blend.next_high_priority = i32::from(r.read_i8()?);
				blend.single_time = r.read_f32()?;
				// High weights sum, next high weights sum, high ease spinner.
				r.skip(12)?;
				blend.items = read_items(r, blend.array_size, wide)?;
			}
			return Ok(blend);
		}

		blend.items = read_items(r, blend.array_size, wide)?;
		blend.manager_controlled = r.read_bool()?;
		blend.weight_threshold = r.read_f32()?;
		blend.only_use_highest_weight = r.read_bool()?;
		blend.interp_count = read_index(r, wide)?;
		blend.single_index = read_index(r, wide)?;
		if ver.at_least(v::V10_1_0_108) {
			blend.single_interpolator = r.read_ref()?;
			blend.single_time = r.read_f32()?;
		}
		blend.high_priority = read_priority(r, wide)?;
		blend.next_high_priority = read_priority(r, wide)?;
		Ok(blend)
	}
}

fn read_index(r: &mut NifReader<'_>, wide: bool) -> Result<u16> {
	if wide { r.read_u16() } else { Ok(u16::from(r.read_u8()?)) }
}

fn read_priority(r: &mut NifReader<'_>, wide: bool) -> Result<i32> {
	if wide { r.read_i32() } else { Ok(i32::from(r.read_i8()?)) }
}

fn read_items(r: &mut NifReader<'_>, count: u16, wide: bool) -> Result<Vec<InterpBlendItem>> {
	let count = r.check_count(u64::from(count), 17)?;
	r.read_vec(count, |r| {
		Ok(InterpBlendItem {
			interpolator: r.read_ref()?,
			weight: r.read_f32()?,
			normalized_weight: r.read_f32()?,
			priority: if wide { r.read_i32()? } else { i32::from(r.read_u8()?) },
			ease_spinner: r.read_f32()?,
		})
	})
}

/// Blended value cached by a typed blend interpolator.
#[derive(Debug, Clone, PartialEq)]
pub enum BlendValue {
	/// `NiBlendTransformInterpolator` has no cached value.
	Transform,
	/// `NiBlendFloatInterpolator`.
	Float(f32),
	/// `NiBlendPoint3Interpolator`.
	Point3(Vector3),
	/// `NiBlendBoolInterpolator`.
	Bool(bool),
}

/// Path-following interpolator fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PathInterpolator {
	/// Path flags.
	pub flags: u16,
	/// Bank direction.
	pub bank_dir: i32,
	/// Maximum bank angle.
	pub max_bank_angle: f32,
	/// Smoothing.
	pub smoothing: f32,
	/// Follow axis.
	pub follow_axis: i16,
	/// Path positions.
	pub path_data: Ref<NiPosData>,
	/// Percentage along the path.
	pub percent_data: Ref<NiFloatData>,
}

/// Interpolator block.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolatorData {
	/// `NiTransformInterpolator`.
	Transform {
		/// Pose used when there is no data.
		transform: QuatTransform,
		/// Transform keys.
		data: Ref<NiKeyframeData>,
	},
	/// `NiFloatInterpolator`.
	Float {
		/// Pose value.
		value: f32,
		/// Float keys.
		data: Ref<NiFloatData>,
	},
	/// `NiPoint3Interpolator`.
	Point3 {
		/// Pose value.
		value: Vector3,
		/// Position keys.
		data: Ref<NiPosData>,
	},
	/// `NiBoolInterpolator` and `NiBoolTimelineInterpolator`.
	Bool {
		/// Pose value.
		value: bool,
		/// Boolean keys.
		data: Ref<NiBoolData>,
	},
	/// Typed blend interpolators.
	Blend {
		/// Blend layer.
		blend: BlendInterpolator,
		/// Cached value.
		value: BlendValue,
	},
	/// `NiPathInterpolator`.
	Path(PathInterpolator),
}

type BlendValueReader = fn(&mut NifReader<'_>) -> Result<BlendValue>;

fn read_blend(r: &mut NifReader<'_>, value: BlendValueReader) -> Result<BlockData> {
	let blend = BlendInterpolator::read(r)?;
	let value = value(r)?;
	Ok(BlockData::Interpolator(InterpolatorData::Blend { blend, value }))
}

fn blend_float(r: &mut NifReader<'_>) -> Result<BlendValue> {
	let value = if r.version().at_least(v::V10_1_0_112) { r.read_f32()? } else { f32::MIN };
	Ok(BlendValue::Float(value))
}

fn blend_point3(r: &mut NifReader<'_>) -> Result<BlendValue> {
	let value = if r.version().at_least(v::V10_1_0_112) {
		r.read_record()?
	} else {
		Vector3::new(f32::MIN, f32::MIN, f32::MIN)
	};
	Ok(BlendValue::Point3(value))
}

fn blend_bool(r: &mut NifReader<'_>) -> Result<BlendValue> {
	let value = r.version().at_least(v::V10_1_0_112) && r.read_u8()? != 0;
	Ok(BlendValue::Bool(value))
}

fn read_transform(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::Interpolator(InterpolatorData::Transform {
		transform: QuatTransform::read(r)?,
		data: r.read_ref()?,
	}))
}

fn read_bool_interpolator(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::Interpolator(InterpolatorData::Bool {
		value: r.read_bool()?,
		data: r.read_ref()?,
	}))
}

fn read_path(r: &mut NifReader<'_>) -> Result<BlockData> {
	Ok(BlockData::Interpolator(InterpolatorData::Path(PathInterpolator {
		flags: r.read_u16()?,
		bank_dir: r.read_i32()?,
		max_bank_angle: r.read_f32()?,
		smoothing: r.read_f32()?,
		follow_axis: r.read_i16()?,
		path_data: r.read_ref()?,
		percent_data: r.read_ref()?,
	})))
}

concrete_block_type! {
	InterpolatorData => Interpolator,
}

pub(crate) fn register(registry: &mut TypeRegistry) {
	registry.register("NiTransformInterpolator", read_transform);
	registry.register("NiFloatInterpolator", |r| {
		Ok(BlockData::Interpolator(InterpolatorData::Float {
			value: r.read_f32()?,
			data: r.read_ref()?,
		}))
	});
	registry.register("NiPoint3Interpolator", |r| {
		Ok(BlockData::Interpolator(InterpolatorData::Point3 {
			value: r.read_record()?,
			data: r.read_ref()?,
		}))
	});
	for name in ["NiBoolInterpolator", "NiBoolTimelineInterpolator"] {
		registry.register(name, read_bool_interpolator);
	}
	registry.register("NiBlendTransformInterpolator", |r| read_blend(r, |_| Ok(BlendValue::Transform)));
	registry.register("NiBlendFloatInterpolator", |r| read_blend(r, blend_float));
	registry.register("NiBlendPoint3Interpolator", |r| read_blend(r, blend_point3));
	registry.register("NiBlendBoolInterpolator", |r| read_blend(r, blend_bool));
	registry.register("NiPathInterpolator", read_path);
}
