pub mod blocks;
mod bytes;
mod compression;
mod diag;
mod error;
mod file;
mod footer;
mod header;
mod layout;
mod reader;
mod refs;
mod registry;
pub mod version;

/// Layer structs shared by several concrete block shapes.
pub use blocks::collision::CollisionObject;
pub use blocks::controller::TimeController;
pub use blocks::extra::ExtraData;
pub use blocks::geometry::GeometryData;
pub use blocks::object::{AvObject, NiNode, ObjectNet};
pub use blocks::texture::NiSourceTexture;
/// Block table entries and category markers usable as link targets.
pub use blocks::{AnyBlock, Block, BlockData, DynamicEffect, HavokShape, Interpolator, Property};
/// Bounds-checked byte cursor.
pub use bytes::{Cursor, LengthPrefix};
/// Compression detection result.
pub use compression::Compression;
/// Recoverable decode conditions and their receivers.
pub use diag::{Diagnostic, DiagnosticSink, TracingSink};
/// Error and result aliases.
pub use error::{NifError, Result};
/// Parsed file and parse switches.
pub use file::{NifFile, ParseOptions};
/// Root list stored after the last block.
pub use footer::Footer;
/// File header representation.
pub use header::{ExportInfo, Header};
/// Packed record layouts read by tag.
pub use layout::{Layout, Record, Scalar, ScalarKind};
/// Version-aware field reader.
pub use reader::{DEFAULT_MAX_ARRAY_LEN, NifReader};
/// Typed links and the table they resolve through.
pub use refs::{BlockTable, BlockType, Ptr, Ref};
/// Block-type dispatch table.
pub use registry::{BlockConstructor, TypeRegistry, split_type_args, type_name_hash};
/// Version triple and byte order.
pub use version::{Endianness, VersionContext};
