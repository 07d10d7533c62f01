//! Decoder for NetImmerse/Gamebryo `.nif` scene-graph files.
//!
//! [`nif::NifFile`] reads the header, every block in table order, and the footer
//! root list. Blocks link to each other through typed [`nif::Ref`] and [`nif::Ptr`]
//! handles that resolve lazily against the parsed [`nif::BlockTable`].

pub mod nif;
