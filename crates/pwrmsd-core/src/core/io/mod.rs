//! Provides input/output for the files this crate reads and writes.
//!
//! Geometry files are read through the [`traits::GeometryFile`] interface, with XYZ as
//! the supported format. Pairwise tables are persisted as CSV by [`table::TableFile`].

pub mod table;
pub mod traits;
pub mod xyz;
