//! Data structures describing conformers and the per-cycle score tables built from them.

pub mod atom;
pub mod conformer;
pub mod table;
