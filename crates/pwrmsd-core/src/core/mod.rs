//! # Core Module
//!
//! Fundamental building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Conformer identifiers, atoms, conformers, score tables
//! - **File I/O** ([`io`]) - XYZ geometry reading/writing and CSV persistence of tables
//! - **Alignment** ([`alignment`]) - Optimal superposition and RMSD between two conformers

pub mod alignment;
pub mod io;
pub mod models;
pub(crate) mod utils;
