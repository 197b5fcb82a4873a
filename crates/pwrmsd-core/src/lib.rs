//! # pwrmsd Core Library
//!
//! Pairwise structural similarity (RMSD) between the conformers produced by a generative
//! quantum-chemistry pipeline, assembled into one upper-triangular table per simulation cycle.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Conformer`, `PairwiseTable`),
//!   geometry and table file I/O, and the [`core::alignment::Aligner`] seam with its
//!   Kabsch implementation.
//!
//! - **[`engine`]: The Logic Core.** Run configuration, the mapping from conformer
//!   identifiers to paths, the invalid-conformer scanner, and the parallel row builder.
//!
//! - **[`workflows`]: The Public API.** Builds and persists a cycle's table, and drives a
//!   range of cycles with skip-if-already-written semantics.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
