//! Superposition of two conformers and the RMSD of the superposed coordinates.
//!
//! The engine only depends on the [`Aligner`] trait; [`kabsch::KabschAligner`] is the
//! implementation used by the command-line tool.

pub mod kabsch;
pub mod symmetry;

use crate::core::models::conformer::Conformer;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AlignmentError {
    #[error("Conformers have different numbers of alignment atoms ({reference} vs {target})")]
    AtomCountMismatch { reference: usize, target: usize },

    #[error("Element mismatch at alignment atom {index}: '{reference}' vs '{target}'")]
    ElementMismatch {
        index: usize,
        reference: String,
        target: String,
    },

    #[error("No atoms left to align")]
    Empty,

    #[error("Singular value decomposition failed")]
    Decomposition,
}

/// Computes a similarity score between two conformers after optimal superposition.
///
/// Implementations must be pure: the engine calls them concurrently from worker threads
/// with no ordering guarantee.
pub trait Aligner: Send + Sync {
    /// Superposes `target` onto `reference` and returns the resulting RMSD in Angstroms.
    fn rmsd(&self, reference: &Conformer, target: &Conformer) -> Result<f64, AlignmentError>;
}
