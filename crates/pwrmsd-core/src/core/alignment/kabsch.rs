use super::symmetry::{automorphisms, bond_graph};
use super::{AlignmentError, Aligner};
use crate::core::models::conformer::Conformer;
use crate::core::utils::geometry::{calculate_rmsd, center, centroid};
use nalgebra::{Matrix3, Point3, Vector3};

/// Upper bound on the atom permutations tried for one pair.
const MAX_AUTOMORPHISMS: usize = 4096;

/// Rigid-body superposition by the Kabsch algorithm.
///
/// Atoms are matched by position in the file, so both conformers must list their
/// alignment atoms in the same element order. With symmetry enabled (the default), the
/// reported RMSD is the minimum over every permutation of topologically equivalent atoms
/// of the reference. Only proper rotations are considered: a conformer is never
/// superposed onto its mirror image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KabschAligner {
    /// Include hydrogens in the superposition. Off by default.
    pub include_hydrogens: bool,
    /// Allow equivalent atoms to trade places. On by default.
    pub symmetry: bool,
}

impl Default for KabschAligner {
    fn default() -> Self {
        Self {
            include_hydrogens: false,
            symmetry: true,
        }
    }
}

impl KabschAligner {
    pub fn new(include_hydrogens: bool) -> Self {
        Self {
            include_hydrogens,
            ..Default::default()
        }
    }

    pub fn with_symmetry(mut self, symmetry: bool) -> Self {
        self.symmetry = symmetry;
        self
    }

    fn matched_positions(
        &self,
        reference: &Conformer,
        target: &Conformer,
    ) -> Result<(Vec<Point3<f64>>, Vec<Point3<f64>>), AlignmentError> {
        let ref_atoms: Vec<_> = reference.alignment_atoms(self.include_hydrogens).collect();
        let tgt_atoms: Vec<_> = target.alignment_atoms(self.include_hydrogens).collect();

        if ref_atoms.len() != tgt_atoms.len() {
            return Err(AlignmentError::AtomCountMismatch {
                reference: ref_atoms.len(),
                target: tgt_atoms.len(),
            });
        }
        if ref_atoms.is_empty() {
            return Err(AlignmentError::Empty);
        }

        for (index, (a, b)) in ref_atoms.iter().zip(&tgt_atoms).enumerate() {
            if !a.element.eq_ignore_ascii_case(&b.element) {
                return Err(AlignmentError::ElementMismatch {
                    index,
                    reference: a.element.clone(),
                    target: b.element.clone(),
                });
            }
        }

        Ok((
            ref_atoms.iter().map(|a| a.position).collect(),
            tgt_atoms.iter().map(|a| a.position).collect(),
        ))
    }
}

impl Aligner for KabschAligner {
    fn rmsd(&self, reference: &Conformer, target: &Conformer) -> Result<f64, AlignmentError> {
        let (ref_positions, tgt_positions) = self.matched_positions(reference, target)?;
        if !self.symmetry {
            return kabsch_rmsd(&ref_positions, &tgt_positions);
        }

        let graph = bond_graph(reference, self.include_hydrogens);
        let mut best = f64::INFINITY;
        for mapping in automorphisms(&graph, MAX_AUTOMORPHISMS) {
            let permuted: Vec<Point3<f64>> = mapping.iter().map(|&k| tgt_positions[k]).collect();
            best = best.min(kabsch_rmsd(&ref_positions, &permuted)?);
        }
        Ok(best)
    }
}

fn kabsch_rmsd(
    reference: &[Point3<f64>],
    target: &[Point3<f64>],
) -> Result<f64, AlignmentError> {
    let ref_centroid = centroid(reference).ok_or(AlignmentError::Empty)?;
    let tgt_centroid = centroid(target).ok_or(AlignmentError::Empty)?;

    let q = center(reference, &ref_centroid);
    let p = center(target, &tgt_centroid);

    // covariance of the moving set against the fixed set
    let mut h = Matrix3::zeros();
    for (p_c, q_c) in p.iter().zip(q.iter()) {
        h += p_c * q_c.transpose();
    }

    let svd = h.svd(true, true);
    let u = svd.u.ok_or(AlignmentError::Decomposition)?;
    let v_t = svd.v_t.ok_or(AlignmentError::Decomposition)?;

    let mut d = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        d[(2, 2)] = -1.0;
    }
    let r = u * d * v_t;

    let rotated: Vec<Vector3<f64>> = p.iter().map(|p_c| r.transpose() * p_c).collect();

    calculate_rmsd(&rotated, &q).ok_or(AlignmentError::Empty)
}
