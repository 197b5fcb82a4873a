use super::atom::Atom;
use std::fmt;

/// Identifies one conformer slot of the upstream pipeline by zero-based cycle and geometry index.
///
/// File names on disk are one-based (`cycle_0001_geom01`); the conversion is done by
/// [`ConformerId::cycle_label`] and [`ConformerId::geometry_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConformerId {
    pub cycle: usize,
    pub geometry: usize,
}

impl ConformerId {
    pub fn new(cycle: usize, geometry: usize) -> Self {
        Self { cycle, geometry }
    }

    /// Position of this slot in the global cycle-major ordering of all conformers.
    ///
    /// # Arguments
    ///
    /// * `total_geometries` - Number of geometries produced per cycle.
    ///
    /// # Return
    ///
    /// `cycle * total_geometries + geometry`, which is also the column of this
    /// conformer in every pairwise table.
    pub fn flat_index(&self, total_geometries: usize) -> usize {
        self.cycle * total_geometries + self.geometry
    }

    /// One-based cycle number, zero-padded to four digits.
    pub fn cycle_label(&self) -> String {
        format!("{:04}", self.cycle + 1)
    }

    /// One-based geometry number, zero-padded to two digits.
    pub fn geometry_label(&self) -> String {
        format!("{:02}", self.geometry + 1)
    }
}

impl fmt::Display for ConformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle_{}_geom{}", self.cycle_label(), self.geometry_label())
    }
}

/// The atoms of one conformer, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conformer {
    /// Free-form comment line carried by the geometry file.
    pub comment: String,
    pub atoms: Vec<Atom>,
}

impl Conformer {
    pub fn new(comment: &str, atoms: Vec<Atom>) -> Self {
        Self {
            comment: comment.to_string(),
            atoms,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterates over the atoms used for superposition.
    ///
    /// Hydrogens are skipped unless `include_hydrogens` is set.
    pub fn alignment_atoms(&self, include_hydrogens: bool) -> impl Iterator<Item = &Atom> {
        self.atoms
            .iter()
            .filter(move |atom| include_hydrogens || !atom.is_hydrogen())
    }
}
