use nalgebra::Point3;

/// A single atom of a conformer, as read from a geometry file.
///
/// Only the information needed for superposition is kept: the element symbol,
/// used to match atoms between conformers and to filter hydrogens, and the
/// Cartesian position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol as written in the source file (e.g., "C", "Na").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new atom from an element symbol and a position.
    ///
    /// # Arguments
    ///
    /// * `element` - The element symbol.
    /// * `position` - The Cartesian coordinates in Angstroms.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
        }
    }

    /// Returns `true` if the atom is a hydrogen (including the `D` and `T` isotopes).
    ///
    /// The comparison is case-insensitive, so `h` and `H` are both recognized.
    pub fn is_hydrogen(&self) -> bool {
        matches!(
            self.element.to_ascii_uppercase().as_str(),
            "H" | "D" | "T"
        )
    }
}
