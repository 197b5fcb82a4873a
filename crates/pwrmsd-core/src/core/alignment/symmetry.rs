//! Topological equivalence of atoms, used to let superposition swap atoms that the
//! molecular graph cannot tell apart (twin methyls, carboxylate oxygens, flipped rings).
//!
//! Bonds are perceived from interatomic distances and covalent radii; the permutations
//! allowed during alignment are the automorphisms of the resulting labelled graph.

use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use petgraph::algo::subgraph_isomorphisms_iter;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::warn;

/// Slack added to the sum of covalent radii when deciding whether two atoms are bonded.
const BOND_TOLERANCE: f64 = 0.45;
/// Atoms closer than this are treated as overlapping, not bonded.
const MIN_BOND_DISTANCE: f64 = 0.4;
const FALLBACK_RADIUS: f64 = 1.5;

/// Graph label of one alignment atom.
///
/// Heavy atoms carry the number of hydrogens bonded to them, so a CH3 is never
/// considered equivalent to a CH2 even when hydrogens are left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomLabel {
    pub element: String,
    pub hydrogens: usize,
}

pub type MolecularGraph = UnGraph<AtomLabel, ()>;

fn covalent_radius(element: &str) -> f64 {
    match element.to_ascii_uppercase().as_str() {
        "H" | "D" | "T" => 0.31,
        "LI" => 1.28,
        "B" => 0.84,
        "C" => 0.76,
        "N" => 0.71,
        "O" => 0.66,
        "F" => 0.57,
        "NA" => 1.66,
        "MG" => 1.41,
        "SI" => 1.11,
        "P" => 1.07,
        "S" => 1.05,
        "CL" => 1.02,
        "K" => 2.03,
        "CA" => 1.76,
        "SE" => 1.20,
        "BR" => 1.20,
        "I" => 1.39,
        _ => FALLBACK_RADIUS,
    }
}

fn is_bonded(a: &Atom, b: &Atom) -> bool {
    let distance = (a.position - b.position).norm();
    let cutoff = covalent_radius(&a.element) + covalent_radius(&b.element) + BOND_TOLERANCE;
    distance > MIN_BOND_DISTANCE && distance < cutoff
}

/// Builds the bond graph of the atoms selected for alignment.
///
/// Node `k` of the returned graph is the `k`-th atom yielded by
/// [`Conformer::alignment_atoms`] with the same `include_hydrogens` flag. Bonds are
/// perceived over all atoms, so hydrogen counts are known even when hydrogens are
/// not part of the graph.
pub fn bond_graph(conformer: &Conformer, include_hydrogens: bool) -> MolecularGraph {
    let atoms = &conformer.atoms;

    let mut bonds = Vec::new();
    for i in 0..atoms.len() {
        for j in i + 1..atoms.len() {
            if is_bonded(&atoms[i], &atoms[j]) {
                bonds.push((i, j));
            }
        }
    }

    let mut hydrogens = vec![0usize; atoms.len()];
    for &(i, j) in &bonds {
        if atoms[j].is_hydrogen() {
            hydrogens[i] += 1;
        }
        if atoms[i].is_hydrogen() {
            hydrogens[j] += 1;
        }
    }

    let mut graph = MolecularGraph::with_capacity(atoms.len(), bonds.len());
    let nodes: Vec<Option<NodeIndex>> = atoms
        .iter()
        .zip(&hydrogens)
        .map(|(atom, &h)| {
            (include_hydrogens || !atom.is_hydrogen()).then(|| {
                graph.add_node(AtomLabel {
                    element: atom.element.to_ascii_uppercase(),
                    hydrogens: h,
                })
            })
        })
        .collect();

    for (i, j) in bonds {
        if let (Some(a), Some(b)) = (nodes[i], nodes[j]) {
            graph.add_edge(a, b, ());
        }
    }
    graph
}

/// Enumerates automorphisms of `graph` as node permutations, identity first.
///
/// `mapping[k]` is the node that node `k` is sent to. At most `limit` permutations are
/// returned; a graph with no symmetry yields only the identity.
pub fn automorphisms(graph: &MolecularGraph, limit: usize) -> Vec<Vec<usize>> {
    let identity: Vec<usize> = (0..graph.node_count()).collect();
    if graph.node_count() < 2 || limit <= 1 {
        return vec![identity];
    }

    let mut node_match = |a: &AtomLabel, b: &AtomLabel| a == b;
    let mut edge_match = |_: &(), _: &()| true;
    let Some(mappings) = subgraph_isomorphisms_iter(&graph, &graph, &mut node_match, &mut edge_match)
    else {
        return vec![identity];
    };

    let mut result = vec![identity.clone()];
    for mapping in mappings.filter(|m| *m != identity) {
        if result.len() == limit {
            warn!(
                limit,
                "Automorphism search truncated; alignment may miss the best atom mapping."
            );
            break;
        }
        result.push(mapping);
    }
    result
}
