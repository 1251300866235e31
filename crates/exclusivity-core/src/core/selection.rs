//! Chain selectors and atom selections.
//!
//! An [`AtomSelection`] is an ordered set of atom IDs over one [`MolecularSystem`]. Selections
//! are built from a chain and refined with distance and residue operators, mirroring the
//! `byres (chain X) within d of (chain Y)` queries a structure comparison is phrased in.
//! The distance operator may look at atoms of a second system, which is how two superposed
//! structures are compared.

use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::spatial::NeighborGrid;
use nalgebra::Point3;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid chain selector '{0}': expected 'chain X' or a single chain identifier")]
    InvalidChainSelector(String),
    #[error("Chain '{0}' not found in structure")]
    ChainNotFound(char),
    #[error("Chain '{0}' contains no atoms")]
    EmptyChain(char),
}

/// A case-sensitive, single-character chain identifier.
///
/// Parses from either `"chain A"` or `"A"` and renders as `chain A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainSelector(char);

impl ChainSelector {
    pub const fn new(id: char) -> Self {
        Self(id)
    }

    pub fn id(&self) -> char {
        self.0
    }
}

impl FromStr for ChainSelector {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id_part = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) if keyword.eq_ignore_ascii_case("chain") => rest.trim(),
            Some(_) => return Err(SelectionError::InvalidChainSelector(s.to_string())),
            None => trimmed,
        };
        let mut chars = id_part.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(Self(c)),
            _ => Err(SelectionError::InvalidChainSelector(s.to_string())),
        }
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain {}", self.0)
    }
}

impl Serialize for ChainSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomSelection {
    atoms: BTreeSet<AtomId>,
}

impl FromIterator<AtomId> for AtomSelection {
    fn from_iter<I: IntoIterator<Item = AtomId>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

impl AtomSelection {
    /// Selects every atom of a chain.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ChainNotFound`] if the structure has no such chain and
    /// [`SelectionError::EmptyChain`] if the chain holds no atoms.
    pub fn chain(system: &MolecularSystem, selector: ChainSelector) -> Result<Self, SelectionError> {
        let chain_id = system
            .find_chain_by_id(selector.id())
            .ok_or(SelectionError::ChainNotFound(selector.id()))?;
        let selection: Self = system.chain_atom_ids(chain_id).into_iter().collect();
        if selection.is_empty() {
            return Err(SelectionError::EmptyChain(selector.id()));
        }
        Ok(selection)
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms.iter().copied()
    }

    /// Positions of the selected atoms.
    pub fn positions(&self, system: &MolecularSystem) -> Vec<Point3<f64>> {
        self.iter()
            .filter_map(|id| system.atom(id).map(|atom| atom.position))
            .collect()
    }

    /// Keeps the atoms of `self` that lie within `cutoff` Angstroms of any atom of `other`.
    ///
    /// `other` is a selection over `other_system`, which may be `system` itself or a second
    /// structure sharing the same coordinate frame.
    pub fn within(
        &self,
        system: &MolecularSystem,
        cutoff: f64,
        other_system: &MolecularSystem,
        other: &AtomSelection,
    ) -> Self {
        let targets = other.positions(other_system);
        if targets.is_empty() {
            return Self::default();
        }
        let grid = NeighborGrid::new(&targets, cutoff);
        self.iter()
            .filter(|&id| {
                system
                    .atom(id)
                    .is_some_and(|atom| grid.any_within(&atom.position, cutoff))
            })
            .collect()
    }

    /// Expands the selection to every atom of each residue it touches.
    pub fn by_residue(&self, system: &MolecularSystem) -> Self {
        let residues: HashSet<ResidueId> = self
            .iter()
            .filter_map(|id| system.atom(id).map(|atom| atom.residue_id))
            .collect();
        residues
            .into_iter()
            .filter_map(|res_id| system.residue(res_id))
            .flat_map(|residue| residue.atoms().iter().copied())
            .collect()
    }

    /// Keeps the atoms with the given name (e.g. `CA`).
    pub fn named(&self, system: &MolecularSystem, name: &str) -> Self {
        self.iter()
            .filter(|&id| system.atom(id).is_some_and(|atom| atom.name == name))
            .collect()
    }

    /// The residues touched by the selection, in chain order and without duplicates.
    pub fn residues(&self, system: &MolecularSystem) -> Vec<ResidueId> {
        let touched: HashSet<ResidueId> = self
            .iter()
            .filter_map(|id| system.atom(id).map(|atom| atom.residue_id))
            .collect();
        system
            .chains_iter()
            .flat_map(|(_, chain)| chain.residues().iter().copied())
            .filter(|res_id| touched.contains(res_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;

    // Chain A: residues 1 and 2 near the origin; chain B: residue 10 close to residue 2 only.
    fn create_two_chain_system() -> MolecularSystem {
        let mut system = MolecularSystem::new();
        let chain_a = system.add_chain('A', ChainType::Protein);
        let res1 = system.add_residue(chain_a, 1, ' ', "ALA").unwrap();
        system.add_atom_to_residue(res1, Atom::new("CA", res1, Point3::new(0.0, 0.0, 0.0)));
        system.add_atom_to_residue(res1, Atom::new("CB", res1, Point3::new(0.0, 1.5, 0.0)));
        let res2 = system.add_residue(chain_a, 2, ' ', "GLY").unwrap();
        system.add_atom_to_residue(res2, Atom::new("CA", res2, Point3::new(3.8, 0.0, 0.0)));
        system.add_atom_to_residue(res2, Atom::new("O", res2, Point3::new(5.0, 0.0, 0.0)));

        let chain_b = system.add_chain('B', ChainType::Protein);
        let res10 = system.add_residue(chain_b, 10, ' ', "LYS").unwrap();
        system.add_atom_to_residue(res10, Atom::new("CA", res10, Point3::new(8.5, 0.0, 0.0)));
        system.add_atom_to_residue(res10, Atom::new("NZ", res10, Point3::new(12.0, 0.0, 0.0)));
        system
    }

    #[test]
    fn chain_selector_parses_both_forms() {
        assert_eq!("chain A".parse(), Ok(ChainSelector::new('A')));
        assert_eq!("  chain   b ".parse(), Ok(ChainSelector::new('b')));
        assert_eq!("B".parse(), Ok(ChainSelector::new('B')));
        assert_eq!("CHAIN C".parse(), Ok(ChainSelector::new('C')));
        assert_eq!(ChainSelector::new('D').to_string(), "chain D");
    }

    #[test]
    fn chain_selector_rejects_malformed_input() {
        for input in ["", "chain", "chain AB", "AB", "resi 5", "chain  "] {
            assert!(
                input.parse::<ChainSelector>().is_err(),
                "'{input}' should not parse"
            );
        }
    }

    #[test]
    fn chain_selection_is_case_sensitive_and_validated() {
        let system = create_two_chain_system();
        assert_eq!(
            AtomSelection::chain(&system, ChainSelector::new('A'))
                .unwrap()
                .len(),
            4
        );
        assert_eq!(
            AtomSelection::chain(&system, ChainSelector::new('a')),
            Err(SelectionError::ChainNotFound('a'))
        );
    }

    #[test]
    fn empty_chain_is_an_error() {
        let mut system = create_two_chain_system();
        system.add_chain('C', ChainType::Protein);
        assert_eq!(
            AtomSelection::chain(&system, ChainSelector::new('C')),
            Err(SelectionError::EmptyChain('C'))
        );
    }

    #[test]
    fn within_then_by_residue_selects_whole_contact_residues() {
        let system = create_two_chain_system();
        let chain_a = AtomSelection::chain(&system, ChainSelector::new('A')).unwrap();
        let chain_b = AtomSelection::chain(&system, ChainSelector::new('B')).unwrap();

        let close = chain_a.within(&system, 4.0, &system, &chain_b);
        assert_eq!(close.len(), 1, "only the O of residue 2 is within 4 A");

        let interface = close.by_residue(&system);
        assert_eq!(interface.len(), 2);
        let residues = interface.residues(&system);
        assert_eq!(residues.len(), 1);
        assert_eq!(system.residue(residues[0]).unwrap().residue_number, 2);
    }

    #[test]
    fn within_uses_inclusive_cutoff_and_other_systems() {
        let system = create_two_chain_system();
        let mut other = MolecularSystem::new();
        let chain = other.add_chain('Z', ChainType::Protein);
        let res = other.add_residue(chain, 1, ' ', "SER").unwrap();
        other.add_atom_to_residue(res, Atom::new("OG", res, Point3::new(-4.0, 0.0, 0.0)));

        let chain_a = AtomSelection::chain(&system, ChainSelector::new('A')).unwrap();
        let partner = AtomSelection::chain(&other, ChainSelector::new('Z')).unwrap();

        let hits = chain_a.within(&system, 4.0, &other, &partner);
        assert_eq!(hits.len(), 1);
        assert!(chain_a.within(&system, 3.9, &other, &partner).is_empty());
        assert!(chain_a.within(&system, 4.0, &other, &AtomSelection::default()).is_empty());
    }

    #[test]
    fn named_filters_by_atom_name() {
        let system = create_two_chain_system();
        let all = AtomSelection::chain(&system, ChainSelector::new('A')).unwrap();
        let ca = all.named(&system, "CA");
        assert_eq!(ca.len(), 2);
        assert!(ca.iter().all(|id| system.atom(id).unwrap().name == "CA"));
    }

    #[test]
    fn residues_are_reported_in_chain_order() {
        let system = create_two_chain_system();
        let everything: AtomSelection = system.atoms_iter().map(|(id, _)| id).collect();
        let numbers: Vec<isize> = everything
            .residues(&system)
            .into_iter()
            .map(|id| system.residue(id).unwrap().residue_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }
}
