//! Interface and chain overlap between two superposed complexes.
//!
//! Both structures share a "common" chain and each has its own "test" partner. With the two
//! structures in one frame:
//!
//! - the **interface** of each structure is the set of common-chain residues within the contact
//!   cutoff of that structure's partner;
//! - the **interface overlap** is the set of residues of the first interface within the cutoff
//!   of the second interface;
//! - the **chain overlap** of each partner is the set of its residues within the cutoff of the
//!   other structure's partner.

use super::error::EngineError;
use crate::core::io::manifest::ChainAssignment;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::core::selection::AtomSelection;
use serde::Serialize;
use tracing::debug;

/// A residue of an overlapping partner chain with its model confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueConfidence {
    /// Residue number, insertion code, and name, e.g. `52LYS`.
    pub residue: String,
    /// B-factor of the confidence atom; pLDDT for predicted models.
    pub plddt: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainOverlap {
    pub residues: Vec<ResidueConfidence>,
}

impl ChainOverlap {
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Mean confidence over the overlapping residues; `None` when there are none.
    pub fn average_plddt(&self) -> Option<f64> {
        if self.residues.is_empty() {
            return None;
        }
        let sum: f64 = self.residues.iter().map(|r| r.plddt).sum();
        Some(sum / self.residues.len() as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapAnalysis {
    /// Labels of common-chain residues (structure 1 numbering) shared by both interfaces,
    /// ordered by residue number, then insertion code.
    pub interface_residues: Vec<String>,
    /// Residues of the first partner that clash with the second partner.
    pub chain1: ChainOverlap,
    /// Residues of the second partner that clash with the first partner.
    pub chain2: ChainOverlap,
}

/// Measures interface and chain overlap between two structures in a common frame.
///
/// # Errors
///
/// Returns [`EngineError::Selection`] if any of the four chains is missing or empty.
pub fn analyze(
    structure1: &MolecularSystem,
    structure2: &MolecularSystem,
    chains: &ChainAssignment,
    cutoff: f64,
    confidence_atom: &str,
) -> Result<OverlapAnalysis, EngineError> {
    let common1 = AtomSelection::chain(structure1, chains.common_chain1)?;
    let test1 = AtomSelection::chain(structure1, chains.test_chain1)?;
    let common2 = AtomSelection::chain(structure2, chains.common_chain2)?;
    let test2 = AtomSelection::chain(structure2, chains.test_chain2)?;

    let interface1 = common1
        .within(structure1, cutoff, structure1, &test1)
        .by_residue(structure1);
    let interface2 = common2
        .within(structure2, cutoff, structure2, &test2)
        .by_residue(structure2);
    debug!(
        interface1_atoms = interface1.len(),
        interface2_atoms = interface2.len(),
        "Selected binding interfaces on the common chains."
    );

    let shared_interface = interface1
        .within(structure1, cutoff, structure2, &interface2)
        .by_residue(structure1);
    let interface_residues = sorted_labels(structure1, shared_interface.residues(structure1));

    let clash1 = test1
        .within(structure1, cutoff, structure2, &test2)
        .by_residue(structure1);
    let clash2 = test2
        .within(structure2, cutoff, structure1, &test1)
        .by_residue(structure2);

    let analysis = OverlapAnalysis {
        interface_residues,
        chain1: chain_overlap(structure1, &clash1, confidence_atom),
        chain2: chain_overlap(structure2, &clash2, confidence_atom),
    };
    debug!(
        interface = analysis.interface_residues.len(),
        chain1 = analysis.chain1.len(),
        chain2 = analysis.chain2.len(),
        "Overlap analysis complete."
    );
    Ok(analysis)
}

fn sorted_labels(system: &MolecularSystem, residues: Vec<ResidueId>) -> Vec<String> {
    let mut keyed: Vec<(isize, char, String)> = residues
        .into_iter()
        .filter_map(|id| system.residue(id))
        .map(|r| (r.residue_number, r.insertion_code, r.label()))
        .collect();
    keyed.sort();
    keyed.dedup_by(|a, b| a.2 == b.2);
    keyed.into_iter().map(|(_, _, label)| label).collect()
}

// One entry per residue carrying the confidence atom; residues without it are not reported.
fn chain_overlap(
    system: &MolecularSystem,
    selection: &AtomSelection,
    confidence_atom: &str,
) -> ChainOverlap {
    let anchors = selection.named(system, confidence_atom);
    let residues = anchors
        .residues(system)
        .into_iter()
        .filter_map(|res_id| {
            let residue = system.residue(res_id)?;
            let atom = system.atom(residue.get_atom_id_by_name(confidence_atom)?)?;
            Some(ResidueConfidence {
                residue: format!("{}{}", residue.label(), residue.name),
                plddt: atom.b_factor,
            })
        })
        .collect();
    ChainOverlap { residues }
}
