use super::config::{AlignmentAtoms, AlignmentConfig};
use super::error::EngineError;
use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use crate::core::models::system::MolecularSystem;
use crate::core::selection::{ChainSelector, SelectionError};
use crate::core::utils::geometry::{Superposition, calculate_rmsd, kabsch};
use crate::core::utils::sequence::needleman_wunsch;
use nalgebra::Point3;
use tracing::{debug, trace};

/// Fewest atom pairs that determine a rigid-body fit.
pub const MIN_ALIGNED_ATOMS: usize = 3;

/// Below this RMSD the remaining deviations are rounding noise and refinement stops.
const EXACT_FIT_RMSD: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    /// Maps mobile coordinates onto the target frame.
    pub transform: Superposition,
    /// RMSD over the atom pairs that survived refinement.
    pub rmsd: f64,
    pub atom_count: usize,
    /// RMSD of the first fit, before any pair was rejected.
    pub initial_rmsd: f64,
    pub initial_atom_count: usize,
    /// Refinement cycles that rejected at least one pair.
    pub cycles: usize,
    /// Residue pairs from the sequence alignment that contributed atoms.
    pub aligned_residues: usize,
}

#[derive(Debug, Clone, Copy)]
struct AtomPair {
    mobile: Point3<f64>,
    target: Point3<f64>,
}

/// Superposes one chain of `mobile` onto one chain of `target`.
///
/// Residues are matched by a global alignment of the two chain sequences, atoms within each
/// residue pair by name (hydrogens excluded). After an initial Kabsch fit, pairs deviating by
/// more than `outlier_cutoff` times the current RMSD are dropped and the fit repeated, for at
/// most `cycles` rounds.
///
/// # Errors
///
/// Returns [`EngineError::Selection`] if either chain is missing,
/// [`EngineError::InsufficientAlignment`] if fewer than [`MIN_ALIGNED_ATOMS`] pairs are found
/// and [`EngineError::Superposition`] if the paired coordinates admit no finite fit.
pub fn superpose(
    mobile: &MolecularSystem,
    mobile_chain: ChainSelector,
    target: &MolecularSystem,
    target_chain: ChainSelector,
    config: &AlignmentConfig,
) -> Result<AlignmentOutcome, EngineError> {
    let mobile_residues = chain_residues(mobile, mobile_chain)?;
    let target_residues = chain_residues(target, target_chain)?;

    let mobile_seq: Vec<u8> = mobile_residues.iter().map(|r| r.one_letter()).collect();
    let target_seq: Vec<u8> = target_residues.iter().map(|r| r.one_letter()).collect();
    let sequence_alignment =
        needleman_wunsch(&mobile_seq, &target_seq, config.gap_open, config.gap_extend);
    debug!(
        mobile_residues = mobile_seq.len(),
        target_residues = target_seq.len(),
        aligned = sequence_alignment.pairs.len(),
        score = sequence_alignment.score,
        "Aligned common chain sequences."
    );

    let mut pairs = Vec::new();
    let mut aligned_residues = 0;
    for &(i, j) in &sequence_alignment.pairs {
        let before = pairs.len();
        collect_atom_pairs(
            mobile,
            mobile_residues[i],
            target,
            target_residues[j],
            config.atoms,
            &mut pairs,
        );
        if pairs.len() > before {
            aligned_residues += 1;
        }
    }

    if pairs.len() < MIN_ALIGNED_ATOMS {
        return Err(EngineError::InsufficientAlignment {
            pairs: pairs.len(),
            required: MIN_ALIGNED_ATOMS,
        });
    }

    let (mut transform, mut rmsd) = fit(&pairs)?;
    let initial_rmsd = rmsd;
    let initial_atom_count = pairs.len();
    debug!(atoms = initial_atom_count, rmsd, "Initial superposition.");

    let mut cycles = 0;
    for cycle in 1..=config.cycles {
        if rmsd < EXACT_FIT_RMSD {
            break;
        }
        let rejection_cutoff = config.outlier_cutoff * rmsd;
        let kept: Vec<AtomPair> = pairs
            .iter()
            .copied()
            .filter(|pair| {
                (transform.apply(&pair.mobile) - pair.target).norm() <= rejection_cutoff
            })
            .collect();

        if kept.len() == pairs.len() || kept.len() < MIN_ALIGNED_ATOMS {
            trace!(cycle, kept = kept.len(), "Refinement converged.");
            break;
        }

        trace!(
            cycle,
            rejected = pairs.len() - kept.len(),
            remaining = kept.len(),
            "Rejected outlier pairs."
        );
        pairs = kept;
        (transform, rmsd) = fit(&pairs)?;
        cycles = cycle;
    }

    debug!(atoms = pairs.len(), rmsd, cycles, "Final superposition.");

    Ok(AlignmentOutcome {
        transform,
        rmsd,
        atom_count: pairs.len(),
        initial_rmsd,
        initial_atom_count,
        cycles,
        aligned_residues,
    })
}

/// Moves every atom of `system` by `transform`.
pub fn apply_transform(system: &mut MolecularSystem, transform: &Superposition) {
    for (_, atom) in system.atoms_iter_mut() {
        atom.position = transform.apply(&atom.position);
    }
}

fn chain_residues(
    system: &MolecularSystem,
    selector: ChainSelector,
) -> Result<Vec<&Residue>, SelectionError> {
    let chain = system
        .find_chain_by_id(selector.id())
        .and_then(|id| system.chain(id))
        .ok_or(SelectionError::ChainNotFound(selector.id()))?;
    let residues: Vec<&Residue> = chain
        .residues()
        .iter()
        .filter_map(|&id| system.residue(id))
        .collect();
    if residues.is_empty() {
        return Err(SelectionError::EmptyChain(selector.id()));
    }
    Ok(residues)
}

fn takes_part(atom: &Atom, atoms: AlignmentAtoms) -> bool {
    if atom.is_hydrogen() {
        return false;
    }
    match atoms {
        AlignmentAtoms::All => true,
        AlignmentAtoms::Backbone => atom.is_backbone(),
        AlignmentAtoms::CaOnly => atom.name == "CA",
    }
}

fn collect_atom_pairs(
    mobile: &MolecularSystem,
    mobile_residue: &Residue,
    target: &MolecularSystem,
    target_residue: &Residue,
    atoms: AlignmentAtoms,
    pairs: &mut Vec<AtomPair>,
) {
    for &atom_id in mobile_residue.atoms() {
        let Some(mobile_atom) = mobile.atom(atom_id) else {
            continue;
        };
        if !takes_part(mobile_atom, atoms) {
            continue;
        }
        // Duplicate names within a residue pair only the first occurrence.
        if mobile_residue.get_atom_id_by_name(&mobile_atom.name) != Some(atom_id) {
            continue;
        }
        let Some(target_atom) = target_residue
            .get_atom_id_by_name(&mobile_atom.name)
            .and_then(|id| target.atom(id))
        else {
            continue;
        };
        pairs.push(AtomPair {
            mobile: mobile_atom.position,
            target: target_atom.position,
        });
    }
}

fn fit(pairs: &[AtomPair]) -> Result<(Superposition, f64), EngineError> {
    let mobile: Vec<Point3<f64>> = pairs.iter().map(|p| p.mobile).collect();
    let target: Vec<Point3<f64>> = pairs.iter().map(|p| p.target).collect();
    let transform = kabsch(&mobile, &target).ok_or(EngineError::Superposition {
        pairs: pairs.len(),
    })?;
    let moved: Vec<Point3<f64>> = mobile.iter().map(|p| transform.apply(p)).collect();
    let rmsd = calculate_rmsd(&moved, &target)
        .filter(|rmsd| rmsd.is_finite())
        .ok_or(EngineError::Superposition {
            pairs: pairs.len(),
        })?;
    Ok((transform, rmsd))
}
