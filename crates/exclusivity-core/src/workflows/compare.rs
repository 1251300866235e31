use super::report::{AlignmentSummary, OverlapReport};
use crate::core::io::manifest::ChainAssignment;
use crate::core::models::system::MolecularSystem;
use crate::core::selection::AtomSelection;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::overlap;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::superposition::{self, AlignmentOutcome};
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    pub report: OverlapReport,
    pub alignment: AlignmentOutcome,
    /// Structure 1 moved into the frame of structure 2.
    pub aligned_structure: MolecularSystem,
}

/// Compares two complexes that share a protein.
///
/// Structure 1 is superposed onto structure 2 through their common chains, then the
/// interfaces and partner chains of both structures are checked for overlap.
///
/// # Arguments
///
/// * `structure1` - First complex; it is moved and returned as the aligned structure.
/// * `structure2` - Second complex, which defines the reference frame.
/// * `chains` - The common and test chain of each structure.
/// * `config` - Contact cutoff, confidence atom, and alignment settings.
/// * `reporter` - Receives phase progress events.
///
/// # Errors
///
/// Returns an [`EngineError`] if a chain is missing or empty, or if the common chains cannot
/// be superposed.
#[instrument(skip_all, name = "compare_workflow")]
pub fn run(
    structure1: MolecularSystem,
    structure2: &MolecularSystem,
    chains: &ChainAssignment,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<ComparisonOutcome, EngineError> {
    let result = compare(structure1, structure2, chains, config, reporter);
    if let Err(e) = &result {
        error!(
            common_chain1 = %chains.common_chain1,
            common_chain2 = %chains.common_chain2,
            test_chain1 = %chains.test_chain1,
            test_chain2 = %chains.test_chain2,
            "Structure comparison failed: {e}"
        );
    }
    result
}

fn compare(
    mut structure1: MolecularSystem,
    structure2: &MolecularSystem,
    chains: &ChainAssignment,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<ComparisonOutcome, EngineError> {
    reporter.phase("Validating chains", || {
        validate_chains(&structure1, structure2, chains, reporter)
    })?;

    let alignment = reporter.phase("Superposing common chains", || {
        superposition::superpose(
            &structure1,
            chains.common_chain1,
            structure2,
            chains.common_chain2,
            &config.alignment,
        )
    })?;
    superposition::apply_transform(&mut structure1, &alignment.transform);
    info!(
        rmsd = alignment.rmsd,
        atoms = alignment.atom_count,
        cycles = alignment.cycles,
        "Superposed {} of structure 1 onto {} of structure 2.",
        chains.common_chain1,
        chains.common_chain2
    );
    reporter.report(Progress::Message(format!(
        "Alignment RMSD {:.2} over {} atoms",
        alignment.rmsd, alignment.atom_count
    )));

    let analysis = reporter.phase("Measuring overlap", || {
        overlap::analyze(
            &structure1,
            structure2,
            chains,
            config.contact_cutoff,
            &config.confidence_atom,
        )
    })?;

    let report = OverlapReport::new(analysis, Some(AlignmentSummary::from(&alignment)));
    info!(
        interface_overlap = report.interface_overlap,
        chain_overlap = report.chain_overlap,
        "Comparison complete."
    );

    Ok(ComparisonOutcome {
        report,
        alignment,
        aligned_structure: structure1,
    })
}

fn validate_chains(
    structure1: &MolecularSystem,
    structure2: &MolecularSystem,
    chains: &ChainAssignment,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    for (system, selector) in [
        (structure1, chains.common_chain1),
        (structure1, chains.test_chain1),
        (structure2, chains.common_chain2),
        (structure2, chains.test_chain2),
    ] {
        AtomSelection::chain(system, selector)?;
    }
    for (structure, common, test) in [
        (1, chains.common_chain1, chains.test_chain1),
        (2, chains.common_chain2, chains.test_chain2),
    ] {
        if common == test {
            return Err(EngineError::ChainRoleConflict {
                structure,
                chain: common,
            });
        }
    }
    // Ligand and solvent common chains are still superposed; they only draw a warning.
    for (structure, system, selector) in [
        (1, structure1, chains.common_chain1),
        (2, structure2, chains.common_chain2),
    ] {
        let chain_type = system
            .find_chain_by_id(selector.id())
            .and_then(|id| system.chain(id))
            .map(|chain| chain.chain_type);
        if let Some(chain_type) = chain_type.filter(|t| !t.is_protein()) {
            warn!(structure, ?chain_type, "Common {selector} is not a protein chain.");
            reporter.report(Progress::Message(format!(
                "Common {selector} of structure {structure} is not a protein chain"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::selection::{ChainSelector, SelectionError};
    use crate::engine::config::{AlignmentAtoms, AnalysisConfigBuilder};
    use nalgebra::{Point3, Rotation3, Vector3};
    use std::sync::Mutex;

    const COMMON: [&str; 8] = ["MET", "ALA", "LYS", "LEU", "TRP", "SER", "GLU", "VAL"];

    fn config() -> AnalysisConfig {
        AnalysisConfigBuilder::new()
            .contact_cutoff(4.0)
            .confidence_atom("CA")
            .cycles(5)
            .outlier_cutoff(2.0)
            .atoms(AlignmentAtoms::All)
            .gap_open(10)
            .gap_extend(1)
            .build()
            .unwrap()
    }

    fn chains(common1: char, common2: char, test1: char, test2: char) -> ChainAssignment {
        ChainAssignment {
            common_chain1: ChainSelector::new(common1),
            common_chain2: ChainSelector::new(common2),
            test_chain1: ChainSelector::new(test1),
            test_chain2: ChainSelector::new(test2),
        }
    }

    // Common protein laid out along x, one residue every 3.8 A, plus a partner residue
    // hovering 3.5 A above the residue at index `site`.
    fn complex(
        common_chain: char,
        partner_chain: char,
        site: usize,
        motion: &dyn Fn(Point3<f64>) -> Point3<f64>,
    ) -> MolecularSystem {
        complex_of(ChainType::Protein, common_chain, partner_chain, site, motion)
    }

    fn complex_of(
        common_type: ChainType,
        common_chain: char,
        partner_chain: char,
        site: usize,
        motion: &dyn Fn(Point3<f64>) -> Point3<f64>,
    ) -> MolecularSystem {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain(common_chain, common_type);
        for (i, name) in COMMON.iter().enumerate() {
            let res = system.add_residue(chain, i as isize + 1, ' ', name).unwrap();
            let x = i as f64 * 3.8;
            let wobble = if i % 2 == 0 { 0.4 } else { -0.4 };
            for (atom_name, offset) in [
                ("N", Vector3::new(-1.2, 0.3, wobble)),
                ("CA", Vector3::new(0.0, 0.0, 0.0)),
                ("C", Vector3::new(1.2, -0.3, -wobble)),
            ] {
                let position = motion(Point3::new(x, 0.0, 0.0) + offset);
                let mut atom = Atom::new(atom_name, res, position);
                atom.b_factor = 90.0;
                system.add_atom_to_residue(res, atom);
            }
        }

        let partner = system.add_chain(partner_chain, ChainType::Protein);
        let res = system.add_residue(partner, 1, ' ', "TYR").unwrap();
        let mut ca = Atom::new("CA", res, motion(Point3::new(site as f64 * 3.8, 3.5, 0.0)));
        ca.b_factor = 65.0;
        system.add_atom_to_residue(res, ca);
        system
    }

    fn moved(p: Point3<f64>) -> Point3<f64> {
        Rotation3::from_euler_angles(0.4, -0.9, 1.3).transform_point(&p)
            + Vector3::new(25.0, -4.0, 8.0)
    }

    #[test]
    fn partners_binding_the_same_site_are_exclusive() {
        let structure1 = complex('B', 'A', 3, &moved);
        let structure2 = complex('A', 'B', 3, &|p| p);

        let outcome = run(
            structure1,
            &structure2,
            &chains('B', 'A', 'A', 'B'),
            &config(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let report = &outcome.report;
        assert!(outcome.alignment.rmsd < 1e-6);
        assert!(report.interface_overlap);
        assert_eq!(report.overlapping_interface_residues, vec!["4"]);
        assert!(report.chain_overlap);
        assert_eq!(report.overlapping_chain1_residues[0].residue, "1TYR");
        assert_eq!(report.average_plddt_chain2, Some(65.0));

        let chain = outcome.aligned_structure.find_chain_by_id('A').unwrap();
        let partner_atom = outcome.aligned_structure.chain_atom_ids(chain)[0];
        let position = outcome.aligned_structure.atom(partner_atom).unwrap().position;
        assert!((position - Point3::new(3.0 * 3.8, 3.5, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn partners_on_opposite_ends_are_compatible() {
        let structure1 = complex('A', 'B', 0, &moved);
        let structure2 = complex('A', 'B', 7, &|p| p);

        let outcome = run(
            structure1,
            &structure2,
            &chains('A', 'A', 'B', 'B'),
            &config(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(!outcome.report.interface_overlap);
        assert!(!outcome.report.chain_overlap);
        assert_eq!(outcome.report.num_overlapping_chain1_residues, 0);
    }

    #[test]
    fn missing_test_chain_is_reported_before_alignment() {
        let structure1 = complex('A', 'B', 0, &|p| p);
        let structure2 = complex('A', 'B', 0, &|p| p);
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                events.lock().unwrap().push(name);
            }
        }));

        let result = run(
            structure1,
            &structure2,
            &chains('A', 'A', 'C', 'B'),
            &config(),
            &reporter,
        );

        assert!(matches!(
            result,
            Err(EngineError::Selection {
                source: SelectionError::ChainNotFound('C')
            })
        ));
        assert_eq!(*events.lock().unwrap(), vec!["Validating chains"]);
    }

    #[test]
    fn non_protein_common_chain_is_flagged_but_compared() {
        let structure1 = complex_of(ChainType::Ligand, 'A', 'B', 3, &moved);
        let structure2 = complex('A', 'B', 3, &|p| p);
        let notes = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(note) = event {
                notes.lock().unwrap().push(note);
            }
        }));

        let outcome = run(
            structure1,
            &structure2,
            &chains('A', 'A', 'B', 'B'),
            &config(),
            &reporter,
        )
        .unwrap();

        assert!(outcome.report.interface_overlap);
        let notes = notes.lock().unwrap();
        assert_eq!(
            notes
                .iter()
                .filter(|note| note.contains("not a protein chain"))
                .collect::<Vec<_>>(),
            vec!["Common chain A of structure 1 is not a protein chain"]
        );
    }

    #[test]
    fn identical_common_and_test_chain_is_rejected() {
        let structure1 = complex('A', 'B', 0, &|p| p);
        let structure2 = complex('A', 'B', 0, &|p| p);
        let result = run(
            structure1,
            &structure2,
            &chains('A', 'A', 'A', 'B'),
            &config(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::ChainRoleConflict { structure: 1, .. })
        ));
    }
}
