use crate::engine::overlap::{ChainOverlap, OverlapAnalysis, ResidueConfidence};
use crate::engine::superposition::AlignmentOutcome;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::{self, Write};

const EMPTY_LIST: &str = "none";
const NOT_AVAILABLE: &str = "N/A";

/// Statistics of the common-chain superposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub rmsd: f64,
    pub atom_count: usize,
    pub initial_rmsd: f64,
    pub initial_atom_count: usize,
    pub cycles: usize,
    pub aligned_residues: usize,
}

impl From<&AlignmentOutcome> for AlignmentSummary {
    fn from(outcome: &AlignmentOutcome) -> Self {
        Self {
            rmsd: outcome.rmsd,
            atom_count: outcome.atom_count,
            initial_rmsd: outcome.initial_rmsd,
            initial_atom_count: outcome.initial_atom_count,
            cycles: outcome.cycles,
            aligned_residues: outcome.aligned_residues,
        }
    }
}

/// Result of comparing two complexes that share a protein.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapReport {
    #[serde(serialize_with = "yes_no")]
    pub interface_overlap: bool,
    pub overlapping_interface_residues: Vec<String>,
    pub num_overlapping_interface_residues: usize,
    pub alignment: Option<AlignmentSummary>,
    #[serde(serialize_with = "yes_no")]
    pub chain_overlap: bool,
    pub overlapping_chain1_residues: Vec<ResidueConfidence>,
    pub num_overlapping_chain1_residues: usize,
    pub average_plddt_chain1: Option<f64>,
    pub overlapping_chain2_residues: Vec<ResidueConfidence>,
    pub num_overlapping_chain2_residues: usize,
    pub average_plddt_chain2: Option<f64>,
}

fn yes_no<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(flag_text(*flag))
}

fn flag_text(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl OverlapReport {
    pub fn new(analysis: OverlapAnalysis, alignment: Option<AlignmentSummary>) -> Self {
        let OverlapAnalysis {
            interface_residues,
            chain1,
            chain2,
        } = analysis;
        let chain_overlap = !chain1.is_empty() || !chain2.is_empty();
        let average_plddt_chain1 = chain1.average_plddt();
        let average_plddt_chain2 = chain2.average_plddt();
        let ChainOverlap { residues: chain1 } = chain1;
        let ChainOverlap { residues: chain2 } = chain2;

        Self {
            interface_overlap: !interface_residues.is_empty(),
            num_overlapping_interface_residues: interface_residues.len(),
            overlapping_interface_residues: interface_residues,
            alignment,
            chain_overlap,
            num_overlapping_chain1_residues: chain1.len(),
            overlapping_chain1_residues: chain1,
            average_plddt_chain1,
            num_overlapping_chain2_residues: chain2.len(),
            overlapping_chain2_residues: chain2,
            average_plddt_chain2,
        }
    }

    /// Writes the eleven-line plain-text report.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        joined
    }
}

fn two_decimals(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for OverlapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Interface Overlap: {}", flag_text(self.interface_overlap))?;
        writeln!(
            f,
            "Overlapping Interface Residues: {}",
            join_or_none(self.overlapping_interface_residues.iter().map(String::as_str))
        )?;
        writeln!(
            f,
            "Number of Overlapping Interface Residues: {}",
            self.num_overlapping_interface_residues
        )?;
        writeln!(
            f,
            "Alignment RMSD: {}",
            two_decimals(self.alignment.as_ref().map(|a| a.rmsd))
        )?;
        writeln!(f, "Chain Overlap: {}", flag_text(self.chain_overlap))?;

        let chains = [
            (
                1,
                &self.overlapping_chain1_residues,
                self.num_overlapping_chain1_residues,
                self.average_plddt_chain1,
            ),
            (
                2,
                &self.overlapping_chain2_residues,
                self.num_overlapping_chain2_residues,
                self.average_plddt_chain2,
            ),
        ];
        for (index, residues, count, average) in chains {
            writeln!(
                f,
                "Overlapping Chain {index} Residues: {}",
                join_or_none(residues.iter().map(|r| r.residue.as_str()))
            )?;
            writeln!(f, "Number of Overlapping Chain {index} Residues: {count}")?;
            writeln!(
                f,
                "Average pLDDT for Overlapping Chain {index}: {}",
                two_decimals(average)
            )?;
        }
        Ok(())
    }
}
