//! Parsing of dimer-pair manifest lines.
//!
//! A manifest line names two heterodimers that share one protein, e.g. `P1-P2|P1-P3` with
//! `-` separating the proteins of a dimer and `|` separating the dimers. Each dimer label is
//! also the name of the directory holding its structure (`<label>/<label>.pdb`), and the order
//! of the proteins in a label is the order of the chains in that structure.

use crate::core::selection::ChainSelector;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FIRST_CHAIN: char = 'A';
const SECOND_CHAIN: char = 'B';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Input line is empty")]
    EmptyLine,
    #[error("Delimiter for {0} must not be empty")]
    EmptyDelimiter(&'static str),
    #[error("Expected 2 dimers separated by '{delimiter}' in '{line}', found {found}")]
    DimerCount {
        line: String,
        delimiter: String,
        found: usize,
    },
    #[error("Empty dimer label between '{delimiter}' separators in '{line}'")]
    EmptyDimer { line: String, delimiter: String },
    #[error("Expected 2 proteins separated by '{delimiter}' in dimer '{dimer}', found {found}")]
    ProteinCount {
        dimer: String,
        delimiter: String,
        found: usize,
    },
    #[error("Dimers '{first}' and '{second}' do not share a protein")]
    NoCommonProtein { first: String, second: String },
    #[error("Dimer '{dimer}' has no protein besides the common protein '{common}'")]
    NoUniqueProtein { dimer: String, common: String },
}

/// One heterodimer named on a manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimer {
    /// The label as written on the line (e.g. `P1-P2`).
    pub label: String,
    /// The two proteins, in chain order.
    pub proteins: [String; 2],
}

impl Dimer {
    fn parse(label: &str, pair_delim: &str) -> Result<Self, ManifestError> {
        let proteins: Vec<&str> = label.split(pair_delim).map(str::trim).collect();
        if proteins.len() != 2 || proteins.iter().any(|p| p.is_empty()) {
            return Err(ManifestError::ProteinCount {
                dimer: label.to_string(),
                delimiter: pair_delim.to_string(),
                found: proteins.iter().filter(|p| !p.is_empty()).count(),
            });
        }
        Ok(Self {
            label: label.to_string(),
            proteins: [proteins[0].to_string(), proteins[1].to_string()],
        })
    }

    /// Chain `A` if the protein is listed first in the dimer, `B` otherwise.
    pub fn chain_of(&self, protein: &str) -> ChainSelector {
        if self.proteins[0] == protein {
            ChainSelector::new(FIRST_CHAIN)
        } else {
            ChainSelector::new(SECOND_CHAIN)
        }
    }

    fn protein_set(&self) -> BTreeSet<&str> {
        self.proteins.iter().map(String::as_str).collect()
    }
}

/// The chains to compare in each of the two structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainAssignment {
    pub common_chain1: ChainSelector,
    pub common_chain2: ChainSelector,
    pub test_chain1: ChainSelector,
    pub test_chain2: ChainSelector,
}

/// A parsed manifest line: two dimers, the protein they share, and the chain roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimerPairRecord {
    pub first: Dimer,
    pub second: Dimer,
    pub common_protein: String,
    pub unique_protein1: String,
    pub unique_protein2: String,
    pub chains: ChainAssignment,
}

impl DimerPairRecord {
    /// Parses one manifest line.
    ///
    /// # Arguments
    ///
    /// * `line` - The raw line; surrounding whitespace is ignored.
    /// * `pair_delim` - Separator between the two proteins of a dimer.
    /// * `dimer_delim` - Separator between the two dimers.
    ///
    /// # Errors
    ///
    /// Returns a [`ManifestError`] when the line does not name exactly two non-empty dimers
    /// of two proteins each, when the dimers share no protein, or when a dimer consists only
    /// of the shared protein (a homodimer, or two identical dimers).
    pub fn parse(line: &str, pair_delim: &str, dimer_delim: &str) -> Result<Self, ManifestError> {
        if pair_delim.is_empty() {
            return Err(ManifestError::EmptyDelimiter("proteins within a pair"));
        }
        if dimer_delim.is_empty() {
            return Err(ManifestError::EmptyDelimiter("dimers"));
        }
        let line = line.trim();
        if line.is_empty() {
            return Err(ManifestError::EmptyLine);
        }

        let dimers: Vec<&str> = line.split(dimer_delim).map(str::trim).collect();
        if dimers.iter().any(|d| d.is_empty()) {
            return Err(ManifestError::EmptyDimer {
                line: line.to_string(),
                delimiter: dimer_delim.to_string(),
            });
        }
        if dimers.len() != 2 {
            return Err(ManifestError::DimerCount {
                line: line.to_string(),
                delimiter: dimer_delim.to_string(),
                found: dimers.len(),
            });
        }

        let first = Dimer::parse(dimers[0], pair_delim)?;
        let second = Dimer::parse(dimers[1], pair_delim)?;

        let set1 = first.protein_set();
        let set2 = second.protein_set();
        let common: Vec<&str> = set1.intersection(&set2).copied().collect();
        let common_protein = match common.as_slice() {
            [] => {
                return Err(ManifestError::NoCommonProtein {
                    first: first.label.clone(),
                    second: second.label.clone(),
                });
            }
            [single] => single.to_string(),
            [first_common, ..] => {
                // Both proteins are shared; neither dimer has a partner to test.
                return Err(ManifestError::NoUniqueProtein {
                    dimer: first.label.clone(),
                    common: first_common.to_string(),
                });
            }
        };

        let unique_protein1 = unique_partner(&first, &common_protein)?;
        let unique_protein2 = unique_partner(&second, &common_protein)?;

        let chains = ChainAssignment {
            common_chain1: first.chain_of(&common_protein),
            common_chain2: second.chain_of(&common_protein),
            test_chain1: first.chain_of(&unique_protein1),
            test_chain2: second.chain_of(&unique_protein2),
        };

        Ok(Self {
            first,
            second,
            common_protein,
            unique_protein1,
            unique_protein2,
            chains,
        })
    }

    /// Paths of the two structures: `<root>/<label>/<label>.pdb`.
    pub fn structure_paths(&self, root: &Path) -> (PathBuf, PathBuf) {
        let path_for = |dimer: &Dimer| {
            root.join(&dimer.label)
                .join(format!("{}.pdb", dimer.label))
        };
        (path_for(&self.first), path_for(&self.second))
    }

    /// Name of the result file for this pair: `<label1>_<label2>_overlap.txt`.
    pub fn output_file_name(&self) -> String {
        format!("{}_{}_overlap.txt", self.first.label, self.second.label)
    }
}

fn unique_partner(dimer: &Dimer, common: &str) -> Result<String, ManifestError> {
    dimer
        .proteins
        .iter()
        .find(|p| p.as_str() != common)
        .cloned()
        .ok_or_else(|| ManifestError::NoUniqueProtein {
            dimer: dimer.label.clone(),
            common: common.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(c: char) -> ChainSelector {
        ChainSelector::new(c)
    }

    #[test]
    fn parses_line_and_infers_chain_roles() {
        let record = DimerPairRecord::parse("PSMA2-PSMB1|PSMB1-PAAF1\n", "-", "|").unwrap();

        assert_eq!(record.first.label, "PSMA2-PSMB1");
        assert_eq!(record.second.label, "PSMB1-PAAF1");
        assert_eq!(record.common_protein, "PSMB1");
        assert_eq!(record.unique_protein1, "PSMA2");
        assert_eq!(record.unique_protein2, "PAAF1");
        assert_eq!(
            record.chains,
            ChainAssignment {
                common_chain1: chain('B'),
                common_chain2: chain('A'),
                test_chain1: chain('A'),
                test_chain2: chain('B'),
            }
        );
    }

    #[test]
    fn supports_multi_character_delimiters() {
        let record = DimerPairRecord::parse("  X__Y ;; X__Z  ", "__", ";;").unwrap();
        assert_eq!(record.common_protein, "X");
        assert_eq!(record.chains.common_chain1, chain('A'));
        assert_eq!(record.chains.common_chain2, chain('A'));
        assert_eq!(record.chains.test_chain1, chain('B'));
        assert_eq!(record.chains.test_chain2, chain('B'));
    }

    #[test]
    fn resolves_structure_paths_and_output_name() {
        let record = DimerPairRecord::parse("A1-B2|A1-C3", "-", "|").unwrap();
        let (pdb1, pdb2) = record.structure_paths(Path::new("/data"));
        assert_eq!(pdb1, PathBuf::from("/data/A1-B2/A1-B2.pdb"));
        assert_eq!(pdb2, PathBuf::from("/data/A1-C3/A1-C3.pdb"));
        assert_eq!(record.output_file_name(), "A1-B2_A1-C3_overlap.txt");
    }

    #[test]
    fn rejects_empty_lines_and_delimiters() {
        assert_eq!(
            DimerPairRecord::parse("   ", "-", "|"),
            Err(ManifestError::EmptyLine)
        );
        assert!(matches!(
            DimerPairRecord::parse("A-B|A-C", "", "|"),
            Err(ManifestError::EmptyDelimiter(_))
        ));
        assert!(matches!(
            DimerPairRecord::parse("A-B|A-C", "-", ""),
            Err(ManifestError::EmptyDelimiter(_))
        ));
    }

    #[test]
    fn rejects_wrong_number_of_dimers() {
        let err = DimerPairRecord::parse("A-B", "-", "|").unwrap_err();
        assert!(matches!(err, ManifestError::DimerCount { found: 1, .. }));

        let err = DimerPairRecord::parse("A-B|A-C|A-D", "-", "|").unwrap_err();
        assert!(matches!(err, ManifestError::DimerCount { found: 3, .. }));
    }

    #[test]
    fn rejects_empty_dimer_labels() {
        for line in ["A-B||A-C", "A-B|A-C|", "|A-B|A-C", "A-B| |A-C"] {
            assert_eq!(
                DimerPairRecord::parse(line, "-", "|"),
                Err(ManifestError::EmptyDimer {
                    line: line.to_string(),
                    delimiter: "|".to_string(),
                }),
                "{line}"
            );
        }
        let err = DimerPairRecord::parse("A-B::::A-C", "-", "::").unwrap_err();
        assert!(matches!(err, ManifestError::EmptyDimer { .. }));
    }

    #[test]
    fn rejects_dimers_without_two_proteins() {
        let err = DimerPairRecord::parse("A-B-C|A-D", "-", "|").unwrap_err();
        assert!(matches!(err, ManifestError::ProteinCount { found: 3, .. }));

        let err = DimerPairRecord::parse("A-|A-D", "-", "|").unwrap_err();
        assert!(matches!(err, ManifestError::ProteinCount { found: 1, .. }));
    }

    #[test]
    fn rejects_pairs_without_a_shared_protein() {
        let err = DimerPairRecord::parse("A-B|C-D", "-", "|").unwrap_err();
        assert_eq!(
            err,
            ManifestError::NoCommonProtein {
                first: "A-B".into(),
                second: "C-D".into()
            }
        );
    }

    #[test]
    fn rejects_homodimers_and_identical_dimers() {
        let err = DimerPairRecord::parse("A-A|A-B", "-", "|").unwrap_err();
        assert_eq!(
            err,
            ManifestError::NoUniqueProtein {
                dimer: "A-A".into(),
                common: "A".into()
            }
        );

        let err = DimerPairRecord::parse("A-B|B-A", "-", "|").unwrap_err();
        assert!(matches!(err, ManifestError::NoUniqueProtein { .. }));
    }

    #[test]
    fn protein_names_are_case_sensitive() {
        let err = DimerPairRecord::parse("abc-B|ABC-C", "-", "|").unwrap_err();
        assert!(matches!(err, ManifestError::NoCommonProtein { .. }));
    }
}
