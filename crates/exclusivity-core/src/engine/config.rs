use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted gap penalty; BLOSUM62 scores stay within -4..=11.
pub const MAX_GAP_PENALTY: i32 = 1000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which atoms of each aligned residue pair take part in the superposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentAtoms {
    /// Every heavy atom whose name appears in both residues.
    #[default]
    All,
    /// Backbone heavy atoms only (N, CA, C, O).
    Backbone,
    /// Alpha carbons only.
    CaOnly,
}

impl FromStr for AlignmentAtoms {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "backbone" => Ok(Self::Backbone),
            "ca" => Ok(Self::CaOnly),
            other => Err(ConfigError::InvalidParameter {
                name: "alignment.atoms",
                reason: format!("'{other}' is not one of all, backbone, ca"),
            }),
        }
    }
}

impl fmt::Display for AlignmentAtoms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Backbone => "backbone",
            Self::CaOnly => "ca",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Maximum number of outlier-rejection cycles after the initial fit.
    pub cycles: usize,
    /// Pairs deviating by more than this multiple of the current RMSD are rejected.
    pub outlier_cutoff: f64,
    pub atoms: AlignmentAtoms,
    pub gap_open: i32,
    pub gap_extend: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Distance (Angstroms) under which two atoms are in contact.
    pub contact_cutoff: f64,
    /// Atom whose B-factor is read as the per-residue confidence (pLDDT).
    pub confidence_atom: String,
    pub alignment: AlignmentConfig,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    contact_cutoff: Option<f64>,
    confidence_atom: Option<String>,
    cycles: Option<usize>,
    outlier_cutoff: Option<f64>,
    atoms: Option<AlignmentAtoms>,
    gap_open: Option<i32>,
    gap_extend: Option<i32>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_cutoff(mut self, cutoff: f64) -> Self {
        self.contact_cutoff = Some(cutoff);
        self
    }
    pub fn confidence_atom(mut self, name: impl Into<String>) -> Self {
        self.confidence_atom = Some(name.into());
        self
    }
    pub fn cycles(mut self, cycles: usize) -> Self {
        self.cycles = Some(cycles);
        self
    }
    pub fn outlier_cutoff(mut self, cutoff: f64) -> Self {
        self.outlier_cutoff = Some(cutoff);
        self
    }
    pub fn atoms(mut self, atoms: AlignmentAtoms) -> Self {
        self.atoms = Some(atoms);
        self
    }
    pub fn gap_open(mut self, penalty: i32) -> Self {
        self.gap_open = Some(penalty);
        self
    }
    pub fn gap_extend(mut self, penalty: i32) -> Self {
        self.gap_extend = Some(penalty);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let contact_cutoff = self
            .contact_cutoff
            .ok_or(ConfigError::MissingParameter("contact_cutoff"))?;
        require_positive("contact_cutoff", contact_cutoff)?;

        let confidence_atom = self
            .confidence_atom
            .ok_or(ConfigError::MissingParameter("confidence_atom"))?;
        if confidence_atom.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "confidence_atom",
                reason: "atom name must not be empty".to_string(),
            });
        }

        let outlier_cutoff = self
            .outlier_cutoff
            .ok_or(ConfigError::MissingParameter("outlier_cutoff"))?;
        require_positive("outlier_cutoff", outlier_cutoff)?;

        let gap_open = self
            .gap_open
            .ok_or(ConfigError::MissingParameter("gap_open"))?;
        let gap_extend = self
            .gap_extend
            .ok_or(ConfigError::MissingParameter("gap_extend"))?;
        let penalty_range = 0..=MAX_GAP_PENALTY;
        if !penalty_range.contains(&gap_open) || !penalty_range.contains(&gap_extend) {
            return Err(ConfigError::InvalidParameter {
                name: "gap penalties",
                reason: format!(
                    "penalties must be between 0 and {MAX_GAP_PENALTY} \
                     (open {gap_open}, extend {gap_extend})"
                ),
            });
        }

        let alignment = AlignmentConfig {
            cycles: self.cycles.ok_or(ConfigError::MissingParameter("cycles"))?,
            outlier_cutoff,
            atoms: self.atoms.ok_or(ConfigError::MissingParameter("atoms"))?,
            gap_open,
            gap_extend,
        };

        Ok(AnalysisConfig {
            contact_cutoff,
            confidence_atom: confidence_atom.trim().to_string(),
            alignment,
        })
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}
