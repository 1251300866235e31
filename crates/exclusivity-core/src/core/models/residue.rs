use super::ids::{AtomId, ChainId};
use phf::phf_map;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// A standard amino acid, named by its three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueType {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
}

// Force-field and modified-residue spellings map onto their parent amino acid.
static RESIDUE_NAMES: phf::Map<&'static str, ResidueType> = phf_map! {
    "ALA" => ResidueType::Ala,
    "ARG" => ResidueType::Arg,
    "ASN" => ResidueType::Asn,
    "ASP" => ResidueType::Asp,
    "CYS" => ResidueType::Cys,
    "CYX" => ResidueType::Cys,
    "GLN" => ResidueType::Gln,
    "GLU" => ResidueType::Glu,
    "GLY" => ResidueType::Gly,
    "HIS" => ResidueType::His,
    "HID" => ResidueType::His,
    "HIE" => ResidueType::His,
    "HIP" => ResidueType::His,
    "HSD" => ResidueType::His,
    "HSE" => ResidueType::His,
    "HSP" => ResidueType::His,
    "ILE" => ResidueType::Ile,
    "LEU" => ResidueType::Leu,
    "LYS" => ResidueType::Lys,
    "MET" => ResidueType::Met,
    "MSE" => ResidueType::Met,
    "PHE" => ResidueType::Phe,
    "PRO" => ResidueType::Pro,
    "SER" => ResidueType::Ser,
    "THR" => ResidueType::Thr,
    "TRP" => ResidueType::Trp,
    "TYR" => ResidueType::Tyr,
    "VAL" => ResidueType::Val,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not an amino acid")]
pub struct ParseResidueTypeError(pub String);

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RESIDUE_NAMES
            .get(s.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| ParseResidueTypeError(s.to_string()))
    }
}

impl ResidueType {
    pub fn one_letter(self) -> u8 {
        use ResidueType::*;
        match self {
            Ala => b'A',
            Arg => b'R',
            Asn => b'N',
            Asp => b'D',
            Cys => b'C',
            Gln => b'Q',
            Glu => b'E',
            Gly => b'G',
            His => b'H',
            Ile => b'I',
            Leu => b'L',
            Lys => b'K',
            Met => b'M',
            Phe => b'F',
            Pro => b'P',
            Ser => b'S',
            Thr => b'T',
            Trp => b'W',
            Tyr => b'Y',
            Val => b'V',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A residue as read from a structure file.
///
/// `residue_type` is `None` for ligands, nucleotides and anything else outside the
/// standard amino acids.
pub struct Residue {
    pub residue_number: isize,
    /// `' '` when the file gives none.
    pub insertion_code: char,
    pub name: String,
    pub residue_type: Option<ResidueType>,
    pub chain_id: ChainId,
    pub(crate) atoms: Vec<AtomId>,
    first_atom_by_name: HashMap<String, AtomId>,
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        insertion_code: char,
        name: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            insertion_code,
            name: name.to_string(),
            residue_type: name.parse().ok(),
            chain_id,
            atoms: Vec::new(),
            first_atom_by_name: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.first_atom_by_name
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.first_atom_by_name.get(name).copied()
    }

    /// The residue identifier as written in reports: the residue number followed by the
    /// insertion code, if any (e.g. "52", "52A").
    pub fn label(&self) -> String {
        if self.insertion_code == ' ' {
            self.residue_number.to_string()
        } else {
            format!("{}{}", self.residue_number, self.insertion_code)
        }
    }

    /// One-letter code for sequence alignment; `X` for unrecognized residues.
    pub fn one_letter(&self) -> u8 {
        self.residue_type.map_or(b'X', |t| t.one_letter())
    }
}
