use super::ids::ResidueId;

const SOLVENT_NAMES: [&str; 4] = ["HOH", "WAT", "DOD", "H2O"];

/// What a chain holds, judged from the first record that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Protein,
    Ligand,
    /// Solvent and anything else that is neither polymer nor ligand.
    Other,
}

impl ChainType {
    /// Classifies a chain from its opening record: `ATOM` lines start a protein chain,
    /// `HETATM` lines start a ligand chain unless the residue is solvent.
    pub fn from_opening_record(is_hetero: bool, residue_name: &str) -> Self {
        if !is_hetero {
            ChainType::Protein
        } else if SOLVENT_NAMES.contains(&residue_name.trim().to_ascii_uppercase().as_str()) {
            ChainType::Other
        } else {
            ChainType::Ligand
        }
    }

    pub fn is_protein(self) -> bool {
        self == ChainType::Protein
    }
}

/// A named chain and the residues it owns, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,
    pub chain_type: ChainType,
    pub(crate) residues: Vec<ResidueId>,
}

impl Chain {
    pub(crate) fn new(id: char, chain_type: ChainType) -> Self {
        Self {
            id,
            chain_type,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_record_decides_the_chain_type() {
        assert_eq!(ChainType::from_opening_record(false, "ALA"), ChainType::Protein);
        assert_eq!(ChainType::from_opening_record(true, "ATP"), ChainType::Ligand);
        assert_eq!(ChainType::from_opening_record(true, "hoh"), ChainType::Other);
        assert_eq!(ChainType::from_opening_record(false, "HOH"), ChainType::Protein);
        assert!(!ChainType::Ligand.is_protein());
    }

    #[test]
    fn new_chain_owns_no_residues() {
        let chain = Chain::new('B', ChainType::Protein);
        assert_eq!(chain.id, 'B');
        assert!(chain.residues().is_empty());
    }
}
