use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::HashMap;

type ResidueKey = (ChainId, isize, char);

/// One loaded structure: its chains, residues and atoms, linked by slot map keys.
///
/// Chains keep the order in which they first appeared, and each chain and residue keeps
/// its children in insertion order, so walking [`MolecularSystem::chains_iter`] with
/// [`MolecularSystem::chain_atom_ids`] visits atoms in the same order as the file they
/// came from.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    chain_order: Vec<ChainId>,
    chains_by_letter: HashMap<char, ChainId>,
    residues_by_key: HashMap<ResidueKey, ResidueId>,
}

impl MolecularSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Atoms in storage order, which is not necessarily file order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Chains in the order they first appeared.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Looks a chain up by its letter. Letters are case-sensitive.
    pub fn find_chain_by_id(&self, letter: char) -> Option<ChainId> {
        self.chains_by_letter.get(&letter).copied()
    }

    pub fn find_residue(
        &self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: char,
    ) -> Option<ResidueId> {
        self.residues_by_key
            .get(&(chain_id, residue_number, insertion_code))
            .copied()
    }

    /// Returns the chain with this letter, creating it first if needed.
    ///
    /// The type given for an existing chain is ignored.
    pub fn add_chain(&mut self, letter: char, chain_type: ChainType) -> ChainId {
        *self.chains_by_letter.entry(letter).or_insert_with(|| {
            let id = self.chains.insert(Chain::new(letter, chain_type));
            self.chain_order.push(id);
            id
        })
    }

    /// Returns the residue at (`chain_id`, `residue_number`, `insertion_code`), creating it
    /// at the end of the chain if needed. `None` means the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: char,
        name: &str,
    ) -> Option<ResidueId> {
        let key = (chain_id, residue_number, insertion_code);
        if let Some(&existing) = self.residues_by_key.get(&key) {
            return Some(existing);
        }

        let chain = self.chains.get_mut(chain_id)?;
        let residue_id = self
            .residues
            .insert(Residue::new(residue_number, insertion_code, name, chain_id));
        chain.residues.push(residue_id);
        self.residues_by_key.insert(key, residue_id);
        Some(residue_id)
    }

    /// Stores `atom` under `residue_id`, overriding whatever residue the atom named.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let atom_name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        residue.add_atom(&atom_name, atom_id);
        Some(atom_id)
    }

    /// Atoms of one chain in residue order; empty for an unknown chain.
    pub fn chain_atom_ids(&self, chain_id: ChainId) -> Vec<AtomId> {
        let Some(chain) = self.chains.get(chain_id) else {
            return Vec::new();
        };
        chain
            .residues()
            .iter()
            .filter_map(|&res_id| self.residues.get(res_id))
            .flat_map(|residue| residue.atoms().iter().copied())
            .collect()
    }
}
