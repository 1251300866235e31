//! # Core Models Module
//!
//! Data structures describing a macromolecular structure as read from a coordinate file.
//!
//! - [`atom`] - Individual atoms with coordinates and per-atom attributes (B-factor, occupancy)
//! - [`residue`] - Residues and the amino acid classification used for sequence alignment
//! - [`chain`] - Polymer chains keyed by their single-character identifier
//! - [`system`] - The complete structure with lookups across all components
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ```ignore
//! use exclusivity::core::models::{system::MolecularSystem, atom::Atom};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A', ChainType::Protein);
//! let residue_id = system.add_residue(chain_id, 1, ' ', "ALA").unwrap();
//! system.add_atom_to_residue(residue_id, Atom::new("CA", residue_id, Point3::origin()));
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
