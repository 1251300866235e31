//! Provides input/output functionality for the files a comparison consumes.
//!
//! Structures are read from PDB coordinate files through the [`traits::MolecularFile`]
//! interface; dimer-pair manifests pair two such structures and name the shared protein.

pub mod manifest;
pub mod pdb;
pub mod traits;
