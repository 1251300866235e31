//! # Core Module
//!
//! Building blocks shared by the analysis engine: the molecular data model, file formats,
//! selections over a structure, and geometric utilities.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, and systems
//! - **File I/O** ([`io`]) - PDB coordinates and dimer-pair manifest lines
//! - **Selections** ([`selection`]) - Chain selectors and distance-based atom selections
//! - **Utilities** ([`utils`]) - Superposition, neighbor search, and sequence alignment

pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
