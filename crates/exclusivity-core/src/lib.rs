//! # Exclusivity Core Library
//!
//! Decides whether two binding partners of a shared ("common") protein occupy overlapping,
//! and therefore mutually exclusive, binding sites. Two complex structures are superposed on
//! the common protein and the interfaces of the two partners are compared residue by residue.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless structure models (`MolecularSystem`), PDB and
//!   manifest I/O, atom selections, and geometric utilities (superposition, neighbor grids,
//!   sequence alignment).
//!
//! - **[`engine`]: The Analysis Steps.** Configuration, error types, progress reporting, the
//!   sequence-guided superposition of the common chains, and the interface/chain overlap
//!   queries.
//!
//! - **[`workflows`]: The Public API.** Runs a complete comparison of two structures and
//!   renders the resulting report.

pub mod core;
pub mod engine;
pub mod workflows;
