//! # Engine Module
//!
//! This module implements the structural comparison engine: superposing the shared protein of
//! two complexes and measuring where their binding partners and interfaces coincide.
//!
//! ## Overview
//!
//! Two complexes that share a protein are placed in a common frame by aligning the shared
//! chains. Once superposed, contact queries between the chains of both structures reveal
//! whether the two partners engage the same surface of the shared protein (an interface
//! overlap) and whether the partners themselves would occupy the same space (a chain overlap).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Contact cutoff, confidence atom, and alignment settings
//! - **Superposition** ([`superposition`]) - Sequence-guided, outlier-rejecting rigid fit
//! - **Overlap Analysis** ([`overlap`]) - Interface and chain overlap detection
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod error;
pub mod overlap;
pub mod progress;
pub mod superposition;
