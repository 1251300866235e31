//! # Workflows Module
//!
//! High-level entry points that run a complete structure comparison.
//!
//! ## Overview
//!
//! A workflow takes two parsed structures and the chain roles within them, superposes the
//! common chains, measures interface and chain overlap, and packages the outcome as an
//! [`report::OverlapReport`] ready to be rendered as text or serialized.
//!
//! ## Architecture
//!
//! - **Comparison Workflow** ([`compare`]) - Validation, superposition, and overlap analysis
//!   with phase-by-phase progress reporting.
//! - **Reports** ([`report`]) - The result record and its plain-text rendering.

pub mod compare;
pub mod report;
