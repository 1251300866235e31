use crate::core::selection::{ChainSelector, SelectionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid chain selection: {source}")]
    Selection {
        #[from]
        source: SelectionError,
    },

    #[error(
        "Alignment of the common chains produced only {pairs} matched atom pairs (at least {required} needed)"
    )]
    InsufficientAlignment { pairs: usize, required: usize },

    #[error("Superposition of {pairs} atom pairs failed to converge")]
    Superposition { pairs: usize },

    #[error("Structure {structure} uses {chain} as both the common and the test chain")]
    ChainRoleConflict { structure: u8, chain: ChainSelector },
}
