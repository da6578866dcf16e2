//! Workspace error type.
//!
//! Sub-crates define their own error enums and wrap `AfError` as one variant
//! where they need to.

use thiserror::Error;

use crate::ActorId;

/// The common base error for `af-*` crates.
#[derive(Debug, Error)]
pub enum AfError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),
}
