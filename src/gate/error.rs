use thiserror::Error;

use crate::database::StoreError;
use crate::types::Resource;

/// Reasons a gate chain stops before the handler runs
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Not authorized")]
    Unauthenticated,

    #[error("Invalid token")]
    InvalidCredential,

    #[error("{0} not found")]
    NotFound(Resource),

    /// Child entity does not belong to the claimed parent
    #[error("Invalid action")]
    InvalidScope,

    #[error("Invalid action")]
    Forbidden,

    /// A handler or gate read a context slot the pipeline never filled
    #[error("Request context is missing {0}")]
    MissingSlot(&'static str),

    /// The route declares a loader but the path carries no id for it
    #[error("Route has no path id for {0}")]
    MissingPathId(Resource),

    #[error(transparent)]
    Store(#[from] StoreError),
}
