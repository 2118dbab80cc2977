//! Query path errors.

use thiserror::Error;

use crate::catalog::ValidationError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Bad mod, type or pagination input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced collection is absent from the store listing.
    #[error("{0} does not exist or is an unknown class type")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
