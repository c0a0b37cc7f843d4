use thiserror::Error;

use crate::sampling::SamplingError;
use crate::store::StoreError;
use crate::transit::TransitError;

/// Errors from [`crate::session::SamplingSession`].
///
/// Failures while probing a single destination are logged and skipped; only
/// failures that invalidate the whole session surface here.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The point source could not be constructed.
    #[error(transparent)]
    Sampling(#[from] SamplingError),
    /// Reading or writing the trip store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The origin description could not be resolved.
    #[error(transparent)]
    Transit(#[from] TransitError),
}
