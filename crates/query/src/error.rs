use thiserror::Error;

use crate::QueryKey;

/// Errors surfaced by reads and writes. Cloneable so one failed fetch can be
/// handed to every reader that joined it.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// No actor connection is available.
    #[error("not connected to the backend")]
    Disconnected,

    /// The remote call failed.
    #[error("{0}")]
    Remote(String),

    /// A cached value was stored under the key with a different type.
    #[error("cached value for {0} has an unexpected type")]
    TypeMismatch(QueryKey),
}
