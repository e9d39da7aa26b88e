use encore_model::GigId;
use thiserror::Error;

/// Errors returned by client operations. Each one has already been surfaced
/// as a notification where the user should see it.
#[derive(Debug, Error)]
pub enum Error {
    /// Ticket image could not be encoded.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Ticket file could not be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Scanned payload does not belong to the gig.
    #[error("ticket does not match gig {0}")]
    InvalidTicket(GigId),

    /// Login flow failed.
    #[error("login failed: {0}")]
    Login(String),

    /// Read or write through the query client failed.
    #[error(transparent)]
    Query(#[from] encore_query::Error),

    /// Input rejected before any remote call.
    #[error("{0}")]
    Validation(&'static str),
}
