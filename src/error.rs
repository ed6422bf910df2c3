//! Error type shared by the auth session, its HTTP client, and token stores.
//!
//! ERROR HANDLING
//! ==============
//! `Display` output is what ends up in `AuthState::error`, so variants that
//! carry a server message render it verbatim.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A stored or supplied token failed validation.
    #[error("Invalid token")]
    InvalidToken,

    /// An authenticated call was attempted without a held token.
    #[error("not signed in")]
    MissingToken,

    /// A success response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The durable token slot could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl AuthError {
    /// HTTP status for `Rejected` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
