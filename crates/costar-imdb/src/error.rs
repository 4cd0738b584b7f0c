//! Error types for the IMDb oracles

use costar_core::{NodeId, OracleError};
use thiserror::Error;

/// Result type for IMDb operations
pub type Result<T> = std::result::Result<T, ImdbError>;

/// Errors raised while fetching or reading IMDb pages
#[derive(Error, Debug)]
pub enum ImdbError {
    /// Network or protocol failure from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Not an IMDb name or title id: {0}")]
    InvalidId(String),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The page lacks the structure the parser relies on
    #[error("Unexpected page layout: {0}")]
    Parse(String),

    #[error("Invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ImdbError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse(reason.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Classify this failure as the oracle error of a lookup for `node`
    ///
    /// A 404 means the node does not exist. Network failures and other
    /// statuses may clear up on retry; everything else is a parse error.
    pub fn into_oracle_error(self, node: &NodeId) -> OracleError {
        match self {
            e if e.is_not_found() => OracleError::NotFound(node.clone()),
            e @ (Self::Http(_) | Self::Status { .. }) => OracleError::transient(node, e.to_string()),
            e => OracleError::parse(node, e.to_string()),
        }
    }
}
