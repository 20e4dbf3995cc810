//! Custom error types for sitemap-architect

use thiserror::Error;

/// Main error type for sitemap-architect operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required request field is missing or blank
    #[error("{0}")]
    Input(String),

    /// The full resolution produced no URLs
    #[error("{0}")]
    NotFound(String),

    /// Network, timeout or non-success status against a remote URL
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// XML that stays unparseable after sanitization
    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    pub(crate) fn fetch(url: &str, reason: impl Into<String>) -> Self {
        Error::Fetch {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Short, caller-facing description of a fetch or parse failure.
    ///
    /// Prefers the upstream status text carried by `Fetch` over the full message.
    pub fn reason(&self) -> String {
        match self {
            Error::Fetch { reason, .. } => reason.clone(),
            Error::Parse(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for sitemap-architect
pub type Result<T> = std::result::Result<T, Error>;
