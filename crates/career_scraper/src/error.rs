use thiserror::Error;

pub type Result<T> = std::result::Result<T, CareerError>;

#[derive(Debug, Error)]
pub enum CareerError {
    /// Username is not a battletag but the pc platform was requested.
    #[error("'{username}' is not a valid battletag (expected Name#1234)")]
    InvalidIdentityFormat { username: String },

    #[error("player region is not defined, run region detection first")]
    RegionUndefined,

    #[error("player platform is not defined, run platform detection first")]
    PlatformUndefined,

    /// Contract failure: a fetch was attempted without a resolvable profile URL.
    #[error("profile URL is not defined")]
    ProfileUrlUndefined,

    /// Required element missing from a fetched page, the layout has changed.
    #[error("required element '{element}' not found in profile page")]
    StructuralParseFailure { element: &'static str },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request for {url} did not finish before the deadline")]
    Timeout { url: String },

    #[error("invalid CSS selector '{0}'")]
    InvalidSelector(String),

    #[error("stat label '{label}' is mapped more than once")]
    DuplicateLabel { label: String },

    #[error("invalid roster: {0}")]
    Roster(String),

    #[error("roster JSON: {0}")]
    RosterJson(#[from] serde_json::Error),

    #[error("roster file: {0}")]
    Io(#[from] std::io::Error),
}
