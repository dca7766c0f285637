use std::path::PathBuf;
use thiserror::Error;

/// Failures that halt the pipeline: the catalog answered, but not in the shape we expect.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed record time range {time:?}: {reason}")]
    MalformedRecord { time: String, reason: String },

    #[error("Unable to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid catalog url")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failures that are logged and then collapsed into an empty or `None` outcome.
#[derive(Error, Debug)]
pub enum SoftFailure {
    #[error("Failed to download image metadata ({status}): {reason}")]
    CatalogRequestFailed { status: u16, reason: String },

    #[error("Failed to download image ({status}): {reason}")]
    BinaryFetchFailed { status: u16, reason: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Invalid download locator {locator:?}: {source}")]
    InvalidLocator {
        locator: String,
        source: url::ParseError,
    },

    #[error("Trouble saving file {}: {source}", path.display())]
    PersistenceFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown ranking policy {0:?}, expected one of: date, resolution, cloudcover")]
pub struct PolicyParseError(pub String);
