//! Metadata queries for installed formulae.

use anyhow::Result;
use thiserror::Error;

/// What was recorded about one formula when it was installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaMetadata {
    /// Direct dependency names, in declaration order. May reference
    /// formulae that are not themselves installed.
    pub deps: Vec<String>,
    /// Options the formula was originally installed with.
    pub used_options: Vec<String>,
    /// Whether a prebuilt bottle was used instead of building from source.
    pub from_bottle: bool,
}

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("no keg found for '{0}'")]
    NoKeg(String),

    #[error("'{0}' has no install receipt")]
    MissingReceipt(String),

    #[error("unreadable install receipt for '{name}': {source}")]
    UnreadableReceipt {
        name: String,
        source: std::io::Error,
    },

    #[error("malformed install receipt for '{name}': {source}")]
    MalformedReceipt {
        name: String,
        source: serde_json::Error,
    },
}

/// Source of installed-formula metadata.
///
/// [`installed`](MetadataSource::installed) enumerates the formula names the
/// dump covers; [`load`](MetadataSource::load) answers the per-formula query
/// `name -> {deps, options, bottle?}`. Every [`MetadataError`] is recoverable:
/// the caller records the formula as unavailable and moves on.
pub trait MetadataSource {
    /// Names of all installed formulae, sorted for reproducible output.
    fn installed(&self) -> Result<Vec<String>>;

    /// Load the recorded metadata for one installed formula.
    fn load(&self, name: &str) -> Result<FormulaMetadata, MetadataError>;
}
