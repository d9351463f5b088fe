//! Error taxonomy shared by the engine and its collaborators.
//!
//! Every request resolves to exactly one success value or one of these
//! errors. Storage-layer failures are folded into the nearest kind
//! (`UpdateError::Storage`, `QueryError::Storage`, `StartupError::Storage`)
//! so backend-specific error shapes never reach callers.

use thiserror::Error;

/// Invalid construction options.
///
/// Raised synchronously, before any connection attempt is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("name is required")]
    MissingName,

    #[error("name must be a non-empty string")]
    EmptyName,

    #[error("url is required")]
    MissingUrl,

    #[error("url must be a non-empty string")]
    EmptyUrl,

    #[error("numEntries is required")]
    MissingNumEntries,

    #[error("numEntries must be a positive integer, got {0}")]
    NonPositiveNumEntries(i64),

    /// `numEntries` came from a text source and did not parse as an integer.
    #[error("numEntries must be an integer, got '{0}'")]
    InvalidNumEntries(String),

    /// The options document itself could not be decoded.
    #[error("malformed options: {0}")]
    Malformed(String),
}

/// Rejected single or batch update.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("index {index} is out of range [0, {num_entries})")]
    IndexOutOfRange { index: u64, num_entries: u64 },

    #[error("quantity {quantity} at index {index} must be non-negative")]
    NegativeQuantity { index: u64, quantity: i64 },

    #[error("attribute {key} at index {index} shadows a record field")]
    ReservedAttribute { index: u64, key: String },

    /// The first entry of a batch that failed validation. Nothing in the
    /// batch was written.
    #[error("invalid entry at batch position {position}: {source}")]
    InvalidBatchEntry {
        position: usize,
        source: Box<UpdateError>,
    },

    #[error("storage write failed: {0}")]
    Storage(String),
}

impl UpdateError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Wrap a single-entry failure with its position in a batch.
    pub fn in_batch(position: usize, source: UpdateError) -> Self {
        Self::InvalidBatchEntry {
            position,
            source: Box::new(source),
        }
    }

    /// True when the failure came from input validation (no storage call was made).
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Rejected or failed query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("index {index} is out of range [0, {num_entries})")]
    IndexOutOfRange { index: u64, num_entries: u64 },

    #[error("start {start} is greater than end {end}")]
    InvertedRange { start: u64, end: u64 },

    #[error("bound {bound} is out of range [0, {num_entries}]")]
    BoundOutOfRange { bound: u64, num_entries: u64 },

    #[error("storage read failed: {0}")]
    Storage(String),
}

impl QueryError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Failure to bring an engine to the ready state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to storage: {0}")]
    Storage(String),
}

impl StartupError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_messages_are_stable() {
        assert_eq!(ConfigError::MissingUrl.to_string(), "url is required");
        assert_eq!(ConfigError::MissingNumEntries.to_string(), "numEntries is required");
        assert_eq!(
            ConfigError::NonPositiveNumEntries(0).to_string(),
            "numEntries must be a positive integer, got 0"
        );
        assert_eq!(
            ConfigError::InvalidNumEntries("ten".into()).to_string(),
            "numEntries must be an integer, got 'ten'"
        );
    }

    #[test]
    fn batch_error_names_position_and_cause() {
        let err = UpdateError::in_batch(
            2,
            UpdateError::NegativeQuantity {
                index: 4,
                quantity: -1,
            },
        );
        assert_eq!(
            err.to_string(),
            "invalid entry at batch position 2: quantity -1 at index 4 must be non-negative"
        );
        assert!(err.is_validation());
        assert!(!UpdateError::storage("disk full").is_validation());
    }

    #[test]
    fn query_messages_are_stable() {
        assert_eq!(
            QueryError::InvertedRange { start: 5, end: 2 }.to_string(),
            "start 5 is greater than end 2"
        );
        assert_eq!(
            QueryError::BoundOutOfRange {
                bound: 11,
                num_entries: 10
            }
            .to_string(),
            "bound 11 is out of range [0, 10]"
        );
        assert_eq!(
            QueryError::IndexOutOfRange {
                index: 10,
                num_entries: 10
            }
            .to_string(),
            "index 10 is out of range [0, 10)"
        );
    }

    #[test]
    fn startup_wraps_config_transparently() {
        let err: StartupError = ConfigError::MissingName.into();
        assert_eq!(err.to_string(), "name is required");
        assert_eq!(
            StartupError::storage("refused").to_string(),
            "failed to connect to storage: refused"
        );
    }
}
