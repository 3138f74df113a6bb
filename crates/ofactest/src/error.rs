//! Check error types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use ofactest_client::ClientError;

use crate::checks::format_elapsed;

/// Why a check failed.
///
/// Transport and protocol failures mean the service could not be asked;
/// semantic failures mean it answered with the wrong data.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Network failure or timeout before a response arrived.
    #[error("{operation} failed: {cause}")]
    Transport {
        /// Operation that was attempted.
        operation: &'static str,
        /// Underlying cause.
        cause: String,
    },

    /// Non-2xx status.
    #[error("{operation} error (status code: {status}){}", detail(.message))]
    Protocol {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Error text from the response body, may be empty.
        message: String,
    },

    /// Well-formed response that violates an expectation.
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// The run was cancelled while this operation was pending.
    #[error("{operation} cancelled")]
    Cancelled {
        /// Operation that was abandoned.
        operation: &'static str,
    },

    /// The overall run deadline passed.
    #[error("{operation} deadline exceeded")]
    DeadlineExceeded {
        /// Operation that was abandoned.
        operation: &'static str,
    },
}

impl CheckError {
    /// Map a client error for `operation` into the check taxonomy.
    #[must_use]
    pub fn from_client(operation: &'static str, err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => Self::Protocol {
                operation,
                status,
                message,
            },
            ClientError::Serialization(e) => Self::Semantic(SemanticError::MalformedResponse {
                operation,
                cause: e.to_string(),
            }),
            ClientError::Http(e) => Self::Transport {
                operation,
                cause: e.to_string(),
            },
            ClientError::Configuration(cause) => Self::Transport { operation, cause },
        }
    }

    /// HTTP status code attached to the failure, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short category name for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Semantic(_) => "semantic",
            Self::Cancelled { .. } | Self::DeadlineExceeded { .. } => "cancelled",
        }
    }

    /// Whether the run as a whole was aborted, as opposed to this check failing.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

/// A response that arrived intact but holds the wrong data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    /// No download records at all.
    #[error("empty downloads response")]
    EmptyDownloads,

    /// The latest record has a zero or missing timestamp.
    #[error("latest download has a zero timestamp")]
    ZeroTimestamp,

    /// The latest record claims to be from the future.
    #[error("latest download timestamp {timestamp} is in the future")]
    FutureTimestamp {
        /// Reported timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The latest record is older than the configured bound.
    #[error("last download was {} ago, older than the {} limit", human(.age), human(.limit))]
    StaleDownload {
        /// Age of the latest record.
        age: Duration,
        /// Configured staleness bound.
        limit: Duration,
    },

    /// The body could not be decoded.
    #[error("malformed {operation} response: {cause}")]
    MalformedResponse {
        /// Operation whose response was malformed.
        operation: &'static str,
        /// Decoder error.
        cause: String,
    },

    /// The expected entity was not among the results.
    #[error("search {query:?}: expected entity {expected} but {}", describe_top(.top))]
    MismatchedIdentifier {
        /// Query that was sent.
        query: String,
        /// Entity id that should have matched.
        expected: String,
        /// Best candidate actually returned.
        top: Option<(String, f64)>,
    },

    /// The expected entity matched, but too weakly.
    #[error("search {query:?}: entity {entity_id} scored {score:.2}, below threshold {min_score:.2}")]
    ScoreBelowThreshold {
        /// Query that was sent.
        query: String,
        /// Entity id that matched.
        entity_id: String,
        /// Observed score.
        score: f64,
        /// Required score.
        min_score: f64,
    },

    /// A query that should match nothing produced a strong match.
    #[error("search {query:?}: unexpected match {entity_id} scored {score:.2}, above {max_score:.2}")]
    UnexpectedMatch {
        /// Query that was sent.
        query: String,
        /// Entity id of the false positive.
        entity_id: String,
        /// Observed score.
        score: f64,
        /// Score no candidate may exceed.
        max_score: f64,
    },
}

fn detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

fn human(duration: &Duration) -> String {
    format_elapsed(*duration)
}

fn describe_top(top: &Option<(String, f64)>) -> String {
    match top {
        Some((id, score)) => format!("top result was {id} ({score:.2})"),
        None => "no results were returned".to_string(),
    }
}
