//! Failures surfaced by the post repository client.

use reqwest::StatusCode;
use thiserror::Error;

/// Which repository call failed; carries the request-specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    List,
    Create,
    Update,
    Delete,
}

impl RequestKind {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch posts",
            Self::Create => "Failed to create post",
            Self::Update => "Failed to update post",
            Self::Delete => "Failed to delete post",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {} (status {status})", .kind.failure_message())]
    RequestFailed { kind: RequestKind, status: StatusCode },
    #[error("request failed: {}: {source}", .kind.failure_message())]
    Transport {
        kind: RequestKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed response body for {kind:?}: {source}")]
    Decode {
        kind: RequestKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid api base url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    pub fn kind(&self) -> Option<RequestKind> {
        match self {
            Self::RequestFailed { kind, .. }
            | Self::Transport { kind, .. }
            | Self::Decode { kind, .. } => Some(*kind),
            Self::InvalidUrl { .. } | Self::Build(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
