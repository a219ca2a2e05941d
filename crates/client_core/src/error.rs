use thiserror::Error;

use crate::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Decode,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Decode => "decode",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            ClientError::Transport { operation, .. } | ClientError::Decode { operation, .. } => {
                *operation
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Transport { .. } => ErrorCategory::Transport,
            ClientError::Decode { .. } => ErrorCategory::Decode,
        }
    }

    /// True when the call never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn is_decode(&self) -> bool {
        self.category() == ErrorCategory::Decode
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
