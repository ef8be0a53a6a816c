use std::error::Error as StdError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("serialize envelope error: {source}")]
    Serialize { source: serde_json::Error },

    #[error("deserialize envelope error: {source}")]
    Deserialize { source: serde_json::Error },

    #[error("invalid status code: {status_code}")]
    InvalidStatus { status_code: u16 },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl EnvelopeError {
    pub fn serialize(source: serde_json::Error) -> Self {
        Self::Serialize { source }
    }

    pub fn deserialize(source: serde_json::Error) -> Self {
        Self::Deserialize { source }
    }

    pub fn invalid_status(status_code: u16) -> Self {
        Self::InvalidStatus { status_code }
    }

    pub fn invalid_body<E: Into<Box<dyn StdError + Send + Sync>>>(e: E) -> Self {
        Self::InvalidBody { reason: e.into().to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// The payload could not be written as JSON.
    pub fn is_serialize(&self) -> bool {
        matches!(self, Self::Serialize { .. })
    }

    /// The input was not a well formed envelope.
    pub fn is_deserialize(&self) -> bool {
        matches!(self, Self::Deserialize { .. })
    }
}
