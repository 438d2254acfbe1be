use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;
use tokio_util::codec::LinesCodecError;

/// Reasons a line or one of its segments does not match the wire grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("quote not closed (opened at position {position})")]
    QuoteNotClosed { position: usize },

    #[error("separator expected at position {position}")]
    SeparatorExpected { position: usize },

    #[error("user segment `{segment}` has {found} fields, expected {expected}")]
    FieldCount {
        segment: String,
        found: usize,
        expected: &'static str,
    },

    #[error("invalid update age `{0}`")]
    InvalidAge(String),

    #[error("empty user id in segment `{0}`")]
    EmptyUserId(String),

    #[error("unknown room state `{0}`")]
    UnknownRoomState(String),

    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Failed to connect to {addr}: {source}")]
    ConnectionError {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {timeout:?} connecting to {addr}")]
    ConnectTimeout { addr: String, timeout: Duration },

    #[error("Server rejected handshake (response: {response:?})")]
    HandshakeRejected { response: Option<String> },

    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("Connection lost: {0}")]
    ConnectionLost(#[from] LinesCodecError),

    #[error("Connection closed by server")]
    ConnectionClosed,

    #[error("Client is not connected")]
    NotConnected,

    #[error("Text cannot be sent as a single protocol line: {text:?}")]
    InvalidWireText { text: String },

    #[error("Task panicked or was cancelled: {0}")]
    TaskPanic(#[from] JoinError),

    #[error("Multiple tasks failed ({} errors): {}", errors.len(), .errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    MultipleTaskErrors { errors: Vec<GroupError> },
}

impl From<tokio::sync::mpsc::error::SendError<String>> for GroupError {
    fn from(_: tokio::sync::mpsc::error::SendError<String>) -> Self {
        GroupError::NotConnected
    }
}
