//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use quiz_core::ItemBankError;
use quiz_core::model::{EndReason, ItemId};

/// Errors emitted by `QuizEngine` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("choice {index} is out of range for {options} options")]
    InvalidChoice { index: usize, options: usize },
    #[error("invalid session settings: {0}")]
    InvalidSettings(String),
    #[error("session already ended: {0}")]
    SessionEnded(EndReason),
    #[error("no unseen items left in topic")]
    PoolExhausted,
    #[error("session lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Bank(#[from] ItemBankError),
}

/// Errors from a single AI backend call.
///
/// These never reach engine callers; the tutor resolves them to offline text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("AI backend returned an empty response")]
    EmptyResponse,
    #[error("AI backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("AI backend timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown AI backend {raw:?} (expected auto, openai, anthropic or off)")]
    UnknownBackend { raw: String },
    #[error("{var} must be a non-negative integer, got {raw:?}")]
    InvalidNumber { var: &'static str, raw: String },
}
