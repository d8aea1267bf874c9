#![forbid(unsafe_code)]

pub mod ai;
pub mod config;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use ai::TutorService;
pub use config::{AiConfig, BackendSelection, CallPolicy, EngineConfig, ProviderConfig};
pub use error::{ConfigError, EngineError, TutorError};

pub use sessions::{
    AnswerResult, AnswerSubmission, BatchReport, ExplainEntry, Explanation, NextOutcome,
    QuizEngine, ServedItem, SessionKey, SessionStore,
};
