mod engine;
mod store;
mod view;

// Public API of the session subsystem.
pub use crate::error::EngineError;
pub use engine::QuizEngine;
pub use store::{SessionKey, SessionStore};
pub use view::{
    AnswerResult, AnswerSubmission, BatchReport, ExplainEntry, Explanation, NextOutcome, ServedItem,
};
