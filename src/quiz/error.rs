use thiserror::Error;

use crate::quiz::{intent::Intent, session::Phase};

#[derive(Debug, Error)]
pub enum QuizError {
    /// The question bank is malformed. Fatal at load time.
    #[error("question bank is invalid: {0}")]
    DataIntegrity(String),

    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank: {0}")]
    Json(#[from] serde_json::Error),

    /// An intent reached the engine in a phase that has no transition for it.
    #[error("intent {intent:?} is not valid in phase {phase:?}")]
    InvalidTransition { intent: Intent, phase: Phase },

    /// Session progress points outside the question bank.
    #[error("session state is corrupted: index {index} in phase {phase:?} with {total} questions")]
    StateCorruption {
        index: usize,
        phase: Phase,
        total: usize,
    },
}

impl QuizError {
    pub fn data_integrity(message: impl Into<String>) -> Self {
        QuizError::DataIntegrity(message.into())
    }
}
