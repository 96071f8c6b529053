pub mod bank;
pub mod engine;
pub mod error;
pub mod intent;
pub mod reply;
pub mod session;
pub mod stats;

pub use bank::QuestionBank;
pub use engine::{Engine, Outcome};
pub use error::QuizError;
pub use intent::Intent;
pub use reply::{Formatting, RenderableOutcome, Replies};
pub use session::{Phase, SessionState};
pub use stats::{AttemptTier, LifetimeStats, LifetimeTier, Summary};

/// Token the user sends to answer "yes".
pub const YES_TOKEN: &str = "да";
/// Token the user sends to answer "no".
pub const NO_TOKEN: &str = "нет";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Expects an already normalized (trimmed, lowercased) token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            YES_TOKEN => Some(Answer::Yes),
            NO_TOKEN => Some(Answer::No),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Answer::Yes => YES_TOKEN,
            Answer::No => NO_TOKEN,
        }
    }
}

/// Explanation text for both possible answers to a question.
///
/// Both entries always exist, so looking one up can never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanations {
    yes: String,
    no: String,
}

impl Explanations {
    pub fn new(yes: String, no: String) -> Self {
        Self { yes, no }
    }

    pub fn for_answer(&self, answer: Answer) -> &str {
        match answer {
            Answer::Yes => &self.yes,
            Answer::No => &self.no,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub prompt: String,
    pub correct_answer: Answer,
    explanations: Explanations,
}

impl QuizItem {
    pub fn new(prompt: String, correct_answer: Answer, explanations: Explanations) -> Self {
        Self {
            prompt,
            correct_answer,
            explanations,
        }
    }

    pub fn is_correct(&self, given: Answer) -> bool {
        given == self.correct_answer
    }

    /// The explanation is keyed by the answer the user gave, not by the
    /// correct one: a wrong answer gets the "why wrong" text.
    pub fn explanation(&self, given: Answer) -> &str {
        self.explanations.for_answer(given)
    }
}
