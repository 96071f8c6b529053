use crate::quiz::{error::QuizError, stats::LifetimeStats};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Asking,
    /// The explanation is on screen, waiting for next-question/finish.
    Reviewing,
}

/// Per-user quiz progress and lifetime statistics.
///
/// `current_question_index` counts the questions answered in the running
/// attempt, so the question on screen while [`Phase::Asking`] is
/// `bank[current_question_index]`, and an index equal to the bank size while
/// [`Phase::Reviewing`] means the last answer is in and the attempt is ready
/// to be finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionState {
    phase: Phase,
    current_question_index: usize,
    correct_answers_this_attempt: usize,
    lifetime: LifetimeStats,
    pending_reset: bool,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn test_in_progress(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn correct_answers_this_attempt(&self) -> usize {
        self.correct_answers_this_attempt
    }

    pub fn lifetime(&self) -> &LifetimeStats {
        &self.lifetime
    }

    pub(crate) fn lifetime_mut(&mut self) -> &mut LifetimeStats {
        &mut self.lifetime
    }

    pub fn pending_reset(&self) -> bool {
        self.pending_reset
    }

    pub(crate) fn begin_attempt(&mut self) {
        self.phase = Phase::Asking;
        self.current_question_index = 0;
        self.correct_answers_this_attempt = 0;
    }

    /// Records the answer to the question on screen and moves to review.
    pub(crate) fn record_answer(&mut self, correct: bool) {
        debug_assert_eq!(self.phase, Phase::Asking);
        self.current_question_index += 1;
        if correct {
            self.correct_answers_this_attempt += 1;
        }
        self.phase = Phase::Reviewing;
    }

    pub(crate) fn resume_asking(&mut self) {
        debug_assert_eq!(self.phase, Phase::Reviewing);
        self.phase = Phase::Asking;
    }

    /// Lifetime statistics are left alone.
    pub(crate) fn clear_attempt(&mut self) {
        self.phase = Phase::Idle;
        self.current_question_index = 0;
        self.correct_answers_this_attempt = 0;
    }

    pub(crate) fn request_reset(&mut self) {
        self.pending_reset = true;
    }

    /// Clears the reset confirmation flag, returning whether it was set.
    pub(crate) fn take_pending_reset(&mut self) -> bool {
        std::mem::take(&mut self.pending_reset)
    }

    /// Checks the progress fields against a bank of `total` questions.
    pub fn check(&self, total: usize) -> Result<(), QuizError> {
        let index = self.current_question_index;
        let valid = self.correct_answers_this_attempt <= index
            && match self.phase {
                Phase::Idle => index == 0,
                Phase::Asking => index < total,
                Phase::Reviewing => (1..=total).contains(&index),
            };

        if valid {
            Ok(())
        } else {
            Err(QuizError::StateCorruption {
                index,
                phase: self.phase,
                total,
            })
        }
    }
}
