//! Lifetime statistics and the feedback tiers derived from them.

use crate::quiz::session::SessionState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LifetimeStats {
    tests_completed: usize,
    correct_answers: usize,
    questions_answered: usize,
}

impl LifetimeStats {
    pub fn tests_completed(&self) -> usize {
        self.tests_completed
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn questions_answered(&self) -> usize {
        self.questions_answered
    }

    pub(crate) fn record(&mut self, correct: usize, total: usize) {
        debug_assert!(correct <= total);
        self.tests_completed = self.tests_completed.saturating_add(1);
        self.correct_answers = self.correct_answers.saturating_add(correct.min(total));
        self.questions_answered = self.questions_answered.saturating_add(total);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn summary(&self) -> Summary {
        let accuracy_pct = if self.questions_answered == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.questions_answered as f64 * 100.0
        };
        let avg_score = if self.tests_completed == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.tests_completed as f64
        };
        let tier = if reaches(self.correct_answers, self.questions_answered, 4, 5) {
            LifetimeTier::Excellent
        } else if reaches(self.correct_answers, self.questions_answered, 3, 5) {
            LifetimeTier::Good
        } else {
            LifetimeTier::NeedsPractice
        };

        Summary {
            accuracy_pct,
            avg_score,
            tier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub accuracy_pct: f64,
    pub avg_score: f64,
    pub tier: LifetimeTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifetimeTier {
    Excellent,
    Good,
    NeedsPractice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptTier {
    Perfect,
    Strong,
    Good,
    KeepLearning,
}

/// `part / whole >= num / den`, false when `whole` is zero.
fn reaches(part: usize, whole: usize, num: usize, den: usize) -> bool {
    whole > 0 && part.saturating_mul(den) >= whole.saturating_mul(num)
}

/// Folds a completed attempt into the lifetime counters and ends the test.
///
/// Called once per completed attempt, never on cancel.
pub fn finalize(session: &mut SessionState, attempt_correct: usize, attempt_total: usize) {
    session.lifetime_mut().record(attempt_correct, attempt_total);
    session.clear_attempt();
}

pub fn reset(session: &mut SessionState) {
    session.lifetime_mut().reset();
}

pub fn compute_summary(session: &SessionState) -> Summary {
    session.lifetime().summary()
}

pub fn compute_attempt_tier(correct: usize, total: usize) -> AttemptTier {
    if correct == total {
        AttemptTier::Perfect
    } else if reaches(correct, total, 4, 5) {
        AttemptTier::Strong
    } else if reaches(correct, total, 3, 5) {
        AttemptTier::Good
    } else {
        AttemptTier::KeepLearning
    }
}
