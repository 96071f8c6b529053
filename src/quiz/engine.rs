//! The quiz state machine.
//!
//! [`Engine`] only owns the immutable question bank; every call takes the
//! user's [`SessionState`] explicitly, so users can be served in parallel.

use log::{debug, error, warn};

use crate::quiz::{
    bank::QuestionBank,
    error::QuizError,
    intent::{self, Intent},
    reply::{self, RenderableOutcome},
    session::{Phase, SessionState},
    stats::{self, AttemptTier, LifetimeStats},
    QuizItem,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<'a> {
    Welcome,
    About,
    Help,
    Stats(LifetimeStats),
    ResetRequested,
    ResetConfirmed,
    ResetDeclined,
    /// A reset choice arrived without a pending reset request.
    ResetExpired,
    Question {
        number: usize,
        total: usize,
        prompt: &'a str,
        /// The question was already on screen and is repeated because the
        /// user tried to move on without answering.
        repeated: bool,
    },
    Explanation {
        text: &'a str,
        last: bool,
    },
    AlreadyAnswered {
        last: bool,
    },
    Finished {
        correct: usize,
        total: usize,
        tier: AttemptTier,
    },
    Cancelled,
    NothingToCancel,
    Unrecognized,
    StateReset,
}

#[derive(Debug, Clone)]
pub struct Engine {
    bank: QuestionBank,
}

impl Engine {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Classifies `raw_text` against the session and renders the result.
    pub fn handle(&self, session: &mut SessionState, raw_text: &str) -> RenderableOutcome {
        let intent = intent::classify(raw_text, session);
        self.dispatch(session, intent)
    }

    /// Applies an already known intent, e.g. one coming from a bot command.
    pub fn dispatch(&self, session: &mut SessionState, intent: Intent) -> RenderableOutcome {
        let outcome = self.apply(session, intent);
        reply::render(&outcome, self.bank.len())
    }

    /// Applies `intent` and recovers locally from any error.
    pub fn apply<'a>(&'a self, session: &mut SessionState, intent: Intent) -> Outcome<'a> {
        let phase = session.phase();
        match self.step(session, intent) {
            Ok(outcome) => {
                debug!("{intent:?} in {phase:?} -> {:?}", session.phase());
                outcome
            }
            Err(err @ QuizError::StateCorruption { .. }) => {
                warn!("{err}, resetting progress");
                session.clear_attempt();
                Outcome::StateReset
            }
            Err(err) => {
                error!("{err}");
                Outcome::Unrecognized
            }
        }
    }

    fn step<'a>(
        &'a self,
        session: &mut SessionState,
        intent: Intent,
    ) -> Result<Outcome<'a>, QuizError> {
        // Any intent ends a pending reset confirmation.
        let pending_reset = session.take_pending_reset();

        match intent {
            Intent::ShowWelcome => Ok(Outcome::Welcome),
            Intent::ShowAbout => Ok(Outcome::About),
            Intent::ShowHelp => Ok(Outcome::Help),
            Intent::ShowStats => Ok(Outcome::Stats(*session.lifetime())),
            Intent::ResetStats => {
                session.request_reset();
                Ok(Outcome::ResetRequested)
            }
            Intent::ConfirmReset if pending_reset => {
                stats::reset(session);
                Ok(Outcome::ResetConfirmed)
            }
            Intent::DeclineReset if pending_reset => Ok(Outcome::ResetDeclined),
            Intent::ConfirmReset | Intent::DeclineReset => Ok(Outcome::ResetExpired),
            Intent::CancelTest => Ok(self.cancel(session)),
            Intent::StartTest | Intent::RestartTest => self.start(session),
            Intent::AnswerYes | Intent::AnswerNo => self.answer(session, intent),
            Intent::AdvanceOrFinish => self.advance(session),
            Intent::Unrecognized => Ok(Outcome::Unrecognized),
        }
    }

    fn start<'a>(&'a self, session: &mut SessionState) -> Result<Outcome<'a>, QuizError> {
        session.begin_attempt();
        self.question(session, false)
    }

    fn cancel(&self, session: &mut SessionState) -> Outcome<'static> {
        if session.test_in_progress() {
            session.clear_attempt();
            Outcome::Cancelled
        } else {
            Outcome::NothingToCancel
        }
    }

    fn answer<'a>(
        &'a self,
        session: &mut SessionState,
        intent: Intent,
    ) -> Result<Outcome<'a>, QuizError> {
        let total = self.bank.len();
        session.check(total)?;

        let given = match (session.phase(), intent.answer()) {
            (Phase::Asking, Some(given)) => given,
            (Phase::Reviewing, Some(_)) => {
                return Ok(Outcome::AlreadyAnswered {
                    last: session.current_question_index() == total,
                })
            }
            (phase, _) => return Err(QuizError::InvalidTransition { intent, phase }),
        };

        let item = self.current_item(session)?;
        session.record_answer(item.is_correct(given));

        Ok(Outcome::Explanation {
            text: item.explanation(given),
            last: session.current_question_index() == total,
        })
    }

    fn advance<'a>(&'a self, session: &mut SessionState) -> Result<Outcome<'a>, QuizError> {
        let total = self.bank.len();
        session.check(total)?;

        match session.phase() {
            Phase::Idle => Ok(Outcome::Unrecognized),
            Phase::Asking => self.question(session, true),
            Phase::Reviewing if session.current_question_index() < total => {
                session.resume_asking();
                self.question(session, false)
            }
            Phase::Reviewing => {
                let correct = session.correct_answers_this_attempt();
                stats::finalize(session, correct, total);
                Ok(Outcome::Finished {
                    correct,
                    total,
                    tier: stats::compute_attempt_tier(correct, total),
                })
            }
        }
    }

    fn question<'a>(
        &'a self,
        session: &SessionState,
        repeated: bool,
    ) -> Result<Outcome<'a>, QuizError> {
        let item = self.current_item(session)?;
        Ok(Outcome::Question {
            number: session.current_question_index() + 1,
            total: self.bank.len(),
            prompt: &item.prompt,
            repeated,
        })
    }

    fn current_item(&self, session: &SessionState) -> Result<&QuizItem, QuizError> {
        let index = session.current_question_index();
        self.bank
            .get(index)
            .ok_or_else(|| QuizError::StateCorruption {
                index,
                phase: session.phase(),
                total: self.bank.len(),
            })
    }
}
