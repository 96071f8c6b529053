//! Maps raw inbound text to what the user meant.
//!
//! Matching is done on the trimmed, lowercased text against fixed label
//! tables. Menu buttons carry a leading emoji; the bare words are accepted
//! too so a typed "статистика" works the same as the button.

use crate::quiz::{session::SessionState, Answer};

/// Inline button payload confirming a statistics reset.
pub const RESET_CONFIRM: &str = "reset_confirm";
/// Inline button payload declining a statistics reset.
pub const RESET_CANCEL: &str = "reset_cancel";

pub(crate) const ABOUT_LABELS: &[&str] = &["ℹ️ о боте", "о боте"];
pub(crate) const STATS_LABELS: &[&str] = &["📊 статистика", "статистика"];
pub(crate) const HELP_LABELS: &[&str] = &["❓ помощь", "помощь"];
pub(crate) const RESET_LABELS: &[&str] = &["🔄 сбросить статистику", "сбросить статистику"];
pub(crate) const CANCEL_LABELS: &[&str] = &["❌ отменить тест", "отменить тест"];
pub(crate) const START_LABELS: &[&str] = &["🚀 начать тест", "начать тест"];
pub(crate) const NEXT_LABELS: &[&str] = &["➡️ следующий вопрос", "следующий вопрос"];
pub(crate) const FINISH_LABELS: &[&str] = &["✅ завершить тест", "завершить тест"];
pub(crate) const RETAKE_LABELS: &[&str] = &["🔄 пройти заново", "пройти заново"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Only reachable through `/start`.
    ShowWelcome,
    ShowAbout,
    ShowStats,
    ShowHelp,
    ResetStats,
    ConfirmReset,
    DeclineReset,
    CancelTest,
    StartTest,
    AnswerYes,
    AnswerNo,
    AdvanceOrFinish,
    RestartTest,
    Unrecognized,
}

impl Intent {
    pub fn answer(self) -> Option<Answer> {
        match self {
            Intent::AnswerYes => Some(Answer::Yes),
            Intent::AnswerNo => Some(Answer::No),
            _ => None,
        }
    }
}

impl From<Answer> for Intent {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => Intent::AnswerYes,
            Answer::No => Intent::AnswerNo,
        }
    }
}

/// Maps an inline button payload to its intent. Payloads never come from
/// typed text, so they are kept out of [`classify`].
pub fn from_payload(payload: &str) -> Intent {
    match payload {
        RESET_CONFIRM => Intent::ConfirmReset,
        RESET_CANCEL => Intent::DeclineReset,
        _ => Intent::Unrecognized,
    }
}

pub fn normalize(raw_text: &str) -> String {
    raw_text.trim().to_lowercase()
}

/// Classifies `raw_text`, first match wins.
///
/// Yes/no tokens only count as answers while a test is running; otherwise
/// they fall through to [`Intent::Unrecognized`].
pub fn classify(raw_text: &str, session: &SessionState) -> Intent {
    let text = normalize(raw_text);
    let text = text.as_str();
    let is = |labels: &[&str]| labels.contains(&text);

    if is(ABOUT_LABELS) {
        Intent::ShowAbout
    } else if is(STATS_LABELS) {
        Intent::ShowStats
    } else if is(HELP_LABELS) {
        Intent::ShowHelp
    } else if is(RESET_LABELS) {
        Intent::ResetStats
    } else if is(CANCEL_LABELS) {
        Intent::CancelTest
    } else if is(START_LABELS) {
        Intent::StartTest
    } else if let Some(answer) = Answer::from_token(text).filter(|_| session.test_in_progress())
    {
        answer.into()
    } else if is(NEXT_LABELS) || is(FINISH_LABELS) {
        Intent::AdvanceOrFinish
    } else if is(RETAKE_LABELS) {
        Intent::RestartTest
    } else {
        Intent::Unrecognized
    }
}
