use pythagoras_bot::quiz::{
    intent::{self, RESET_CANCEL, RESET_CONFIRM},
    reply::{CANCEL_BUTTON, FINISH_BUTTON, NEXT_BUTTON, RESET_BUTTON, RETAKE_BUTTON, START_BUTTON},
    stats, Engine, Intent, LifetimeStats, Phase, QuestionBank, RenderableOutcome, SessionState,
};

/// One chat: the shared engine plus the state the dialogue storage would hold.
struct Chat {
    engine: Engine,
    session: SessionState,
}

impl Chat {
    fn new() -> Self {
        Self {
            engine: Engine::new(QuestionBank::reference().expect("reference bank")),
            session: SessionState::default(),
        }
    }

    fn send(&mut self, text: &str) -> RenderableOutcome {
        self.engine.handle(&mut self.session, text)
    }

    fn press(&mut self, payload: &str) -> RenderableOutcome {
        self.engine
            .dispatch(&mut self.session, intent::from_payload(payload))
    }

    fn dispatch(&mut self, intent: Intent) -> RenderableOutcome {
        self.engine.dispatch(&mut self.session, intent)
    }

    fn lifetime(&self) -> (usize, usize, usize) {
        let lifetime = self.session.lifetime();
        (
            lifetime.tests_completed(),
            lifetime.correct_answers(),
            lifetime.questions_answered(),
        )
    }

    /// Starts a test and answers every question, advancing between them.
    /// Returns the text of the final message.
    fn run_attempt(&mut self, answers: &[&str]) -> String {
        self.send(START_BUTTON);
        let mut last = String::new();
        for (i, answer) in answers.iter().enumerate() {
            self.send(answer);
            let button = if i + 1 == answers.len() {
                FINISH_BUTTON
            } else {
                NEXT_BUTTON
            };
            last = self.send(button).text;
        }
        last
    }
}

#[test]
fn perfect_attempt_from_fresh_session() {
    let mut chat = Chat::new();
    let text = chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    assert!(text.starts_with("🏆"));
    assert!(text.contains("5 из 5"));
    assert_eq!(chat.lifetime(), (1, 5, 5));
    assert!(!chat.session.test_in_progress());
}

#[test]
fn two_correct_answers_keep_learning() {
    let mut chat = Chat::new();
    let text = chat.run_attempt(&["нет", "да", "да", "нет", "нет"]);

    assert!(text.starts_with("📖"));
    assert!(text.contains("2 из 5"));
    assert_eq!(chat.lifetime(), (1, 2, 5));
}

#[test]
fn correct_never_exceeds_answered() {
    let mut chat = Chat::new();
    chat.send(START_BUTTON);
    for answer in ["да", "да", "нет", "да", "нет"] {
        chat.send(answer);
        assert!(
            chat.session.correct_answers_this_attempt() <= chat.session.current_question_index()
        );
        chat.send(NEXT_BUTTON);
    }
}

#[test]
fn explanation_depends_on_given_answer() {
    let mut chat = Chat::new();
    chat.send(START_BUTTON);
    let wrong = chat.send("нет");
    assert!(wrong.text.starts_with("❌"));
    assert_eq!(wrong.suggested_replies(), vec![NEXT_BUTTON]);

    chat.send(NEXT_BUTTON);
    let right = chat.send("да");
    assert!(right.text.starts_with("✅"));
}

#[test]
fn cancelling_mid_test_leaves_lifetime_alone() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    chat.send(START_BUTTON);
    chat.send("да");
    chat.send(NEXT_BUTTON);
    chat.send("нет");
    let cancelled = chat.send(CANCEL_BUTTON);

    assert!(cancelled.text.contains("Тест отменен"));
    assert_eq!(chat.lifetime(), (1, 5, 5));
    assert_eq!(chat.session.phase(), Phase::Idle);
    assert_eq!(chat.session.current_question_index(), 0);
    assert_eq!(chat.session.correct_answers_this_attempt(), 0);
}

#[test]
fn unrecognized_text_mid_test_keeps_progress() {
    let mut chat = Chat::new();
    chat.send(START_BUTTON);
    for answer in ["да", "да"] {
        chat.send(answer);
        chat.send(NEXT_BUTTON);
    }
    assert_eq!(chat.session.current_question_index(), 2);

    let reply = chat.send("какой-то текст");
    assert!(reply.text.contains("Команда не распознана"));
    assert_eq!(reply.suggested_replies()[0], START_BUTTON);

    assert_eq!(chat.session.current_question_index(), 2);
    assert!(chat.session.test_in_progress());
}

#[test]
fn yes_outside_a_test_is_unrecognized() {
    let mut chat = Chat::new();
    let reply = chat.send("да");
    assert!(reply.text.contains("Команда не распознана"));
    assert_eq!(chat.session, SessionState::default());
}

#[test]
fn declined_reset_keeps_counters() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    let prompt = chat.send(RESET_BUTTON);
    assert_eq!(prompt.suggested_replies().len(), 2);
    chat.press(RESET_CANCEL);
    assert_eq!(chat.lifetime(), (1, 5, 5));

    // A late confirmation no longer applies.
    chat.press(RESET_CONFIRM);
    assert_eq!(chat.lifetime(), (1, 5, 5));
}

#[test]
fn decline_without_reset_request_has_expired() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    let declined = chat.press(RESET_CANCEL);
    let expired = chat.press(RESET_CONFIRM);
    assert_eq!(declined.text, expired.text);
    assert_eq!(chat.lifetime(), (1, 5, 5));
}

#[test]
fn typed_reset_payload_is_not_a_confirmation() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    chat.send(RESET_BUTTON);
    let reply = chat.send(RESET_CONFIRM);
    assert!(reply.text.contains("Команда не распознана"));
    assert_eq!(chat.lifetime(), (1, 5, 5));
    assert!(!chat.session.pending_reset());
}

#[test]
fn cancel_test_after_reset_request_keeps_counters() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    chat.send(RESET_BUTTON);
    let reply = chat.dispatch(Intent::CancelTest);
    assert_eq!(reply.text, "У тебя нет активного теста.");
    assert!(!chat.session.pending_reset());
    assert_eq!(chat.lifetime(), (1, 5, 5));
}

#[test]
fn confirmed_reset_zeroes_counters() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);
    chat.run_attempt(&["нет", "да", "да", "нет", "нет"]);
    assert_eq!(chat.lifetime(), (2, 7, 10));

    chat.send(RESET_BUTTON);
    let reply = chat.press(RESET_CONFIRM);
    assert!(reply.text.contains("сброшена"));
    assert_eq!(chat.lifetime(), (0, 0, 0));

    let stats = chat.send("📊 Статистика");
    assert!(stats.text.contains("нет завершенных тестов"));
}

#[test]
fn retake_restarts_without_counting_discarded_attempt() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);

    chat.send(RETAKE_BUTTON);
    chat.send("да");
    let restarted = chat.send(RETAKE_BUTTON);

    assert!(restarted.text.starts_with("Вопрос 1 из 5"));
    assert_eq!(chat.session.correct_answers_this_attempt(), 0);
    assert_eq!(chat.lifetime(), (1, 5, 5));
}

#[test]
fn welcome_command_does_not_start_a_test() {
    let mut chat = Chat::new();
    let reply = chat.dispatch(Intent::ShowWelcome);
    assert!(reply.text.starts_with("👋"));
    assert!(!chat.session.test_in_progress());
}

#[test]
fn stats_summary_after_attempts() {
    let mut chat = Chat::new();
    chat.run_attempt(&["да", "да", "нет", "да", "нет"]);
    chat.run_attempt(&["нет", "да", "да", "нет", "нет"]);

    let summary = stats::compute_summary(&chat.session);
    assert!((summary.accuracy_pct - 70.0).abs() < 1e-9);
    assert!((summary.avg_score - 3.5).abs() < 1e-9);
}

#[test]
fn stored_session_resumes_mid_test() {
    let mut chat = Chat::new();
    chat.send(START_BUTTON);
    chat.send("да");
    chat.send(NEXT_BUTTON);

    let stored = serde_json::to_string(&chat.session).unwrap();
    chat.session = serde_json::from_str(&stored).unwrap();

    let reply = chat.send("да");
    assert!(reply.text.starts_with("✅"));
    assert_eq!(chat.session.current_question_index(), 2);
    assert_eq!(chat.session.correct_answers_this_attempt(), 2);
}

#[test]
fn chats_do_not_share_progress() {
    let mut first = Chat::new();
    let second = Chat::new();
    first.run_attempt(&["да", "да", "нет", "да", "нет"]);

    assert_eq!(first.lifetime(), (1, 5, 5));
    assert_eq!(second.session.lifetime(), &LifetimeStats::default());
}
