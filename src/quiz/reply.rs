//! Turns engine outcomes into the message the user sees.

use crate::quiz::{
    engine::Outcome,
    intent::{RESET_CANCEL, RESET_CONFIRM},
    stats::{AttemptTier, LifetimeStats, LifetimeTier},
    NO_TOKEN, YES_TOKEN,
};

pub const START_BUTTON: &str = "🚀 Начать тест";
pub const ABOUT_BUTTON: &str = "ℹ️ О боте";
pub const STATS_BUTTON: &str = "📊 Статистика";
pub const HELP_BUTTON: &str = "❓ Помощь";
pub const RESET_BUTTON: &str = "🔄 Сбросить статистику";
pub const CANCEL_BUTTON: &str = "❌ Отменить тест";
pub const NEXT_BUTTON: &str = "➡️ Следующий вопрос";
pub const FINISH_BUTTON: &str = "✅ Завершить тест";
pub const RETAKE_BUTTON: &str = "🔄 Пройти заново";

const WELCOME_TEXT: &str = "👋 Привет! Я бот-учитель по теме «Обратная теорема Пифагора».\n\n\
📚 Я помогу тебе проверить знания о прямоугольных треугольниках!\n\n\
🎯 Отвечай 'да' или 'нет' на вопросы о треугольниках.\n\n\
Выбери действие:";

const HELP_TEXT: &str = "📖 <b>Справка по боту</b>\n\n\
<b>Команды:</b>\n\
/start - Начать работу с ботом\n\
/help - Показать эту справку\n\
/cancel - Отменить текущий тест\n\
/stats - Показать статистику\n\
/about - О боте\n\n\
<b>Как пользоваться:</b>\n\
1. Нажми '🚀 Начать тест'\n\
2. Отвечай на вопросы кнопками 'да' или 'нет'\n\
3. Получай объяснения после каждого ответа\n\
4. В конце смотри свои результаты\n\n\
<b>Теорема Пифагора:</b>\n\
Треугольник является прямоугольным, если квадрат самой длинной стороны равен \
сумме квадратов двух других сторон: a² + b² = c²";

const ABOUT_TEXT: &str = "ℹ️ <b>О боте</b>\n\n\
📐 <b>Пифагор Учитель</b>\n\
Образовательный бот для изучения обратной теоремы Пифагора\n\n\
👨‍💻 Версия: 1.0\n\
📅 Создан: 2025\n\n\
📚 <b>Обратная теорема Пифагора:</b>\n\
Если в треугольнике квадрат одной стороны равен сумме квадратов двух других сторон, \
то этот треугольник прямоугольный.\n\n\
🎓 Формула: a² + b² = c²\n\
где c - гипотенуза (самая длинная сторона)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Formatting {
    #[default]
    PlainText,
    /// Telegram HTML.
    RichText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Replies {
    #[default]
    None,
    Keyboard {
        rows: Vec<Vec<String>>,
        one_time: bool,
    },
    /// Inline buttons; a press comes back as the payload, not as text.
    Choice(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableOutcome {
    pub text: String,
    pub replies: Replies,
    pub formatting: Formatting,
}

impl RenderableOutcome {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            replies: Replies::None,
            formatting: Formatting::PlainText,
        }
    }

    fn rich(text: impl Into<String>) -> Self {
        Self {
            formatting: Formatting::RichText,
            ..Self::plain(text)
        }
    }

    fn keyboard(mut self, rows: &[&[&str]]) -> Self {
        self.replies = Replies::Keyboard {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|label| label.to_string()).collect())
                .collect(),
            one_time: false,
        };
        self
    }

    fn one_time(mut self) -> Self {
        if let Replies::Keyboard { one_time, .. } = &mut self.replies {
            *one_time = true;
        }
        self
    }

    pub fn suggested_replies(&self) -> Vec<String> {
        match &self.replies {
            Replies::None => Vec::new(),
            Replies::Keyboard { rows, .. } => rows.iter().flatten().cloned().collect(),
            Replies::Choice(choices) => choices.iter().map(|c| c.label.clone()).collect(),
        }
    }
}

const MAIN_MENU: &[&[&str]] = &[&[START_BUTTON], &[ABOUT_BUTTON, STATS_BUTTON], &[HELP_BUTTON]];
const SHORT_MENU: &[&[&str]] = &[&[START_BUTTON], &[ABOUT_BUTTON, STATS_BUTTON]];
const ANSWER_MENU: &[&[&str]] = &[&[YES_TOKEN, NO_TOKEN], &[CANCEL_BUTTON]];

/// Renders `outcome` for a bank of `total` questions.
pub fn render(outcome: &Outcome<'_>, total: usize) -> RenderableOutcome {
    match outcome {
        Outcome::Welcome => RenderableOutcome::plain(WELCOME_TEXT).keyboard(MAIN_MENU),
        Outcome::Help => RenderableOutcome::rich(HELP_TEXT).keyboard(SHORT_MENU),
        Outcome::About => RenderableOutcome::rich(ABOUT_TEXT)
            .keyboard(&[&[START_BUTTON], &[HELP_BUTTON, STATS_BUTTON]]),
        Outcome::Stats(lifetime) => RenderableOutcome::rich(stats_text(lifetime, total))
            .keyboard(&[&[START_BUTTON], &[RESET_BUTTON], &[ABOUT_BUTTON, HELP_BUTTON]]),
        Outcome::ResetRequested => RenderableOutcome {
            replies: Replies::Choice(vec![
                Choice {
                    label: "✅ Да, сбросить".to_string(),
                    payload: RESET_CONFIRM.to_string(),
                },
                Choice {
                    label: "❌ Отмена".to_string(),
                    payload: RESET_CANCEL.to_string(),
                },
            ]),
            ..RenderableOutcome::plain("⚠️ Ты уверен, что хочешь сбросить всю статистику?")
        },
        Outcome::ResetConfirmed => {
            RenderableOutcome::plain("✅ Статистика успешно сброшена!\n\nНачни новый тест!")
                .keyboard(SHORT_MENU)
        }
        Outcome::ResetDeclined => RenderableOutcome::plain("❌ Сброс статистики отменен."),
        Outcome::ResetExpired => RenderableOutcome::plain(format!(
            "⚠️ Этот запрос на сброс уже неактуален. Нажми «{RESET_BUTTON}» ещё раз."
        )),
        Outcome::Question {
            number,
            total,
            prompt,
            repeated,
        } => {
            let notice = if *repeated {
                "Сначала ответь на вопрос: «да» или «нет».\n\n"
            } else {
                ""
            };
            RenderableOutcome::plain(format!("{notice}Вопрос {number} из {total}\n\n{prompt}"))
                .keyboard(ANSWER_MENU)
        }
        Outcome::Explanation { text, last } => {
            RenderableOutcome::plain(*text).keyboard(&[&[advance_button(*last)]]).one_time()
        }
        Outcome::AlreadyAnswered { last } => RenderableOutcome::plain(format!(
            "Ты уже ответил на этот вопрос. Нажми «{}».",
            advance_button(*last)
        ))
        .keyboard(&[&[advance_button(*last)]])
        .one_time(),
        Outcome::Finished {
            correct,
            total,
            tier,
        } => RenderableOutcome::rich(results_text(*correct, *total, *tier))
            .keyboard(&[&[RETAKE_BUTTON], &[STATS_BUTTON, ABOUT_BUTTON], &[HELP_BUTTON]]),
        Outcome::Cancelled => {
            RenderableOutcome::plain("❌ Тест отменен. Твой прогресс не сохранен.")
                .keyboard(SHORT_MENU)
        }
        Outcome::NothingToCancel => RenderableOutcome::plain("У тебя нет активного теста."),
        Outcome::Unrecognized => {
            RenderableOutcome::plain("❓ Команда не распознана. Выбери действие из меню:")
                .keyboard(MAIN_MENU)
        }
        Outcome::StateReset => RenderableOutcome::plain(
            "⚠️ Что-то пошло не так, поэтому текущий тест был сброшен. Начни заново!",
        )
        .keyboard(MAIN_MENU),
    }
}

fn advance_button(last: bool) -> &'static str {
    if last {
        FINISH_BUTTON
    } else {
        NEXT_BUTTON
    }
}

fn stats_text(lifetime: &LifetimeStats, total: usize) -> String {
    if lifetime.tests_completed() == 0 {
        return "📊 <b>Твоя статистика</b>\n\n\
                У тебя пока нет завершенных тестов.\n\
                Пройди первый тест, чтобы увидеть статистику!"
            .to_string();
    }

    let summary = lifetime.summary();
    let verdict = match summary.tier {
        LifetimeTier::Excellent => "🏆 Отличный результат!",
        LifetimeTier::Good => "👍 Хороший результат!",
        LifetimeTier::NeedsPractice => "💪 Продолжай практиковаться!",
    };

    format!(
        "📊 <b>Твоя статистика</b>\n\n\
         🎯 Пройдено тестов: {}\n\
         ✅ Правильных ответов: {} из {}\n\
         📈 Точность: {:.1}%\n\
         ⭐ Средний балл: {:.1} из {}\n\n\
         {}",
        lifetime.tests_completed(),
        lifetime.correct_answers(),
        lifetime.questions_answered(),
        summary.accuracy_pct,
        summary.avg_score,
        total,
        verdict
    )
}

fn results_text(correct: usize, total: usize, tier: AttemptTier) -> String {
    let (emoji, message) = match tier {
        AttemptTier::Perfect => ("🏆", "Отличная работа! Ты знаешь теорему Пифагора на 100%!"),
        AttemptTier::Strong => ("⭐", "Очень хорошо! Небольшие ошибки, но результат отличный!"),
        AttemptTier::Good => ("👍", "Хороший результат! Продолжай в том же духе!"),
        AttemptTier::KeepLearning => ("📖", "Продолжай учиться! Повтори материал и попробуй снова."),
    };
    let percentage = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    };

    format!(
        "{emoji} <b>Тест завершён!</b>\n\n\
         ✅ Правильных ответов: {correct} из {total}\n\
         📊 Процент: {percentage:.0}%\n\n\
         {message}"
    )
}
