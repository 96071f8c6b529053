use std::{sync::Arc, time::Duration};

use log::{debug, error, info, warn};
use pythagoras_bot::{
    config::Config,
    quiz::{
        intent, Engine, Formatting, Intent, QuestionBank, RenderableOutcome, Replies, SessionState,
    },
};
use teloxide::{
    dispatching::{dialogue::InMemStorage, UpdateHandler},
    error_handlers::LoggingErrorHandler,
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ParseMode},
    update_listeners::Polling,
    utils::command::BotCommands,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type QuizDialogue = Dialogue<SessionState, InMemStorage<SessionState>>;

/// Long-poll timeout; the HTTP client timeout is added on top of it.
const POLL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать справку")]
    Help,
    #[command(description = "о боте")]
    About,
    #[command(description = "показать статистику")]
    Stats,
    #[command(description = "отменить текущий тест")]
    Cancel,
}

impl From<Command> for Intent {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Intent::ShowWelcome,
            Command::Help => Intent::ShowHelp,
            Command::About => Intent::ShowAbout,
            Command::Stats => Intent::ShowStats,
            Command::Cancel => Intent::CancelTest,
        }
    }
}

#[tokio::main]
async fn main() {
    // Read before the logger starts so RUST_LOG from .env is honoured.
    let config = Config::from_env();

    pretty_env_logger::init();
    info!("Starting quiz bot...");

    let result = match config {
        Ok(config) => run(config).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = result {
        error!("Quiz bot stopped: {err}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> HandlerResult {
    let bank = match &config.questions_path {
        Some(path) => {
            info!("Loading questions from {}", path.display());
            QuestionBank::from_path(path)?
        }
        None => QuestionBank::reference()?,
    };
    info!("Question bank loaded: {} questions", bank.len());
    let engine = Arc::new(Engine::new(bank));

    let client = teloxide::net::default_reqwest_settings()
        .timeout(POLL_TIMEOUT + config.request_timeout)
        .build()?;
    let bot = Bot::from_env_with_client(client);

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {err}");
    }

    let mut polling = Polling::builder(bot.clone()).timeout(POLL_TIMEOUT);
    if config.drop_pending_updates {
        polling = polling.drop_pending_updates();
    }
    let listener = polling.build();

    info!("Quiz bot is running");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![InMemStorage::<SessionState>::new(), engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let message_handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<SessionState>, SessionState>()
        .branch(teloxide::filter_command::<Command, _>().endpoint(command))
        .branch(dptree::endpoint(message));

    let callback_handler = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, InMemStorage<SessionState>, SessionState>()
        .endpoint(callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

async fn command(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: SessionState,
    engine: Arc<Engine>,
    msg: Message,
    cmd: Command,
) -> HandlerResult {
    let intent = Intent::from(cmd);
    debug!("Command from chat {}: {intent:?}", msg.chat.id);

    let outcome = engine.dispatch(&mut session, intent);
    dialogue.update(session).await?;
    deliver(&bot, msg.chat.id, outcome).await
}

async fn message(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: SessionState,
    engine: Arc<Engine>,
    msg: Message,
) -> HandlerResult {
    // Non-text messages (stickers, photos) get the fallback reply.
    let text = msg.text().unwrap_or_default();
    debug!("Message from chat {}: {text:?}", msg.chat.id);

    let outcome = engine.handle(&mut session, text);
    dialogue.update(session).await?;
    deliver(&bot, msg.chat.id, outcome).await
}

async fn callback(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: SessionState,
    engine: Arc<Engine>,
    q: CallbackQuery,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    debug!("Callback from user {}: {data:?}", q.from.id);

    let outcome = engine.dispatch(&mut session, intent::from_payload(data));
    dialogue.update(session).await?;
    let notice_only = outcome.replies == Replies::None;
    match (&q.message, notice_only) {
        // A bare notice replaces the question it answers.
        (Some(prompt), true) => {
            let mut request = bot.edit_message_text(prompt.chat.id, prompt.id, outcome.text);
            if outcome.formatting == Formatting::RichText {
                request = request.parse_mode(ParseMode::Html);
            }
            request.await?;
        }
        (prompt, _) => {
            let chat_id = match prompt {
                Some(prompt) => {
                    // The inline buttons are single-use.
                    if let Err(err) = bot
                        .edit_message_reply_markup(prompt.chat.id, prompt.id)
                        .await
                    {
                        warn!("Failed to remove buttons in chat {}: {err}", prompt.chat.id);
                    }
                    prompt.chat.id
                }
                None => q.from.id.into(),
            };
            deliver(&bot, chat_id, outcome).await?;
        }
    }
    Ok(())
}

async fn deliver(bot: &Bot, chat_id: ChatId, outcome: RenderableOutcome) -> HandlerResult {
    let mut request = bot.send_message(chat_id, outcome.text);
    if outcome.formatting == Formatting::RichText {
        request = request.parse_mode(ParseMode::Html);
    }

    request = match outcome.replies {
        Replies::None => request,
        Replies::Keyboard { rows, one_time } => request.reply_markup(
            KeyboardMarkup::new(
                rows.into_iter()
                    .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
            )
            .resize_keyboard(true)
            .one_time_keyboard(one_time),
        ),
        Replies::Choice(choices) => request.reply_markup(InlineKeyboardMarkup::new(
            choices
                .into_iter()
                .map(|choice| vec![InlineKeyboardButton::callback(choice.label, choice.payload)]),
        )),
    };

    request.await?;
    Ok(())
}
