//! Command and callback flows.
//!
//! Each flow is one self-contained request/response routine: it performs
//! its remote lookups, formats a reply, and hands it to the transport.
//! Remote-API failures are converted into a single generic user-facing
//! message at the flow boundary; they never propagate as a crash. No
//! state survives an event: everything derived here is discarded once
//! the reply is sent.

use crate::bot::links;
use crate::bot::token::CallbackToken;
use crate::bot::transport::{Button, Transport};
use crate::jikan::{self, AnimeHit, EpisodeEntry, JikanClient};
use anyhow::Result;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tracing::{debug, warn};

/// Maximum number of search hits requested from the metadata API
pub const SEARCH_RESULT_LIMIT: usize = 5;
/// Maximum number of episode buttons in one reply
pub const EPISODE_BUTTON_LIMIT: usize = 12;

/// Reply to `/start`
pub const WELCOME_TEXT: &str =
    "Привет! Используй команду /search <название> чтобы найти аниме.\nНапример: /search Naruto";
/// Reply to `/help`
pub const HELP_TEXT: &str = "/search <название> — найти аниме.\nПосле выбора аниме появится список эпизодов. Для просмотра используйте легальные сервисы.";
/// Reply to `/search` without an argument
pub const SEARCH_USAGE_TEXT: &str = "Укажите название: /search <название>";
/// Reply to any unrecognized text
pub const UNKNOWN_COMMAND_TEXT: &str = "Неизвестная команда. Используйте /help.";
/// Header above the search result buttons
pub const SEARCH_RESULTS_TEXT: &str = "Выберите аниме (результаты поиска):";
/// Generic search failure reply
pub const SEARCH_FAILED_TEXT: &str = "Ошибка при поиске. Попробуйте позже.";
/// Generic episode list failure reply
pub const EPISODES_FAILED_TEXT: &str = "Ошибка при получении эпизодов. Попробуйте позже.";
/// Fallback reply when link composition fails
pub const LINKS_FAILED_TEXT: &str =
    "Не удалось сформировать ссылки. Попробуйте вручную поискать на официальных платформах.";
/// Callback acknowledgment for an anime button
pub const ACK_EPISODES_TEXT: &str = "Показываю эпизоды...";
/// Callback acknowledgment for an episode button
pub const ACK_LINKS_TEXT: &str = "Генерирую ссылки на просмотр...";

/// Supported text commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
pub enum Command {
    #[command(description = "Начать работу.")]
    Start,
    #[command(description = "Как пользоваться ботом.")]
    Help,
    #[command(description = "Найти аниме по названию.")]
    Search(String),
}

/// The "nothing found" reply, naming the query it was built from.
#[must_use]
pub fn nothing_found_text(query: &str) -> String {
    format!("Ничего не найдено по запросу: {query}")
}

/// `/start`: static welcome text.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the reply.
pub async fn start(transport: &impl Transport, chat_id: ChatId) -> Result<()> {
    transport.send_text(chat_id, WELCOME_TEXT).await
}

/// `/help`: static usage text.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the reply.
pub async fn help(transport: &impl Transport, chat_id: ChatId) -> Result<()> {
    transport.send_text(chat_id, HELP_TEXT).await
}

/// Any text that is not a recognized command.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the reply.
pub async fn unknown_command(transport: &impl Transport, chat_id: ChatId) -> Result<()> {
    transport.send_text(chat_id, UNKNOWN_COMMAND_TEXT).await
}

/// `/search <query>`: present the top matches as one button per row.
///
/// A blank query is answered with the usage text without touching the
/// remote API.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the reply; remote
/// API failures are reported to the user instead.
pub async fn search(
    transport: &impl Transport,
    jikan: &JikanClient,
    chat_id: ChatId,
    query: &str,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return transport.send_text(chat_id, SEARCH_USAGE_TEXT).await;
    }

    let hits = match jikan.search_anime(query, SEARCH_RESULT_LIMIT).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("anime search failed for {:?}: {}", query, e);
            return transport.send_text(chat_id, SEARCH_FAILED_TEXT).await;
        }
    };

    if hits.is_empty() {
        return transport.send_text(chat_id, &nothing_found_text(query)).await;
    }

    let rows: Vec<Vec<Button>> = hits
        .into_iter()
        .map(|AnimeHit { mal_id, title }| {
            let label = title.unwrap_or_else(|| jikan::placeholder_title(mal_id));
            vec![Button {
                label,
                token: CallbackToken::Anime { anime_id: mal_id },
            }]
        })
        .collect();

    transport
        .send_buttons(chat_id, SEARCH_RESULTS_TEXT, &rows)
        .await
}

/// Route a button press by its callback token.
///
/// The acknowledgment clears the client's loading indicator and is sent
/// in addition to the main reply, even when the flow itself failed.
/// Malformed payloads are silently ignored.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the acknowledgment.
pub async fn handle_callback(
    transport: &impl Transport,
    jikan: &JikanClient,
    chat_id: ChatId,
    callback_id: &str,
    data: &str,
) -> Result<()> {
    match CallbackToken::parse(data) {
        Some(CallbackToken::Anime { anime_id }) => {
            if let Err(e) = episode_list(transport, jikan, chat_id, anime_id).await {
                warn!("episode list flow failed for anime {}: {:#}", anime_id, e);
            }
            transport.acknowledge(callback_id, ACK_EPISODES_TEXT).await
        }
        Some(CallbackToken::Episode { anime_id, episode }) => {
            if let Err(e) = episode_links(transport, jikan, chat_id, anime_id, episode).await {
                warn!("episode links flow failed for anime {}: {:#}", anime_id, e);
            }
            transport.acknowledge(callback_id, ACK_LINKS_TEXT).await
        }
        None => {
            debug!("ignoring unrecognized callback data: {:?}", data);
            Ok(())
        }
    }
}

/// Show up to [`EPISODE_BUTTON_LIMIT`] episode buttons for an anime.
///
/// The episode list and the display title are independent lookups and
/// run concurrently; the title falls back to a placeholder on its own.
/// An empty list is answered with a search link built from the title.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the reply.
pub async fn episode_list(
    transport: &impl Transport,
    jikan: &JikanClient,
    chat_id: ChatId,
    anime_id: u64,
) -> Result<()> {
    let (episodes, title) = tokio::join!(
        jikan.episodes(anime_id),
        jikan.title_or_placeholder(anime_id)
    );

    let episodes = match episodes {
        Ok(episodes) => episodes,
        Err(e) => {
            warn!("episode list failed for anime {}: {}", anime_id, e);
            return transport.send_text(chat_id, EPISODES_FAILED_TEXT).await;
        }
    };

    if episodes.is_empty() {
        return match links::no_episodes_message(&title) {
            Ok(text) => transport.send_text(chat_id, &text).await,
            Err(e) => {
                warn!("fallback link failed for anime {}: {}", anime_id, e);
                transport.send_text(chat_id, EPISODES_FAILED_TEXT).await
            }
        };
    }

    let rows = episode_buttons(anime_id, &episodes);
    let text = format!("Эпизоды для: {title}");
    transport.send_buttons(chat_id, &text, &rows).await
}

/// Send watch links for one episode.
///
/// # Errors
///
/// Returns an error if the transport fails to deliver the reply.
pub async fn episode_links(
    transport: &impl Transport,
    jikan: &JikanClient,
    chat_id: ChatId,
    anime_id: u64,
    episode: u32,
) -> Result<()> {
    let title = jikan.title_or_placeholder(anime_id).await;
    match links::episode_links_message(&title, episode) {
        Ok(text) => transport.send_text(chat_id, &text).await,
        Err(e) => {
            warn!(
                "link composition failed for anime {} episode {}: {}",
                anime_id, episode, e
            );
            transport.send_text(chat_id, LINKS_FAILED_TEXT).await
        }
    }
}

/// One button per episode, at most the first [`EPISODE_BUTTON_LIMIT`]
/// entries in remote order. Entries without a number are labeled by
/// their 1-based position in the truncated list.
fn episode_buttons(anime_id: u64, episodes: &[EpisodeEntry]) -> Vec<Vec<Button>> {
    episodes
        .iter()
        .take(EPISODE_BUTTON_LIMIT)
        .enumerate()
        .map(|(index, entry)| {
            let number = entry.episode.unwrap_or((index + 1) as u32);
            vec![Button {
                label: format!("Эп. {number}"),
                token: CallbackToken::Episode {
                    anime_id,
                    episode: number,
                },
            }]
        })
        .collect()
}
