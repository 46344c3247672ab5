//! Watch-link URL templates.
//!
//! Pure string templating: two search URLs are filled with a
//! form-url-encoded title query. The bot never links to media files
//! directly, only to search pages of external services.

use url::Url;

const CRUNCHYROLL_SEARCH_URL: &str = "https://www.crunchyroll.com/search";
const WEB_SEARCH_URL: &str = "https://www.google.com/search";

/// Crunchyroll search page for `query`.
///
/// # Errors
///
/// Returns a `ParseError` if the composed URL is invalid.
pub fn crunchyroll_search(query: &str) -> Result<String, url::ParseError> {
    let url = Url::parse_with_params(CRUNCHYROLL_SEARCH_URL, &[("from", "search"), ("q", query)])?;
    Ok(url.into())
}

/// General web search for `query`.
///
/// # Errors
///
/// Returns a `ParseError` if the composed URL is invalid.
pub fn web_search(query: &str) -> Result<String, url::ParseError> {
    let url = Url::parse_with_params(WEB_SEARCH_URL, &[("q", query)])?;
    Ok(url.into())
}

/// Message with watch links for one episode plus the no-files disclaimer.
///
/// # Errors
///
/// Returns a `ParseError` if link composition fails; the caller replaces
/// that with a generic fallback reply.
pub fn episode_links_message(title: &str, episode: u32) -> Result<String, url::ParseError> {
    let crunchyroll = crunchyroll_search(&format!("{title} episode {episode}"))?;
    let search = web_search(&format!("{title} episode {episode} watch"))?;
    Ok(format!(
        "Для просмотра используйте легальные сервисы:\n\
         Crunchyroll: {crunchyroll}\n\
         Поиск: {search}\n\n\
         Я не отправляю видеофайлы. Поддерживайте авторов — используйте официальные платформы."
    ))
}

/// Fallback reply for an anime whose remote episode list is empty.
///
/// # Errors
///
/// Returns a `ParseError` if link composition fails.
pub fn no_episodes_message(title: &str) -> Result<String, url::ParseError> {
    let crunchyroll = crunchyroll_search(title)?;
    Ok(format!(
        "Эпизоды не найдены. Можно поискать на легальных сервисах:\nCrunchyroll: {crunchyroll}"
    ))
}
