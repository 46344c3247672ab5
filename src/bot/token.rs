//! Compact callback-data tokens attached to inline buttons.
//!
//! Telegram limits callback data to 64 bytes, so buttons carry only the
//! entity identifier (`anime:<id>`, `episode:<id>:<n>`); display titles
//! are re-fetched from the metadata API when a token is decoded. The wire
//! format is ASCII, colon-delimited, and must stay exactly as is for
//! compatibility with buttons of already-sent messages.

use std::fmt;
use std::str::FromStr;

/// Reference to a remote entity, decoded from a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackToken {
    /// An anime whose episode list should be shown
    Anime {
        /// Remote anime identifier (MyAnimeList id)
        anime_id: u64,
    },
    /// A single episode to generate watch links for
    Episode {
        /// Remote anime identifier (MyAnimeList id)
        anime_id: u64,
        /// Remote-reported episode number
        episode: u32,
    },
}

impl CallbackToken {
    /// Decode a token from raw callback data.
    ///
    /// Returns `None` for anything that is not exactly `anime:<digits>`
    /// or `episode:<digits>:<digits>`. The dispatcher ignores unknown
    /// payloads rather than reporting them, so buttons from foreign
    /// keyboards or older bot versions stay harmless.
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        let fields: Vec<&str> = data.split(':').collect();
        match fields.as_slice() {
            ["anime", id] => Some(Self::Anime {
                anime_id: parse_digits(id)?,
            }),
            ["episode", id, num] => Some(Self::Episode {
                anime_id: parse_digits(id)?,
                episode: parse_digits(num)?,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anime { anime_id } => write!(f, "anime:{anime_id}"),
            Self::Episode { anime_id, episode } => write!(f, "episode:{anime_id}:{episode}"),
        }
    }
}

/// Strict digit parse: rejects the signs, whitespace and empty input
/// that `str::parse` would otherwise accept.
fn parse_digits<T: FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
