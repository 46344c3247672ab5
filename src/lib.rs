//! Anime search Telegram bot.
//!
//! Translates text commands into Jikan metadata API queries and presents
//! the results as inline button menus. Buttons carry compact callback
//! tokens with entity identifiers only; titles are re-fetched on demand.
//! The bot never sends media files, it only links to legal services.

/// Telegram bot implementation: flows, tokens, links, transport
pub mod bot;
/// Configuration management
pub mod config;
/// Jikan metadata API client
pub mod jikan;
