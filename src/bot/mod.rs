/// Command and callback flows (the dispatcher core)
pub mod handlers;
/// Watch-link URL templates
pub mod links;
/// Compact callback-data tokens
pub mod token;
/// Messaging transport seam and the Telegram adapter
pub mod transport;
