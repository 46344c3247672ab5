//! Messaging transport seam.
//!
//! Flows talk to the chat platform through the [`Transport`] trait so the
//! dispatcher can be exercised in tests without a live connection.
//! [`TelegramTransport`] is the production adapter. Implementations hold
//! no event-spanning mutable state and are safe to share across
//! concurrently delivered events.

use crate::bot::token::CallbackToken;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup};

/// One inline button: a label and the token delivered back on press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
    /// Token carried in the callback data
    pub token: CallbackToken,
}

/// Outbound operations of the chat platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Send a message with an inline keyboard, one `Vec<Button>` per row.
    async fn send_buttons(&self, chat_id: ChatId, text: &str, rows: &[Vec<Button>]) -> Result<()>;

    /// Answer a callback query so the client's loading indicator clears.
    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<()>;
}

/// Telegram Bot API adapter.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Wrap a `teloxide` bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.bot.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn send_buttons(&self, chat_id: ChatId, text: &str, rows: &[Vec<Button>]) -> Result<()> {
        let keyboard = InlineKeyboardMarkup::new(rows.iter().map(|row| {
            row.iter().map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.token.to_string())
            })
        }));
        self.bot
            .send_message(chat_id, text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<()> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_owned()))
            .text(text)
            .await?;
        Ok(())
    }
}
