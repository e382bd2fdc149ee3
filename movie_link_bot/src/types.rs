use std::fmt::Display;

use chrono::{DateTime, Utc};
use teloxide::types::{ChatId, Message, MessageId};

/// Location of a message that can be copied from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl SourceRef {
    #[must_use]
    pub fn of(message: &Message) -> Self {
        SourceRef {
            chat_id: message.chat.id,
            message_id: message.id,
        }
    }
}

/// One saved message, as stored in the database.
#[allow(dead_code)] // Intentionally allow unused fields here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieItem {
    /// ID of the entry. Grows with every insert.
    pub id: i64,
    /// Code this item is saved under. Many items can share one.
    pub code: String,
    /// Where to copy the message from.
    pub source: SourceRef,
    /// Caption of the source message at the time it was saved.
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A copy that was sent to a user and should be deleted later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeliveredMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A code that is fit to be saved, meaning it can be put into a
/// `t.me/bot?start=code` link as is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MovieCode(String);

/// Reasons a string can't be a [`MovieCode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadMovieCode {
    Empty,
    TooLong,
    BadCharacters,
}

impl MovieCode {
    /// Longest payload Telegram accepts in a `start` link.
    pub const MAX_LEN: usize = 64;

    /// Surrounding whitespace is trimmed.
    pub fn parse(code: &str) -> Result<Self, BadMovieCode> {
        let code = code.trim();
        if code.is_empty() {
            return Err(BadMovieCode::Empty);
        }
        if code.len() > Self::MAX_LEN {
            return Err(BadMovieCode::TooLong);
        }
        if !code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(BadMovieCode::BadCharacters);
        }
        Ok(MovieCode(code.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MovieCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for BadMovieCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("The code can't be empty."),
            Self::TooLong => write!(
                f,
                "The code can't be longer than {} characters.",
                MovieCode::MAX_LEN
            ),
            Self::BadCharacters => f.write_str(
                "The code can only contain the letters A-Z and a-z, digits, \"_\" and \"-\".",
            ),
        }
    }
}
