mod split_lines;
pub use split_lines::*;

use std::future::Future;

use teloxide::{
    requests::Requester,
    sugar::request::RequestReplyExt,
    types::{Message, MessageId, Recipient},
    Bot, RequestError,
};

/// Maximum length of a text message, as per Telegram Bot API docs.
///
/// Telegram counts UTF-16 code units, and a string's UTF-8 byte length is
/// never smaller than that, so comparing byte lengths against this is safe.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Make a `t.me` link that opens a private chat with the bot and sends
/// `/start <payload>` once the user presses "Start".
///
/// Telegram only accepts `A-Z`, `a-z`, `0-9`, `_` and `-` in the payload,
/// up to 64 characters. Checking that is up to the caller.
#[must_use]
pub fn deep_link(bot_username: &str, payload: &str) -> String {
    format!("https://t.me/{bot_username}?start={payload}")
}

pub trait BotLongMessages {
    /// Send a plain text message, split into as many messages as needed to
    /// stay under [`TELEGRAM_MESSAGE_LIMIT`]. Splits happen on line breaks
    /// where possible. Every part replies to `reply_to`, if given.
    ///
    /// Stops at the first failed part.
    fn send_long_message(
        &self,
        to_where: impl Into<Recipient> + Send,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> impl Future<Output = Result<Vec<Message>, RequestError>> + Send;
}

impl BotLongMessages for Bot {
    async fn send_long_message(
        &self,
        to_where: impl Into<Recipient> + Send,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<Vec<Message>, RequestError> {
        let to_where: Recipient = to_where.into();
        let mut sent_messages = Vec::new();

        for part in SplitByLines::new(text, TELEGRAM_MESSAGE_LIMIT) {
            let mut request = self.send_message(to_where.clone(), part);
            if let Some(reply_to) = reply_to {
                request = request.reply_to(reply_to);
            }
            sent_messages.push(request.await?);
        }

        Ok(sent_messages)
    }
}
