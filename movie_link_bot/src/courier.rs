use std::future::Future;

use bot_commons::useful_methods::BotLongMessages;
use teloxide::{
    requests::Requester,
    types::{ChatId, MessageId},
    Bot, RequestError,
};

use crate::types::SourceRef;

/// The bot API calls that delivering messages needs.
///
/// Implemented for [`Bot`]; tests put a recording fake in its place.
pub trait Courier: Clone + Send + Sync + 'static {
    /// Copy the source message into `to`, returning the ID of the copy.
    fn copy_item(
        &self,
        to: ChatId,
        source: SourceRef,
    ) -> impl Future<Output = Result<MessageId, RequestError>> + Send;

    fn remove_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Send a plain text message.
    fn notify(
        &self,
        chat: ChatId,
        text: String,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Reply to a message with text of any length, split up if needed.
    fn reply(
        &self,
        chat: ChatId,
        to: MessageId,
        text: String,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;
}

impl Courier for Bot {
    async fn copy_item(&self, to: ChatId, source: SourceRef) -> Result<MessageId, RequestError> {
        self.copy_message(to, source.chat_id, source.message_id)
            .await
    }

    async fn remove_message(&self, chat: ChatId, message: MessageId) -> Result<(), RequestError> {
        self.delete_message(chat, message).await?;
        Ok(())
    }

    async fn notify(&self, chat: ChatId, text: String) -> Result<(), RequestError> {
        self.send_message(chat, text).await?;
        Ok(())
    }

    async fn reply(&self, chat: ChatId, to: MessageId, text: String) -> Result<(), RequestError> {
        self.send_long_message(chat, &text, Some(to)).await?;
        Ok(())
    }
}
