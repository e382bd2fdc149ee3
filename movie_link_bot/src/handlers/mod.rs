pub mod admin;
pub mod commands;

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, Me, MessageId, UserId},
};

use crate::{
    courier::Courier,
    database::Database,
    delivery::{self, DeliveryPolicy, DeliveryReport},
    error::Error,
    types::SourceRef,
};

use self::{
    admin::{Caller, SaveSource},
    commands::{CommandKind, ParsedCommand},
};

const STORAGE_DOWN_TEXT: &str = "Storage is unavailable right now. Please try again later.";
const NO_CODE_TEXT: &str = "Open this bot via a direct link.";

/// Everything handlers need besides the bot itself.
pub struct BotState {
    pub database: Database,
    pub admin_id: Option<UserId>,
    pub delivery_policy: DeliveryPolicy,
}

/// The parts of an incoming command message that handling it needs.
#[derive(Clone, Copy, Debug)]
struct Incoming<'a> {
    chat: ChatId,
    message_id: MessageId,
    sender: Option<UserId>,
    /// The message this one is a reply to.
    replied_to: Option<SaveSource<'a>>,
}

impl<'a> Incoming<'a> {
    fn of(message: &'a Message) -> Self {
        Incoming {
            chat: message.chat.id,
            message_id: message.id,
            sender: message.from.as_ref().map(|from| from.id),
            replied_to: message.reply_to_message().map(|source| SaveSource {
                source: SourceRef::of(source),
                caption: source.caption(),
            }),
        }
    }
}

pub async fn handle_message(
    bot: Bot,
    me: Me,
    message: Message,
    state: Arc<BotState>,
) -> Result<(), Error> {
    let incoming = Incoming::of(&message);
    // Bot ignores messages made by itself.
    if incoming.sender == Some(me.id) {
        return Ok(());
    }

    let Some(text) = message.text() else {
        return Ok(());
    };

    let Some(command) = ParsedCommand::parse(text, me.username()) else {
        return Ok(());
    };

    respond(&bot, &state, me.username(), incoming, &command).await
}

/// Handle the command, and if the database fails along the way, tell the
/// requester so before passing the error on.
async fn respond<C: Courier>(
    courier: &C,
    state: &BotState,
    bot_username: &str,
    incoming: Incoming<'_>,
    command: &ParsedCommand<'_>,
) -> Result<(), Error> {
    let result = handle_command(courier, state, bot_username, incoming, command).await;

    if let Err(Error::Database(e)) = &result {
        log::error!("Database failed while handling {}: {e}", command.command.callname);
        if let Err(e) = courier
            .reply(incoming.chat, incoming.message_id, STORAGE_DOWN_TEXT.to_string())
            .await
        {
            log::warn!("Couldn't tell {} that storage is down: {e}", incoming.chat);
        }
    }

    result
}

async fn handle_command<C: Courier>(
    courier: &C,
    state: &BotState,
    bot_username: &str,
    incoming: Incoming<'_>,
    command: &ParsedCommand<'_>,
) -> Result<(), Error> {
    let caller = Caller {
        user: incoming.sender,
        admin: state.admin_id,
    };

    let reply = match command.kind() {
        CommandKind::Start => {
            let Some(code) = command.first_arg() else {
                courier.notify(incoming.chat, NO_CODE_TEXT.to_string()).await?;
                return Ok(());
            };

            let report = delivery::deliver(
                courier,
                &state.database,
                state.delivery_policy,
                incoming.chat,
                code,
            )
            .await?;

            if let DeliveryReport::Delivered { delivered, failed } = report {
                log::info!(
                    "Delivered {} item(s) of {code:?} to {}, {failed} failed",
                    delivered.len(),
                    incoming.chat
                );
            }
            return Ok(());
        }
        CommandKind::Save => {
            admin::save(
                &state.database,
                caller,
                command.first_arg(),
                incoming.replied_to,
                bot_username,
            )
            .await?
        }
        CommandKind::Clear => admin::clear(&state.database, caller, command.first_arg()).await?,
        CommandKind::List => admin::list(&state.database, caller).await?,
    };

    courier
        .reply(incoming.chat, incoming.message_id, reply)
        .await?;

    Ok(())
}
