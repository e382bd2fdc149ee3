use std::sync::Arc;

use teloxide::{
    dptree::deps,
    error_handlers::LoggingErrorHandler,
    payloads::SetMyCommandsSetters,
    prelude::*,
    types::{BotCommandScope, Recipient},
};

use crate::{
    config::Config,
    database::Database,
    delivery::DeliveryPolicy,
    handlers::{commands::Command, BotState},
    keep_alive,
};

/// # Panics
///
/// Panics if the configuration is unusable or the database can't be opened.
pub async fn entry() {
    log::info!("ASYNC WOOOO");
    let config = Config::from_env().expect("Could not load the configuration!");

    let Config {
        bot_token,
        admin_id,
        database_url,
        port,
        auto_delete_after,
        copy_interval,
    } = config;

    if admin_id.is_none() {
        log::warn!("ADMIN_USER_ID is not set, so nobody can save, clear or list codes.");
    }

    if database_url.is_none() {
        log::warn!("DATABASE_URL is not set. Saved codes live in memory and are lost on restart!");
    }

    let database = Database::open(database_url.as_deref())
        .await
        .expect("Could not open the database!");

    match database.total_items().await {
        Ok(count) => log::info!("Database has {count} saved item(s)."),
        Err(e) => log::warn!("Could not count saved items: {e}"),
    }

    let bot = Bot::new(bot_token);

    bot.set_my_commands(Command::generate_bot_commands(false))
        .await
        .expect("Failed to set bot commands!");

    if let Some(admin_id) = admin_id {
        // Users and their private chats with the bot share the ID.
        let admin_chat = Recipient::Id(ChatId::from(admin_id));
        if let Err(e) = bot
            .set_my_commands(Command::generate_bot_commands(true))
            .scope(BotCommandScope::Chat {
                chat_id: admin_chat,
            })
            .await
        {
            // Happens if the admin never started a chat with the bot.
            log::warn!("Failed to set admin commands: {e}");
        }
    }

    tokio::spawn(async move {
        if let Err(e) = keep_alive::serve(port).await {
            log::error!("Keep-alive server died: {e}");
        }
    });

    let state = Arc::new(BotState {
        database,
        admin_id,
        delivery_policy: DeliveryPolicy {
            copy_interval,
            delete_after: auto_delete_after,
        },
    });

    log::info!("Creating the handler...");

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(crate::handlers::handle_message));

    log::info!("Dispatching the dispatcher!");

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error occurred while handling an update",
        ))
        .dependencies(deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("it appears we have been bonked.");
}
