//! Source code for Movie Link Bot.
//!
//! The admin replies `/save <code>` to messages with files to register them
//! under a code. Anyone who opens `t.me/<bot>?start=<code>` gets copies of
//! everything saved under that code, which disappear again after a while.

/// Various types used throughout.
mod types;

/// Errors that handlers can run into.
mod error;

/// Startup configuration from the environment.
mod config;

/// The database of saved messages.
mod database;

/// The few bot API calls the delivery needs, behind a trait.
mod courier;

/// Copying saved messages to users and cleaning them up afterwards.
mod delivery;

/// Functions that handle events from Telegram.
mod handlers;

/// Tiny web server that answers uptime pings.
mod keep_alive;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;
