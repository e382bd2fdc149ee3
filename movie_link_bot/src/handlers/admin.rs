//! The admin's `/save`, `/clear` and `/list`.
//!
//! These take what they need out of the message and return the text to reply
//! with, so that they don't need a live bot to be tested.

use std::fmt::Write;

use bot_commons::useful_methods::deep_link;
use teloxide::types::UserId;

use crate::{
    database::{Database, Error},
    types::{MovieCode, SourceRef},
};

pub const UNAUTHORIZED_SAVE: &str = "Unauthorized. Only admin can save movies.";
pub const UNAUTHORIZED: &str = "Unauthorized.";
pub const SAVE_USAGE: &str = "Usage: Reply to a file with: /save movie123";
pub const SAVE_NOT_A_REPLY: &str = "Reply to the message that contains the movie.";
pub const CLEAR_USAGE: &str = "Usage: /clear movie123";
pub const LIST_EMPTY: &str = "No saved movies found in database.";

/// Who is asking, and who is allowed.
#[derive(Clone, Copy, Debug)]
pub struct Caller {
    pub user: Option<UserId>,
    pub admin: Option<UserId>,
}

impl Caller {
    /// Anonymous senders are never the admin, and with no admin configured
    /// nobody is.
    pub fn is_admin(&self) -> bool {
        self.user.is_some() && self.user == self.admin
    }
}

/// The message `/save` replied to.
#[derive(Clone, Copy, Debug)]
pub struct SaveSource<'a> {
    pub source: SourceRef,
    pub caption: Option<&'a str>,
}

pub async fn save(
    database: &Database,
    caller: Caller,
    code: Option<&str>,
    replied_to: Option<SaveSource<'_>>,
    bot_username: &str,
) -> Result<String, Error> {
    if !caller.is_admin() {
        log::info!("Unauthorized /save from {:?}", caller.user);
        return Ok(UNAUTHORIZED_SAVE.to_string());
    }

    let Some(code) = code else {
        return Ok(SAVE_USAGE.to_string());
    };

    let code = match MovieCode::parse(code) {
        Ok(code) => code,
        Err(e) => return Ok(format!("{e}\n\n{SAVE_USAGE}")),
    };

    let Some(SaveSource { source, caption }) = replied_to else {
        return Ok(SAVE_NOT_A_REPLY.to_string());
    };

    database.insert(code.as_str(), source, caption).await?;
    log::info!(
        "Saved message {} of chat {} under \"{code}\"",
        source.message_id.0,
        source.chat_id
    );

    Ok(format!(
        "Saved item for movie_id='{code}' in the database.\nLink: {}",
        deep_link(bot_username, code.as_str())
    ))
}

pub async fn clear(
    database: &Database,
    caller: Caller,
    code: Option<&str>,
) -> Result<String, Error> {
    if !caller.is_admin() {
        log::info!("Unauthorized /clear from {:?}", caller.user);
        return Ok(UNAUTHORIZED.to_string());
    }

    let Some(code) = code else {
        return Ok(CLEAR_USAGE.to_string());
    };

    let deleted = database.delete_by_code(code).await?;

    if deleted > 0 {
        log::info!("Cleared {deleted} item(s) of {code:?}");
        Ok(format!("Cleared {deleted} items for '{code}'."))
    } else {
        Ok(format!("No items found for '{code}'."))
    }
}

pub async fn list(database: &Database, caller: Caller) -> Result<String, Error> {
    if !caller.is_admin() {
        log::info!("Unauthorized /list from {:?}", caller.user);
        return Ok(UNAUTHORIZED.to_string());
    }

    let counts = database.counts_by_code().await?;

    if counts.is_empty() {
        return Ok(LIST_EMPTY.to_string());
    }

    let mut text = String::from("Saved movie codes:\n");
    for (code, count) in &counts {
        writeln!(text, "{code} → {count} item(s)").expect("Writing to a String never fails");
    }

    Ok(text)
}
