use teloxide::RequestError;

/// Anything that can go wrong while handling an update.
///
/// Both kinds only fail the update being handled; the bot keeps running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Telegram request failed: {0}")]
    Request(#[from] RequestError),
    #[error("Database failed: {0}")]
    Database(#[from] sqlx::Error),
}
