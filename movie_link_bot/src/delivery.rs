use std::time::Duration;

use teloxide::types::ChatId;

use crate::{
    config::{DEFAULT_AUTO_DELETE, DEFAULT_COPY_INTERVAL},
    courier::Courier,
    database::Database,
    error::Error,
    types::{DeliveredMessage, MovieItem},
};

pub const NOT_FOUND_TEXT: &str = "Sorry, movie not found or expired.";

/// Timings of a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Pause between two copies in a row.
    pub copy_interval: Duration,
    /// How long after the last copy the copies get deleted.
    pub delete_after: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        DeliveryPolicy {
            copy_interval: DEFAULT_COPY_INTERVAL,
            delete_after: DEFAULT_AUTO_DELETE,
        }
    }
}

/// What came out of one delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Nothing is saved under the code.
    NotFound,
    Delivered {
        /// Copies that made it, in the order they were sent.
        /// These are scheduled for deletion.
        delivered: Vec<DeliveredMessage>,
        /// How many items failed to copy.
        failed: usize,
    },
}

/// Send everything saved under `code` to `requester`.
///
/// Only a failing database lookup or a failing "not found" notice make this
/// return an error; see [`deliver_items`] for the rest.
pub async fn deliver<C: Courier>(
    courier: &C,
    database: &Database,
    policy: DeliveryPolicy,
    requester: ChatId,
    code: &str,
) -> Result<DeliveryReport, Error> {
    let items = database.find_by_code(code).await?;
    log::debug!(
        "Delivering {} item(s) of code {code:?} to {requester}",
        items.len()
    );
    deliver_items(courier, policy, requester, &items).await
}

/// Copy `items` to `requester` in order, one per `policy.copy_interval`.
///
/// An item that fails to copy gets a one-line notice in the chat instead,
/// and the rest still go out. If anything was delivered, deleting it is
/// scheduled `policy.delete_after` from now, in a task of its own.
///
/// With no items, the requester is told nothing was found and nothing is copied.
pub async fn deliver_items<C: Courier>(
    courier: &C,
    policy: DeliveryPolicy,
    requester: ChatId,
    items: &[MovieItem],
) -> Result<DeliveryReport, Error> {
    if items.is_empty() {
        courier
            .notify(requester, NOT_FOUND_TEXT.to_string())
            .await?;
        return Ok(DeliveryReport::NotFound);
    }

    let mut delivered = Vec::with_capacity(items.len());
    let mut failed = 0;

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(policy.copy_interval).await;
        }

        match courier.copy_item(requester, item.source).await {
            Ok(message_id) => delivered.push(DeliveredMessage {
                chat_id: requester,
                message_id,
            }),
            Err(e) => {
                failed += 1;
                log::warn!(
                    "Failed to copy item {} (code {:?}) to {requester}: {e}",
                    item.id,
                    item.code
                );
                if let Err(e) = courier
                    .notify(requester, format!("(Failed to send one item: {e})"))
                    .await
                {
                    log::warn!("Couldn't even tell {requester} about it: {e}");
                }
            }
        }
    }

    if !delivered.is_empty() {
        tokio::spawn(delete_later(
            courier.clone(),
            delivered.clone(),
            policy.delete_after,
        ));
    }

    Ok(DeliveryReport::Delivered { delivered, failed })
}

/// Wait `delay`, then try to delete all of `messages`.
/// Failures are skipped over; the user may have deleted them already.
async fn delete_later<C: Courier>(courier: C, messages: Vec<DeliveredMessage>, delay: Duration) {
    tokio::time::sleep(delay).await;

    let mut deleted = 0;
    for message in &messages {
        match courier
            .remove_message(message.chat_id, message.message_id)
            .await
        {
            Ok(()) => deleted += 1,
            Err(e) => log::debug!(
                "Couldn't delete message {} in {}: {e}",
                message.message_id.0,
                message.chat_id
            ),
        }
    }

    log::debug!("Auto-deleted {deleted} of {} message(s)", messages.len());
}
