//! Change feed over server-sent events.
//!
//! Each message carries one row change as JSON:
//! `{"type": "INSERT", "table": "...", "record": {...}, "old_record": {...}}`.
//! The feed is not retried: on a transport error it closes and the
//! subscription goes inactive.

use crate::domain::gateway::change::{ChangeEvent, ChangeHandler, ChangeKind, Subscription};
use crate::domain::shared::errors::GatewayError;
use futures_util::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct ChangePayload {
    #[serde(rename = "type", alias = "eventType")]
    kind: ChangeKind,
    table: String,
    #[serde(default)]
    record: Value,
    #[serde(default)]
    old_record: Value,
}

pub fn decode_change(data: &str) -> Result<ChangeEvent, GatewayError> {
    let payload: ChangePayload =
        serde_json::from_str(data).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(ChangeEvent {
        collection: payload.table,
        kind: payload.kind,
        record: payload.record,
        old_record: payload.old_record,
    })
}

/// Opens the event stream described by `request` and delivers every change
/// on `collection` to `on_change` until the subscription is dropped.
pub fn spawn_feed(
    request: reqwest::RequestBuilder,
    collection: String,
    on_change: ChangeHandler,
) -> Result<Subscription, GatewayError> {
    let mut source = request
        .eventsource()
        .map_err(|e| GatewayError::Realtime(e.to_string()))?;

    let token = CancellationToken::new();
    let task_token = token.clone();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = task_token.cancelled() => break,
                next = source.next() => match next {
                    Some(Ok(Event::Open)) => info!(collection = %collection, "Change feed opened"),
                    Some(Ok(Event::Message(message))) => match decode_change(&message.data) {
                        Ok(event) if event.collection == collection => on_change(event),
                        Ok(event) => debug!(table = %event.collection, "Ignoring change on other table"),
                        Err(e) => debug!(error = %e, event = %message.event, "Ignoring non-change message"),
                    },
                    Some(Err(e)) => {
                        warn!(collection = %collection, error = %e, "Change feed failed, closing");
                        break;
                    }
                    None => break,
                }
            }
        }
        source.close();
        debug!(collection = %collection, "Change feed closed");
    });

    Ok(Subscription::new(token, task))
}
