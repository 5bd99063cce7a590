use serde_json::{json, Value};

/// Redis channel carrying entity-change events to connected WebSocket
/// clients. Front-ends re-query on events instead of polling.
pub const EVENTS_CHANNEL: &str = "messmate:events";

/// Fire-and-forget event publication.
/// Spawns a background task — never blocks the request handler,
/// never propagates errors (logs a warning on failure).
pub fn publish(mut redis: redis::aio::MultiplexedConnection, event: &str, payload: Value) {
    let message = json!({ "type": event, "payload": payload }).to_string();
    let event = event.to_string();

    tokio::spawn(async move {
        let res: Result<(), redis::RedisError> = redis::cmd("PUBLISH")
            .arg(EVENTS_CHANNEL)
            .arg(&message)
            .query_async(&mut redis)
            .await;

        if let Err(e) = res {
            tracing::warn!("event publish failed for {event}: {e}");
        }
    });
}
