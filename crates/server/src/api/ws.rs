//! WebSocket feed of the end-user catalog.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use biocatalog_core::{BucketCounts, CatalogCard, CatalogFilter, CatalogView};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// WebSocket message sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Full card list for the connection's filter, sent on connect and on
    /// every change.
    CatalogSnapshot {
        entries: Vec<CatalogCard>,
        counts: BucketCounts,
    },
}

impl WsMessage {
    fn snapshot(view: &CatalogView, filter: &CatalogFilter) -> Self {
        WsMessage::CatalogSnapshot {
            entries: view.entries(filter),
            counts: view.bucket_counts(),
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CatalogFilter>,
) -> impl IntoResponse {
    let view = state.catalog().clone();
    ws.on_upgrade(move |socket| handle_socket(socket, view, filter))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, mut view: CatalogView, filter: CatalogFilter) {
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket client connected");

    // Push the current list, then one snapshot per feed change
    let send_task = tokio::spawn(async move {
        view.mark_seen();
        loop {
            let msg = WsMessage::snapshot(&view, &filter);
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize WsMessage: {}", e);
                }
            }

            if !view.changed().await {
                debug!("Catalog feed closed");
                break;
            }
        }
    });

    // Handle incoming messages from client (ping/pong, close)
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Text(text)) => {
                // We don't expect any client messages, but log them
                debug!("Received text message: {}", text);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    send_task.abort();
    info!("WebSocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_tag() {
        let msg = WsMessage::CatalogSnapshot {
            entries: Vec::new(),
            counts: BucketCounts::default(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "catalog_snapshot");
        assert_eq!(json["counts"]["house"], 0);
    }
}
