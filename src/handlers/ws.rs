use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::AppState;
use crate::events::BookingEvent;

/// Optional filters: a chef dashboard subscribes with its chef id, a
/// customer's booking list with its customer id. No filter means the full
/// stream.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    chef_id: Option<Uuid>,
    customer_id: Option<Uuid>,
}

fn matches(filter: &WsQuery, event: &BookingEvent) -> bool {
    if let Some(chef_id) = filter.chef_id {
        if event.chef_id != chef_id {
            return false;
        }
    }
    if let Some(customer_id) = filter.customer_id {
        if event.customer_id != customer_id {
            return false;
        }
    }
    true
}

/// WebSocket upgrade handler for the booking event stream
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, filter: WsQuery) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe to broadcast channel
    let mut rx = state.events.subscribe();

    // Spawn task to handle incoming messages from client
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text message: {}", text);
                }
                Message::Ping(_) => {
                    tracing::trace!("Received ping");
                    // Axum handles pong automatically
                }
                Message::Close(_) => {
                    tracing::info!("Client closed connection");
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn task to send booking events and heartbeats to client
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat_interval = tokio::time::interval(tokio::time::Duration::from_secs(30));

        loop {
            tokio::select! {
                // Send heartbeat ping
                _ = heartbeat_interval.tick() => {
                    if sender.send(Message::Ping(vec![])).await.is_err() {
                        tracing::info!("Client disconnected during heartbeat");
                        break;
                    }
                }
                // Forward booking events matching the subscription filter
                result = rx.recv() => {
                    match result {
                        Ok(event) => {
                            if !matches(&filter, &event) {
                                continue;
                            }

                            let json = match serde_json::to_string(&event) {
                                Ok(j) => j,
                                Err(e) => {
                                    tracing::error!("Failed to serialize event: {}", e);
                                    continue;
                                }
                            };

                            if sender.send(Message::Text(json)).await.is_err() {
                                tracing::info!("Client disconnected");
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("Client lagged behind by {} events", n);
                            // Keep serving; the client simply misses old events
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Broadcast channel closed");
                            break;
                        }
                    }
                }
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookingStatus;
    use crate::events::BookingEventKind;
    use chrono::Utc;

    fn event(chef_id: Uuid, customer_id: Uuid) -> BookingEvent {
        BookingEvent {
            kind: BookingEventKind::StatusChanged,
            booking_id: Uuid::new_v4(),
            chef_id,
            customer_id,
            status: BookingStatus::Confirmed,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unfiltered_subscription_sees_everything() {
        let filter = WsQuery {
            chef_id: None,
            customer_id: None,
        };
        assert!(matches(&filter, &event(Uuid::new_v4(), Uuid::new_v4())));
    }

    #[test]
    fn chef_filter_drops_other_chefs() {
        let chef = Uuid::new_v4();
        let filter = WsQuery {
            chef_id: Some(chef),
            customer_id: None,
        };
        assert!(matches(&filter, &event(chef, Uuid::new_v4())));
        assert!(!matches(&filter, &event(Uuid::new_v4(), Uuid::new_v4())));
    }

    #[test]
    fn combined_filters_require_both() {
        let chef = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let filter = WsQuery {
            chef_id: Some(chef),
            customer_id: Some(customer),
        };
        assert!(matches(&filter, &event(chef, customer)));
        assert!(!matches(&filter, &event(chef, Uuid::new_v4())));
    }
}
