use std::collections::HashMap;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    bus::{Channel, Envelope, ACTIVE_SESSIONS_UPDATED, EVENTS_LIST_UPDATED},
    error::AppError,
    models::{game_event::GameEventResponse, game_session::GameSessionResponse},
    repositories::{game_events, game_sessions},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientMessage {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
    Ping,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ServerMessage {
    Pong,
    Error { message: String },
}

/// Upgrades the connection into a realtime subscriber socket.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// Full lifecycle of one subscriber connection.
async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer keeps pushes flowing while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut forwarders: HashMap<Channel, JoinHandle<()>> = HashMap::new();

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                handle_client_message(&state, &text, &outbound_tx, &mut forwarders).await;
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) | Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(error = %err, "websocket receive error");
                break;
            }
        }
    }

    for (_, task) in forwarders.drain() {
        task.abort();
    }
    drop(outbound_tx);
    let _ = writer_task.await;
}

async fn handle_client_message(
    state: &AppState,
    text: &str,
    outbound_tx: &mpsc::UnboundedSender<Message>,
    forwarders: &mut HashMap<Channel, JoinHandle<()>>,
) {
    let parsed: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(err) => {
            debug!(error = %err, "ignoring malformed websocket message");
            let _ = send_json(
                outbound_tx,
                &ServerMessage::Error {
                    message: "Malformed message".to_string(),
                },
            );
            return;
        }
    };

    match parsed {
        ClientMessage::Subscribe { channel: name } => {
            let Some(channel) = Channel::parse(&name) else {
                let _ = send_json(
                    outbound_tx,
                    &ServerMessage::Error {
                        message: format!("Unknown channel: {name}"),
                    },
                );
                return;
            };

            // A repeated subscribe just replays the snapshot.
            let already_subscribed = forwarders.contains_key(&channel);
            let bus_rx = if already_subscribed {
                None
            } else {
                Some(state.bus.subscribe(channel))
            };

            match resync_envelope(state, channel).await {
                Ok(envelope) => {
                    if send_json(outbound_tx, &envelope).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!(channel = channel.as_str(), error = ?err, "channel resync failed");
                    let _ = send_json(
                        outbound_tx,
                        &ServerMessage::Error {
                            message: "Failed to load channel snapshot".to_string(),
                        },
                    );
                    return;
                }
            }

            if let Some(bus_rx) = bus_rx {
                forwarders.insert(channel, spawn_forwarder(channel, bus_rx, outbound_tx.clone()));
            }
        }
        ClientMessage::Unsubscribe { channel: name } => {
            let Some(channel) = Channel::parse(&name) else {
                let _ = send_json(
                    outbound_tx,
                    &ServerMessage::Error {
                        message: format!("Unknown channel: {name}"),
                    },
                );
                return;
            };
            if let Some(task) = forwarders.remove(&channel) {
                task.abort();
            }
        }
        ClientMessage::Ping => {
            let _ = send_json(outbound_tx, &ServerMessage::Pong);
        }
    }
}

/// Forwards bus envelopes to the writer until the bus or the socket goes away.
/// A lagged receiver skips what it missed and keeps going.
fn spawn_forwarder(
    channel: Channel,
    mut bus_rx: tokio::sync::broadcast::Receiver<Envelope>,
    outbound_tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match bus_rx.recv().await {
                Ok(envelope) => {
                    if send_json(&outbound_tx, &envelope).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(
                        channel = channel.as_str(),
                        skipped, "websocket subscriber lagged"
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Builds the snapshot envelope a fresh subscriber needs to catch up.
async fn resync_envelope(state: &AppState, channel: Channel) -> Result<Envelope, AppError> {
    let now = Utc::now();
    let (event, data) = match channel {
        Channel::GameSessions => {
            let active: Vec<GameSessionResponse> = game_sessions::list_active(&state.pool)
                .await?
                .into_iter()
                .map(|record| GameSessionResponse::from_record(record, now))
                .collect();
            (
                ACTIVE_SESSIONS_UPDATED,
                serde_json::to_value(active).map_err(anyhow::Error::new)?,
            )
        }
        Channel::GameEvents => {
            let events: Vec<GameEventResponse> = game_events::list_events(&state.pool)
                .await?
                .into_iter()
                .map(|event| GameEventResponse::from_event(event, now))
                .collect();
            (
                EVENTS_LIST_UPDATED,
                serde_json::to_value(events).map_err(anyhow::Error::new)?,
            )
        }
    };
    Ok(Envelope::new(channel, event, data))
}

/// Serializes a payload onto the writer queue. Err means the writer is gone.
fn send_json<T: Serialize>(tx: &mpsc::UnboundedSender<Message>, value: &T) -> Result<(), ()> {
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize websocket payload");
            return Ok(());
        }
    };
    tx.send(Message::Text(payload.into())).map_err(|_| ())
}
