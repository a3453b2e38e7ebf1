//! Process-wide broadcast bus feeding the realtime channel.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Named channels clients can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    GameSessions,
    GameEvents,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::GameSessions => "game-sessions",
            Channel::GameEvents => "game-events",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "game-sessions" => Some(Channel::GameSessions),
            "game-events" => Some(Channel::GameEvents),
            _ => None,
        }
    }
}

/// Session channel event names.
pub const SESSION_STARTED: &str = "session_started";
pub const SESSION_ENDED: &str = "session_ended";
pub const SESSION_UPDATED: &str = "session_updated";
pub const SESSION_DELETED: &str = "session_deleted";
pub const CLIENT_SESSIONS_STOPPED: &str = "client_sessions_stopped";
pub const ACTIVE_SESSIONS_UPDATED: &str = "active_sessions_updated";

/// Event channel event names.
pub const EVENT_CREATED: &str = "event_created";
pub const EVENT_UPDATED: &str = "event_updated";
pub const EVENT_DELETED: &str = "event_deleted";
pub const EVENT_STATUS_UPDATED: &str = "event_status_updated";
pub const EVENTS_LIST_UPDATED: &str = "events_list_updated";

#[derive(Debug, Clone, Serialize)]
/// Payload carried to every subscriber of a channel.
pub struct Envelope {
    pub channel: &'static str,
    pub event: &'static str,
    pub data: Value,
}

impl Envelope {
    pub fn new(channel: Channel, event: &'static str, data: Value) -> Self {
        Self {
            channel: channel.as_str(),
            event,
            data,
        }
    }
}

/// Broadcast hub for one channel.
struct Hub {
    sender: broadcast::Sender<Envelope>,
}

impl Hub {
    fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    /// Delivery is best effort. A send with no subscribers is not an error.
    fn publish(&self, envelope: Envelope) {
        let _ = self.sender.send(envelope);
    }
}

/// One hub per channel, owned by the shared application state.
pub struct EventBus {
    sessions: Hub,
    events: Hub,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Hub::new(capacity),
            events: Hub::new(capacity),
        }
    }

    fn hub(&self, channel: Channel) -> &Hub {
        match channel {
            Channel::GameSessions => &self.sessions,
            Channel::GameEvents => &self.events,
        }
    }

    pub fn subscribe(&self, channel: Channel) -> broadcast::Receiver<Envelope> {
        self.hub(channel).subscribe()
    }

    pub fn publish<T: Serialize>(&self, channel: Channel, event: &'static str, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => self
                .hub(channel)
                .publish(Envelope::new(channel, event, value)),
            Err(err) => {
                tracing::error!(event, "Failed to serialize broadcast payload: {}", err);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
