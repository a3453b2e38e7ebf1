//! Data models shared across database access and API handlers.

pub mod game;
pub mod game_event;
pub mod game_key;
pub mod game_session;
pub mod setting;
pub mod user;
