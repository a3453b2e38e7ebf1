//! Database access, one module per aggregate.

pub mod game_events;
pub mod game_keys;
pub mod game_sessions;
pub mod games;
pub mod settings;
pub mod users;

/// True when the database rejected the statement for a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
