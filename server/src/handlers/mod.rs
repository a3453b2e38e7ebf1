pub mod auth;
pub mod game_events;
pub mod game_keys;
pub mod game_sessions;
pub mod games;
pub mod settings;
pub mod steam;
pub mod system;
pub mod updates;
pub mod users;
pub mod ws;

pub use auth::*;
pub use game_events::*;
pub use game_keys::*;
pub use game_sessions::*;
pub use games::*;
pub use settings::*;
pub use steam::*;
pub use system::*;
pub use updates::*;
pub use users::*;
pub use ws::*;
