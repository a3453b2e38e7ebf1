pub mod auth;
pub mod logging;
pub mod permit;
pub mod rate_limit;

pub use auth::*;
pub use logging::*;
pub use permit::*;
pub use rate_limit::*;
