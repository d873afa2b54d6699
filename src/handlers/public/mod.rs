// Public handlers: token acquisition and service status, no authentication
pub mod auth;
pub mod health;

pub use auth::login;
pub use health::{health, root};
