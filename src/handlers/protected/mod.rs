// Protected handlers: every route here sits behind jwt_auth_middleware
pub mod auth;
pub mod data;

pub use auth::whoami;
pub use data::{list as data_list, record_delete, record_get};
