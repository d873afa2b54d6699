pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod fixtures;
pub mod handlers;
pub mod middleware;
pub mod permission;
pub mod record;
pub mod server;
pub mod session;
pub mod types;
pub mod view;
