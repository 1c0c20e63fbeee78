//! HTTP handlers for the content API

pub mod auth;
pub mod content;

pub use auth::{authenticate, logout, verify};
pub use content::{get_data, save_data};
