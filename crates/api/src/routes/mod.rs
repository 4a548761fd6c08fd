//! HTTP route handlers.

pub mod activate;
pub mod health;
