//! Repository implementations for database operations.

pub mod invite;

pub use invite::InviteRepository;
