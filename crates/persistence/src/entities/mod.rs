//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod invite;

pub use invite::InviteEntity;
