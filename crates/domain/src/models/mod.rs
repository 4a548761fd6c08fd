//! Domain model definitions.

pub mod invite;
pub mod tag;

pub use invite::{ActivateRequest, ActivateResponse, Invite, Redeemability};
pub use tag::{slugify, CreateTagInput, Tag, UpdateTagInput};
