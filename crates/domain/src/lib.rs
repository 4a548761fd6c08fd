//! Domain models for the Tryon backend.

pub mod models;
