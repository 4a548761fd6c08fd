//! Shared utilities for the Tryon backend.

pub mod token;
