//! Client SDK for the boards platform.
//!
//! Two independent pieces live here:
//! - the activation flow: exchanging a one-time invite code for an
//!   authenticated session ([`activation`], [`session`]);
//! - the tag data-access layer: typed GraphQL operations for managing tags
//!   and attaching them to generations, with a cache-invalidate-by-refetch
//!   policy after every mutation ([`tags`]).
//!
//! Sessions are explicit values: every data-access call takes a
//! [`session::Session`], and lifecycle events flow through
//! [`session::SessionHandle`] subscriptions. There is no ambient auth state.

pub mod activation;
pub mod error;
pub mod graphql;
pub mod operations;
pub mod session;
pub mod tags;

pub use error::ClientError;
