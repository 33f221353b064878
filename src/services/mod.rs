//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - Hosted relational store (PostgREST-style HTTP adapter)
//! - Authentication service (password sign-in)
//! - Background submission execution

pub mod auth;
pub mod store;
pub mod submit;

pub use auth::Session;
pub use store::{select_into, EntityStore, RestStore, StoreError};
pub use submit::{spawn, SubmitHandle, SubmitOutcome, SubmitPoll};
