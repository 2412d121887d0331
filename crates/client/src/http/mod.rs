//! Dashboard HTTP API client.
//!
//! Thin I/O glue over the dashboard backend: email-challenge
//! authentication and direct workspace/user CRUD endpoints. Retry and
//! backoff policy belongs to callers, not this layer.

pub mod client;
pub mod dto;
pub mod paths;

pub use client::{ClientError, DashboardClient};
