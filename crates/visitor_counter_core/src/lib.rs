//! Shared visitor counter domain primitives.
//!
//! This crate owns the gateway request/response contract, configuration
//! defaults and the store error taxonomy. It intentionally excludes AWS SDK
//! and Lambda runtime concerns, which live in `visitor_counter_lambda`.

pub mod config;
pub mod contract;
pub mod error;
