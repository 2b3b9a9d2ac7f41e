//! AWS-oriented adapters and the request handler for the visitor counter.
//!
//! This crate owns runtime integration details (the Lambda handler and the
//! DynamoDB adapter). Contract types, configuration and the error taxonomy
//! come from `visitor_counter_core`.

pub mod adapters;
pub mod handlers;
