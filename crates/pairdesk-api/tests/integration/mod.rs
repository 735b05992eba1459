//! Integration tests for pairdesk-api.
//!
//! These tests run the REST client against a local mock of the platform API:
//! - request bodies and bearer authentication
//! - success, rejection and error-status handling
//! - enveloped and paginated fetches

pub mod common;
