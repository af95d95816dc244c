//! LocalStack-backed integration tests.
//!
//! These tests exercise the real S3 store implementation against a
//! LocalStack endpoint and skip silently when none is reachable.

mod common;
mod store_test;
