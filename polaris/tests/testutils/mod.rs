//! Test utilities for polaris integration tests
//!
//! - MockCatalogApi: in-memory catalog service with call counters and failure injection
//! - fixtures: helpers building an extension and attachments on top of the mock

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_api;
