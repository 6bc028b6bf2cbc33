// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for Polaris Catalog
//!
//! Exchanges client credentials for tokens, browses remote catalogs through
//! the metadata cache and prints the storage credentials vended for a table.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_catalogs, handle_credentials, handle_schemas, handle_tables, handle_token,
};
