// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Remote catalog metadata cache
//!
//! A two-level cache of the remote catalog's structure. The façade
//! ([`manager::PolarisCatalog`]) owns a schema cache, each schema owns a table
//! cache, and both caches share one generic implementation
//! ([`entry_set::EntrySet`]) parameterized by a scope-specific loader.

pub mod entry;
pub mod entry_set;
pub mod error;
pub mod manager;
pub mod operations;
pub mod providers;
pub mod registry;
pub mod system_procedures;
pub mod traits;
