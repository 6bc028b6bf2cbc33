// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Data-access plans with vended storage credentials
//!
//! The host engine builds its own physical operators; the façade wraps them in
//! a [`CredentialedPlan`] that carries the storage credentials fetched for the
//! target table at plan time.

pub mod physical;

pub use physical::{CredentialedPlan, DataAccessKind, StorageAccess, TableIdentity};
