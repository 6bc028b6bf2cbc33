// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction shim
//!
//! The remote catalog service has no multi-statement transactions. The host
//! still expects a transaction manager per attachment, so this module only
//! keeps track of which transactions exist and how they ended.

pub mod manager;
pub mod state;

pub use manager::{PolarisTransactionManager, TransactionStatistics};
pub use state::{PolarisTransaction, TransactionId, TransactionStatus};
