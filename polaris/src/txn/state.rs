// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction state

use crate::catalog::operations::AccessMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        TransactionId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "txn_{}", self.0.simple())
    }
}

/// Transaction lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Active,
    Committed,
    RolledBack,
}

/// Bookkeeping record of one host transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolarisTransaction {
    pub id: TransactionId,
    pub status: TransactionStatus,
    pub access_mode: AccessMode,
    pub started_at: DateTime<Utc>,
}

impl PolarisTransaction {
    pub fn new(access_mode: AccessMode) -> Self {
        Self {
            id: TransactionId::new(),
            status: TransactionStatus::Active,
            access_mode,
            started_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    pub fn is_read_only(&self) -> bool {
        self.access_mode.is_read_only()
    }
}
