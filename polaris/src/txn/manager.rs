// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction manager of one attachment

use super::state::{PolarisTransaction, TransactionId, TransactionStatus};
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::operations::AccessMode;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Tracks the transactions the host opens against one attachment
///
/// Nothing is forwarded to the remote service; commit and rollback only end
/// the bookkeeping record.
pub struct PolarisTransactionManager {
    catalog_name: String,
    /// Access mode of the attachment; read-only forces read-only transactions
    access_mode: AccessMode,
    active: RwLock<HashMap<TransactionId, PolarisTransaction>>,
    committed: AtomicU64,
    rolled_back: AtomicU64,
    checkpoints: AtomicU64,
}

impl PolarisTransactionManager {
    pub fn new(catalog_name: impl Into<String>, access_mode: AccessMode) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            access_mode,
            active: RwLock::new(HashMap::new()),
            committed: AtomicU64::new(0),
            rolled_back: AtomicU64::new(0),
            checkpoints: AtomicU64::new(0),
        }
    }

    /// Start a new transaction
    ///
    /// # Arguments
    /// * `access_mode` - Requested mode; `None` uses the attachment's mode
    pub fn start_transaction(&self, access_mode: Option<AccessMode>) -> PolarisTransaction {
        let requested = access_mode.unwrap_or(self.access_mode);
        let effective = if self.access_mode.is_read_only() {
            AccessMode::ReadOnly
        } else {
            requested
        };

        let transaction = PolarisTransaction::new(effective);
        self.active.write().insert(transaction.id, transaction.clone());
        log::debug!(
            "Started transaction {} on catalog '{}' ({})",
            transaction.id,
            self.catalog_name,
            effective
        );
        transaction
    }

    fn finish(&self, id: TransactionId, status: TransactionStatus) -> CatalogResult<PolarisTransaction> {
        let mut transaction = self.active.write().remove(&id).ok_or_else(|| {
            CatalogError::TransactionNotFound(format!(
                "Transaction {} not found on catalog '{}'",
                id, self.catalog_name
            ))
        })?;
        transaction.status = status;
        Ok(transaction)
    }

    /// Commit a transaction; there is nothing to flush
    pub fn commit(&self, id: TransactionId) -> CatalogResult<PolarisTransaction> {
        let transaction = self.finish(id, TransactionStatus::Committed)?;
        self.committed.fetch_add(1, Ordering::Relaxed);
        log::debug!("Committed transaction {}", id);
        Ok(transaction)
    }

    /// Roll back a transaction; there is nothing to undo
    pub fn rollback(&self, id: TransactionId) -> CatalogResult<PolarisTransaction> {
        let transaction = self.finish(id, TransactionStatus::RolledBack)?;
        self.rolled_back.fetch_add(1, Ordering::Relaxed);
        log::debug!("Rolled back transaction {}", id);
        Ok(transaction)
    }

    /// No local state to persist
    pub fn checkpoint(&self, force: bool) {
        self.checkpoints.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Checkpoint on catalog '{}' (force: {}) is a no-op",
            self.catalog_name,
            force
        );
    }

    pub fn get_transaction(&self, id: TransactionId) -> Option<PolarisTransaction> {
        self.active.read().get(&id).cloned()
    }

    pub fn active_transaction_ids(&self) -> Vec<TransactionId> {
        self.active.read().keys().copied().collect()
    }

    pub fn get_statistics(&self) -> TransactionStatistics {
        TransactionStatistics {
            active_transactions: self.active.read().len() as u64,
            committed_transactions: self.committed.load(Ordering::Relaxed),
            rolled_back_transactions: self.rolled_back.load(Ordering::Relaxed),
            checkpoints: self.checkpoints.load(Ordering::Relaxed),
        }
    }
}

/// Transaction statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionStatistics {
    pub active_transactions: u64,
    pub committed_transactions: u64,
    pub rolled_back_transactions: u64,
    pub checkpoints: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_and_rollback_bookkeeping() {
        let manager = PolarisTransactionManager::new("lake", AccessMode::ReadWrite);
        let first = manager.start_transaction(None);
        let second = manager.start_transaction(Some(AccessMode::ReadOnly));

        assert!(first.is_active());
        assert!(!first.is_read_only());
        assert!(second.is_read_only());
        assert_ne!(first.id, second.id);

        let committed = manager.commit(first.id).unwrap();
        assert_eq!(committed.status, TransactionStatus::Committed);
        let rolled_back = manager.rollback(second.id).unwrap();
        assert_eq!(rolled_back.status, TransactionStatus::RolledBack);

        manager.checkpoint(false);
        assert_eq!(
            manager.get_statistics(),
            TransactionStatistics {
                active_transactions: 0,
                committed_transactions: 1,
                rolled_back_transactions: 1,
                checkpoints: 1,
            }
        );
    }

    #[test]
    fn test_unknown_transaction() {
        let manager = PolarisTransactionManager::new("lake", AccessMode::ReadWrite);
        let txn = manager.start_transaction(None);
        manager.commit(txn.id).unwrap();

        let err = manager.commit(txn.id).unwrap_err();
        assert!(matches!(err, CatalogError::TransactionNotFound(_)));
        let err = manager.rollback(TransactionId::new()).unwrap_err();
        assert!(matches!(err, CatalogError::TransactionNotFound(_)));
    }

    #[test]
    fn test_read_only_attachment_forces_read_only() {
        let manager = PolarisTransactionManager::new("lake", AccessMode::ReadOnly);
        let txn = manager.start_transaction(Some(AccessMode::ReadWrite));
        assert!(txn.is_read_only());
        assert!(manager.get_transaction(txn.id).is_some());
        assert_eq!(manager.active_transaction_ids(), vec![txn.id]);
    }
}
