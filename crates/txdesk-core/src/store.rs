//! Transaction store boundary
//!
//! The front-end owns no persistence; every read and write goes through a
//! [`TransactionStore`]. The HTTP implementation lives in `txdesk-client`,
//! [`MemoryTransactionStore`] keeps records in process memory.

use crate::error::{CoreError, CoreResult};
use crate::models::{StatusOption, Transaction};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Remote transaction store
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Records matching a free-text query; an empty query returns all
    async fn fetch_transactions(&self, search_query: &str) -> CoreResult<Vec<Transaction>>;

    async fn create_transaction(&self, transaction: &Transaction) -> CoreResult<()>;

    async fn update_transaction(&self, transaction: &Transaction) -> CoreResult<()>;

    async fn fetch_statuses(&self) -> CoreResult<Vec<StatusOption>>;
}

/// Shared handle to a store
pub type StoreRef = Arc<dyn TransactionStore>;

#[derive(Debug, Default)]
struct MemoryData {
    transactions: Vec<Transaction>,
    statuses: Vec<StatusOption>,
    next_id: i64,
}

/// Store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    data: RwLock<MemoryData>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with records; new ids continue after the highest seeded one
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            data: RwLock::new(MemoryData {
                transactions,
                statuses: Vec::new(),
                next_id,
            }),
        }
    }

    pub fn with_statuses(self, statuses: Vec<StatusOption>) -> Self {
        let mut data = self.data.into_inner();
        data.statuses = statuses;
        Self {
            data: RwLock::new(data),
        }
    }

    /// Copy of every stored record
    pub async fn snapshot(&self) -> Vec<Transaction> {
        self.data.read().await.transactions.clone()
    }
}

fn matches_query(transaction: &Transaction, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        &transaction.transaction_id,
        &transaction.description,
        &transaction.status,
        &transaction.origin_account,
        &transaction.destination_account,
        &transaction.category,
    ]
    .iter()
    .filter_map(|value| value.as_deref())
    .any(|value| value.to_lowercase().contains(&needle))
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn fetch_transactions(&self, search_query: &str) -> CoreResult<Vec<Transaction>> {
        let data = self.data.read().await;
        let query = search_query.trim();
        if query.is_empty() {
            return Ok(data.transactions.clone());
        }
        Ok(data
            .transactions
            .iter()
            .filter(|t| matches_query(t, query))
            .cloned()
            .collect())
    }

    async fn create_transaction(&self, transaction: &Transaction) -> CoreResult<()> {
        let mut data = self.data.write().await;
        let mut record = transaction.clone();
        record.id = data.next_id.max(1);
        data.next_id = record.id + 1;
        log::debug!("Stored transaction {} in memory", record.id);
        data.transactions.push(record);
        Ok(())
    }

    async fn update_transaction(&self, transaction: &Transaction) -> CoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)
            .ok_or(CoreError::TransactionNotFound { id: transaction.id })?;
        *slot = transaction.clone();
        Ok(())
    }

    async fn fetch_statuses(&self) -> CoreResult<Vec<StatusOption>> {
        Ok(self.data.read().await.statuses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn tx(id: i64, code: &str, description: &str) -> Transaction {
        let mut t = Transaction::blank();
        t.id = id;
        t.transaction_id = Some(code.to_string());
        t.description = Some(description.to_string());
        t
    }

    #[tokio::test]
    async fn test_fetch_with_query() {
        let store = MemoryTransactionStore::with_transactions(vec![
            tx(1, "TX-1", "Office rent"),
            tx(2, "TX-2", "Coffee beans"),
        ]);
        assert_eq!(store.fetch_transactions("").await.unwrap().len(), 2);
        let hits = store.fetch_transactions("RENT").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert!(store.fetch_transactions("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let store = MemoryTransactionStore::with_transactions(vec![tx(5, "TX-5", "")]);
        store.create_transaction(&Transaction::blank()).await.unwrap();
        store.create_transaction(&Transaction::blank()).await.unwrap();
        let ids: Vec<i64> = store.snapshot().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);

        let empty = MemoryTransactionStore::new();
        empty.create_transaction(&Transaction::blank()).await.unwrap();
        assert_eq!(empty.snapshot().await[0].id, 1);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let store = MemoryTransactionStore::with_transactions(vec![tx(1, "TX-1", "old")]);
        store.update_transaction(&tx(1, "TX-1", "new")).await.unwrap();
        assert_eq!(
            store.snapshot().await[0].description.as_deref(),
            Some("new")
        );
        assert_eq!(
            store.update_transaction(&tx(9, "TX-9", "")).await,
            Err(CoreError::TransactionNotFound { id: 9 })
        );
    }

    #[tokio::test]
    async fn test_statuses() {
        let store = MemoryTransactionStore::new().with_statuses(vec![StatusOption {
            id: 1,
            name: "Open".to_string(),
        }]);
        assert_eq!(store.fetch_statuses().await.unwrap()[0].name, "Open");
    }
}
