//! The `Book` aggregate: accounts, transaction legs, and id allocators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{account::Account, common::normalized_name, transaction::Transaction};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The complete persisted state of one account book.
///
/// Identifier counters only move forward; ids of deleted rows are never
/// handed out again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "Book::first_id")]
    next_account_id: u64,
    #[serde(default = "Book::first_id")]
    next_transaction_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Book::schema_version_default")]
    pub schema_version: u8,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: Vec::new(),
            transactions: Vec::new(),
            next_account_id: Self::first_id(),
            next_transaction_id: Self::first_id(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Hands out the next account id, advancing the counter.
    pub fn allocate_account_id(&mut self) -> u64 {
        let id = self.next_account_id;
        self.next_account_id += 1;
        id
    }

    /// Hands out the next transaction id, advancing the counter.
    pub fn allocate_transaction_id(&mut self) -> u64 {
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;
        id
    }

    /// Raises the id counters above any id already present, for state saved
    /// by builds that did not persist them.
    pub fn reconcile_counters(&mut self) {
        let max_account = self.accounts.iter().map(|a| a.id).max().unwrap_or(0);
        let max_transaction = self.transactions.iter().map(|t| t.id).max().unwrap_or(0);
        self.next_account_id = self.next_account_id.max(max_account + 1);
        self.next_transaction_id = self.next_transaction_id.max(max_transaction + 1);
    }

    pub fn account(&self, id: u64) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: u64) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    /// Looks an account up by display name, trimmed and case-insensitive.
    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        let wanted = normalized_name(name);
        self.accounts
            .iter()
            .find(|account| normalized_name(&account.name) == wanted)
    }

    pub fn transaction(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Returns the legs owned by `account_id`, in insertion order.
    pub fn transactions_for(&self, account_id: u64) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.account_id == account_id)
            .collect()
    }

    /// Next 1-based sequence number for a leg created in `account_id`.
    pub fn next_number_for(&self, account_id: u64) -> u32 {
        self.transactions
            .iter()
            .filter(|txn| txn.account_id == account_id)
            .map(|txn| txn.number)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn first_id() -> u64 {
        1
    }
}
