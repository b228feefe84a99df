//! Facade that coordinates book state, validation policy, and persistence.

use tracing::{info, warn};

use slipbook_domain::{Account, Book, Transaction};

use crate::{
    account_service::{AccountRemoval, AccountService},
    book_service::BookService,
    error::CoreError,
    policy::PairingPolicy,
    statement_service::{AccountStatement, StatementService},
    storage::BookStorage,
    transaction_service::{SlipLookup, TransactionDraft, TransactionService},
};

/// Single-writer facade over one account book.
///
/// Every mutating call runs against a cloned snapshot and persists that
/// snapshot before it becomes visible: a failed save leaves both the
/// in-memory book and the stored copy on the previous state, so no reader
/// can observe a half-applied operation. Mutations take `&mut self`, which
/// serializes writers; reads take `&self` against the committed state.
pub struct BookManager {
    book: Book,
    name: String,
    storage: Box<dyn BookStorage>,
    policy: PairingPolicy,
}

impl BookManager {
    /// Creates a new book and persists its initial empty state.
    pub fn create(
        name: &str,
        storage: Box<dyn BookStorage>,
        policy: PairingPolicy,
    ) -> Result<Self, CoreError> {
        let book = BookService::create(name);
        storage.save_book(name, &book)?;
        info!(book = name, "created account book");
        Ok(Self {
            book,
            name: name.to_string(),
            storage,
            policy,
        })
    }

    /// Opens a previously saved book, logging any integrity findings.
    pub fn open(
        name: &str,
        storage: Box<dyn BookStorage>,
        policy: PairingPolicy,
    ) -> Result<Self, CoreError> {
        let mut book = storage.load_book(name)?;
        book.reconcile_counters();
        for finding in BookService::integrity_warnings(&book) {
            warn!(book = name, "{finding}");
        }
        Ok(Self {
            book,
            name: name.to_string(),
            storage,
            policy,
        })
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PairingPolicy) {
        self.policy = policy;
    }

    /// Saves the current state under a different storage name.
    pub fn save_as(&mut self, name: &str) -> Result<(), CoreError> {
        self.storage.save_book(name, &self.book)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn accounts(&self) -> Vec<&Account> {
        AccountService::list(&self.book)
    }

    pub fn account(&self, id: u64) -> Result<&Account, CoreError> {
        AccountService::get(&self.book, id)
    }

    pub fn create_account(&mut self, name: &str) -> Result<Account, CoreError> {
        let created = self.commit(|book| AccountService::create(book, name))?;
        info!(book = %self.name, account = %created.name, "account created");
        Ok(created)
    }

    pub fn rename_account(&mut self, id: u64, new_name: &str) -> Result<(), CoreError> {
        self.commit(|book| AccountService::rename(book, id, new_name))?;
        info!(book = %self.name, account = id, new_name, "account renamed");
        Ok(())
    }

    pub fn delete_account(&mut self, id: u64) -> Result<AccountRemoval, CoreError> {
        let removal = self.commit(|book| AccountService::remove(book, id))?;
        for finding in &removal.warnings {
            warn!(book = %self.name, "{finding}");
        }
        info!(
            book = %self.name,
            account = %removal.account.name,
            removed = removal.removed_transactions,
            "account deleted"
        );
        Ok(removal)
    }

    pub fn add_transaction(
        &mut self,
        current_account_id: u64,
        linked_account_id: u64,
        draft: TransactionDraft,
    ) -> Result<(Transaction, Transaction), CoreError> {
        let policy = self.policy;
        let pair = self.commit(move |book| {
            TransactionService::add_pair(book, policy, current_account_id, linked_account_id, draft)
        })?;
        info!(book = %self.name, slip = %pair.0.slip_number, "transaction pair added");
        Ok(pair)
    }

    pub fn edit_transaction(
        &mut self,
        original_slip: &str,
        current_account_id: u64,
        old_linked_account_name: &str,
        new_linked_account_id: u64,
        draft: TransactionDraft,
    ) -> Result<(), CoreError> {
        let policy = self.policy;
        self.commit(move |book| {
            TransactionService::edit_pair(
                book,
                policy,
                original_slip,
                current_account_id,
                old_linked_account_name,
                new_linked_account_id,
                draft,
            )
        })?;
        info!(book = %self.name, slip = original_slip, "transaction pair edited");
        Ok(())
    }

    pub fn delete_transaction(&mut self, slip: &str) -> Result<Vec<Transaction>, CoreError> {
        let removed = self.commit(|book| TransactionService::remove_pair(book, slip))?;
        info!(book = %self.name, slip, legs = removed.len(), "transaction pair deleted");
        Ok(removed)
    }

    pub fn slip_lookup(&self, slip: &str) -> SlipLookup {
        TransactionService::slip_lookup(&self.book, slip)
    }

    pub fn statement(&self, account_id: u64) -> Result<AccountStatement, CoreError> {
        StatementService::statement(&self.book, account_id)
    }

    pub fn statement_up_to(
        &self,
        account_id: u64,
        number: u32,
    ) -> Result<AccountStatement, CoreError> {
        StatementService::statement_up_to(&self.book, account_id, number)
    }

    pub fn integrity_warnings(&self) -> Vec<String> {
        BookService::integrity_warnings(&self.book)
    }

    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut Book) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut snapshot = self.book.clone();
        match op(&mut snapshot) {
            Ok(value) => {
                self.storage.save_book(&self.name, &snapshot)?;
                self.book = snapshot;
                Ok(value)
            }
            // A detected pre-existing inconsistency still commits whatever
            // the operation safely removed before surfacing the error.
            Err(err @ CoreError::PartialLedger { .. }) => {
                self.storage.save_book(&self.name, &snapshot)?;
                self.book = snapshot;
                warn!(book = %self.name, "{err}");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
