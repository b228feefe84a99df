//! Validated account lifecycle mutations and their cascades.

use std::collections::BTreeMap;

use slipbook_domain::{normalized_name, Account, Book, Transaction};

use crate::{error::CoreError, statement_service::StatementService};

/// Report returned by [`AccountService::remove`].
///
/// Cascade anomalies (a removed slip that did not come out as an exact pair)
/// are reported as warnings rather than failing the delete; the data was
/// already inconsistent before the call.
#[derive(Debug, Clone)]
pub struct AccountRemoval {
    pub account: Account,
    pub removed_transactions: usize,
    pub warnings: Vec<String>,
}

/// Provides validated mutations for [`Account`] entities.
pub struct AccountService;

impl AccountService {
    /// Adds a new account with a zero balance.
    pub fn create(book: &mut Book, name: &str) -> Result<Account, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidName(name.into()));
        }
        Self::validate_name(book, None, trimmed)?;
        let id = book.allocate_account_id();
        let account = Account::new(id, trimmed);
        book.accounts.push(account.clone());
        book.touch();
        Ok(account)
    }

    /// Renames an account and rewrites every leg that referenced the old
    /// name as its counter account. The name is the cross-account link key,
    /// so skipping the rewrite would silently break pairings.
    pub fn rename(book: &mut Book, id: u64, new_name: &str) -> Result<(), CoreError> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidName(new_name.into()));
        }
        Self::validate_name(book, Some(id), trimmed)?;
        let account = book
            .account_mut(id)
            .ok_or_else(|| CoreError::AccountNotFound(id.to_string()))?;
        let old_name = std::mem::replace(&mut account.name, trimmed.to_string());

        for txn in book
            .transactions
            .iter_mut()
            .filter(|txn| txn.counter_account == old_name)
        {
            txn.counter_account = trimmed.to_string();
        }
        book.touch();
        Ok(())
    }

    /// Removes an account together with every transaction tied to it:
    /// its own legs, legs elsewhere naming it as counter account, and the
    /// slip-mates of all of those. Surviving balances are recomputed.
    pub fn remove(book: &mut Book, id: u64) -> Result<AccountRemoval, CoreError> {
        let position = book
            .accounts
            .iter()
            .position(|account| account.id == id)
            .ok_or_else(|| CoreError::AccountNotFound(id.to_string()))?;
        let account = book.accounts.remove(position);
        let name = account.name.clone();

        let doomed_slips: Vec<String> = book
            .transactions
            .iter()
            .filter(|txn| txn.account_id == id || txn.counter_account == name)
            .map(|txn| txn.slip_number.clone())
            .collect();

        let (removed, kept): (Vec<Transaction>, Vec<Transaction>) =
            book.transactions.drain(..).partition(|txn| {
                txn.account_id == id
                    || txn.counter_account == name
                    || doomed_slips.iter().any(|slip| txn.slip_matches(slip))
            });
        book.transactions = kept;

        let mut per_slip: BTreeMap<String, usize> = BTreeMap::new();
        for txn in &removed {
            *per_slip
                .entry(txn.slip_number.to_ascii_lowercase())
                .or_default() += 1;
        }
        let warnings: Vec<String> = per_slip
            .iter()
            .filter(|(_, count)| **count != 2)
            .map(|(slip, count)| {
                format!("slip `{slip}` cascaded {count} entries instead of a pair")
            })
            .collect();

        StatementService::refresh_all(book);
        book.touch();
        Ok(AccountRemoval {
            account,
            removed_transactions: removed.len(),
            warnings,
        })
    }

    /// Returns a snapshot of the accounts currently tracked in the book.
    pub fn list(book: &Book) -> Vec<&Account> {
        book.accounts.iter().collect()
    }

    pub fn get(book: &Book, id: u64) -> Result<&Account, CoreError> {
        book.account(id)
            .ok_or_else(|| CoreError::AccountNotFound(id.to_string()))
    }

    fn validate_name(book: &Book, exclude: Option<u64>, candidate: &str) -> Result<(), CoreError> {
        let normalized = normalized_name(candidate);
        let duplicate = book.accounts.iter().any(|account| {
            normalized_name(&account.name) == normalized && exclude != Some(account.id)
        });
        if duplicate {
            Err(CoreError::DuplicateName(candidate.into()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use slipbook_domain::Entry;

    use super::*;
    use crate::transaction_service::{TransactionDraft, TransactionService};
    use crate::PairingPolicy;

    fn draft(slip: &str, entry: Entry) -> TransactionDraft {
        TransactionDraft {
            date: NaiveDate::from_ymd_opt(2024, 7, 23).unwrap(),
            description: "cascade fixture".into(),
            slip_number: slip.into(),
            entry,
        }
    }

    #[test]
    fn create_rejects_duplicate_names_case_insensitively() {
        let mut book = Book::new("Accounts");
        AccountService::create(&mut book, "Cash").expect("first create succeeds");

        let err = AccountService::create(&mut book, "  cash ").expect_err("duplicate must fail");
        assert!(matches!(err, CoreError::DuplicateName(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn create_rejects_blank_names() {
        let mut book = Book::new("Accounts");
        let err = AccountService::create(&mut book, "   ").expect_err("blank must fail");
        assert!(matches!(err, CoreError::InvalidName(_)));
    }

    #[test]
    fn rename_cascades_to_counter_references() {
        let mut book = Book::new("Accounts");
        let cash = AccountService::create(&mut book, "Cash").unwrap();
        let rent = AccountService::create(&mut book, "Rent").unwrap();
        TransactionService::add_pair(
            &mut book,
            PairingPolicy::default(),
            cash.id,
            rent.id,
            draft("S005", Entry::Debit(800.0)),
        )
        .unwrap();

        AccountService::rename(&mut book, cash.id, "Petty Cash").unwrap();

        assert!(book
            .transactions
            .iter()
            .all(|txn| txn.counter_account != "Cash"));
        let rent_leg = book
            .transactions
            .iter()
            .find(|txn| txn.account_id == rent.id)
            .unwrap();
        assert_eq!(rent_leg.counter_account, "Petty Cash");
    }

    #[test]
    fn rename_rejects_a_name_held_by_another_account() {
        let mut book = Book::new("Accounts");
        let cash = AccountService::create(&mut book, "Cash").unwrap();
        AccountService::create(&mut book, "Rent").unwrap();

        let err = AccountService::rename(&mut book, cash.id, "rent").expect_err("must collide");
        assert!(matches!(err, CoreError::DuplicateName(_)));
    }

    #[test]
    fn rename_to_the_same_name_is_allowed() {
        let mut book = Book::new("Accounts");
        let cash = AccountService::create(&mut book, "Cash").unwrap();
        AccountService::rename(&mut book, cash.id, "Cash").expect("self rename succeeds");
    }

    #[test]
    fn remove_cascades_through_shared_slips() {
        let mut book = Book::new("Accounts");
        let cash = AccountService::create(&mut book, "Cash").unwrap();
        let rent = AccountService::create(&mut book, "Rent").unwrap();
        let supplies = AccountService::create(&mut book, "Supplies").unwrap();
        let policy = PairingPolicy::default();
        TransactionService::add_pair(&mut book, policy, cash.id, rent.id, draft("S001", Entry::Debit(800.0))).unwrap();
        TransactionService::add_pair(&mut book, policy, cash.id, supplies.id, draft("S002", Entry::Debit(50.0))).unwrap();
        TransactionService::add_pair(&mut book, policy, rent.id, supplies.id, draft("S003", Entry::Credit(25.0))).unwrap();

        let removal = AccountService::remove(&mut book, cash.id).unwrap();

        assert_eq!(removal.removed_transactions, 4);
        assert!(removal.warnings.is_empty());
        assert!(book.account(cash.id).is_none());
        assert!(book
            .transactions
            .iter()
            .all(|txn| txn.account_id != cash.id && txn.counter_account != "Cash"));
        // The untouched pair survives with recomputed balances.
        assert_eq!(book.transactions.len(), 2);
        assert_eq!(book.account(rent.id).unwrap().balance, 25.0);
        assert_eq!(book.account(supplies.id).unwrap().balance, -25.0);
    }

    #[test]
    fn remove_reports_unpaired_cascade_counts() {
        let mut book = Book::new("Accounts");
        let cash = AccountService::create(&mut book, "Cash").unwrap();
        let rent = AccountService::create(&mut book, "Rent").unwrap();
        TransactionService::add_pair(
            &mut book,
            PairingPolicy::default(),
            cash.id,
            rent.id,
            draft("S001", Entry::Debit(10.0)),
        )
        .unwrap();
        // Strip one leg to simulate pre-existing corruption.
        book.transactions.retain(|txn| txn.account_id != rent.id);

        let removal = AccountService::remove(&mut book, cash.id).unwrap();
        assert_eq!(removal.removed_transactions, 1);
        assert_eq!(removal.warnings.len(), 1);
        assert!(removal.warnings[0].contains("s001"));
    }

    #[test]
    fn remove_unknown_account_is_an_error() {
        let mut book = Book::new("Accounts");
        let err = AccountService::remove(&mut book, 42).expect_err("must fail");
        assert!(matches!(err, CoreError::AccountNotFound(_)));
    }
}
