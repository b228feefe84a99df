//! The double-entry engine: every slip lives as two legs in two accounts,
//! and every mutation keeps both legs and both cached balances consistent.

use chrono::NaiveDate;

use slipbook_domain::{Book, Entry, Transaction};

use crate::{error::CoreError, policy::PairingPolicy, statement_service::StatementService};

/// Caller-supplied fields for one side of a new or edited pair. The engine
/// derives the counter leg from these.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub slip_number: String,
    pub entry: Entry,
}

impl TransactionDraft {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        slip_number: impl Into<String>,
        entry: Entry,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            slip_number: slip_number.into(),
            entry,
        }
    }
}

/// Outcome of a global slip-number scan, with enough context for the caller
/// to phrase an exact duplicate message.
#[derive(Debug, Clone, Default)]
pub struct SlipLookup {
    pub exists: bool,
    pub transaction: Option<Transaction>,
    pub account_name: Option<String>,
}

/// Creates, edits, and deletes transaction pairs. All validation happens
/// before any mutation; a failed call leaves the book untouched, with the
/// single documented exception of [`TransactionService::remove_pair`] on an
/// already-corrupt slip.
pub struct TransactionService;

impl TransactionService {
    /// Creates both legs of a new slip and refreshes both balances.
    ///
    /// Leg A carries the draft entry in the current account; leg B carries
    /// the opposite entry in the linked account. Both share date,
    /// description, and slip number, and name each other's account as
    /// counter account.
    pub fn add_pair(
        book: &mut Book,
        policy: PairingPolicy,
        current_account_id: u64,
        linked_account_id: u64,
        draft: TransactionDraft,
    ) -> Result<(Transaction, Transaction), CoreError> {
        let current_name = Self::account_name(book, current_account_id)?;
        let linked_name = Self::account_name(book, linked_account_id)?;
        if current_account_id == linked_account_id && !policy.allows_self_link() {
            return Err(CoreError::SelfLink(current_name));
        }
        Self::validate_amount(&draft.entry)?;
        Self::ensure_slip_free(book, &draft.slip_number, None)?;

        let leg_a = Transaction {
            id: book.allocate_transaction_id(),
            account_id: current_account_id,
            number: book.next_number_for(current_account_id),
            date: draft.date,
            description: draft.description.clone(),
            slip_number: draft.slip_number.clone(),
            entry: draft.entry,
            counter_account: linked_name,
        };
        book.transactions.push(leg_a.clone());

        // Computed after leg A lands so a self-linked pair still gets
        // consecutive numbers.
        let leg_b = Transaction {
            id: book.allocate_transaction_id(),
            account_id: linked_account_id,
            number: book.next_number_for(linked_account_id),
            date: draft.date,
            description: draft.description,
            slip_number: draft.slip_number,
            entry: draft.entry.opposite(),
            counter_account: current_name,
        };
        book.transactions.push(leg_b.clone());

        StatementService::refresh_balance(book, current_account_id);
        StatementService::refresh_balance(book, linked_account_id);
        book.touch();
        Ok((leg_a, leg_b))
    }

    /// Rewrites both legs of an existing slip. Re-linking to a different
    /// counter account moves leg B into that account; it keeps its sequence
    /// number, since edits never renumber.
    pub fn edit_pair(
        book: &mut Book,
        policy: PairingPolicy,
        original_slip: &str,
        current_account_id: u64,
        old_linked_account_name: &str,
        new_linked_account_id: u64,
        draft: TransactionDraft,
    ) -> Result<(), CoreError> {
        let current_name = Self::account_name(book, current_account_id)?;
        let new_linked_name = Self::account_name(book, new_linked_account_id)?;
        let old_linked_id = book
            .account_by_name(old_linked_account_name)
            .ok_or_else(|| CoreError::AccountNotFound(old_linked_account_name.into()))?
            .id;

        if current_account_id == new_linked_account_id && !policy.allows_self_link() {
            return Err(CoreError::SelfLink(current_name));
        }
        Self::validate_amount(&draft.entry)?;
        Self::ensure_slip_free(book, &draft.slip_number, Some(original_slip))?;

        let leg_a = book
            .transactions
            .iter()
            .position(|txn| {
                txn.slip_matches(original_slip) && txn.account_id == current_account_id
            })
            .ok_or_else(|| {
                CoreError::TransactionNotFound(format!(
                    "slip `{original_slip}` in `{current_name}`"
                ))
            })?;
        // The counter leg must be a different row: a self-linked pair has
        // both legs in the same account.
        let leg_b = book
            .transactions
            .iter()
            .enumerate()
            .position(|(index, txn)| {
                index != leg_a && txn.slip_matches(original_slip) && txn.account_id == old_linked_id
            })
            .ok_or_else(|| CoreError::LinkedTransactionNotFound {
                slip: original_slip.into(),
                account: old_linked_account_name.into(),
            })?;

        {
            let txn = &mut book.transactions[leg_a];
            txn.date = draft.date;
            txn.description = draft.description.clone();
            txn.slip_number = draft.slip_number.clone();
            txn.entry = draft.entry;
            txn.counter_account = new_linked_name;
        }
        {
            let txn = &mut book.transactions[leg_b];
            txn.account_id = new_linked_account_id;
            txn.date = draft.date;
            txn.description = draft.description;
            txn.slip_number = draft.slip_number;
            txn.entry = draft.entry.opposite();
            txn.counter_account = current_name;
        }

        StatementService::refresh_balance(book, current_account_id);
        StatementService::refresh_balance(book, old_linked_id);
        if new_linked_account_id != old_linked_id {
            StatementService::refresh_balance(book, new_linked_account_id);
        }
        book.touch();
        Ok(())
    }

    /// Removes every leg sharing `slip` and refreshes the owning balances.
    ///
    /// A slip that does not resolve to an exact pair signals corruption that
    /// predates this call: the legs that were found are still removed, and
    /// the inconsistency is surfaced as [`CoreError::PartialLedger`].
    pub fn remove_pair(book: &mut Book, slip: &str) -> Result<Vec<Transaction>, CoreError> {
        let (removed, kept): (Vec<Transaction>, Vec<Transaction>) = book
            .transactions
            .drain(..)
            .partition(|txn| txn.slip_matches(slip));
        book.transactions = kept;

        if removed.is_empty() {
            return Err(CoreError::TransactionNotFound(format!("slip `{slip}`")));
        }

        let mut owners: Vec<u64> = removed.iter().map(|txn| txn.account_id).collect();
        owners.sort_unstable();
        owners.dedup();
        for account_id in owners {
            StatementService::refresh_balance(book, account_id);
        }
        book.touch();

        if removed.len() != 2 {
            return Err(CoreError::PartialLedger {
                slip: slip.into(),
                found: removed.len(),
            });
        }
        Ok(removed)
    }

    /// Case-insensitive scan for an existing slip anywhere in the book.
    pub fn slip_lookup(book: &Book, slip: &str) -> SlipLookup {
        let Some(txn) = book.transactions.iter().find(|txn| txn.slip_matches(slip)) else {
            return SlipLookup::default();
        };
        let account_name = book.account(txn.account_id).map(|a| a.name.clone());
        SlipLookup {
            exists: true,
            transaction: Some(txn.clone()),
            account_name,
        }
    }

    fn account_name(book: &Book, id: u64) -> Result<String, CoreError> {
        book.account(id)
            .map(|account| account.name.clone())
            .ok_or_else(|| CoreError::AccountNotFound(id.to_string()))
    }

    fn validate_amount(entry: &Entry) -> Result<(), CoreError> {
        let amount = entry.amount();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidAmount(amount));
        }
        Ok(())
    }

    /// A slip is free when no existing transaction uses it, except that an
    /// edit may keep its own pair's slip (`reuse_of`).
    fn ensure_slip_free(book: &Book, slip: &str, reuse_of: Option<&str>) -> Result<(), CoreError> {
        if let Some(own) = reuse_of {
            if own.eq_ignore_ascii_case(slip) {
                return Ok(());
            }
        }
        let lookup = Self::slip_lookup(book, slip);
        if let Some(conflict) = lookup.transaction {
            return Err(CoreError::DuplicateSlip {
                slip: slip.into(),
                number: conflict.number,
                account: lookup
                    .account_name
                    .unwrap_or_else(|| "unknown account".into()),
            });
        }
        Ok(())
    }
}
