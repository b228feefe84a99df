//! Book construction and whole-book diagnostics.

use std::collections::BTreeMap;

use slipbook_domain::{Book, Transaction};

/// Provides constructor helpers and consistency diagnostics for [`Book`]
/// instances. Diagnostics only report; the engine never auto-heals.
pub struct BookService;

impl BookService {
    /// Creates a new, empty book.
    pub fn create(name: impl Into<String>) -> Book {
        Book::new(name)
    }

    /// Renames the book itself.
    pub fn rename(book: &mut Book, new_name: impl Into<String>) {
        book.name = new_name.into();
        book.touch();
    }

    /// Detects anomalies within a book snapshot: slips that do not resolve
    /// to an exact opposite-sided pair, counter-account names matching no
    /// account, legs owned by no account, and cached balances that drifted
    /// from the recomputed totals.
    pub fn integrity_warnings(book: &Book) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut by_slip: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
        for txn in &book.transactions {
            by_slip
                .entry(txn.slip_number.to_ascii_lowercase())
                .or_default()
                .push(txn);
        }
        for (slip, legs) in &by_slip {
            match legs.as_slice() {
                [a, b] => {
                    if a.entry.is_debit() == b.entry.is_debit() {
                        warnings.push(format!("slip `{slip}` has two legs on the same side"));
                    }
                    if (a.entry.amount() - b.entry.amount()).abs() > f64::EPSILON {
                        warnings.push(format!("slip `{slip}` has mismatched amounts"));
                    }
                    if a.date != b.date {
                        warnings.push(format!("slip `{slip}` has mismatched dates"));
                    }
                }
                legs => warnings.push(format!(
                    "slip `{slip}` has {} legs instead of 2",
                    legs.len()
                )),
            }
        }

        for txn in &book.transactions {
            if book.account(txn.account_id).is_none() {
                warnings.push(format!(
                    "transaction {} belongs to unknown account {}",
                    txn.id, txn.account_id
                ));
            }
            if book.account_by_name(&txn.counter_account).is_none() {
                warnings.push(format!(
                    "transaction {} references unknown account `{}`",
                    txn.id, txn.counter_account
                ));
            }
        }

        for account in &book.accounts {
            let recomputed: f64 = book
                .transactions_for(account.id)
                .iter()
                .map(|txn| txn.entry.signed())
                .sum();
            if (account.balance - recomputed).abs() > 1e-9 {
                warnings.push(format!(
                    "account `{}` caches balance {} but its entries total {}",
                    account.name, account.balance, recomputed
                ));
            }
        }

        warnings
    }
}
