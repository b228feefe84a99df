//! Ordered running-balance views over one account's transactions.

use chrono::NaiveDate;

use slipbook_domain::{Book, Transaction};

use crate::error::CoreError;

/// One display-ready statement row: the leg's export columns plus the
/// cumulative balance after applying it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLine {
    pub id: u64,
    pub number: u32,
    pub date: NaiveDate,
    pub description: String,
    pub slip_number: String,
    pub debit: Option<f64>,
    pub credit: Option<f64>,
    pub counter_account: String,
    pub balance: f64,
}

impl StatementLine {
    fn from_leg(txn: &Transaction, balance: f64) -> Self {
        Self {
            id: txn.id,
            number: txn.number,
            date: txn.date,
            description: txn.description.clone(),
            slip_number: txn.slip_number.clone(),
            debit: txn.entry.debit(),
            credit: txn.entry.credit(),
            counter_account: txn.counter_account.clone(),
            balance,
        }
    }
}

/// Ordered, balance-annotated statement for a single account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountStatement {
    pub account_id: u64,
    pub account_name: String,
    pub lines: Vec<StatementLine>,
    pub final_balance: f64,
}

/// Pure derivations from the transaction log. Reads never mutate the book;
/// the `refresh_*` helpers are the only writers and only touch cached
/// balances.
pub struct StatementService;

impl StatementService {
    /// Builds the ordered running-balance view of an account.
    ///
    /// Legs are ordered by date, then sequence number, then id. Date leads
    /// because edits may move a leg's date without renumbering it; the id
    /// keeps the order total even if a re-linked leg carried a duplicate
    /// number into its new account.
    pub fn statement(book: &Book, account_id: u64) -> Result<AccountStatement, CoreError> {
        let account = book
            .account(account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;

        let mut legs = book.transactions_for(account_id);
        legs.sort_by_key(|txn| (txn.date, txn.number, txn.id));

        let mut balance = 0.0;
        let lines: Vec<StatementLine> = legs
            .into_iter()
            .map(|txn| {
                balance += txn.entry.signed();
                StatementLine::from_leg(txn, balance)
            })
            .collect();

        let final_balance = lines.last().map_or(0.0, |line| line.balance);
        Ok(AccountStatement {
            account_id,
            account_name: account.name.clone(),
            lines,
            final_balance,
        })
    }

    /// Truncates the statement after the line whose sequence number matches,
    /// for "up to transaction N" exports.
    pub fn statement_up_to(
        book: &Book,
        account_id: u64,
        number: u32,
    ) -> Result<AccountStatement, CoreError> {
        let mut statement = Self::statement(book, account_id)?;
        let cut = statement
            .lines
            .iter()
            .position(|line| line.number == number)
            .ok_or_else(|| {
                CoreError::TransactionNotFound(format!(
                    "number {} in `{}`",
                    number, statement.account_name
                ))
            })?;
        statement.lines.truncate(cut + 1);
        statement.final_balance = statement.lines.last().map_or(0.0, |line| line.balance);
        Ok(statement)
    }

    /// Rewrites the cached balance of `account_id` from its transaction log.
    /// Unknown ids are a no-op.
    pub fn refresh_balance(book: &mut Book, account_id: u64) {
        let total: f64 = book
            .transactions_for(account_id)
            .iter()
            .map(|txn| txn.entry.signed())
            .sum();
        if let Some(account) = book.account_mut(account_id) {
            account.balance = total;
        }
    }

    /// Recomputes every cached account balance.
    pub fn refresh_all(book: &mut Book) {
        let ids: Vec<u64> = book.accounts.iter().map(|account| account.id).collect();
        for id in ids {
            Self::refresh_balance(book, id);
        }
    }
}
