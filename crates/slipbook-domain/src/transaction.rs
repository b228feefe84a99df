//! Domain models for transaction legs and their debit/credit sides.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{Displayable, Identifiable};

/// The side a transaction leg carries, with its positive amount.
///
/// Exactly one side exists by construction; there is no representable state
/// with both or neither.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Entry {
    Debit(f64),
    Credit(f64),
}

impl Entry {
    /// Returns the positive magnitude of the entry.
    pub fn amount(&self) -> f64 {
        match self {
            Entry::Debit(amount) | Entry::Credit(amount) => *amount,
        }
    }

    /// Returns the same amount on the opposite side.
    pub fn opposite(&self) -> Entry {
        match self {
            Entry::Debit(amount) => Entry::Credit(*amount),
            Entry::Credit(amount) => Entry::Debit(*amount),
        }
    }

    /// Contribution to a running balance: credits add, debits subtract.
    pub fn signed(&self) -> f64 {
        match self {
            Entry::Debit(amount) => -amount,
            Entry::Credit(amount) => *amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        matches!(self, Entry::Debit(_))
    }

    /// The debit column value, if this is a debit leg.
    pub fn debit(&self) -> Option<f64> {
        match self {
            Entry::Debit(amount) => Some(*amount),
            Entry::Credit(_) => None,
        }
    }

    /// The credit column value, if this is a credit leg.
    pub fn credit(&self) -> Option<f64> {
        match self {
            Entry::Credit(amount) => Some(*amount),
            Entry::Debit(_) => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Debit(amount) => write!(f, "debit {:.2}", amount),
            Entry::Credit(amount) => write!(f, "credit {:.2}", amount),
        }
    }
}

/// One leg of a double-entry pair, owned by a single account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub account_id: u64,
    /// 1-based position in the owning account's creation order. Assigned
    /// once; edits never renumber.
    pub number: u32,
    pub date: NaiveDate,
    pub description: String,
    /// External reference shared by exactly this leg and its counterpart.
    pub slip_number: String,
    pub entry: Entry,
    /// Name of the account holding the other leg of this slip.
    pub counter_account: String,
}

impl Transaction {
    /// Compares this leg's slip number against `slip`, ignoring ASCII case.
    pub fn slip_matches(&self, slip: &str) -> bool {
        self.slip_number.eq_ignore_ascii_case(slip)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} | {}]", self.id, self.slip_number, self.entry)
    }
}
