use serde::{Deserialize, Serialize};

use crate::common::{Displayable, Identifiable, NamedEntity};

/// A named ledger account holding one side of paired transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: u64,
    pub name: String,
    /// Cached final running balance. Derived from the transaction log;
    /// rewritten by the engine after every mutation, never hand-edited.
    pub balance: f64,
}

impl Account {
    /// Creates an account with a zero balance.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: 0.0,
        }
    }
}

impl Identifiable for Account {
    fn id(&self) -> u64 {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({:.2})", self.name, self.balance)
    }
}
