use thiserror::Error;

/// Unified error type for the engine's services and persistence edges.
///
/// Every variant maps to a distinct, user-presentable message; no operation
/// fails without naming its reason.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("account `{0}` already exists")]
    DuplicateName(String),
    #[error("account name `{0}` is blank")]
    InvalidName(String),
    #[error("slip number `{slip}` is already used by transaction {number} in `{account}`")]
    DuplicateSlip {
        slip: String,
        number: u32,
        account: String,
    },
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("the counter entry for slip `{slip}` is missing from `{account}`")]
    LinkedTransactionNotFound { slip: String, account: String },
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("account `{0}` cannot be linked to itself")]
    SelfLink(String),
    #[error("slip `{slip}` had {found} entries instead of a pair; the book was already inconsistent")]
    PartialLedger { slip: String, found: usize },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
