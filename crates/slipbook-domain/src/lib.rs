//! slipbook-domain
//!
//! Pure domain models (Book, Account, Transaction, Entry).
//! No I/O, no storage. Only data types and core helpers.

pub mod account;
pub mod book;
pub mod common;
pub mod transaction;

pub use account::*;
pub use book::*;
pub use common::*;
pub use transaction::*;
