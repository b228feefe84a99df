//! slipbook-core
//!
//! Business logic and services for slipbook: the double-entry pairing
//! engine, running-balance statements, account lifecycle cascades, and the
//! persistence-aware facade. Depends on slipbook-domain; no terminal I/O
//! and no concrete storage backends.

pub mod account_service;
pub mod book_service;
pub mod error;
pub mod manager;
pub mod policy;
pub mod statement_service;
pub mod storage;
pub mod transaction_service;

pub use account_service::*;
pub use book_service::*;
pub use error::CoreError;
pub use manager::BookManager;
pub use policy::*;
pub use statement_service::*;
pub use storage::BookStorage;
pub use transaction_service::*;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Installs the global tracing subscriber once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
        tracing::info!("slipbook tracing initialized");
    });
}
