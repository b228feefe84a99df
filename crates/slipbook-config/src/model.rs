use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stores user-configurable preferences and metadata for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Currency label handed to statement renderers.
    pub currency: String,
    /// Whether new managers should accept pairs whose two legs share one
    /// account. Mirrors the engine's self-link policy switch.
    #[serde(default)]
    pub allow_self_linked_slips: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for books. Defaults to
    /// `~/Documents/Slipbook`.
    pub default_book_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            allow_self_linked_slips: false,
            last_opened_book: None,
            default_book_root: None,
        }
    }
}

impl Config {
    pub fn resolve_default_book_root(&self) -> PathBuf {
        if let Some(path) = &self.default_book_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Slipbook")
    }
}
