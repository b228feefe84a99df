//! Validation switches the source system left configurable.

/// Whether one account may hold both legs of a slip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelfLinkPolicy {
    /// Refuse pairs whose two legs would land in the same account.
    #[default]
    Reject,
    /// Permit self-linked pairs; their net balance effect is zero.
    Allow,
}

/// Validation rules applied by the transaction engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingPolicy {
    pub self_links: SelfLinkPolicy,
}

impl PairingPolicy {
    pub fn allowing_self_links() -> Self {
        Self {
            self_links: SelfLinkPolicy::Allow,
        }
    }

    pub fn allows_self_link(&self) -> bool {
        matches!(self.self_links, SelfLinkPolicy::Allow)
    }
}
