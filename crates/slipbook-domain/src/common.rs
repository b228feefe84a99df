//! Shared traits and name-comparison helpers for book entities.

/// Exposes a stable identifier for entities stored in a book.
pub trait Identifiable {
    fn id(&self) -> u64;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Normalizes an account name for case-insensitive uniqueness checks.
pub fn normalized_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_name_trims_and_lowercases() {
        assert_eq!(normalized_name("  Petty Cash "), "petty cash");
        assert_eq!(normalized_name("RENT"), "rent");
    }
}
