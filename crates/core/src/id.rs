//! Opaque identifier generation.
//!
//! Record identifiers are opaque strings from the caller's point of view.
//! They are generated from random UUIDs rather than timestamps so two
//! records created within the same instant can never collide.

use uuid::Uuid;

/// Generate a fresh opaque record identifier.
///
/// The returned string is unique, URL-safe, and carries no meaning beyond
/// identity. Callers must not parse it.
#[must_use]
pub fn generate() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_url_safe() {
        let id = generate();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
