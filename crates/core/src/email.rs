//! Email address helpers shared by every account type.

/// Canonical form for storage and lookups (trimmed, lower-cased).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape check only: `local@domain.tld`, no whitespace.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn plausibility() {
        assert!(is_plausible_email("a@b.io"));
        assert!(!is_plausible_email("a.b.io"));
        assert!(!is_plausible_email("@b.io"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a@.io"));
        assert!(!is_plausible_email("a b@c.io"));
        assert!(!is_plausible_email("a@b@c.io"));
    }
}
