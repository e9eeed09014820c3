//! Slug derivation shared by categories and posts.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, keeps only ASCII letters, digits and spaces, turns each run of
/// whitespace into a single hyphen and trims hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic_name() {
        assert_eq!(slugify("Technology"), "technology");
        assert_eq!(slugify("Web Development"), "web-development");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("C++ & Rust: Tips!"), "c-rust-tips");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_slugify_collapses_whitespace_and_trims() {
        assert_eq!(slugify("  Health   and\tWellness  "), "health-and-wellness");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Culture"), "caf-culture");
    }
}
