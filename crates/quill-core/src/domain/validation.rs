//! Field validation shared by the entity constructors.

use crate::error::{DomainError, FieldError};

pub const CATEGORY_NAME_MAX: usize = 50;
pub const CATEGORY_DESCRIPTION_MAX: usize = 200;
pub const POST_TITLE_MAX: usize = 100;
pub const POST_EXCERPT_MAX: usize = 300;
pub const TAG_MAX: usize = 30;
pub const COMMENT_MAX: usize = 500;
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 6;

/// Collects field errors so a caller sees every problem at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Character length bounds, inclusive on both ends.
    pub fn length(
        &mut self,
        field: &str,
        value: &str,
        min: usize,
        max: usize,
        message: &str,
    ) -> &mut Self {
        let len = value.chars().count();
        self.check(len >= min && len <= max, field, message)
    }

    pub fn finish(&mut self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

/// `#RRGGBB`, case-insensitive.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Trim tags, drop empties and keep the first occurrence of each.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_collects_all_errors() {
        let result = Validator::new()
            .length("title", "", 1, 100, "Title is required")
            .check(false, "content", "Content is required")
            .finish();

        match result {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "title");
                assert_eq!(errors[1].field, "content");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let title = "é".repeat(100);
        assert!(
            Validator::new()
                .length("title", &title, 1, 100, "too long")
                .finish()
                .is_ok()
        );
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#3B82F6"));
        assert!(is_hex_color("#abcdef"));
        assert!(!is_hex_color("3B82F6"));
        assert!(!is_hex_color("#3B82F"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " rust ".to_string(),
            "web".to_string(),
            "".to_string(),
            "rust".to_string(),
        ];
        assert_eq!(normalize_tags(tags), vec!["rust", "web"]);
    }
}
