use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use super::validation::{
    CATEGORY_DESCRIPTION_MAX, CATEGORY_NAME_MAX, Validator, is_hex_color,
};
use crate::error::DomainError;

/// Color given to categories created without one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Category entity - groups posts and tracks how many of them are published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    /// Published posts in this category. Derived, only written by a recount.
    pub post_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Build a category from validated input. The count starts at zero.
    pub fn new(input: NewCategory) -> Result<Self, DomainError> {
        input.validate()?;

        let name = input.name.trim().to_string();
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            description: input.description.filter(|d| !d.trim().is_empty()),
            color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            post_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply validated changes. The slug follows the name.
    pub fn apply(&mut self, changes: CategoryChanges) -> Result<(), DomainError> {
        changes.validate()?;

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if name != self.name {
                self.slug = slugify(&name);
                self.name = name;
            }
        }
        if let Some(description) = changes.description {
            // An empty description clears it.
            self.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut v = Validator::new();
        validate_name(&mut v, &self.name);
        validate_optional(&mut v, self.description.as_deref(), self.color.as_deref());
        v.finish()
    }
}

/// Partial update of a category; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl CategoryChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            validate_name(&mut v, name);
        }
        validate_optional(&mut v, self.description.as_deref(), self.color.as_deref());
        v.finish()
    }
}

fn validate_name(v: &mut Validator, name: &str) {
    v.length(
        "name",
        name.trim(),
        1,
        CATEGORY_NAME_MAX,
        "Name is required and must be at most 50 characters",
    );
    v.check(
        name.trim().is_empty() || !slugify(name).is_empty(),
        "name",
        "Name must contain at least one letter or digit",
    );
}

fn validate_optional(v: &mut Validator, description: Option<&str>, color: Option<&str>) {
    if let Some(description) = description {
        v.length(
            "description",
            description,
            0,
            CATEGORY_DESCRIPTION_MAX,
            "Description must be at most 200 characters",
        );
    }
    if let Some(color) = color {
        v.check(
            is_hex_color(color),
            "color",
            "Color must be a valid hex color",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_category_defaults() {
        let category = Category::new(new_category("  Web Development ")).unwrap();

        assert_eq!(category.name, "Web Development");
        assert_eq!(category.slug, "web-development");
        assert_eq!(category.color, DEFAULT_COLOR);
        assert_eq!(category.post_count, 0);
        assert!(category.description.is_none());
    }

    #[test]
    fn test_new_category_rejects_bad_fields() {
        let err = Category::new(NewCategory {
            name: "x".repeat(51),
            description: Some("d".repeat(201)),
            color: Some("blue".to_string()),
        })
        .unwrap_err();

        match err {
            DomainError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "description", "color"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_name_without_slug_characters_is_rejected() {
        assert!(Category::new(new_category("???")).is_err());
    }

    #[test]
    fn test_rename_regenerates_slug() {
        let mut category = Category::new(new_category("Tech")).unwrap();
        category
            .apply(CategoryChanges {
                name: Some("Tech News".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(category.slug, "tech-news");
    }

    #[test]
    fn test_empty_description_clears() {
        let mut category = Category::new(NewCategory {
            name: "Tech".to_string(),
            description: Some("All things tech".to_string()),
            color: None,
        })
        .unwrap();

        category
            .apply(CategoryChanges {
                description: Some(String::new()),
                ..Default::default()
            })
            .unwrap();

        assert!(category.description.is_none());
    }
}
