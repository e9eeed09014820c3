use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_blog_tables::Categories;

/// Name, slug, description and color of the categories every new blog
/// starts with.
pub(crate) const DEFAULT_CATEGORIES: [(&str, &str, &str, &str); 5] = [
    (
        "Education",
        "education",
        "Educational content, tutorials, and learning resources",
        "#10B981",
    ),
    (
        "Technology",
        "technology",
        "Latest tech news, programming, and innovation",
        "#3B82F6",
    ),
    (
        "Gaming",
        "gaming",
        "Video games, gaming culture, and entertainment",
        "#8B5CF6",
    ),
    (
        "Lifestyle",
        "lifestyle",
        "Health, wellness, fashion, and daily life tips",
        "#F59E0B",
    ),
    (
        "Business",
        "business",
        "Entrepreneurship, finance, and career advice",
        "#EF4444",
    ),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Categories::Table).columns([
            Categories::Id,
            Categories::Name,
            Categories::Slug,
            Categories::Description,
            Categories::Color,
        ]);

        for (name, slug, description, color) in DEFAULT_CATEGORIES {
            insert
                .values([
                    Expr::cust("gen_random_uuid()"),
                    name.into(),
                    slug.into(),
                    description.into(),
                    color.into(),
                ])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        insert.on_conflict(OnConflict::column(Categories::Slug).do_nothing().to_owned());

        manager.exec_stmt(insert).await?;
        tracing::info!(
            categories = DEFAULT_CATEGORIES.len(),
            "Default categories seeded"
        );
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slugs = DEFAULT_CATEGORIES.map(|(_, slug, _, _)| slug);
        let delete = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::Slug).is_in(slugs))
            .and_where(Expr::col(Categories::PostCount).eq(0))
            .to_owned();

        manager.exec_stmt(delete).await?;
        tracing::info!("Unused default categories removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::slugify;
    use quill_core::domain::validation::is_hex_color;

    #[test]
    fn test_seed_rows_follow_category_rules() {
        for (name, slug, description, color) in DEFAULT_CATEGORIES {
            assert_eq!(slugify(name), slug);
            assert!(is_hex_color(color), "{name} has color {color}");
            assert!(description.chars().count() <= 200);
        }
    }
}
