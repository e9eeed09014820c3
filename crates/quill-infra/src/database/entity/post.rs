//! Post entity for SeaORM.
//!
//! Tags, likes and comments live in JSONB columns on the post row.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::RowError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub status: String,
    pub views: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub likes: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub featured_image: Option<String>,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl super::OwnedColumns for ActiveModel {
    fn owned_columns() -> Vec<Column> {
        vec![Column::Views, Column::Likes, Column::Comments]
    }
}

fn from_json<T: DeserializeOwned>(column: &'static str, value: Json) -> Result<T, RowError> {
    serde_json::from_value(value).map_err(|e| RowError::decode(column, e))
}

fn to_json<T: Serialize>(column: &'static str, value: &T) -> Result<Json, RowError> {
    serde_json::to_value(value).map_err(|e| RowError::encode(column, e))
}

/// Conversion from SeaORM Model to Domain Post.
impl TryFrom<Model> for quill_core::domain::Post {
    type Error = RowError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            excerpt: model.excerpt,
            category_id: model.category_id,
            author_id: model.author_id,
            tags: from_json("tags", model.tags)?,
            status: model
                .status
                .parse()
                .map_err(|e| RowError::decode("status", e))?,
            views: u64::try_from(model.views).map_err(|e| RowError::decode("views", e))?,
            likes: from_json("likes", model.likes)?,
            comments: from_json("comments", model.comments)?,
            featured_image: model.featured_image,
            published_at: model.published_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl TryFrom<quill_core::domain::Post> for ActiveModel {
    type Error = RowError;

    fn try_from(post: quill_core::domain::Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Set(post.id),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            excerpt: Set(post.excerpt),
            category_id: Set(post.category_id),
            author_id: Set(post.author_id),
            tags: Set(to_json("tags", &post.tags)?),
            status: Set(post.status.as_str().to_string()),
            views: Set(i64::try_from(post.views).map_err(|e| RowError::encode("views", e))?),
            likes: Set(to_json("likes", &post.likes)?),
            comments: Set(to_json("comments", &post.comments)?),
            featured_image: Set(post.featured_image),
            published_at: Set(post.published_at.map(Into::into)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        })
    }
}
