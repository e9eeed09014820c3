//! Category entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::RowError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    pub post_count: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl super::OwnedColumns for ActiveModel {
    fn owned_columns() -> Vec<Column> {
        vec![Column::PostCount]
    }
}

/// Conversion from SeaORM Model to Domain Category.
impl TryFrom<Model> for quill_core::domain::Category {
    type Error = RowError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            color: model.color,
            post_count: u64::try_from(model.post_count)
                .map_err(|e| RowError::decode("post_count", e))?,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Category to SeaORM ActiveModel.
impl TryFrom<quill_core::domain::Category> for ActiveModel {
    type Error = RowError;

    fn try_from(category: quill_core::domain::Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Set(category.id),
            name: Set(category.name),
            slug: Set(category.slug),
            description: Set(category.description),
            color: Set(category.color),
            post_count: Set(i64::try_from(category.post_count)
                .map_err(|e| RowError::encode("post_count", e))?),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        })
    }
}
