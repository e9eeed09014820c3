//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, NullOrdering};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, LikeOutcome, Post, PostPage, PostQuery, PostStatus, User};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::RowError;
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            },
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(User::try_from).transpose()?)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result
            .into_iter()
            .map(User::try_from)
            .collect::<Result<_, _>>()?)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<_, _>>()?)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<_, _>>()?)
    }

    async fn set_post_count(&self, id: Uuid, count: u64) -> Result<(), RepoError> {
        let count = i64::try_from(count)
            .map_err(|_| RepoError::Query(format!("post count {count} out of range")))?;

        let result = CategoryEntity::update_many()
            .col_expr(category::Column::PostCount, Expr::value(count))
            .col_expr(category::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(category::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(&self, query: &PostQuery) -> Result<PostPage, RepoError> {
        let mut select = PostEntity::find().filter(post::Column::Status.eq(query.status.as_str()));

        if let Some(category_id) = query.category {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            select = select.filter(
                Condition::any()
                    .add(Expr::col((PostEntity, post::Column::Title)).ilike(pattern.clone()))
                    .add(Expr::col((PostEntity, post::Column::Content)).ilike(pattern.clone()))
                    .add(Expr::cust_with_values(
                        r#"EXISTS (SELECT 1 FROM jsonb_array_elements_text("posts"."tags") AS tag WHERE tag ILIKE $1)"#,
                        [pattern],
                    )),
            );
        }

        let paginator = select
            .order_by_with_nulls(post::Column::PublishedAt, Order::Desc, NullOrdering::Last)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .paginate(&self.db, query.limit);

        let total = paginator.num_items().await.map_err(query_error)?;
        let models = paginator
            .fetch_page(query.page - 1)
            .await
            .map_err(query_error)?;

        tracing::debug!(
            total,
            page = query.page,
            limit = query.limit,
            search = ?query.search,
            "Post page fetched"
        );

        Ok(PostPage {
            posts: models
                .into_iter()
                .map(Post::try_from)
                .collect::<Result<_, _>>()?,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn count_published_in(&self, category_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError> {
        let update = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1));

        self.update_one(id, update).await
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let liker = serde_json::json!([user_id]);
        let update = PostEntity::update_many().col_expr(
            post::Column::Likes,
            Expr::cust_with_values(
                r#"CASE WHEN "likes" @> $1 THEN "likes" - $2 ELSE "likes" || $1 END"#,
                [sea_orm::Value::from(liker), sea_orm::Value::from(user_id.to_string())],
            ),
        );

        let post = self.update_one(id, update).await?;
        Ok(LikeOutcome {
            likes: post.like_count(),
            is_liked: post.likes.contains(&user_id),
        })
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Post, RepoError> {
        let created_at = comment.created_at;
        let appended = serde_json::to_value([comment])
            .map_err(|e| RowError::encode("comments", e))?;
        let update = PostEntity::update_many()
            .col_expr(
                post::Column::Comments,
                Expr::cust_with_values(r#""comments" || $1"#, [sea_orm::Value::from(appended)]),
            )
            .col_expr(post::Column::UpdatedAt, Expr::value(created_at));

        self.update_one(id, update).await
    }
}

impl PostgresPostRepository {
    /// Run a single-statement update against one post and read back the row.
    async fn update_one(
        &self,
        id: Uuid,
        update: sea_orm::UpdateMany<PostEntity>,
    ) -> Result<Post, RepoError> {
        let mut models = update
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(query_error)?;

        match models.pop() {
            Some(model) => Ok(Post::try_from(model)?),
            None => Err(RepoError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("react"), "%react%");
        assert_eq!(like_pattern("100%_done\\"), "%100\\%\\_done\\\\%");
    }
}
