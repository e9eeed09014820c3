#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::{category, post};
    use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};
    use quill_core::domain::{Comment, Post, PostQuery, PostStatus};
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn post_model(title: &str, status: PostStatus) -> post::Model {
        let now = chrono::Utc::now();
        let liker = uuid::Uuid::new_v4();
        post::Model {
            id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            slug: quill_core::domain::slugify(title),
            content: "Content".to_owned(),
            excerpt: None,
            category_id: uuid::Uuid::new_v4(),
            author_id: uuid::Uuid::new_v4(),
            tags: serde_json::json!(["rust", "web"]),
            status: status.as_str().to_owned(),
            views: 7,
            likes: serde_json::json!([liker]),
            comments: serde_json::json!([]),
            featured_image: None,
            published_at: Some(now.into()),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let model = post_model("Test Post", PostStatus::Published);
        let post_id = model.id;

        // Mock the query expectation
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert_eq!(post.views, 7);
        assert_eq!(post.like_count(), 1);
        assert!(post.comments.is_empty());
    }

    #[tokio::test]
    async fn test_count_published_in() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(3)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let count = repo.count_published_in(uuid::Uuid::new_v4()).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_find_page_reports_total() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(12)]])
            .append_query_results(vec![vec![
                post_model("First", PostStatus::Published),
                post_model("Second", PostStatus::Published),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let query = PostQuery::new(None, None, Some("react".into()), Some(2), Some(10));

        let page = repo.find_page(&query).await.unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_set_post_count_on_missing_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let result = repo.set_post_count(uuid::Uuid::new_v4(), 2).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_all_categories() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: uuid::Uuid::new_v4(),
                name: "Technology".to_owned(),
                slug: "technology".to_owned(),
                description: None,
                color: "#3B82F6".to_owned(),
                post_count: 4,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let categories = repo.find_all().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].post_count, 4);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_a_query_error() {
        let mut model = post_model("Broken", PostStatus::Published);
        model.status = "archived".to_owned();
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Result<Option<Post>, RepoError> = repo.find_by_id(post_id).await;
        assert!(matches!(result, Err(RepoError::Query(msg)) if msg.contains("status")));
    }

    #[tokio::test]
    async fn test_malformed_likes_are_not_dropped() {
        let mut model = post_model("Broken", PostStatus::Published);
        model.likes = serde_json::json!({"not": "a list"});

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(1)]])
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let query = PostQuery::new(None, None, None, None, None);

        assert!(matches!(repo.find_page(&query).await, Err(RepoError::Query(_))));
    }

    #[tokio::test]
    async fn test_post_update_leaves_engagement_columns_alone() {
        let model = post_model("Edited", PostStatus::Draft);
        let post = Post::try_from(model.clone()).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved: Post = repo.update(post).await.unwrap();
        assert_eq!(saved.views, 7);

        let log = repo.db.into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        let set_clause = &sql[..sql.find("RETURNING").unwrap_or(sql.len())];
        assert!(set_clause.contains(r#""status" ="#), "{sql}");
        for column in ["views", "likes", "comments"] {
            assert!(!set_clause.contains(&format!(r#""{column}" ="#)), "{sql}");
        }
    }

    #[tokio::test]
    async fn test_category_update_leaves_post_count_alone() {
        let now = chrono::Utc::now();
        let model = category::Model {
            id: uuid::Uuid::new_v4(),
            name: "Games".to_owned(),
            slug: "games".to_owned(),
            description: None,
            color: "#8B5CF6".to_owned(),
            post_count: 3,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let mut stale = quill_core::domain::Category::try_from(model.clone()).unwrap();
        stale.post_count = 0;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);
        let saved: quill_core::domain::Category = repo.update(stale).await.unwrap();
        assert_eq!(saved.post_count, 3);

        let log = repo.db.into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        let set_clause = &sql[..sql.find("RETURNING").unwrap_or(sql.len())];
        assert!(set_clause.contains(r#""name" ="#), "{sql}");
        assert!(!set_clause.contains(r#""post_count" ="#), "{sql}");
    }

    #[tokio::test]
    async fn test_increment_views_is_a_single_statement() {
        let mut model = post_model("Viewed", PostStatus::Published);
        model.views = 8;
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let post = repo.increment_views(post_id).await.unwrap();
        assert_eq!(post.views, 8);

        let log = repo.db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = &log[0].statements()[0].sql;
        assert!(sql.starts_with("UPDATE"), "{sql}");
        assert!(sql.contains(r#""views" = "views" + "#), "{sql}");
    }

    #[tokio::test]
    async fn test_toggle_like_reads_state_from_returned_row() {
        let mut model = post_model("Liked", PostStatus::Published);
        let user = uuid::Uuid::new_v4();
        model.likes = serde_json::json!([user, uuid::Uuid::new_v4()]);
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let outcome = repo.toggle_like(post_id, user).await.unwrap();

        assert!(outcome.is_liked);
        assert_eq!(outcome.likes, 2);

        let log = repo.db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(log[0].statements()[0].sql.contains("CASE WHEN"));
    }

    #[tokio::test]
    async fn test_push_comment_on_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let comment = Comment::new(uuid::Uuid::new_v4(), "hello").unwrap();

        let result = repo.push_comment(uuid::Uuid::new_v4(), comment).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
