//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CategoryRepository, PostRepository, UserRepository};
use quill_core::services::{CategoryLedger, ConsistencyCoordinator, PostRegistry};
use quill_infra::database::DatabaseConfig;
use quill_infra::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository,
    PostgresUserRepository,
};

/// Which store the repositories talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    /// Raw category rows, for resolving references in responses.
    pub category_rows: Arc<dyn CategoryRepository>,
    pub categories: CategoryLedger,
    pub posts: PostRegistry,
    pub store: StoreKind,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let mut state = Self::from_repositories(
                            Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            Arc::new(PostgresCategoryRepository::new(conn.main.clone())),
                            Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            StoreKind::Postgres,
                        );
                        state.db = Some(conn);
                        tracing::info!(store = "postgres", "Application state initialized");
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Failed to connect to database. Using in-memory store."
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
            }
        }

        #[cfg(not(feature = "postgres"))]
        if db_config.is_some() {
            tracing::warn!("Built without postgres feature - DATABASE_URL ignored");
        }

        tracing::info!(store = "memory", "Application state initialized");
        Self::in_memory()
    }

    /// Fresh state backed by empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self::from_repositories(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCategoryRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            StoreKind::Memory,
        )
    }

    fn from_repositories(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        posts: Arc<dyn PostRepository>,
        store: StoreKind,
    ) -> Self {
        let ledger = CategoryLedger::new(categories.clone(), posts.clone());
        let coordinator = ConsistencyCoordinator::new(ledger.clone());
        let registry = PostRegistry::new(posts, categories.clone(), coordinator);

        Self {
            users,
            category_rows: categories,
            categories: ledger,
            posts: registry,
            store,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
