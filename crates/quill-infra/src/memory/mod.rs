//! In-memory repositories - used when no database is configured and in tests.
//!
//! Each repository keeps its rows in a `HashMap` behind an async `RwLock` and
//! enforces the same unique indexes as the PostgreSQL schema. Data is lost on
//! process restart.

mod categories;
mod posts;
mod users;

pub use categories::InMemoryCategoryRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;
