//! Domain entities - the core business objects.

mod category;
mod post;
mod query;
mod slug;
mod user;
pub mod validation;

pub use category::{Category, CategoryChanges, DEFAULT_COLOR, NewCategory};
pub use post::{
    AppliedChange, Comment, Comments, LikeOutcome, NewPost, Post, PostChanges, PostStatus,
};
pub use query::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PostPage, PostQuery, listing_order};
pub use slug::slugify;
pub use user::{NewUser, Role, User};
