//! Authorization predicates.

use uuid::Uuid;

use crate::domain::{Post, Role};

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Only the author or an admin may edit or delete a post.
pub fn can_modify_post(actor: &Actor, post: &Post) -> bool {
    actor.is_admin() || post.author_id == actor.id
}

/// Category mutations are reserved for admins.
pub fn can_manage_categories(actor: &Actor) -> bool {
    actor.is_admin()
}
