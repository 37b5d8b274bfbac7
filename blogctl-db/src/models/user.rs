use serde::Serialize;
use sqlx::FromRow;

use super::Post;

/// User record as returned by every read path (password is never selected)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

/// User with the posts they authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
}

/// Input for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub location: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Partial update for a user; `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.password.is_none()
            && self.name.is_none()
            && self.location.is_none()
            && self.active.is_none()
    }
}
