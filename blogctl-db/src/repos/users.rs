//! User repository
//!
//! Passwords are written on insert/update but never selected.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{NewUser, User, UserUpdate, UserWithPosts};
use crate::{Error, Result};

use super::PostRepo;

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user.
    ///
    /// Returns `None` when the username is already taken
    /// (ON CONFLICT DO NOTHING yields no row).
    pub async fn create(&self, new_user: &NewUser) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, name, location)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, name, location, active
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.name)
        .bind(&new_user.location)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// All users, ordered by id.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, location, active
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// A user together with their posts, or `None` if the id is unknown.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<UserWithPosts>> {
        let Some(user) = self.find(id).await? else {
            return Ok(None);
        };

        let posts = PostRepo::new(self.pool).list_by_user(user.id).await?;

        Ok(Some(UserWithPosts { user, posts }))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, location, active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Apply a partial update and return the resulting row.
    ///
    /// An empty update issues no UPDATE and returns the current row.
    pub async fn update(&self, id: i32, update: &UserUpdate) -> Result<User> {
        let user = match update_query(id, update) {
            Some(mut query) => {
                query
                    .build_query_as::<User>()
                    .fetch_optional(self.pool)
                    .await?
            }
            None => self.find(id).await?,
        };

        user.ok_or_else(|| Error::not_found("user", id))
    }

    async fn find(&self, id: i32) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, location, active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}

/// Build `UPDATE users SET ...` covering only the provided fields.
fn update_query(id: i32, update: &UserUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if update.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE users SET ");
    let mut set = query.separated(", ");

    if let Some(password) = &update.password {
        set.push("password = ").push_bind_unseparated(password.clone());
    }
    if let Some(name) = &update.name {
        set.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(location) = &update.location {
        set.push("location = ").push_bind_unseparated(location.clone());
    }
    if let Some(active) = update.active {
        set.push("active = ").push_bind_unseparated(active);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(" RETURNING id, username, name, location, active");

    Some(query)
}
