//! Post repository
//!
//! Posts are always returned hydrated: the author row is joined in and
//! tags for every returned post are loaded in one batch query.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::models::{Author, NewPost, Post, PostUpdate, Tag};
use crate::{Error, Result};

use super::TagRepo;

const POST_SELECT: &str = r#"
    SELECT
        p.id,
        p.title,
        p.content,
        p.active,
        u.id AS author_id,
        u.username AS author_username,
        u.name AS author_name,
        u.location AS author_location
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

/// Post joined with its author, before tags are attached
#[derive(Debug, FromRow)]
struct PostRow {
    id: i32,
    title: String,
    content: String,
    active: bool,
    author_id: i32,
    author_username: String,
    author_name: String,
    author_location: String,
}

impl PostRow {
    fn into_post(self, tags: Vec<Tag>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            active: self.active,
            author: Author {
                id: self.author_id,
                username: self.author_username,
                name: self.author_name,
                location: self.author_location,
            },
            tags,
        }
    }
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post, create any missing tags, link them, and return the
    /// hydrated post.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let (post_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO posts (author_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_post.author_id)
        .bind(&new_post.title)
        .bind(&new_post.content)
        .fetch_one(self.pool)
        .await?;

        let tags = TagRepo::new(self.pool);
        let created = tags.create_many(&new_post.tags).await?;
        tags.add_to_post(post_id, &created).await?;

        self.get_by_id(post_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| Error::not_found("post", id))?;

        let mut posts = self.hydrate(vec![row]).await?;
        posts.pop().ok_or_else(|| Error::not_found("post", id))
    }

    /// All posts, ordered by id.
    pub async fn list(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} ORDER BY p.id"))
            .fetch_all(self.pool)
            .await?;

        self.hydrate(rows).await
    }

    /// Posts written by one user, ordered by id.
    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE p.author_id = $1 ORDER BY p.id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Posts carrying the tag with exactly this name, ordered by id.
    pub async fn list_by_tag_name(&self, tag_name: &str) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"{POST_SELECT}
            WHERE p.id IN (
                SELECT pt.post_id
                FROM post_tags pt
                JOIN tags t ON t.id = pt.tag_id
                WHERE t.name = $1
            )
            ORDER BY p.id"#
        ))
        .bind(tag_name)
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Apply a partial update and return the re-read post.
    ///
    /// With `tags: Some(list)` the post ends up linked to exactly `list`:
    /// missing tags are created, links outside the list are removed, and
    /// new links are added.
    pub async fn update(&self, id: i32, update: &PostUpdate) -> Result<Post> {
        self.ensure_exists(id).await?;

        if let Some(mut query) = update_query(id, update) {
            query.build().execute(self.pool).await?;
        }

        if let Some(names) = &update.tags {
            let tags = TagRepo::new(self.pool);
            let wanted = tags.create_many(names).await?;
            let removed = tags.unlink_except(id, &wanted).await?;
            tags.add_to_post(id, &wanted).await?;
            tracing::debug!(post_id = id, removed, linked = wanted.len(), "replaced post tags");
        }

        self.get_by_id(id).await
    }

    async fn ensure_exists(&self, id: i32) -> Result<()> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        if !exists {
            return Err(Error::not_found("post", id));
        }

        Ok(())
    }

    async fn hydrate(&self, rows: Vec<PostRow>) -> Result<Vec<Post>> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let pairs = TagRepo::new(self.pool).list_for_posts(&ids).await?;
        Ok(attach_tags(rows, pairs))
    }
}

fn attach_tags(rows: Vec<PostRow>, pairs: Vec<(i32, Tag)>) -> Vec<Post> {
    let mut by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (post_id, tag) in pairs {
        by_post.entry(post_id).or_default().push(tag);
    }

    rows.into_iter()
        .map(|row| {
            let tags = by_post.remove(&row.id).unwrap_or_default();
            row.into_post(tags)
        })
        .collect()
}

/// Build `UPDATE posts SET ...` for the row columns; tags are handled apart.
fn update_query(id: i32, update: &PostUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if !update.touches_row() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE posts SET ");
    let mut set = query.separated(", ");

    if let Some(title) = &update.title {
        set.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(content) = &update.content {
        set.push("content = ").push_bind_unseparated(content.clone());
    }
    if let Some(active) = update.active {
        set.push("active = ").push_bind_unseparated(active);
    }

    query.push(" WHERE id = ").push_bind(id);

    Some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32) -> PostRow {
        PostRow {
            id,
            title: format!("post {id}"),
            content: "body".to_string(),
            active: true,
            author_id: 1,
            author_username: "albert".to_string(),
            author_name: "Albert".to_string(),
            author_location: "Tokyo".to_string(),
        }
    }

    fn tag(id: i32, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn attach_tags_groups_by_post() {
        let pairs = vec![
            (1, tag(1, "#happy")),
            (1, tag(3, "#youcandoanything")),
            (3, tag(1, "#happy")),
        ];

        let posts = attach_tags(vec![row(1), row(2), row(3)], pairs);

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].tag_names(), vec!["#happy", "#youcandoanything"]);
        assert!(posts[1].tags.is_empty());
        assert_eq!(posts[2].tag_names(), vec!["#happy"]);
        assert_eq!(posts[2].author.username, "albert");
    }

    #[test]
    fn tags_only_update_skips_row_update() {
        let update = PostUpdate {
            tags: Some(vec!["#redfish".to_string()]),
            ..Default::default()
        };
        assert!(update_query(2, &update).is_none());
    }

    #[test]
    fn update_sets_title_and_content() {
        let update = PostUpdate {
            title: Some("New Title".to_string()),
            content: Some("Updated Content".to_string()),
            ..Default::default()
        };

        let query = update_query(1, &update).expect("row update");
        assert_eq!(
            query.sql(),
            "UPDATE posts SET title = $1, content = $2 WHERE id = $3"
        );
    }
}
