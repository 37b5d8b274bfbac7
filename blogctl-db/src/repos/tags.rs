//! Tag repository
//!
//! Tags are created on demand by name and linked to posts through
//! `post_tags`.

use sqlx::{PgPool, Row};

use crate::models::Tag;
use crate::Result;

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Ensure every name exists as a tag and return all of them.
    ///
    /// Names that already exist are kept as-is (ON CONFLICT DO NOTHING) and
    /// still returned, so the result covers the whole input list.
    pub async fn create_many(&self, names: &[String]) -> Result<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query(
            r#"
            INSERT INTO tags (name)
            SELECT UNNEST($1::varchar[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(names)
        .execute(self.pool)
        .await?;

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name
            FROM tags
            WHERE name = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(names)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Link tags to a post; links that already exist are skipped.
    pub async fn add_to_post(&self, post_id: i32, tags: &[Tag]) -> Result<()> {
        for tag in tags {
            sqlx::query(
                r#"
                INSERT INTO post_tags (post_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(post_id)
            .bind(tag.id)
            .execute(self.pool)
            .await?;
        }

        Ok(())
    }

    /// Remove every link from the post to a tag not in `keep`.
    ///
    /// An empty `keep` unlinks all of the post's tags.
    pub async fn unlink_except(&self, post_id: i32, keep: &[Tag]) -> Result<u64> {
        let keep_ids: Vec<i32> = keep.iter().map(|t| t.id).collect();

        let result = sqlx::query(
            r#"
            DELETE FROM post_tags
            WHERE post_id = $1
              AND NOT (tag_id = ANY($2))
            "#,
        )
        .bind(post_id)
        .bind(&keep_ids)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// All tags, ordered by id.
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(tags)
    }

    /// Tags for a batch of posts as `(post_id, tag)` pairs.
    ///
    /// Ordered by post then tag id, so each post's tags keep creation order.
    pub async fn list_for_posts(&self, post_ids: &[i32]) -> Result<Vec<(i32, Tag)>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT pt.post_id, t.id, t.name
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY pt.post_id, t.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool)
        .await?;

        let pairs = rows
            .into_iter()
            .map(|r| {
                (
                    r.get("post_id"),
                    Tag {
                        id: r.get("id"),
                        name: r.get("name"),
                    },
                )
            })
            .collect();

        Ok(pairs)
    }
}
