//! Drop and recreate the blog tables

use sqlx::PgPool;
use tracing::{error, info};

use crate::Result;

/// Dependents first, so no foreign key blocks a drop.
pub const TABLES_IN_DROP_ORDER: [&str; 4] = ["post_tags", "tags", "posts", "users"];

const CREATE_USERS: &str = r#"
    CREATE TABLE users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(255) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        name VARCHAR(255) NOT NULL,
        location VARCHAR(255) NOT NULL,
        active BOOLEAN NOT NULL DEFAULT true
    )
"#;

const CREATE_POSTS: &str = r#"
    CREATE TABLE posts (
        id SERIAL PRIMARY KEY,
        author_id INTEGER REFERENCES users(id) NOT NULL,
        title VARCHAR(255) NOT NULL,
        content TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT true
    )
"#;

const CREATE_TAGS: &str = r#"
    CREATE TABLE tags (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) UNIQUE NOT NULL
    )
"#;

const CREATE_POST_TAGS: &str = r#"
    CREATE TABLE post_tags (
        post_id INTEGER REFERENCES posts(id),
        tag_id INTEGER REFERENCES tags(id),
        UNIQUE (post_id, tag_id)
    )
"#;

/// Drop every blog table that exists.
pub async fn drop_tables(pool: &PgPool) -> Result<()> {
    info!("Starting to drop tables...");

    for table in TABLES_IN_DROP_ORDER {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await
            .inspect_err(|e| error!(table, error = %e, "Error dropping tables!"))?;
    }

    info!("Finished dropping tables!");
    Ok(())
}

/// Create the blog tables. Fails if any of them already exists.
pub async fn create_tables(pool: &PgPool) -> Result<()> {
    info!("Starting to build tables...");

    for statement in [CREATE_USERS, CREATE_POSTS, CREATE_TAGS, CREATE_POST_TAGS] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .inspect_err(|e| error!(error = %e, "Error building tables!"))?;
    }

    info!("Finished building tables!");
    Ok(())
}

/// Drop and recreate all tables, leaving them empty.
pub async fn rebuild_schema(pool: &PgPool) -> Result<()> {
    drop_tables(pool).await?;
    create_tables(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_order_is_reverse_of_create_order() {
        let created: Vec<&str> = [CREATE_USERS, CREATE_POSTS, CREATE_TAGS, CREATE_POST_TAGS]
            .iter()
            .map(|sql| {
                sql.split_whitespace()
                    .nth(2)
                    .expect("CREATE TABLE <name>")
            })
            .collect();

        let mut dropped = TABLES_IN_DROP_ORDER.to_vec();
        dropped.reverse();

        assert_eq!(created, vec!["users", "posts", "tags", "post_tags"]);
        assert_eq!(dropped, vec!["users", "posts", "tags", "post_tags"]);
    }
}
