//! Fixture rows and the rebuild sequence
//!
//! `rebuild` drops and recreates the schema, then inserts the fixture users
//! and their posts. Each step logs its start and finish; a failing step logs
//! an error and aborts the whole sequence.

use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::models::{NewPost, NewUser, Post, User};
use crate::repos::{PostRepo, UserRepo};
use crate::{schema, Error, Result};

/// Fixture user row
#[derive(Debug, Clone, Copy)]
pub struct UserFixture {
    pub username: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

/// Fixture post row; the author is named by username.
#[derive(Debug, Clone, Copy)]
pub struct PostFixture {
    pub author: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub tags: &'static [&'static str],
}

pub const USERS: [UserFixture; 3] = [
    UserFixture {
        username: "albert",
        password: "bertie99",
        name: "Albert",
        location: "Tokyo",
    },
    UserFixture {
        username: "sandra",
        password: "2sandy4me",
        name: "Sandra",
        location: "Savannah",
    },
    UserFixture {
        username: "glamgal",
        password: "soglam",
        name: "Sofia",
        location: "Atlanta",
    },
];

pub const POSTS: [PostFixture; 3] = [
    PostFixture {
        author: "albert",
        title: "First Post",
        content: "This is my first post. I hope I love writing blogs as much as I love writing them.",
        tags: &["#happy", "#youcandoanything"],
    },
    PostFixture {
        author: "sandra",
        title: "Sandra Post #1",
        content: "Thanks @albert for inviting me to this app, I love it already",
        tags: &["#happy", "#worst-day-ever"],
    },
    PostFixture {
        author: "glamgal",
        title: "Posting Debut!",
        content: "Heyyyyy! Super excited to be making my first post! Stay tuned for more",
        tags: &["#happy", "#youcandoanything", "#canmandoeverything"],
    },
];

impl UserFixture {
    pub fn to_new_user(&self) -> NewUser {
        NewUser::new(self.username, self.password, self.name, self.location)
    }
}

impl PostFixture {
    pub fn to_new_post(&self, author_id: i32) -> NewPost {
        NewPost {
            author_id,
            title: self.title.to_string(),
            content: self.content.to_string(),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// What a rebuild left in the database
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
}

/// Insert the fixture users. Usernames that already exist are skipped.
pub async fn create_initial_users(pool: &PgPool) -> Result<Vec<User>> {
    info!("Starting to create users...");

    let repo = UserRepo::new(pool);
    let mut created = Vec::with_capacity(USERS.len());

    for fixture in &USERS {
        let user = repo
            .create(&fixture.to_new_user())
            .await
            .inspect_err(|e| error!(error = %e, "Error creating users!"))?;

        match user {
            Some(user) => created.push(user),
            None => warn!(username = fixture.username, "user already exists, skipped"),
        }
    }

    info!("Finished creating users!");
    Ok(created)
}

/// Insert the fixture posts, resolving each author by username.
pub async fn create_initial_posts(pool: &PgPool) -> Result<Vec<Post>> {
    let result = insert_posts(pool).await;
    if let Err(e) = &result {
        error!(error = %e, "Error creating posts!");
    }
    result
}

async fn insert_posts(pool: &PgPool) -> Result<Vec<Post>> {
    let users = UserRepo::new(pool).list().await?;

    info!("Starting to create posts...");

    let repo = PostRepo::new(pool);
    let mut created = Vec::with_capacity(POSTS.len());

    for fixture in &POSTS {
        let author = users
            .iter()
            .find(|u| u.username == fixture.author)
            .ok_or_else(|| Error::Fixture(format!("no user '{}' to author a post", fixture.author)))?;

        created.push(repo.create(&fixture.to_new_post(author.id)).await?);
    }

    info!("Finished creating posts!");
    Ok(created)
}

/// Drop and recreate all tables, then insert users and posts.
pub async fn rebuild(pool: &PgPool) -> Result<SeedSummary> {
    let result = async {
        schema::rebuild_schema(pool).await?;
        let users = create_initial_users(pool).await?;
        let posts = create_initial_posts(pool).await?;
        Ok::<_, Error>(SeedSummary { users, posts })
    }
    .await;

    if let Err(e) = &result {
        error!(error = %e, "Error during rebuild");
    }
    result
}
