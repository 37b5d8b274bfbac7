//! Read-only inspection of users, posts and tags

use anyhow::{anyhow, Result};
use blogctl_db::{PostRepo, TagRepo, UserRepo};
use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::ui::JsonOutput;

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// List all users
    List,
    /// Show one user with their posts
    Get {
        /// User ID
        id: i32,
    },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommands,
}

#[derive(Subcommand, Debug)]
pub enum PostsCommands {
    /// List all posts with authors and tags
    List,
    /// Show one post
    Get {
        /// Post ID
        id: i32,
    },
    /// List posts written by a user
    ByUser {
        /// Author's user ID
        user_id: i32,
    },
    /// List posts carrying a tag
    ByTag {
        /// Exact tag name, e.g. "#happy"
        name: String,
    },
}

#[derive(Parser, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommands,
}

#[derive(Subcommand, Debug)]
pub enum TagsCommands {
    /// List all tags
    List,
}

pub async fn run_users(args: UsersArgs, pool: &PgPool, output: JsonOutput) -> Result<()> {
    let repo = UserRepo::new(pool);

    match args.command {
        UsersCommands::List => output.print(&repo.list().await?),
        UsersCommands::Get { id } => {
            let user = repo
                .get_by_id(id)
                .await?
                .ok_or_else(|| anyhow!("User {} not found", id))?;
            output.print(&user)
        }
    }
}

pub async fn run_posts(args: PostsArgs, pool: &PgPool, output: JsonOutput) -> Result<()> {
    let repo = PostRepo::new(pool);

    match args.command {
        PostsCommands::List => output.print(&repo.list().await?),
        PostsCommands::Get { id } => output.print(&repo.get_by_id(id).await?),
        PostsCommands::ByUser { user_id } => output.print(&repo.list_by_user(user_id).await?),
        PostsCommands::ByTag { name } => output.print(&repo.list_by_tag_name(&name).await?),
    }
}

pub async fn run_tags(args: TagsArgs, pool: &PgPool, output: JsonOutput) -> Result<()> {
    let repo = TagRepo::new(pool);

    match args.command {
        TagsCommands::List => output.print(&repo.list().await?),
    }
}
