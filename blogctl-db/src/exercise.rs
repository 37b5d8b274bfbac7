//! Fixed read/update sequence run against a freshly seeded database
//!
//! Each step announces itself through a [`Reporter`], runs one accessor and
//! hands the result back as JSON. The first failing step aborts the run.

use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{error, info};

use crate::models::{Post, PostUpdate, User, UserUpdate, UserWithPosts};
use crate::repos::{PostRepo, UserRepo};
use crate::{Error, Result};

pub const RENAMED_USER_NAME: &str = "Newname Sogood";
pub const RENAMED_USER_LOCATION: &str = "Lesterville, KY";
pub const UPDATED_POST_TITLE: &str = "New Title";
pub const UPDATED_POST_CONTENT: &str = "Updated Content";
pub const RETAGGED_POST_TAGS: [&str; 3] = ["#youcandoanything", "#redfish", "#bluefish"];
pub const LOOKUP_USER_ID: i32 = 1;
pub const LOOKUP_TAG: &str = "#happy";

/// Receives the progress of an exercise run
pub trait Reporter {
    /// A step is about to run.
    fn calling(&mut self, step: &str);

    /// A step finished with this result.
    fn result(&mut self, step: &str, value: &Value);
}

/// Reporter that keeps everything it is told, in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub calls: Vec<String>,
    pub results: Vec<(String, Value)>,
}

impl Reporter for RecordingReporter {
    fn calling(&mut self, step: &str) {
        self.calls.push(step.to_string());
    }

    fn result(&mut self, step: &str, value: &Value) {
        self.results.push((step.to_string(), value.clone()));
    }
}

/// Everything the exercise read or wrote
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseReport {
    pub users: Vec<User>,
    pub renamed_user: User,
    pub posts: Vec<Post>,
    pub updated_post: Post,
    pub retagged_post: Post,
    pub user_by_id: Option<UserWithPosts>,
    pub posts_by_tag: Vec<Post>,
}

/// Run the fixed sequence of reads and updates.
pub async fn run(pool: &PgPool, reporter: &mut dyn Reporter) -> Result<ExerciseReport> {
    info!("Starting to test database...");

    let result = run_steps(pool, reporter).await;
    match &result {
        Ok(_) => info!("Finished database tests!"),
        Err(e) => error!(error = %e, "Error testing database!"),
    }
    result
}

async fn run_steps(pool: &PgPool, reporter: &mut dyn Reporter) -> Result<ExerciseReport> {
    let users_repo = UserRepo::new(pool);
    let posts_repo = PostRepo::new(pool);

    let step = "list users";
    reporter.calling(step);
    let users = users_repo.list().await?;
    report(reporter, step, &users)?;

    let step = "update user users[0]";
    reporter.calling(step);
    let first_user = users
        .first()
        .ok_or_else(|| Error::Fixture("no users to update".to_string()))?;
    let renamed_user = users_repo
        .update(
            first_user.id,
            &UserUpdate {
                name: Some(RENAMED_USER_NAME.to_string()),
                location: Some(RENAMED_USER_LOCATION.to_string()),
                ..Default::default()
            },
        )
        .await?;
    report(reporter, step, &renamed_user)?;

    let step = "list posts";
    reporter.calling(step);
    let posts = posts_repo.list().await?;
    report(reporter, step, &posts)?;

    let step = "update post posts[0]";
    reporter.calling(step);
    let first_post = posts
        .first()
        .ok_or_else(|| Error::Fixture("no posts to update".to_string()))?;
    let updated_post = posts_repo
        .update(
            first_post.id,
            &PostUpdate {
                title: Some(UPDATED_POST_TITLE.to_string()),
                content: Some(UPDATED_POST_CONTENT.to_string()),
                ..Default::default()
            },
        )
        .await?;
    report(reporter, step, &updated_post)?;

    let step = "update post posts[1] tags only";
    reporter.calling(step);
    let second_post = posts
        .get(1)
        .ok_or_else(|| Error::Fixture("no second post to retag".to_string()))?;
    let retagged_post = posts_repo
        .update(
            second_post.id,
            &PostUpdate {
                tags: Some(RETAGGED_POST_TAGS.iter().map(|t| t.to_string()).collect()),
                ..Default::default()
            },
        )
        .await?;
    report(reporter, step, &retagged_post)?;

    let step = "get user by id";
    reporter.calling(step);
    let user_by_id = users_repo.get_by_id(LOOKUP_USER_ID).await?;
    report(reporter, step, &user_by_id)?;

    let step = "list posts by tag name";
    reporter.calling(step);
    let posts_by_tag = posts_repo.list_by_tag_name(LOOKUP_TAG).await?;
    report(reporter, step, &posts_by_tag)?;

    Ok(ExerciseReport {
        users,
        renamed_user,
        posts,
        updated_post,
        retagged_post,
        user_by_id,
        posts_by_tag,
    })
}

fn report<T: Serialize>(reporter: &mut dyn Reporter, step: &str, value: &T) -> Result<()> {
    reporter.result(step, &serde_json::to_value(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;

    #[test]
    fn recording_reporter_keeps_order() {
        let mut reporter = RecordingReporter::default();
        reporter.calling("list tags");
        report(
            &mut reporter,
            "list tags",
            &vec![Tag {
                id: 1,
                name: LOOKUP_TAG.to_string(),
            }],
        )
        .unwrap();

        assert_eq!(reporter.calls, vec!["list tags"]);
        assert_eq!(reporter.results.len(), 1);
        assert_eq!(reporter.results[0].1[0]["name"], "#happy");
    }

    #[test]
    fn missing_user_reports_null() {
        let mut reporter = RecordingReporter::default();
        let nobody: Option<UserWithPosts> = None;
        report(&mut reporter, "get user by id", &nobody).unwrap();

        assert_eq!(reporter.results[0].1, Value::Null);
    }
}
