//! Smoke tests to verify command module wiring

use std::sync::Mutex;

use assert_cmd::Command;
use predicates::prelude::*;

// Database tests rebuild the same schema, so they take turns
static DB_LOCK: Mutex<()> = Mutex::new(());

fn blogctl() -> Command {
    Command::cargo_bin("blogctl").unwrap()
}

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL required")
}

// === Top-level Tests ===

#[test]
fn test_help_lists_commands() {
    let mut cmd = blogctl();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rebuild"))
        .stdout(predicate::str::contains("exercise"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_rebuild_help() {
    let mut cmd = blogctl();
    cmd.arg("rebuild").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Drop and recreate all tables"));
}

#[test]
fn test_missing_database_url_fails() {
    let home = tempfile::tempdir().unwrap();
    let mut cmd = blogctl();
    cmd.arg("exercise")
        .env_remove("DATABASE_URL")
        .env("HOME", home.path())
        .current_dir(home.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

// === Inspect Command Tests ===

#[test]
fn test_users_list_help() {
    let mut cmd = blogctl();
    cmd.arg("users").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("List all users"));
}

#[test]
fn test_users_get_help() {
    let mut cmd = blogctl();
    cmd.arg("users").arg("get").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("User ID"));
}

#[test]
fn test_posts_by_tag_help() {
    let mut cmd = blogctl();
    cmd.arg("posts").arg("by-tag").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Exact tag name"));
}

#[test]
fn test_posts_by_user_help() {
    let mut cmd = blogctl();
    cmd.arg("posts").arg("by-user").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Author's user ID"));
}

#[test]
fn test_tags_list_help() {
    let mut cmd = blogctl();
    cmd.arg("tags").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("List all tags"));
}

// === Config Command Tests ===

#[test]
fn test_config_show_help() {
    let mut cmd = blogctl();
    cmd.arg("config").arg("show").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Print the merged configuration"));
}

#[test]
fn test_config_show_reads_local_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("blogctl.toml"),
        "[database]\nconnect_timeout_secs = 5\n",
    )
    .unwrap();

    let mut cmd = blogctl();
    cmd.arg("config")
        .arg("show")
        .env("HOME", dir.path())
        .current_dir(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("connect_timeout_secs = 5"));
}

// === Database Tests ===
// Run with: DATABASE_URL=postgres://... cargo test -p blogctl-cli -- --ignored

#[test]
#[ignore = "requires database"]
fn test_run_prints_every_step() {
    let _guard = DB_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut cmd = blogctl();
    cmd.arg("--compact")
        .arg("--quiet")
        .arg("run")
        .env("DATABASE_URL", database_url());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Calling list users"))
        .stdout(predicate::str::contains("Calling list posts by tag name"))
        .stdout(predicate::str::contains("Result:"))
        .stdout(predicate::str::contains("Newname Sogood"));
}

#[test]
#[ignore = "requires database"]
fn test_exercise_fails_on_broken_schema() {
    let _guard = DB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let url = database_url();

    blogctl()
        .arg("--quiet")
        .arg("rebuild")
        .env("DATABASE_URL", &url)
        .assert()
        .success();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let pool = sqlx::PgPool::connect(&url).await.unwrap();
        sqlx::query("DROP TABLE post_tags")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    });

    let mut cmd = blogctl();
    cmd.arg("--quiet")
        .arg("exercise")
        .env("DATABASE_URL", &url);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Calling list users"))
        .stderr(predicate::str::contains("Database exercise failed"));
}
