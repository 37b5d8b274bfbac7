//! Rebuild and exercise commands
//!
//! `run` is the full sequence: rebuild the schema, insert fixtures, then
//! call every accessor and print what it returns.

use anyhow::{Context, Result};
use blogctl_db::exercise::{self, Reporter};
use blogctl_db::seed;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use crate::ui::JsonOutput;

/// Prints each exercise step and its JSON result to stdout
struct ConsoleReporter {
    output: JsonOutput,
}

impl Reporter for ConsoleReporter {
    fn calling(&mut self, step: &str) {
        println!("Calling {step}");
    }

    fn result(&mut self, step: &str, value: &Value) {
        match self.output.render(value) {
            Ok(rendered) => println!("Result: {rendered}"),
            Err(e) => tracing::warn!(step, error = %e, "could not render result"),
        }
    }
}

/// Rebuild, then exercise.
pub async fn run_all(pool: &PgPool, output: JsonOutput) -> Result<()> {
    run_rebuild(pool).await?;
    run_exercise(pool, output).await
}

/// Drop and recreate the schema and insert the fixtures.
pub async fn run_rebuild(pool: &PgPool) -> Result<()> {
    let summary = seed::rebuild(pool)
        .await
        .context("Failed to rebuild database")?;

    info!(
        users = summary.users.len(),
        posts = summary.posts.len(),
        "Database rebuilt"
    );
    Ok(())
}

/// Run the fixed read/update sequence, printing every result.
pub async fn run_exercise(pool: &PgPool, output: JsonOutput) -> Result<()> {
    let mut reporter = ConsoleReporter { output };
    exercise::run(pool, &mut reporter)
        .await
        .context("Database exercise failed")?;
    Ok(())
}
