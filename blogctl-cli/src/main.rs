//! blogctl CLI - seed and smoke-test the blog demo database
//!
//! With no subcommand (or `run`) it does the whole sequence against
//! PostgreSQL: drop and recreate the tables, insert the fixture users and
//! posts, then call every accessor and print what comes back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing::{debug, error};

mod commands;
mod config;
mod tracing_setup;
mod ui;

use config::BlogctlConfig;
use ui::JsonOutput;

#[derive(Parser, Debug)]
#[command(
    name = "blogctl",
    author,
    version,
    about = "Seed and smoke-test the blog demo database",
    long_about = "Rebuild the users/posts/tags schema in PostgreSQL, insert fixture rows, \
                  and exercise the read/update accessors, printing every result."
)]
struct Cli {
    /// PostgreSQL connection string (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    /// Enable debug logging (when RUST_LOG is not set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (needs the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Suppress spinners
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Print JSON results on one line
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Database(DatabaseCommands),
    /// Show blogctl configuration
    Config(config::ConfigArgs),
}

/// Commands that need a database connection
#[derive(Subcommand, Debug)]
enum DatabaseCommands {
    /// Rebuild the database, then exercise it (default)
    Run,
    /// Drop and recreate all tables and insert the fixture rows
    Rebuild,
    /// Run the read/update sequence against an already seeded database
    Exercise,
    /// Inspect users (list, get)
    Users(commands::inspect::UsersArgs),
    /// Inspect posts (list, get, by-user, by-tag)
    Posts(commands::inspect::PostsArgs),
    /// Inspect tags
    Tags(commands::inspect::TagsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so DATABASE_URL from .env reaches clap
    let env_files = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;
    ui::init_quiet_mode(cli.quiet);

    for path in &env_files {
        debug!("Loaded environment from {}", path.display());
    }

    let config = BlogctlConfig::load();
    let output = JsonOutput {
        pretty: !cli.compact && config.output.pretty(),
    };

    let command = cli
        .command
        .unwrap_or(Commands::Database(DatabaseCommands::Run));
    let result = match command {
        Commands::Config(args) => config::run_config(args, &config),
        Commands::Database(command) => {
            run_with_database(command, cli.database_url, &config, output).await
        }
    };

    tracing_setup::shutdown_otel();
    result
}

/// Connect, run one command, and close the connection whatever the outcome.
async fn run_with_database(
    command: DatabaseCommands,
    database_url: Option<String>,
    config: &BlogctlConfig,
    output: JsonOutput,
) -> Result<()> {
    let url = config.resolve_database_url(database_url)?;

    let pool = ui::with_spinner_async(
        "Connecting to database",
        "Connected to database",
        blogctl_db::connect_with_timeout(&url, config.database.connect_timeout()),
    )
    .await
    .context("Failed to connect to database")?;

    let result = dispatch(command, &pool, output).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }

    pool.close().await;
    debug!("Database connection closed");
    result
}

async fn dispatch(command: DatabaseCommands, pool: &PgPool, output: JsonOutput) -> Result<()> {
    match command {
        DatabaseCommands::Run => commands::seed::run_all(pool, output).await,
        DatabaseCommands::Rebuild => commands::seed::run_rebuild(pool).await,
        DatabaseCommands::Exercise => commands::seed::run_exercise(pool, output).await,
        DatabaseCommands::Users(args) => commands::inspect::run_users(args, pool, output).await,
        DatabaseCommands::Posts(args) => commands::inspect::run_posts(args, pool, output).await,
        DatabaseCommands::Tags(args) => commands::inspect::run_tags(args, pool, output).await,
    }
}
