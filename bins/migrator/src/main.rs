//! Database migration runner for SGBooks.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The target database comes from `DATABASE_URL` when set, otherwise from
//! the `[database]` section of `config.ini`.

use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;
use sgbooks_db::migration::Migrator;
use sgbooks_shared::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "migrator", about = "Apply SGBooks schema migrations")]
struct Cli {
    /// Connection URL; overrides the config file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations (default).
    Up {
        /// Apply at most this many.
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations.
    Down {
        /// Roll back this many.
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// List applied and pending migrations.
    Status,
    /// Drop everything and re-apply all migrations.
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sgbooks=info,sea_orm_migration=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let db = match &cli.database_url {
        Some(url) => sgbooks_db::connect_url(url).await?,
        None => {
            let config = AppConfig::load()?;
            sgbooks_db::connect(&config.database).await?
        }
    };

    match cli.command.unwrap_or(Command::Up { num: None }) {
        Command::Up { num } => Migrator::up(&db, num).await?,
        Command::Down { num } => Migrator::down(&db, Some(num)).await?,
        Command::Status => Migrator::status(&db).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
    }

    tracing::info!("Migrations complete");
    Ok(())
}
