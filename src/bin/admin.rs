//! CLI administration tool for shortener-gateway.
//!
//! Inspects stored links and checks the database without going through the
//! HTTP API (and therefore without being rate limited).
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show database info
//! cargo run --bin admin -- db info
//!
//! # List stored links
//! cargo run --bin admin -- links list --skip 0 --limit 10
//!
//! # Show a single link
//! cargo run --bin admin -- links show abc123
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_USER`/`DB_PASSWORD`/`DB_NAME`): PostgreSQL connection

use shortener_gateway::config::{Config, mask_connection_string};
use shortener_gateway::domain::repositories::LinkRepository;
use shortener_gateway::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortener-gateway.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect stored links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// List links ordered by id
    List {
        /// Number of links to skip
        #[arg(short, long, default_value_t = 0)]
        skip: i64,

        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },

    /// Show a single link by short code
    Show {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&config.database_url)
            )
        })?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinkAction::List { skip, limit } => list_links(&repo, skip, limit).await?,
        LinkAction::Show { code } => show_link(&repo, &code).await?,
    }

    Ok(())
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// Links
///
///   ID   Code       Created            Long URL
///   ─────────────────────────────────────────────────────────────
///   1    Xk3_a9Qz   2025-01-15 10:30   https://example.com/...
/// ```
async fn list_links(repo: &PgLinkRepository, skip: i64, limit: i64) -> Result<()> {
    println!("{}", "Links".bright_blue().bold());
    println!();

    let links = repo
        .list(skip.max(0), limit.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<10} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Long URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<10} {:<18} {}",
            link.id.to_string().bright_black(),
            link.code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            truncate(&link.long_url, 60)
        );
    }

    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!();
    println!(
        "  Showing {} of {}",
        links.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_link(repo: &PgLinkRepository, code: &str) -> Result<()> {
    let link = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Link '{}' not found", code))?;

    println!("{}", "Link".bright_blue().bold());
    println!();
    println!("  ID:       {}", link.id.to_string().bright_black());
    println!("  Code:     {}", link.code.cyan());
    println!("  Long URL: {}", link.long_url);
    println!(
        "  Created:  {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    Ok(())
}

/// Dispatches database operation commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .context("Database connection failed")?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Info".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_black());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_white().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Shortens `s` to at most `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
