//! Roster CLI - command-line composition root
//!
//! Wires the SQLite adapter into the core services and exposes a few
//! operations for inspecting and seeding a roster database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use roster_core::application::{Auditing, MemberSession, RosterService};
use roster_core::domain::{Member, MemberMutation, MemberPredicate, Order, PageRequest, Sort};
use roster_core::port::MemberRepository;
use roster_infra_sqlite::{create_pool_with, run_migrations, SqliteMemberRepository, StoreConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster member/team store CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (ROSTER_* environment variables override it)
    #[arg(long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Database URL, overrides the config file
    #[arg(long)]
    database_url: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the schema
    Migrate,

    /// Insert members user0..user{N-1} aged 10+i in one transaction
    Seed {
        #[arg(short, long, default_value = "100")]
        count: u32,
    },

    /// Look up members by id (repeated ids are served from the session cache)
    Get {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show one page of members
    List {
        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: u32,

        #[arg(short, long, default_value = "3")]
        size: u32,

        /// Sort order as property[,asc|desc]; repeatable
        #[arg(long, default_value = "id")]
        sort: Vec<String>,

        /// Only members at least this old
        #[arg(long)]
        min_age: Option<i32>,
    },

    /// Add one year to every member aged at least --min-age
    BulkAgePlus {
        #[arg(long)]
        min_age: i32,
    },
}

#[derive(Serialize, Tabled)]
struct MemberView {
    id: i64,
    username: String,
    age: i32,
    #[tabled(display_with = "display_team")]
    team_id: Option<i64>,
    version: i64,
}

impl From<Member> for MemberView {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            username: member.username,
            age: member.age,
            team_id: member.team_id,
            version: member.version,
        }
    }
}

fn display_team(team_id: &Option<i64>) -> String {
    team_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn init_logging() {
    let log_format = std::env::var("ROSTER_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster=info"));

    // Logs go to stderr so --json output stays parseable
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = StoreConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    info!(
        version = roster_core::VERSION,
        database_url = %config.database_url,
        "Roster starting"
    );

    let pool = create_pool_with(&config)
        .await
        .context("Failed to open database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let repo = Arc::new(SqliteMemberRepository::new(pool, Auditing::system()));

    match cli.command {
        Commands::Migrate => {
            println!("{}", "✓ Schema is up to date".green().bold());
        }

        Commands::Seed { count } => {
            let mut service = RosterService::new(repo.clone());
            if let Some(deadline) = config.statement_timeout() {
                service = service.with_deadline(deadline);
            }

            let members = service.seed_members(count).await?;

            if cli.json {
                print_json(&members)?;
            } else {
                println!(
                    "{}",
                    format!("✓ Seeded {} members", members.len()).green().bold()
                );
            }
        }

        Commands::Get { ids } => {
            let mut session = MemberSession::new(repo.clone(), config.cache_invalidation);
            let mut found = Vec::with_capacity(ids.len());
            for id in ids {
                match session.find(id).await? {
                    Some(member) => found.push(MemberView::from(member)),
                    None => eprintln!("{}", format!("Member {} not found", id).yellow()),
                }
            }

            if cli.json {
                print_json(&found)?;
            } else if !found.is_empty() {
                println!("{}", Table::new(found));
            }
        }

        Commands::List {
            page,
            size,
            sort,
            min_age,
        } => {
            let orders = sort
                .iter()
                .map(|s| s.parse::<Order>())
                .collect::<roster_core::Result<Vec<_>>>()?;
            let request = PageRequest::sorted(page, size, Sort::from(orders))?;
            let predicate = min_age.map_or(MemberPredicate::All, MemberPredicate::AgeAtLeast);

            let result = repo.find_page(&predicate, &request).await?;
            let result = result.map(MemberView::from);

            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "{}",
                    format!(
                        "Page {} of {} ({} members)",
                        result.number() + 1,
                        result.total_pages().max(1),
                        result.total_elements()
                    )
                    .cyan()
                    .bold()
                );
                println!("{}", Table::new(result.into_content()));
            }
        }

        Commands::BulkAgePlus { min_age } => {
            let affected = repo
                .bulk_update(
                    &MemberPredicate::AgeAtLeast(min_age),
                    &MemberMutation::IncrementAge(1),
                )
                .await?;

            if cli.json {
                print_json(&serde_json::json!({ "affected": affected }))?;
            } else {
                println!(
                    "{}",
                    format!("✓ {} members aged {}+ are one year older", affected, min_age)
                        .green()
                        .bold()
                );
            }
        }
    }

    Ok(())
}
