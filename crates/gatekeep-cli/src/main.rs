//! Gatekeep CLI — manage the blocklist and drive navigation decisions.

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use gatekeep_config::{CliOverrides, GatekeepConfig};
use gatekeep_core::{NavigationOutcome, Service};
use gatekeep_store::PolicyStore;
use gatekeep_types::{Request, Response};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gatekeep", version, about = "Focus-mode navigation blocker")]
struct Cli {
    /// Path of the policy state file (overrides config)
    #[arg(long)]
    state_path: Option<PathBuf>,

    /// Enable verbose/debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn focus mode on
    On,
    /// Turn focus mode off
    Off,
    /// Show focus mode, the blocklist and active passes
    Status,
    /// Add a domain to the blocklist
    Block {
        domain: String,
        /// Category label shown on the interception page
        #[arg(short, long)]
        category: String,
    },
    /// Remove a domain from the blocklist
    Unblock { domain: String },
    /// Grant a temporary pass for a blocked domain
    Allow {
        domain: String,
        /// Why you need the exception (at least 5 words)
        #[arg(short, long)]
        reason: String,
        /// Pass duration in minutes
        #[arg(short, long, default_value_t = 5)]
        minutes: u64,
    },
    /// Decide a navigation URL against the current policy
    Check { url: String },
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Print the policy state as JSON
    State,
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// List categories
    List,
    /// Add a category
    Add { name: String },
    /// Remove a category
    Remove { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = GatekeepConfig::load(CliOverrides {
        state_path: cli.state_path,
    })?;
    let store = PolicyStore::new(config.state_path.clone()).await?;
    let service = Service::new(store, config.block_page_url.clone());

    match cli.command {
        Command::On => {
            expect_done(service.handle(Request::SetFocusMode { enabled: true }).await)?;
            println!("Focus mode on");
        }
        Command::Off => {
            expect_done(service.handle(Request::SetFocusMode { enabled: false }).await)?;
            println!("Focus mode off");
        }
        Command::Status => status(&service).await?,
        Command::Block { domain, category } => {
            expect_done(
                service
                    .handle(Request::AddSite {
                        domain: domain.clone(),
                        category,
                    })
                    .await,
            )?;
            println!("Blocked {domain}");
        }
        Command::Unblock { domain } => {
            let policy = service.policy().await?;
            let Some(site) = policy.site_by_domain(&domain) else {
                bail!("Site not found: {domain}");
            };
            let id = site.id;
            expect_done(service.handle(Request::RemoveSite { id }).await)?;
            println!("Unblocked {domain}");
        }
        Command::Allow {
            domain,
            reason,
            minutes,
        } => {
            let resp = service
                .handle(Request::GrantTemporaryPass {
                    domain: domain.clone(),
                    duration_ms: Some((minutes * 60_000) as f64),
                    reason,
                    target_url: None,
                })
                .await;
            match resp {
                Response::Granted { expires_at, .. } => {
                    let left = expires_at - Utc::now().timestamp_millis();
                    println!(
                        "Temporary pass for {domain}, expires in {} minute(s)",
                        (left + 59_999) / 60_000
                    );
                }
                Response::Failed { error, .. } => bail!(error),
                other => bail!("unexpected reply: {other:?}"),
            }
        }
        Command::Check { url } => match service.on_navigation(&url, true).await? {
            NavigationOutcome::Proceed(kind) => println!("allow ({kind:?})"),
            NavigationOutcome::Redirect {
                to,
                blocked_domain,
                category,
            } => {
                println!("block {blocked_domain} [{category}]");
                println!("redirect: {to}");
            }
        },
        Command::Categories(cmd) => categories(&service, cmd).await?,
        Command::State => {
            let resp = service.handle(Request::GetState).await;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
    }

    Ok(())
}

async fn status(service: &Service) -> Result<()> {
    let policy = service.policy().await?;
    let now = Utc::now();

    println!("Focus mode: {}", if policy.focus_mode { "on" } else { "off" });

    if policy.blocked_sites.is_empty() {
        println!("Blocklist: empty");
    } else {
        println!("Blocklist:");
        for (category, sites) in policy.sites_by_category() {
            println!("  {category}");
            for site in sites {
                println!("    {}", site.domain);
            }
        }
    }

    let live: Vec<_> = policy
        .temporary_allows
        .iter()
        .filter(|a| a.expires_at > now)
        .collect();
    if !live.is_empty() {
        println!("Active passes:");
        for allow in live {
            let left = (allow.expires_at - now).num_seconds().max(0);
            println!(
                "  {} ({}m{:02}s left): {}",
                allow.domain,
                left / 60,
                left % 60,
                allow.reason
            );
        }
    }

    Ok(())
}

async fn categories(service: &Service, cmd: CategoryCommand) -> Result<()> {
    match cmd {
        CategoryCommand::List => {
            for name in service.policy().await?.categories {
                println!("{name}");
            }
        }
        CategoryCommand::Add { name } => {
            expect_done(service.handle(Request::AddCategory { name: name.clone() }).await)?;
            println!("Added category {name}");
        }
        CategoryCommand::Remove { name } => {
            expect_done(
                service
                    .handle(Request::RemoveCategory { name: name.clone() })
                    .await,
            )?;
            println!("Removed category {name}");
        }
    }
    Ok(())
}

fn expect_done(resp: Response) -> Result<()> {
    match resp {
        Response::Done { .. } => Ok(()),
        Response::Failed { error, .. } => bail!(error),
        other => bail!("unexpected reply: {other:?}"),
    }
}
