//! Recruitdesk CLI entry point.
//!
//! Loads pages and threads from a fixture file and provides `status`, `send`
//! and `tags` subcommands for inspecting thread sendability, pushing a
//! message through the send gate, or listing message tags.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;

use recruitdesk::config::{default_config_path, load_config, load_config_or_default, Config};
use recruitdesk::fixtures::load_fixtures;
use recruitdesk::messaging::tags::ALL_TAGS;
use recruitdesk::messaging::thread::parse_timestamp;
use recruitdesk::{MessageTag, Role, SendRequest, ThreadStatus, ThreadStore};

/// Recruitdesk — thread sendability for page-based candidate messaging.
#[derive(Parser)]
#[command(name = "recruitdesk", version, about)]
struct Cli {
    /// Config file (defaults to ~/.recruitdesk/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixture file with pages, threads and messages.
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Show the sendability of one or all threads.
    Status {
        /// Role the caller acts as (e.g. "admin", "CA Manager", "recruiter").
        #[arg(long)]
        role: String,
        /// Staff id of the caller.
        #[arg(long)]
        user: String,
        /// Only show this thread.
        #[arg(long)]
        thread: Option<String>,
        /// Evaluate at this instant instead of the current time.
        #[arg(long)]
        now: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Send a message through the sendability gate.
    Send {
        /// Target thread.
        #[arg(long)]
        thread: String,
        /// Role the sender acts as.
        #[arg(long)]
        role: String,
        /// Staff id of the sender.
        #[arg(long)]
        user: String,
        /// Message text.
        #[arg(long)]
        body: String,
        /// Message tag (e.g. "ACCOUNT_UPDATE").
        #[arg(long)]
        tag: Option<String>,
        /// Send at this instant instead of the current time.
        #[arg(long)]
        now: Option<String>,
    },
    /// List supported message tags.
    Tags,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_config_or_default(&default_config_path()?)?,
    };
    let _logging_guard = match &config.logging.logs_dir {
        Some(dir) => Some(recruitdesk::logging::init_production(dir, &config.logging.level)?),
        None => {
            recruitdesk::logging::init_cli(&config.logging.level);
            None
        }
    };

    match cli.command {
        Command::Status {
            role,
            user,
            thread,
            now,
            json,
        } => {
            let store = open_store(cli.fixtures, &config)?;
            handle_status(&store, &role, &user, thread.as_deref(), now.as_deref(), json)
        }
        Command::Send {
            thread,
            role,
            user,
            body,
            tag,
            now,
        } => {
            let mut store = open_store(cli.fixtures, &config)?;
            let tag = tag
                .as_deref()
                .map(str::parse::<MessageTag>)
                .transpose()?;
            let request = SendRequest {
                thread_id: thread,
                role: role.parse::<Role>()?,
                user_id: user,
                body,
                tag,
            };
            handle_send(&mut store, request, now.as_deref())
        }
        Command::Tags => {
            for tag in ALL_TAGS {
                println!("{:<24} {}", tag.as_str(), tag.description());
            }
            Ok(())
        }
    }
}

/// Load the fixture store named on the command line or in config.
fn open_store(fixtures: Option<PathBuf>, config: &Config) -> anyhow::Result<ThreadStore> {
    let path = fixtures
        .or_else(|| config.store.fixtures.clone())
        .context("no fixture file given; pass --fixtures or set [store].fixtures")?;
    let mut store =
        load_fixtures(&path).with_context(|| format!("failed to load {}", path.display()))?;
    store.set_trace_decisions(config.engine.trace_decisions);
    debug!(fixtures = %path.display(), "store loaded");
    Ok(store)
}

/// Resolve `--now`, defaulting to the wall clock.
fn resolve_now(raw: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("invalid --now value: {raw}")),
        None => Ok(Utc::now()),
    }
}

/// Print the sendability of one or all threads.
fn handle_status(
    store: &ThreadStore,
    role: &str,
    user: &str,
    thread: Option<&str>,
    now: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let now = resolve_now(now)?;
    let statuses = match thread {
        Some(thread_id) => vec![store.evaluate(thread_id, role, user, now)?],
        None => store.evaluate_all(role, user, now),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }
    for status in &statuses {
        println!("{}", format_status(status));
    }
    Ok(())
}

fn format_status(status: &ThreadStatus) -> String {
    let remaining = status
        .remaining
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_owned());
    let page = status
        .page_health
        .map(|h| h.to_string())
        .unwrap_or_else(|| "unknown".to_owned());
    format!(
        "{:<16} {:<13} {:<14} page={page}",
        status.thread_id,
        status.state.as_str(),
        remaining
    )
}

/// Run one send through the gate and print the recorded message.
fn handle_send(
    store: &mut ThreadStore,
    request: SendRequest,
    now: Option<&str>,
) -> anyhow::Result<()> {
    let now = resolve_now(now)?;
    let message = store.send_message(request, now)?;
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}
