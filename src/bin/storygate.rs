//! GitHub Action entry point that moves Shortcut stories.
//!
//! Usage:
//!
//! ```text
//! storygate [dispatch]
//! storygate release
//! ```
//!
//! `dispatch` (the default) reads the pull request event GitHub delivered to
//! the job and moves every referenced story whose review state calls for it.
//! `release` reads a release event and moves every story referenced in the
//! release notes to the configured release state. Both write the moved
//! stories to the step output `updatedStories`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use storygate::{
    config::{AutomationConfig, Credentials},
    event::services::EventDispatcher,
    review::adapters::github::GithubCodeHost,
    story::{
        adapters::shortcut::ShortcutTracker,
        services::{ReleaseRequest, TransitionService},
    },
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const OUTPUT_NAME: &str = "updatedStories";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Moves Shortcut stories from GitHub pull request activity",
    long_about = None
)]
struct Cli {
    /// Name of the event that triggered the workflow.
    #[arg(long, env = "GITHUB_EVENT_NAME", global = true)]
    event_name: Option<String>,

    /// Path to the JSON event payload.
    #[arg(long, env = "GITHUB_EVENT_PATH", global = true)]
    event_path: Option<Utf8PathBuf>,

    /// File that receives step outputs; printed to stdout when absent.
    #[arg(long, env = "GITHUB_OUTPUT", global = true)]
    output: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Handle a pull request or pull request review event.
    Dispatch,
    /// Move the stories referenced in a release.
    Release,
}

#[derive(Debug, serde::Deserialize)]
struct ReleaseEvent {
    release: ReleasePayload,
}

#[derive(Debug, serde::Deserialize)]
struct ReleasePayload {
    #[serde(default)]
    body: Option<String>,
    html_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err
                .chain()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(": ");
            let mut stdout = std::io::stdout().lock();
            if writeln!(stdout, "::error::{message}").is_err() {
                return ExitCode::from(2);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let config = AutomationConfig::from_env()?;
    let event_path = cli
        .event_path
        .as_deref()
        .ok_or_else(|| eyre!("GITHUB_EVENT_PATH is not set"))?;
    let payload = read_payload(event_path)?;
    let tracker = Arc::new(ShortcutTracker::new(
        config.shortcut_api_url.as_str(),
        &credentials.shortcut_token,
    )?);

    match cli.command.unwrap_or(Command::Dispatch) {
        Command::Dispatch => {
            let event_name = cli
                .event_name
                .as_deref()
                .ok_or_else(|| eyre!("GITHUB_EVENT_NAME is not set"))?;
            let code_host = Arc::new(GithubCodeHost::new(
                config.github_graphql_url.as_str(),
                &credentials.github_token,
            )?);
            let dispatcher = EventDispatcher::new(tracker, code_host, config.dispatch_settings()?);
            let updated = dispatcher.dispatch(event_name, &payload).await?;
            info!(stories = ?updated, "pull request event handled");
            write_output(cli.output.as_deref(), &updated)
        }
        Command::Release => {
            let release_state = config
                .release_state
                .clone()
                .ok_or_else(|| eyre!("INPUT_RELEASESTATE is required for the release flow"))?;
            let release: ReleaseEvent = serde_json::from_value(payload)
                .wrap_err("event payload is not a release event")?;
            let request = ReleaseRequest::new(
                release.release.body.unwrap_or_default(),
                release_state,
                release.release.html_url,
            )
            .with_description_update(config.update_description);
            let names = TransitionService::new(tracker)
                .release_stories(&config.reference_extractor()?, request)
                .await?;
            info!(stories = ?names, "release handled");
            write_output(cli.output.as_deref(), &names)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STORYGATE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("RUNNER_DEBUG").is_ok_and(|value| value == "1") {
            "storygate=debug"
        } else {
            "storygate=info,warn"
        })
    });

    let format = env::var("STORYGATE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_owned());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn open_parent_dir(path: &Utf8Path) -> Result<(Dir, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("path {path} must include a file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("failed to open directory {parent}"))?;
    Ok((dir, file_name))
}

fn read_payload(path: &Utf8Path) -> Result<Value> {
    let (dir, file_name) = open_parent_dir(path)?;
    let contents = dir
        .read_to_string(file_name)
        .wrap_err_with(|| format!("failed to read event payload {path}"))?;
    debug!(path = %path, bytes = contents.len(), "read event payload");
    serde_json::from_str(&contents).wrap_err("event payload is not valid JSON")
}

fn write_output<T: Serialize>(output: Option<&Utf8Path>, value: &T) -> Result<()> {
    let line = format!("{OUTPUT_NAME}={}\n", serde_json::to_string(value)?);
    match output {
        Some(path) => {
            let (dir, file_name) = open_parent_dir(path)?;
            let mut options = OpenOptions::new();
            options.append(true).create(true);
            let mut file = dir
                .open_with(file_name, &options)
                .wrap_err_with(|| format!("failed to open output file {path}"))?;
            file.write_all(line.as_bytes())?;
        }
        None => std::io::stdout().lock().write_all(line.as_bytes())?,
    }
    Ok(())
}
