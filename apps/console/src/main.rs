use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::HttpTableApi;
use shared::{
    domain::{ColumnFilter, QueryOptions, RenderRegion},
    protocol::parse_server_url,
};
use tokio::{io::BufReader, sync::mpsc};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod session;
mod ui;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

use config::load_settings;
use controller::{events::UiEvent, reducer, Controller};
use ui::UiState;

#[derive(Parser, Debug)]
#[command(name = "sheet2api", about = "Upload spreadsheets and query their tables")]
struct Cli {
    /// Config file; defaults to ./sheet2api.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Table to offer as a link (repeatable).
    #[arg(long = "table")]
    tables: Vec<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and print the backend's JSON answer.
    Upload { file: Option<PathBuf> },
    /// Query one table and print its rows.
    Query {
        table: String,
        #[arg(long, value_parser = parse_limit_arg)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        /// COLUMN=VALUE
        #[arg(long)]
        filter: Option<ColumnFilter>,
    },
    /// Prompt for commands (default).
    Interactive,
}

fn parse_limit_arg(raw: &str) -> Result<u32, String> {
    QueryOptions::parse_limit(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    settings.tables.extend(cli.tables);

    let server_url = parse_server_url(&settings.server_url)?;
    tracing::info!(%server_url, "using table api");
    let api = HttpTableApi::with_timeout(server_url, settings.request_timeout())?;

    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let controller =
        Arc::new(Controller::new(Arc::new(api), ui_tx).with_reload_delay(settings.reload_delay()));
    let state = UiState::new(settings.table_names());

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let input = BufReader::new(tokio::io::stdin());
            let mut out = io::stdout();
            session::run(controller, state, ui_rx, input, &mut out)
                .await
                .context("interactive session failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Upload { file } => {
            controller.submit_upload(file.as_deref()).await;
            let succeeded = finish_one_shot(
                state,
                ui_rx,
                RenderRegion::UploadResult,
                &mut io::stdout(),
                &mut io::stderr(),
            )?;
            Ok(exit_code(succeeded))
        }
        Command::Query {
            table,
            limit,
            search,
            filter,
        } => {
            let options = QueryOptions {
                limit,
                search,
                filter,
            };
            controller.query_table(&table, options).await;
            let succeeded = finish_one_shot(
                state,
                ui_rx,
                RenderRegion::ApiResult,
                &mut io::stdout(),
                &mut io::stderr(),
            )?;
            Ok(exit_code(succeeded))
        }
    }
}

/// Applies what the action emitted and prints the region it ended up with to
/// `out`. Alerts and table notices go to `err`. Returns `false` when an alert
/// or a request failure was emitted.
fn finish_one_shot<W: Write, E: Write>(
    mut state: UiState,
    mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    region: RenderRegion,
    out: &mut W,
    err: &mut E,
) -> io::Result<bool> {
    let mut failed = false;
    while let Ok(event) = ui_rx.try_recv() {
        if let UiEvent::Error(_) = &event {
            failed = true;
        }
        reducer::apply(&mut state, &event);
        if let UiEvent::TableDiscovered(table) = &event {
            writeln!(err, "table created: {table} (query it with: sheet2api query {table})")?;
        }
    }

    if let Some(alert) = &state.alert {
        writeln!(err, "{alert}")?;
    }
    let text = state.region(region);
    if !text.is_empty() {
        writeln!(out, "{text}")?;
    }
    out.flush()?;

    Ok(!failed)
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
