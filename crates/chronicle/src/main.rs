mod input;
mod output;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use chronicle_core::config::Config;
use clap::{Parser, Subcommand};

use crate::input::{parse_records, read_source};
use crate::output::{print_lines, print_summary};
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(about = "Push JSON logs to Chronicle and read reference lists")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, help = "Chronicle region, e.g. us or europe")]
    region: Option<String>,

    #[arg(long, global = true)]
    customer_id: Option<String>,

    #[arg(long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Ingest records from a file (or stdin) as one log type")]
    Ingest {
        #[arg(long)]
        log_type: String,
        #[arg(help = "JSON array or JSON-lines file; reads stdin when omitted")]
        file: Option<PathBuf>,
    },
    #[command(about = "Print the lines of a reference list")]
    List { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_cli_tracing();
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;

    match cli.command {
        Commands::Ingest { log_type, file } => {
            let raw = read_source(file.as_deref()).await?;
            let records = parse_records(&raw)?;
            tracing::info!(count = records.len(), log_type = %log_type, "records loaded");
            let summary = chronicle_ingest::ingest(&cfg, &records, &log_type)
                .await
                .with_context(|| format!("ingest {log_type} logs"))?;
            print_summary(&summary, &log_type, cli.json)
        }
        Commands::List { name } => {
            let lines = chronicle_ingest::get_reference_list(&cfg, &name)
                .await
                .with_context(|| format!("fetch reference list {name}"))?;
            print_lines(&lines, cli.json)
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut cfg = Config::load().context("load configuration")?;
    if let Some(region) = &cli.region {
        cfg.region = region.clone();
    }
    if let Some(customer_id) = &cli.customer_id {
        cfg.customer_id = customer_id.clone();
    }
    if let Some(namespace) = &cli.namespace {
        cfg.namespace = Some(namespace.clone());
    }
    Ok(cfg)
}
