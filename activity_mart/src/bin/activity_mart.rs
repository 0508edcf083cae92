use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use activity_mart::load::{ErrorPolicy, LoadOptions, catalog, events};
use activity_mart::{config, db, ledger, runner};

#[derive(Parser)]
#[command(version, about = "Activity Mart ETL CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the full load: catalog units first, then log batches.
    Run(RunCmd),
    /// Apply pending schema migrations and exit.
    Migrate,
}

#[derive(Args)]
struct RunCmd {
    /// Run config TOML file.
    #[arg(long, value_name = "FILE")]
    config: String,
    /// Abort a unit on the first non-uniqueness store failure.
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Migrate => {
            let db_url = std::env::var("DATABASE_URL")?;
            db::migrate::run_sqlite(&db_url)?;
        }
        Cmd::Run(RunCmd {
            config: config_path,
            fail_fast,
        }) => {
            let cfg = config::load_config_path(&config_path)?;
            let db_url = cfg.database_url()?;

            db::migrate::run_sqlite(&db_url)?;
            let mut conn = db::connection::connect_sqlite(&db_url)?;
            let mut ledger = ledger::LoadLedger::open(&cfg.ledger_path)?;
            let opts = LoadOptions {
                on_error: if fail_fast {
                    ErrorPolicy::AbortUnit
                } else {
                    ErrorPolicy::SkipRow
                },
            };

            // Catalog first: fact lookups only resolve against loaded rows.
            let catalog_stats = runner::process_root(
                &mut conn,
                &mut ledger,
                &opts,
                &cfg.catalog_root,
                catalog::load_catalog_unit,
            )?;
            let event_stats = runner::process_root(
                &mut conn,
                &mut ledger,
                &opts,
                &cfg.events_root,
                events::load_event_unit,
            )?;
            tracing::info!(?catalog_stats, ?event_stats, "load complete");
        }
    }

    Ok(())
}
