use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use clipstash::cli::args::{Cli, Commands};
use clipstash::cli::commands::{self, Context};
use clipstash::config::{Paths, Settings};
use clipstash::error::ClipstashError;

const LOG_ENV: &str = "CLIPSTASH_LOG";

fn main() {
    init_logging();

    if let Err(e) = run() {
        let cancelled = e
            .downcast_ref::<ClipstashError>()
            .is_some_and(ClipstashError::is_cancelled);
        if cancelled {
            return;
        }
        eprintln!("{}: {e:#}", "error".red().bold());
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::default();
    let settings = Settings::load_from_path(&paths.config_file)
        .context("could not load settings")?;
    let ctx = Context::new(paths, &settings, &cli);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("could not start the runtime")?;

    let output = runtime.block_on(async {
        match cli.command {
            Commands::History(args) => {
                let store = ctx.open_store().await?;
                commands::history(&store, args.command, ctx.format).await
            }
            Commands::Actions(args) => commands::actions(&ctx, args.command).await,
            Commands::Completions { shell } => commands::completions(shell),
        }
    })?;

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
