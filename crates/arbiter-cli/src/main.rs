use std::path::PathBuf;

use arbiter_cli::{init_logging, load_declarations, resolve_config};
use arbiter_core::{Evaluator, select_builder_targets};
use clap::Parser;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "arbiter",
    about = "Select the class declarations a builder can be generated for",
    version
)]
struct Cli {
    /// JSON array of scanned declarations
    #[arg(value_name = "FILE")]
    declarations: PathBuf,

    /// Optional TOML config with an [evaluator] table
    #[arg(short, long, env = "ARBITER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the per-decision attempt ceiling
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,

    /// Print the selected declarations as JSON instead of one name per line
    #[arg(long)]
    json: bool,
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    let config = resolve_config(cli.config.as_deref(), cli.max_attempts)?;
    let evaluator = Evaluator::new(config)?;
    let declarations = load_declarations(&cli.declarations)?;

    let targets = select_builder_targets(&evaluator, &declarations, |rejection| {
        error!(
            declaration = %rejection.declaration.name,
            reason = ?rejection.reason,
            "{rejection}"
        );
    })?;

    info!(
        scanned = declarations.len(),
        selected = targets.len(),
        "builder targets selected"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        for target in &targets {
            println!("{}", target.name);
        }
    }

    Ok(())
}
