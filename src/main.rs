//! Main entry point for the zipfold CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use zipfold::{Cli, Config, Walker};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(cli.log_directive().parse()?))
        .with_target(false)
        .init();

    let config = Config::from(&cli);
    if config.dry_run {
        tracing::info!("dry run: no files will be written");
    }

    let summary = Walker::new(&config).run().with_context(|| {
        format!(
            "extracting {} into {}",
            config.input_dir.display(),
            config.output_dir.display()
        )
    })?;

    if summary.errors > 0 {
        tracing::warn!(errors = summary.errors, "finished with errors");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
