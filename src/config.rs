use std::path::PathBuf;

use crate::cli::Cli;

/// Run settings, built once and handed to the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root scanned for archives.
    pub input_dir: PathBuf,
    /// Root of the bucketed output tree.
    pub output_dir: PathBuf,
    /// Decide and report everything, change nothing.
    pub dry_run: bool,
}

impl Config {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config::new(&cli.input_dir, &cli.output_dir).dry_run(cli.dry_run)
    }
}
