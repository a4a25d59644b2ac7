use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipfold")]
#[command(version)]
#[command(about = "Unpack nested ZIP archives into a bucketed, deduplicated tree", long_about = None)]
#[command(after_help = "Files land in OUTPUT_DIR/<A>/<AB>/<name>. A name seen again with \n\
  different content turns into a directory holding 1-<name>, 2-<name>, ...\n\n\
Examples:\n  \
  zipfold ~/torrents ~/modules        extract every archive under ~/torrents\n  \
  zipfold -n ~/torrents ~/modules     print what would happen")]
pub struct Cli {
    /// Directory scanned recursively for .zip files
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Root of the output tree
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Do everything but file operations; print what would happen
    #[arg(short = 'n', long = "dry-run", visible_alias = "just-print")]
    pub dry_run: bool,

    /// Log comparison and promotion details
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Quiet mode (-qq => errors only)
    #[arg(short = 'q', action = clap::ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Cli {
    /// Default log filter for this crate.
    pub fn log_directive(&self) -> &'static str {
        match (self.verbose, self.quiet) {
            (true, _) => "zipfold=debug",
            (false, 0) => "zipfold=info",
            (false, 1) => "zipfold=warn",
            (false, _) => "zipfold=error",
        }
    }
}
