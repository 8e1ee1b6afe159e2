use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use studio_text_extract::utils::{run_epub, EpubDocBackend};
use studio_text_extract::{ExitStatus, ExtractConfig, Outcome};

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract plain text from an EPUB file and print it as JSON")]
struct Args {
    /// Path to the EPUB file
    #[arg(allow_hyphen_values = true)]
    path: Option<OsString>,

    /// Extra arguments are accepted and ignored
    #[arg(hide = true, allow_hyphen_values = true)]
    rest: Vec<OsString>,
}

fn main() -> ExitCode {
    let config = ExtractConfig::from_env();
    config.validate();
    config.init_tracing();
    debug!("Configuration: {}", config);

    let path = match Args::try_parse() {
        Ok(args) => args.path.map(PathBuf::from),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            warn!("Could not parse arguments: {}", e);
            None
        }
    };

    let outcome = run_epub(&EpubDocBackend, path.as_deref(), &config);
    info!("EPUB extraction finished with exit code {}", outcome.status.code());

    match emit(&outcome) {
        Ok(()) => outcome.status.into(),
        Err(e) => {
            error!("{:#}", e);
            ExitStatus::ExtractionFailed.into()
        }
    }
}

fn emit(outcome: &Outcome) -> Result<()> {
    outcome
        .emit(io::stdout().lock())
        .context("Failed to write result to stdout")
}
