//! textmatch - near-duplicate document finder
//!
//! Tokenizes documents into word counts, scores them with pairwise TF-IDF
//! cosine or 128-bit SimHash, finds each document's best match and moves the
//! older copy of reciprocal near-duplicates aside, deciding "older" from
//! version/date markers in file names, then modification times.

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod matching;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod similarity;
pub mod text;

use std::io;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::commands::RunSettings;
use crate::config::Config;
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the application for parsed arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration (see
/// [`error::exit_code_for`]) or when the subcommand cannot complete.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Configuration: {:?}", config);

    let progress = Arc::new(Progress::new(cli.quiet));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Match(ref args) => {
            let settings = RunSettings::resolve(&config, &args.common).with_progress(progress);
            commands::match_sample::run(args, &settings, &mut out)
        }
        Commands::MostSimilar(ref args) => {
            let settings = RunSettings::resolve(&config, &args.common).with_progress(progress);
            commands::most_similar::run(args, &settings, &mut out)
        }
    }
}
