//! synamic - query and inspect multi-site content from the command line.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use synamic::cli::{self, Cli};
use synamic::logger::set_verbose;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    set_verbose(cli.verbose);

    cli::run(&cli)
}
