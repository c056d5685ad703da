//! Command-line interface module.

mod args;
pub mod common;
pub mod markers;
pub mod query;
pub mod resolve;
pub mod urls;

pub use args::{Cli, Commands, QueryArgs, SiteArg};

use anyhow::Result;

/// Run one parsed command.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Query { args } => query::run_query(&cli.root, args),
        Commands::Urls { site } => urls::print_urls(&cli.root, &site.site_id()),
        Commands::Markers { kind, site } => markers::print_markers(&cli.root, kind, &site.site_id()),
        Commands::Resolve { url } => resolve::resolve_url(&cli.root, url),
    }
}
