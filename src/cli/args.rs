//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::site::SiteId;

/// Query and inspect the contents of a multi-site project
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Project root directory (holds synamic.toml)
    #[arg(short, long, global = true, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Filter contents with a query and print them as JSON
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },

    /// Print the URL index of a site
    #[command(visible_alias = "u")]
    Urls {
        #[command(flatten)]
        site: SiteArg,
    },

    /// Print the markers of one kind
    #[command(visible_alias = "m")]
    Markers {
        /// Marker kind (single, multiple, hierarchical)
        #[arg(short, long)]
        kind: String,

        #[command(flatten)]
        site: SiteArg,
    },

    /// Find the content a URL points to
    #[command(visible_alias = "r")]
    Resolve {
        /// Requested URL, absolute or a path (`/blog/posts/hello/`)
        #[arg(value_hint = clap::ValueHint::Url)]
        url: String,
    },
}

/// Site selection shared by the per-site commands.
#[derive(clap::Args, Debug, Clone)]
pub struct SiteArg {
    /// Site id (`blog`, `blog::fr`), the root site if omitted
    #[arg(short = 's', long = "site", value_name = "ID")]
    pub id: Option<SiteId>,
}

impl SiteArg {
    pub fn site_id(&self) -> SiteId {
        self.id.clone().unwrap_or_default()
    }
}

/// Query command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Query text, e.g. `type == post & tags contains rust ; sort created desc`
    pub text: String,

    #[command(flatten)]
    pub site: SiteArg,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Filter output to specific fields (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_and_version_flags() {
        let cli = Cli::try_parse_from(["synamic", "-v", "urls"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["synamic", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::try_parse_from([
            "synamic",
            "--root",
            "site",
            "query",
            "type == post",
            "--site",
            "blog::fr",
            "--fields",
            "title,tags",
        ])
        .unwrap();

        assert_eq!(cli.root, PathBuf::from("site"));
        let Commands::Query { args } = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.text, "type == post");
        assert_eq!(args.site.site_id().to_string(), "blog::fr");
        assert_eq!(args.fields.unwrap(), ["title", "tags"]);
    }

    #[test]
    fn test_site_defaults_to_root() {
        let cli = Cli::try_parse_from(["synamic", "urls"]).unwrap();
        let Commands::Urls { site } = cli.command else {
            panic!("expected urls");
        };
        assert!(site.site_id().is_root());
    }

    #[test]
    fn test_invalid_site_id_rejected() {
        assert!(Cli::try_parse_from(["synamic", "urls", "--site", "a b"]).is_err());
    }
}
