//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::{DeliveryStatus, LookupResult};

/// Look up a subject on Wikipedia and mail the summary as a PDF report
#[derive(Debug, Parser)]
#[command(name = "wikireport")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up a subject and print the summary
    Search {
        /// Subject to look up
        term: String,

        /// Print the lookup result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the report and mail it
    ///
    /// Example: wikireport send Rust --to "ana@x.com, beto@x.com"
    Send {
        /// Subject to look up
        term: String,

        /// Recipients separated by commas or semicolons
        #[arg(long, default_value = "")]
        to: String,

        /// Requester address, always added to the recipients
        #[arg(long, value_name = "ADDR")]
        requester: Option<String>,

        #[command(flatten)]
        prefetched: PrefetchedArgs,
    },

    /// Build the report and write it to a file
    Render {
        /// Subject to look up
        term: String,

        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        prefetched: PrefetchedArgs,
    },
}

/// Results already shown to the user, re-delivered without fetching
#[derive(Debug, Clone, Default, Args)]
pub struct PrefetchedArgs {
    /// Summary text to report instead of fetching
    #[arg(long, value_name = "TEXT")]
    pub summary: Option<String>,

    /// Source URL of the supplied summary (default: the article URL)
    #[arg(long, value_name = "URL", requires = "summary")]
    pub url: Option<String>,
}

impl PrefetchedArgs {
    /// Build a lookup result from the flags; `default_url` is used without `--url`
    pub fn into_lookup_result(
        self,
        term: &str,
        default_url: impl FnOnce() -> String,
    ) -> Option<LookupResult> {
        let summary = self.summary?;
        let url = self.url.unwrap_or_else(default_url);
        Some(LookupResult::found(term.trim(), summary.trim(), url))
    }
}

/// Log filter chosen by `-v`; `None` leaves the choice to RUST_LOG and config
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Process exit code for a delivery status
pub const fn exit_code_for(status: &DeliveryStatus) -> u8 {
    match status {
        DeliveryStatus::Sent => 0,
        DeliveryStatus::TransportError(_) => 1,
        DeliveryStatus::NoRecipients => 2,
    }
}
