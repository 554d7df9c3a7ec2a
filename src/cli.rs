//! CLI argument definitions using clap derive macros.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Find, cache and serve website favicons.
///
/// Resolves a site's icon from its HTML, `/favicon.ico`, or external
/// services, falling back to a configured default icon.
#[derive(Parser, Debug)]
#[command(name = "favicon")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $FAVICON_CONFIG, then ~/.config/favicon/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides `listen_addr` from config)
        #[arg(short, long, value_name = "ADDR")]
        listen: Option<SocketAddr>,
    },
    /// Resolve one favicon and write it to a file or stdout
    Fetch {
        /// Site URL or bare host name
        url: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Skip the cache read
        #[arg(long)]
        refresh: bool,
    },
}
