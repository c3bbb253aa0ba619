/*!
 * Configuration handling for dagdump
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use clap_complete::Shell;

use crate::client::HttpGraphClient;
use crate::error::Result;
use crate::types::Cid;
use crate::visited::VisitScope;
use crate::{bail, ensure};

/// Root CID crawled when none is given
pub const DEFAULT_ROOT_CID: &str = "bafyb4iadbza7ckc3djc2k5lfaorwaufcjurzxzkjsj5e7qt2wrguqs7ywm";

/// Command-line arguments for dagdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "dagdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Crawl a content-addressed DAG and dump it as CSV tables",
    long_about = "Walks the directory tree and the raw block DAG below a root CID on a remote node and writes every visited directory, file and block to three CSV files."
)]
pub struct Args {
    /// Root CID to start crawling from
    #[clap(short = 'i', long, default_value = DEFAULT_ROOT_CID)]
    pub root_cid: String,

    /// Node RPC address as host:port
    #[clap(long, default_value = "127.0.0.1:5001")]
    pub node_address: String,

    /// Output CSV for directory entries
    #[clap(long, default_value = "directories.csv")]
    pub directories_output: String,

    /// Output CSV for file entries
    #[clap(long, default_value = "files.csv")]
    pub files_output: String,

    /// Output CSV for DAG blocks
    #[clap(long, default_value = "blocks.csv")]
    pub blocks_output: String,

    /// How the tree and block walkers share visited CIDs
    #[clap(long, value_enum, default_value_t = VisitScope::default())]
    pub visit_scope: VisitScope,

    /// Per-request timeout in seconds (no timeout if omitted)
    #[clap(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Hide the progress spinner
    #[clap(long)]
    pub no_progress: bool,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Locations of the three output files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub directories: PathBuf,
    pub files: PathBuf,
    pub blocks: PathBuf,
}

impl OutputPaths {
    /// All paths with the stream they hold
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            ("directories", self.directories.as_path()),
            ("files", self.files.as_path()),
            ("blocks", self.blocks.as_path()),
        ]
        .into_iter()
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// CID the crawl starts from
    pub root_cid: Cid,

    /// Node RPC address (host:port)
    pub node_address: String,

    /// Output files
    pub outputs: OutputPaths,

    /// Visited-set sharing between walkers
    pub visit_scope: VisitScope,

    /// Per-request timeout
    pub timeout: Option<Duration>,

    /// Whether to draw a progress spinner
    pub show_progress: bool,

    /// Debug logging
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            root_cid: Cid::from(args.root_cid.trim()),
            node_address: args.node_address,
            outputs: OutputPaths {
                directories: PathBuf::from(args.directories_output),
                files: PathBuf::from(args.files_output),
                blocks: PathBuf::from(args.blocks_output),
            },
            visit_scope: args.visit_scope,
            timeout: args.timeout.map(Duration::from_secs),
            show_progress: !args.no_progress,
            verbose: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.root_cid.as_str().is_empty(),
            InvalidArgument,
            "Root CID must not be empty"
        );

        // host:port with a numeric port
        let Some((host, port)) = self.node_address.rsplit_once(':') else {
            bail!(
                InvalidArgument,
                "Node address must be host:port, got '{}'",
                self.node_address
            );
        };
        ensure!(
            !host.is_empty() && port.parse::<u16>().is_ok(),
            InvalidArgument,
            "Node address must be host:port, got '{}'",
            self.node_address
        );
        if let Err(e) = HttpGraphClient::base_url(&self.node_address) {
            bail!(InvalidArgument, "{}", e);
        }

        ensure!(
            self.timeout.map_or(true, |t| !t.is_zero()),
            InvalidArgument,
            "Timeout must be at least one second"
        );

        // Check that every output directory exists
        for (stream, path) in self.outputs.iter() {
            if let Some(parent) = path.parent() {
                ensure!(
                    parent.as_os_str().is_empty() || parent.exists(),
                    Config,
                    "Output directory for {} not found: {}",
                    stream,
                    parent.display()
                );
            }
        }

        ensure!(
            self.outputs.directories != self.outputs.files
                && self.outputs.directories != self.outputs.blocks
                && self.outputs.files != self.outputs.blocks,
            Config,
            "The three output files must be distinct"
        );

        Ok(())
    }
}
