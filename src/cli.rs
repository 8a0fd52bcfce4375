use std::path::PathBuf;

use clap::Parser;

use golicense_checkr::filter::{Partition, SortKey};

#[derive(Parser, Debug)]
#[command(
    name = "golicense-checkr",
    about = "Audit the licenses of a Go module's dependencies",
    version
)]
pub struct Cli {
    /// Path to the go.mod file to analyze
    #[arg(long = "go-mod", value_name = "PATH", default_value = "go.mod")]
    pub go_mod: PathBuf,

    /// Print aggregate counts instead of the dependency list
    #[arg(long)]
    pub summary: bool,

    /// Emit JSON
    #[arg(long, conflicts_with = "markdown")]
    pub json: bool,

    /// Emit a Markdown table
    #[arg(long)]
    pub markdown: bool,

    /// Write the report to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Only report direct dependencies
    #[arg(long = "direct-only", conflicts_with = "indirect_only")]
    pub direct_only: bool,

    /// Only report indirect dependencies
    #[arg(long = "indirect-only")]
    pub indirect_only: bool,

    /// Only report dependencies whose license matches one of these (comma-separated)
    #[arg(long, value_name = "LICENSES", value_delimiter = ',')]
    pub allow: Vec<String>,

    /// Hide dependencies whose license matches one of these (comma-separated)
    #[arg(long, value_name = "LICENSES", value_delimiter = ',')]
    pub deny: Vec<String>,

    /// Exit with status 1 if any dependency's license matches one of these
    #[arg(long = "fail-on", value_name = "LICENSES", value_delimiter = ',')]
    pub fail_on: Vec<String>,

    /// Report ordering
    #[arg(long, value_name = "KEY", default_value = "path")]
    pub sort: SortArg,

    /// Config file [default: <go.mod dir>/.golicense-checkr/config.toml, fallback ~/.config/golicense-checkr/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Go toolchain binary used to resolve the module graph
    #[arg(long = "go-binary", value_name = "PATH")]
    pub go_binary: Option<PathBuf>,

    /// Seconds to wait for `go list` before giving up
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// License file names to look for, highest priority first (comma-separated)
    #[arg(long = "license-files", value_name = "NAMES", value_delimiter = ',')]
    pub license_files: Vec<String>,

    /// Log more detail to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors; no progress bar or status line
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn partition(&self) -> Partition {
        if self.direct_only {
            Partition::DirectOnly
        } else if self.indirect_only {
            Partition::IndirectOnly
        } else {
            Partition::All
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    Path,
    Version,
    License,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Path => SortKey::Path,
            SortArg::Version => SortKey::Version,
            SortArg::License => SortKey::License,
        }
    }
}
