use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;

use crate::lookup::DEFAULT_ENDPOINT;

/// Locate an IP address and plot it on a terminal world map.
///
/// Press q, Esc or Ctrl-C to quit.
#[derive(Parser, Debug)]
#[command(name = "tui-geoip", version, about)]
pub struct Cli {
    /// IP address to locate and plot. Defaults to your own public address
    pub ip: Option<IpAddr>,

    /// Base URL of the ipinfo-compatible lookup service
    #[arg(long, env = "TUI_GEOIP_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Read the lookup result from a JSON file instead of the network
    #[arg(long, value_name = "FILE", conflicts_with = "ip")]
    pub record: Option<PathBuf>,

    /// Draw shapes from a GeoJSON file instead of the built-in world map
    #[arg(long, value_name = "FILE")]
    pub shapes: Option<PathBuf>,

    /// Print the map and info panes once to stdout and exit
    #[arg(long)]
    pub print: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Lookup timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,
}

impl Cli {
    /// Parse the process arguments. Help and version exit 0; any usage error
    /// prints the message with usage and exits 1.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err)
                if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
            {
                err.exit()
            }
            Err(err) => {
                err.print().ok();
                std::process::exit(1);
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
