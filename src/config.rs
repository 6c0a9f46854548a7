//! Command line and environment configuration for the server.

use std::{net::IpAddr, path::PathBuf};

use clap::Parser;

/// The JSON reporting API server for jexpense.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "JEXPENSE_DB_PATH")]
    pub db_path: PathBuf,

    /// The address to serve the API from.
    #[arg(long, env = "JEXPENSE_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "JEXPENSE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// The canonical name of the timezone that "today" is resolved in, e.g.
    /// "Pacific/Auckland".
    #[arg(long, env = "JEXPENSE_TIMEZONE", default_value = "Etc/UTC")]
    pub timezone: String,

    /// File path that debug logs are appended to.
    #[arg(long, env = "JEXPENSE_LOG_PATH", default_value = "debug.log")]
    pub log_path: PathBuf,
}
