//! Command-line argument parsing
//!
//! The service has no subcommands; arguments only select the configuration
//! file or print a sample configuration.

use clap::Parser;

use super::DEFAULT_CONFIG_PATH;

/// ipinfo - where is this IP address?
#[derive(Parser, Debug)]
#[command(name = "ipinfo")]
#[command(version)]
#[command(about = "Resolve the caller's IP address to geographic metadata", long_about = None)]
pub struct Args {
    /// Configuration file path (TOML)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub generate_config: bool,
}

impl Args {
    /// 配置文件路径，以及该文件是否必须存在
    ///
    /// 显式指定的文件必须存在；默认的 config.toml 可选
    pub fn config_source(&self) -> (&str, bool) {
        match self.config.as_deref() {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH, false),
        }
    }
}
