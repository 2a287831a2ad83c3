use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use ipinfo::config::{Args, StaticConfig};
use ipinfo::errors::IpInfoError;
use ipinfo::runtime::run_server;
use ipinfo::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.generate_config {
        print!("{}", StaticConfig::generate_sample_config());
        return ExitCode::SUCCESS;
    }

    dotenvy::dotenv().ok();

    let (config_path, required) = args.config_source();
    let config = match StaticConfig::load(config_path, required) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    // guard 必须存活到进程结束，否则缓冲中的日志会丢失
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_server(config).await {
        error!("Server startup failed: {:#}", e);
        match e.downcast_ref::<IpInfoError>() {
            Some(err) => eprintln!("{}\n  {:#}", err.format_colored(), e),
            None => eprintln!("[ERROR] {:#}", e),
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
