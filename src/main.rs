use std::process::ExitCode;

use clap::Parser;
use regplot::config::{Config, ConfigError};
use regplot::opts::Opts;
use regplot::prelude::*;
use regplot::web::access_log::AccessLog;
use regplot::{logging, web};

const EXIT_FAILURE: u8 = 1;
const EXIT_NO_CONFIG: u8 = 2;
const EXIT_CONFIG_PARSE: u8 = 3;
const EXIT_CANT_LISTEN: u8 = 4;

#[tokio::main]
async fn main() -> ExitCode {
    let opts = Opts::parse();
    let _sentry_guard = match logging::init(opts.sentry_dsn.clone(), opts.traces_sample_rate) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("{:#}", error);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let config = match Config::load(opts.config.as_deref(), opts.listen.clone()) {
        Ok(config) => config,
        Err(error) => {
            let code = match error {
                ConfigError::Read { .. } => EXIT_NO_CONFIG,
                ConfigError::Parse { .. } => EXIT_CONFIG_PARSE,
            };
            error!("{:#}", anyhow::Error::from(error));
            return ExitCode::from(code);
        }
    };
    info!(address = %config.address, access_log = ?config.access_log);

    let access_log = match &config.access_log {
        Some(access_log) => match AccessLog::open(&access_log.path, access_log.fields.clone()).await {
            Ok(access_log) => Some(access_log),
            Err(error) => {
                error!("{:#}", error);
                return ExitCode::from(EXIT_FAILURE);
            }
        },
        None => None,
    };

    if let Err(error) = web::run(&config.address, opts.residuals, access_log).await {
        error!(address = %config.address, "failed to listen: {:#}", error);
        return ExitCode::from(EXIT_CANT_LISTEN);
    }
    ExitCode::SUCCESS
}
