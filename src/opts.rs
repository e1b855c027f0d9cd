//! CLI options.

use std::path::PathBuf;

use clap::Parser;

use crate::prelude::*;
use crate::regression::ResidualMode;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Opts {
    /// JSON config file, `server.conf` is read when present and the option is omitted
    #[arg(short, long, env = "REGPLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address and port to listen on (ex. 127.0.0.1:1234), overrides the config file
    #[arg(short = 'l', long, env = "REGPLOT_LISTEN")]
    pub listen: Option<String>,

    /// Sentry DSN
    #[arg(long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Sentry performance monitoring sample rate
    #[arg(
        long,
        default_value = "0",
        env = "SENTRY_TRACES_SAMPLE_RATE",
        value_parser = parse_sample_rate,
    )]
    pub traces_sample_rate: f32,

    /// Fitted value used for the residuals
    #[arg(long, value_enum, default_value = "inherited", env = "REGPLOT_RESIDUALS")]
    pub residuals: ResidualMode,
}

fn parse_sample_rate(value: &str) -> Result<f32> {
    let value = value.parse::<f32>()?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(anyhow!("{} is not within [0, 1]", value))
    }
}
