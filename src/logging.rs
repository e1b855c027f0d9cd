use std::borrow::Cow;

use sentry::integrations::tracing::EventFilter;
use sentry::{ClientInitGuard, ClientOptions};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::prelude::*;

/// Initialises tracing and Sentry. Sentry stays disabled without a DSN.
pub fn init(sentry_dsn: Option<String>, traces_sample_rate: f32) -> Result<ClientInitGuard> {
    let guard = sentry::init((
        sentry_dsn,
        ClientOptions {
            release: Some(Cow::Borrowed(env!("CARGO_PKG_VERSION"))),
            traces_sample_rate,
            ..Default::default()
        },
    ));

    let sentry_filter = EnvFilter::try_from_env("REGPLOT_SENTRY_LOG")
        .or_else(|_| EnvFilter::try_new("regplot=trace"))?;
    let sentry_layer = sentry::integrations::tracing::layer()
        .event_filter(|metadata| match metadata.level() {
            &Level::ERROR => EventFilter::Event,
            &Level::WARN | &Level::INFO | &Level::DEBUG => EventFilter::Breadcrumb,
            &Level::TRACE => EventFilter::Ignore,
        })
        .span_filter(|metadata| metadata.level() <= &Level::INFO)
        .with_filter(sentry_filter);

    let format_filter = EnvFilter::try_from_env("REGPLOT_LOG")
        .or_else(|_| EnvFilter::try_new("regplot=info,poem=info"))?;
    let format_layer = tracing_subscriber::fmt::layer().with_filter(format_filter);

    tracing_subscriber::Registry::default()
        .with(sentry_layer)
        .with(format_layer)
        .try_init()
        .context("failed to initialise the tracing subscriber")?;

    Ok(guard)
}
