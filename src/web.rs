use std::time::Duration as StdDuration;

use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Tracing};
use poem::{get, Endpoint, EndpointExt, Route, Server};

use crate::point::SharedPoint;
use crate::prelude::*;
use crate::regression::ResidualMode;
use crate::web::access_log::AccessLog;
use crate::web::middleware::{AccessLogMiddleware, ErrorMiddleware};

pub mod access_log;
mod middleware;
pub mod views;

const SHUTDOWN_TIMEOUT: StdDuration = StdDuration::from_secs(5);

pub fn create_app(
    mode: ResidualMode,
    point: SharedPoint,
    access_log: Option<Arc<AccessLog>>,
) -> impl Endpoint {
    Route::new()
        .at("/goplot/viz", get(views::viz::get).post(views::viz::post))
        .at("/goplot/graph.js", get(views::r#static::get_graph_js))
        .at("/point", get(views::point::get).post(views::point::post))
        .at("/debug/vars", get(views::vars::get))
        .data(mode)
        .data(point)
        .with(Tracing)
        .with(CatchPanic::new())
        .with(ErrorMiddleware)
        .with(AccessLogMiddleware::new(access_log))
}

/// Serves until Ctrl+C. The only possible error is the listener one.
pub async fn run(
    address: &str,
    mode: ResidualMode,
    access_log: Option<AccessLog>,
) -> std::io::Result<()> {
    let app = create_app(mode, SharedPoint::default(), access_log.map(Arc::new));
    info!(address, ?mode, "listening…");
    Server::new(TcpListener::bind(address.to_string()))
        .run_with_graceful_shutdown(
            app,
            async {
                if let Err(error) = tokio::signal::ctrl_c().await {
                    error!("failed to listen for Ctrl+C: {:#}", error);
                }
                info!("shutting down…");
            },
            Some(SHUTDOWN_TIMEOUT),
        )
        .await
}
