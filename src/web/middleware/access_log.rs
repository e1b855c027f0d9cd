use chrono::Utc;
use poem::{Endpoint, Middleware, Request, Response, Result};

use crate::prelude::*;
use crate::web::access_log::{AccessLog, Entry};

/// Writes an access log entry per request, passes everything through when the log is disabled.
pub struct AccessLogMiddleware(Option<Arc<AccessLog>>);

impl AccessLogMiddleware {
    pub const fn new(log: Option<Arc<AccessLog>>) -> Self {
        Self(log)
    }
}

impl<E: Endpoint<Output = Response>> Middleware<E> for AccessLogMiddleware {
    type Output = AccessLogMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        AccessLogMiddlewareImpl {
            ep,
            log: self.0.clone(),
        }
    }
}

pub struct AccessLogMiddlewareImpl<E> {
    ep: E,
    log: Option<Arc<AccessLog>>,
}

#[poem::async_trait]
impl<E: Endpoint<Output = Response>> Endpoint for AccessLogMiddlewareImpl<E> {
    type Output = Response;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        let log = match &self.log {
            Some(log) => log,
            None => return self.ep.call(request).await,
        };
        let time = Utc::now();
        let remote = request.remote_addr().to_string();
        let method = request.method().clone();
        let uri = request.uri().clone();
        let start_instant = Instant::now();
        let response = self.ep.call(request).await?;
        let entry = Entry {
            time,
            remote,
            method,
            uri,
            status: response.status(),
            elapsed: start_instant.elapsed(),
        };
        if let Err(error) = log.write(&entry).await {
            error!("{:#}", error);
        }
        Ok(response)
    }
}
