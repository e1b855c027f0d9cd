//! Sample series submission and the plotting page.

use maud::{html, DOCTYPE};
use poem::web::{Data, Form, Html};
use poem::{handler, IntoResponse, Response};
use serde::Deserialize;

use crate::data_sample::{encode, Analysis};
use crate::prelude::*;
use crate::regression::ResidualMode;

pub const SKIPPED_LINES_HEADER: &str = "X-Skipped-Lines";
pub const REGRESSION_ERROR_HEADER: &str = "X-Regression-Error";

#[derive(Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub dataseries: String,
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get() -> impl IntoResponse {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Linear regression" }
                script src="/goplot/graph.js" defer {}
            }
            body {
                form #submission method="POST" action="/goplot/viz" {
                    p {
                        label for="dataseries" { "One " code { "x,y" } " pair per line:" }
                    }
                    p {
                        textarea #dataseries name="dataseries" rows="16" cols="32" placeholder="1,1\n2,2\n3,3" {}
                    }
                    p {
                        button type="submit" { "Plot" }
                    }
                }
                canvas #plot width="640" height="480" {}
                pre #statistics {}
            }
        }
    };
    Html(markup.into_string())
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn post(
    Form(submission): Form<Submission>,
    Data(mode): Data<&ResidualMode>,
) -> Result<Response> {
    let start_instant = Instant::now();
    let analysis = Analysis::new(&submission.dataseries, *mode);
    let body = encode(&analysis.data_sample())?;

    let mut response = Response::builder()
        .content_type("application/json")
        .header(SKIPPED_LINES_HEADER, analysis.n_skipped);
    if let Err(reason) = &analysis.regression {
        response = response.header(REGRESSION_ERROR_HEADER, reason.to_string());
    }
    info!(
        n_points = analysis.series.len(),
        analysis.n_skipped,
        degenerate = analysis.regression.is_err(),
        elapsed = ?start_instant.elapsed(),
    );
    Ok(response.body(body))
}
