//! Process-wide introspection variables.

use poem::web::{Data, Json};
use poem::{handler, IntoResponse};
use serde::Serialize;

use crate::point::SharedPoint;
use crate::prelude::*;
use crate::sample::Point;

#[derive(Serialize)]
struct Vars {
    cmdline: Vec<String>,
    point: Point,
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get(Data(point): Data<&SharedPoint>) -> impl IntoResponse {
    Json(Vars {
        cmdline: std::env::args().collect(),
        point: point.get().await,
    })
    .with_header("Cache-Control", "no-cache")
}
