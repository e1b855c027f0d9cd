//! Demo point resource.

use poem::web::{Data, Form};
use poem::{handler, IntoResponse};
use serde::Deserialize;

use crate::point::SharedPoint;
use crate::prelude::*;
use crate::sample::Point;

#[derive(Deserialize)]
pub struct SetPoint {
    #[serde(default)]
    x: String,

    #[serde(default)]
    y: String,
}

/// Unparseable and non-finite coordinates are set to zero.
fn parse_or_zero(value: &str) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or_default()
}

fn render(point: Point) -> String {
    format!("point is ({:.6},{:.6})\n", point.x, point.y)
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get(Data(point): Data<&SharedPoint>) -> impl IntoResponse {
    let point = point.increment_x().await;
    debug!(point.x, point.y);
    render(point)
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn post(Form(form): Form<SetPoint>, Data(point): Data<&SharedPoint>) -> impl IntoResponse {
    let point = point.set(parse_or_zero(&form.x), parse_or_zero(&form.y)).await;
    debug!(point.x, point.y);
    render(point)
}
