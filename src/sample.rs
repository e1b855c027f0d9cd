//! Sample series ingestion.

use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prelude::*;

/// Upper bound on the number of pieces a submission is split into.
/// The last piece keeps the unsplit remainder.
pub const MAX_LINES: usize = 1_000_000;

pub type Series = Vec<Point>;

/// Coordinate pair.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Error)]
pub enum LineError {
    #[error("empty line")]
    EmptyLine,

    #[error("expected at least two comma-separated fields")]
    MalformedLine,

    #[error("invalid number `{text}`")]
    InvalidNumber {
        text: String,

        #[source]
        source: Option<ParseFloatError>,
    },
}

/// Parses a single `x,y[,ignored]` line.
///
/// The emptiness check runs on the untrimmed line, so a whitespace-only line
/// is reported as malformed rather than empty.
pub fn parse_line(line: &str) -> StdResult<Point, LineError> {
    if line.is_empty() {
        return Err(LineError::EmptyLine);
    }
    let mut fields = line.trim().splitn(3, ',');
    let (x, y) = match (fields.next(), fields.next()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(LineError::MalformedLine),
    };
    let x = parse_coordinate(x)?;
    let y = parse_coordinate(y)?;
    Ok(Point::new(x, y))
}

fn parse_coordinate(text: &str) -> StdResult<f64, LineError> {
    match f64::from_str(text) {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(LineError::InvalidNumber {
            text: text.to_string(),
            source: None,
        }),
        Err(error) => Err(LineError::InvalidNumber {
            text: text.to_string(),
            source: Some(error),
        }),
    }
}

/// Valid points of a submission along with the number of dropped lines.
#[derive(Debug, Default)]
pub struct Ingested {
    pub series: Series,
    pub n_skipped: usize,
}

/// Parses every line of the submission, silently dropping the bad ones.
pub fn ingest(raw: &str) -> Series {
    ingest_counted(raw).series
}

#[instrument(level = "debug", skip_all, fields(n_bytes = raw.len()))]
pub fn ingest_counted(raw: &str) -> Ingested {
    let mut ingested = Ingested::default();
    for (index, line) in raw.splitn(MAX_LINES, '\n').enumerate() {
        match parse_line(line) {
            Ok(point) => ingested.series.push(point),
            Err(error) => {
                trace!(line_number = index + 1, "skipped: {:#}", error);
                ingested.n_skipped += 1;
            }
        }
    }
    debug!(n_points = ingested.series.len(), ingested.n_skipped);
    ingested
}
