//! The plotting document: a sample series along with its regression line.

use serde::Serialize;
use thiserror::Error;

use crate::prelude::*;
use crate::regression::{regress, DegenerateSeries, RegressionLine, ResidualMode};
use crate::sample::{ingest_counted, Point, Series};

/// Response document. A degenerate series is encoded with `"regressionLine": null`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DataSample<'a> {
    pub series: &'a [Point],
    pub regression_line: Option<&'a RegressionLine>,
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("{0} is not representable in JSON")]
    NonFinite(f64),

    #[error("failed to serialize the data sample")]
    Json(#[from] serde_json::Error),
}

/// Processed submission.
#[derive(Debug)]
pub struct Analysis {
    pub series: Series,

    /// Number of lines dropped by the parser.
    pub n_skipped: usize,

    pub regression: StdResult<RegressionLine, DegenerateSeries>,
}

impl Analysis {
    #[instrument(level = "debug", skip_all)]
    pub fn new(raw: &str, mode: ResidualMode) -> Self {
        let ingested = ingest_counted(raw);
        let regression = regress(&ingested.series, mode);
        if let Err(reason) = &regression {
            debug!(n_points = ingested.series.len(), "degenerate series: {:#}", reason);
        }
        Self {
            series: ingested.series,
            n_skipped: ingested.n_skipped,
            regression,
        }
    }

    pub fn data_sample(&self) -> DataSample<'_> {
        DataSample {
            series: &self.series,
            regression_line: self.regression.as_ref().ok(),
        }
    }
}

/// Serializes the document, refusing to emit NaN or infinities which `serde_json` would
/// otherwise silently turn into `null`.
pub fn encode(sample: &DataSample) -> StdResult<Vec<u8>, EncodingError> {
    let points = sample.series.iter().flat_map(|point| [point.x, point.y]);
    let line = sample
        .regression_line
        .into_iter()
        .flat_map(|line| [line.slope, line.intercept, line.std_error, line.correlation]);
    if let Some(value) = points.chain(line).find(|value| !value.is_finite()) {
        return Err(EncodingError::NonFinite(value));
    }
    Ok(serde_json::to_vec(sample)?)
}
