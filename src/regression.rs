//! Ordinary least squares fit over a sample series.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prelude::*;
use crate::sample::Point;

/// Standard error has `n - 2` degrees of freedom.
pub const MIN_POINTS: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    pub std_error: f64,
    pub correlation: f64,
}

impl RegressionLine {
    fn ensure_finite(self) -> StdResult<Self, DegenerateSeries> {
        for (statistic, value) in [
            ("slope", self.slope),
            ("intercept", self.intercept),
            ("stdError", self.std_error),
            ("correlation", self.correlation),
        ] {
            if !value.is_finite() {
                return Err(DegenerateSeries::UndefinedStatistic { statistic });
            }
        }
        Ok(self)
    }
}

/// How the fitted value is computed for the residual sum of squares.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum ResidualMode {
    /// `slope * x - intercept`, kept for numeric compatibility with existing clients.
    #[default]
    Inherited,

    /// `slope * x + intercept`.
    Conventional,
}

impl ResidualMode {
    #[must_use]
    pub fn fitted(self, slope: f64, intercept: f64, x: f64) -> f64 {
        match self {
            Self::Inherited => slope * x - intercept,
            Self::Conventional => slope * x + intercept,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DegenerateSeries {
    #[error("at least {min} points are needed, got {n}", min = MIN_POINTS)]
    TooFewPoints { n: usize },

    #[error("all x values are identical")]
    ConstantX,

    #[error("all y values are identical")]
    ConstantY,

    #[error("{statistic} is undefined")]
    UndefinedStatistic { statistic: &'static str },
}

#[derive(Default)]
struct Sums {
    x: f64,
    y: f64,
    xy: f64,
    x2: f64,
}

impl Sums {
    fn new(series: &[Point]) -> Self {
        series.iter().fold(Self::default(), |sums, point| Self {
            x: sums.x + point.x,
            y: sums.y + point.y,
            xy: sums.xy + point.x * point.y,
            x2: sums.x2 + point.x * point.x,
        })
    }
}

/// Fits `y = slope * x + intercept`.
///
/// Never returns NaN or infinite statistics: such cases are reported as [`DegenerateSeries`].
#[instrument(level = "debug", skip_all, fields(n = series.len(), mode = ?mode))]
pub fn regress(series: &[Point], mode: ResidualMode) -> StdResult<RegressionLine, DegenerateSeries> {
    if series.len() < MIN_POINTS {
        return Err(DegenerateSeries::TooFewPoints { n: series.len() });
    }
    // Sums of identical values are not exact, so these are checked on the points.
    if series.iter().all(|point| point.x == series[0].x) {
        return Err(DegenerateSeries::ConstantX);
    }
    if series.iter().all(|point| point.y == series[0].y) {
        return Err(DegenerateSeries::ConstantY);
    }

    let n = series.len() as f64;
    let sums = Sums::new(series);

    let denominator = n * sums.x2 - sums.x * sums.x;
    if denominator == 0.0 {
        return Err(DegenerateSeries::ConstantX);
    }
    let slope = (n * sums.xy - sums.x * sums.y) / denominator;
    let x_mean = sums.x / n;
    let y_mean = sums.y / n;
    let intercept = y_mean - slope * x_mean;

    let (total, residual) = series.iter().fold((0.0, 0.0), |(total, residual), point| {
        let deviation = point.y - y_mean;
        let error = point.y - mode.fitted(slope, intercept, point.x);
        (total + deviation * deviation, residual + error * error)
    });
    if total == 0.0 {
        return Err(DegenerateSeries::ConstantY);
    }

    let line = RegressionLine {
        slope,
        intercept,
        std_error: (residual / (n - 2.0)).sqrt(),
        correlation: ((total - residual) / total).sqrt(),
    }
    .ensure_finite()?;
    debug!(line.slope, line.intercept, line.std_error, line.correlation);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coordinates: &[(f64, f64)]) -> Vec<Point> {
        coordinates.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn perfect_fit_ok() -> crate::Result {
        let series = points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        for mode in [ResidualMode::Inherited, ResidualMode::Conventional] {
            let line = regress(&series, mode)?;
            assert_eq!(line.slope, 2.0);
            assert_eq!(line.intercept, 0.0);
            assert_eq!(line.std_error, 0.0);
            assert_eq!(line.correlation, 1.0);
        }
        Ok(())
    }

    #[test]
    fn noisy_fit_conventional_ok() -> crate::Result {
        let series = points(&[(1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 4.0)]);
        let line = regress(&series, ResidualMode::Conventional)?;
        assert!((line.slope - 0.8).abs() < 1e-12);
        assert!((line.intercept - 0.5).abs() < 1e-12);
        // Sr = 1.8, St = 5.0
        assert!((line.std_error - 0.9_f64.sqrt()).abs() < 1e-12);
        assert!((line.correlation - 0.64_f64.sqrt()).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn inherited_residuals_ok() -> crate::Result {
        // Inherited fitted values are offset by twice the intercept.
        let series = points(&[(0.0, 0.0), (1.0, 1.3), (2.0, 2.0), (3.0, 3.3), (4.0, 4.0)]);
        let inherited = regress(&series, ResidualMode::Inherited)?;
        let conventional = regress(&series, ResidualMode::Conventional)?;
        assert_eq!(inherited.slope, conventional.slope);
        assert_eq!(inherited.intercept, conventional.intercept);
        assert!(inherited.std_error > conventional.std_error);
        assert!(inherited.correlation < conventional.correlation);

        let residual: f64 = series
            .iter()
            .map(|point| point.y - (inherited.slope * point.x - inherited.intercept))
            .map(|error| error * error)
            .sum();
        assert!((inherited.std_error - (residual / 3.0).sqrt()).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn inherited_negative_radicand_is_degenerate() {
        let series = points(&[(1.0, 11.0), (2.0, 12.0), (3.0, 13.0)]);
        assert_eq!(
            regress(&series, ResidualMode::Inherited),
            Err(DegenerateSeries::UndefinedStatistic { statistic: "correlation" }),
        );
        assert!(regress(&series, ResidualMode::Conventional).is_ok());
    }

    #[test]
    fn empty_series_is_degenerate() {
        assert_eq!(
            regress(&[], ResidualMode::default()),
            Err(DegenerateSeries::TooFewPoints { n: 0 }),
        );
    }

    #[test]
    fn single_point_is_degenerate() {
        assert_eq!(
            regress(&points(&[(1.0, 1.0)]), ResidualMode::default()),
            Err(DegenerateSeries::TooFewPoints { n: 1 }),
        );
    }

    #[test]
    fn two_points_are_degenerate() {
        assert_eq!(
            regress(&points(&[(1.0, 1.0), (2.0, 2.0)]), ResidualMode::default()),
            Err(DegenerateSeries::TooFewPoints { n: 2 }),
        );
    }

    #[test]
    fn constant_x_is_degenerate() {
        let series = points(&[(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        assert_eq!(regress(&series, ResidualMode::default()), Err(DegenerateSeries::ConstantX));
    }

    #[test]
    fn constant_y_is_degenerate() {
        let series = points(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)]);
        assert_eq!(regress(&series, ResidualMode::default()), Err(DegenerateSeries::ConstantY));
    }

    #[test]
    fn inexact_constant_x_is_degenerate() {
        let series = points(&[(0.7, 1.0), (0.7, 2.5), (0.7, 3.8), (0.7, 5.0), (0.7, 6.7)]);
        for mode in [ResidualMode::Inherited, ResidualMode::Conventional] {
            assert_eq!(regress(&series, mode), Err(DegenerateSeries::ConstantX));
        }
    }

    #[test]
    fn inexact_constant_y_is_degenerate() {
        for n in [3, 7] {
            let series: Vec<_> = (0..n).map(|i| Point::new(i as f64, 0.1)).collect();
            for mode in [ResidualMode::Inherited, ResidualMode::Conventional] {
                assert_eq!(regress(&series, mode), Err(DegenerateSeries::ConstantY), "n = {}", n);
            }
        }
    }

    #[test]
    fn overflow_is_degenerate() {
        let series = points(&[(1e200, 1.0), (2e200, 2.0), (3e200, 4.0)]);
        assert!(matches!(
            regress(&series, ResidualMode::Conventional),
            Err(DegenerateSeries::UndefinedStatistic { .. } | DegenerateSeries::ConstantX),
        ));
    }

    #[test]
    fn order_independent_ok() -> crate::Result {
        let forward = points(&[(1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 4.0)]);
        let mut backward = forward.clone();
        backward.reverse();
        let lhs = regress(&forward, ResidualMode::Conventional)?;
        let rhs = regress(&backward, ResidualMode::Conventional)?;
        assert!((lhs.slope - rhs.slope).abs() < 1e-12);
        assert!((lhs.intercept - rhs.intercept).abs() < 1e-12);
        Ok(())
    }
}
