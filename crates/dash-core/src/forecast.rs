//! Additive trend + seasonality forecast for a closing-price series
//!
//! Classical additive decomposition: a least-squares linear trend over day
//! offsets, plus weekly (day-of-week) and yearly (month-of-year) seasonal
//! components averaged from the detrended residuals and centered around
//! zero. The fitted components extend the series forward by the requested
//! horizon and are exposed per point so the page can plot the
//! decomposition alongside the prediction.
//!
//! Seasonal components are gated on the observed span: weekly needs at
//! least two weeks of history, yearly at least two years. Below the gate
//! the component is zero rather than fitted from too little data.

use crate::error::{DashError, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Minimum observed span before the weekly component is fitted
const WEEKLY_SPAN_DAYS: i64 = 14;
/// Minimum observed span before the yearly component is fitted
const YEARLY_SPAN_DAYS: i64 = 730;

/// One predicted point with its additive decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Point prediction: trend + weekly + yearly
    pub yhat: f64,
    pub trend: f64,
    pub weekly: f64,
    pub yearly: f64,
}

/// Forecast over history plus the future horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub points: Vec<ForecastPoint>,
    /// Number of future points past the last observation
    pub horizon_days: u64,
}

/// Fitted additive model
#[derive(Debug, Clone)]
pub struct ForecastModel {
    origin: NaiveDate,
    intercept: f64,
    slope: f64,
    weekly: [f64; 7],
    yearly: [f64; 12],
    observed_dates: Vec<NaiveDate>,
}

impl ForecastModel {
    /// Fit the model to (date, close) observations sorted ascending
    ///
    /// Requires at least 2 observations and no non-finite values; anything
    /// less is reported as insufficient data and the model is never fitted.
    pub fn fit(observations: &[(NaiveDate, f64)]) -> Result<Self> {
        if observations.len() < 2 {
            return Err(DashError::InsufficientData(
                "Not enough data available to fit the model. \
                 Please choose a different date range or ticker."
                    .to_string(),
            ));
        }
        if observations.iter().any(|(_, y)| !y.is_finite()) {
            return Err(DashError::InsufficientData(
                "Price series contains missing closes".to_string(),
            ));
        }

        let origin = observations[0].0;
        let span_days = (observations[observations.len() - 1].0 - origin).num_days();

        // Least-squares linear trend over day offsets
        let n = observations.len() as f64;
        let ts: Vec<f64> = observations
            .iter()
            .map(|(d, _)| (*d - origin).num_days() as f64)
            .collect();
        let mean_t = ts.iter().sum::<f64>() / n;
        let mean_y = observations.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var = 0.0;
        for (t, (_, y)) in ts.iter().zip(observations.iter()) {
            cov += (t - mean_t) * (y - mean_y);
            var += (t - mean_t) * (t - mean_t);
        }
        // Degenerate spans (all observations on one day) fall back to a
        // flat trend at the mean.
        let slope = if var > 0.0 { cov / var } else { 0.0 };
        let intercept = mean_y - slope * mean_t;

        let residuals: Vec<f64> = ts
            .iter()
            .zip(observations.iter())
            .map(|(t, (_, y))| y - (intercept + slope * t))
            .collect();

        let weekly = if span_days >= WEEKLY_SPAN_DAYS {
            seasonal_component::<7>(observations, &residuals, |d| {
                d.weekday().num_days_from_monday() as usize
            })
        } else {
            [0.0; 7]
        };

        let yearly = if span_days >= YEARLY_SPAN_DAYS {
            let deweekly: Vec<f64> = residuals
                .iter()
                .zip(observations.iter())
                .map(|(r, (d, _))| r - weekly[d.weekday().num_days_from_monday() as usize])
                .collect();
            seasonal_component::<12>(observations, &deweekly, |d| d.month0() as usize)
        } else {
            [0.0; 12]
        };

        Ok(Self {
            origin,
            intercept,
            slope,
            weekly,
            yearly,
            observed_dates: observations.iter().map(|(d, _)| *d).collect(),
        })
    }

    /// Decomposed prediction for one date
    pub fn point(&self, date: NaiveDate) -> ForecastPoint {
        let t = (date - self.origin).num_days() as f64;
        let trend = self.intercept + self.slope * t;
        let weekly = self.weekly[date.weekday().num_days_from_monday() as usize];
        let yearly = self.yearly[date.month0() as usize];
        ForecastPoint {
            date,
            yhat: trend + weekly + yearly,
            trend,
            weekly,
            yearly,
        }
    }

    /// Predict over every observed date plus `horizon_days` daily steps
    /// past the last observation
    pub fn predict(&self, horizon_days: u64) -> ForecastResult {
        let mut points: Vec<ForecastPoint> =
            self.observed_dates.iter().map(|d| self.point(*d)).collect();

        if let Some(&last) = self.observed_dates.last() {
            let mut date = last;
            for _ in 0..horizon_days {
                date = date
                    .checked_add_days(Days::new(1))
                    .unwrap_or_else(|| NaiveDate::MAX);
                points.push(self.point(date));
            }
        }

        ForecastResult {
            points,
            horizon_days,
        }
    }
}

/// Fit and predict in one step; the horizon is `horizon_years * 365` days
pub fn forecast(observations: &[(NaiveDate, f64)], horizon_years: u32) -> Result<ForecastResult> {
    let model = ForecastModel::fit(observations)?;
    Ok(model.predict(u64::from(horizon_years) * 365))
}

/// Bucket-average a residual series by a calendar position and center the
/// buckets around zero. Empty buckets stay at zero.
fn seasonal_component<const N: usize>(
    observations: &[(NaiveDate, f64)],
    residuals: &[f64],
    bucket: impl Fn(&NaiveDate) -> usize,
) -> [f64; N] {
    let mut sums = [0.0; N];
    let mut counts = [0usize; N];
    for ((date, _), r) in observations.iter().zip(residuals.iter()) {
        let idx = bucket(date);
        sums[idx] += r;
        counts[idx] += 1;
    }

    let mut component = [0.0; N];
    for i in 0..N {
        if counts[i] > 0 {
            component[i] = sums[i] / counts[i] as f64;
        }
    }

    // Center so the seasonal component has zero mean over its cycle
    let filled = counts.iter().filter(|&&c| c > 0).count();
    if filled > 0 {
        let avg = component.iter().sum::<f64>() / filled as f64;
        for (c, n) in component.iter_mut().zip(counts.iter()) {
            if *n > 0 {
                *c -= avg;
            }
        }
    }
    component
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_series(start: NaiveDate, values: &[f64]) -> Vec<(NaiveDate, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let obs = vec![(date(2024, 1, 1), 100.0)];
        let result = ForecastModel::fit(&obs);
        assert!(matches!(result, Err(DashError::InsufficientData(_))));
    }

    #[test]
    fn test_missing_closes_are_insufficient() {
        let obs = vec![
            (date(2024, 1, 1), 100.0),
            (date(2024, 1, 2), f64::NAN),
            (date(2024, 1, 3), 102.0),
        ];
        assert!(matches!(
            ForecastModel::fit(&obs),
            Err(DashError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_linear_series_recovers_trend() {
        let values: Vec<f64> = (0..60).map(|i| 50.0 + 2.0 * i as f64).collect();
        let obs = daily_series(date(2023, 1, 2), &values);
        let model = ForecastModel::fit(&obs).unwrap();

        assert!((model.slope - 2.0).abs() < 1e-9);
        assert!((model.intercept - 50.0).abs() < 1e-9);

        // Exactly linear data leaves nothing for the seasonal buckets
        let result = model.predict(10);
        for p in &result.points {
            assert!(p.weekly.abs() < 1e-9);
            assert!((p.yhat - p.trend).abs() < 1e-9);
        }
    }

    #[test]
    fn test_horizon_extends_past_history() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let obs = daily_series(date(2024, 1, 1), &values);
        let result = forecast(&obs, 1).unwrap();

        assert_eq!(result.horizon_days, 365);
        assert_eq!(result.points.len(), 30 + 365);

        let last_observed = obs[obs.len() - 1].0;
        assert_eq!(result.points[29].date, last_observed);
        assert_eq!(
            result.points[30].date,
            last_observed + chrono::Duration::days(1)
        );
        assert_eq!(
            result.points.last().unwrap().date,
            last_observed + chrono::Duration::days(365)
        );
    }

    #[test]
    fn test_short_span_disables_weekly_component() {
        // 10 days of data: below the two-week gate
        let values = vec![100.0, 101.0, 99.0, 103.0, 98.0, 102.0, 100.5, 101.5, 99.5, 100.0];
        let obs = daily_series(date(2024, 3, 4), &values);
        let model = ForecastModel::fit(&obs).unwrap();
        assert!(model.weekly.iter().all(|w| *w == 0.0));
        assert!(model.yearly.iter().all(|y| *y == 0.0));
    }

    #[test]
    fn test_weekly_component_is_centered() {
        // Two months with a weekday-shaped wobble on top of a flat level
        let start = date(2024, 1, 1);
        let obs: Vec<(NaiveDate, f64)> = (0..56)
            .map(|i| {
                let d = start + chrono::Duration::days(i);
                let wobble = f64::from(d.weekday().num_days_from_monday()) - 3.0;
                (d, 100.0 + wobble)
            })
            .collect();
        let model = ForecastModel::fit(&obs).unwrap();

        let sum: f64 = model.weekly.iter().sum();
        assert!(sum.abs() < 1e-9);
        // The wobble shows up in the component, not the trend
        assert!(model.weekly.iter().any(|w| w.abs() > 0.5));
        assert!(model.slope.abs() < 0.05);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let values: Vec<f64> = (0..90).map(|i| 100.0 + (i as f64 * 0.5).sin() * 3.0).collect();
        let obs = daily_series(date(2023, 6, 1), &values);
        let a = forecast(&obs, 2).unwrap();
        let b = forecast(&obs, 2).unwrap();
        for (pa, pb) in a.points.iter().zip(b.points.iter()) {
            assert_eq!(pa.yhat, pb.yhat);
        }
    }
}
