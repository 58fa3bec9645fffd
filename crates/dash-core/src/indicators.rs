//! Technical indicators over a closing-price series
//!
//! All indicators are pure functions of the close series, which is assumed
//! sorted ascending by date with no duplicate dates. Outputs are aligned to
//! the input index; points inside an indicator's warm-up window are
//! `f64::NAN`, never an error. There is no I/O and no state here.

use serde::{Deserialize, Serialize};

/// Simple moving average
///
/// Arithmetic mean over a trailing window; NaN for the first `window - 1`
/// points.
pub fn sma(closes: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if window == 0 {
        return out;
    }
    let mut sum = 0.0;
    for (i, &close) in closes.iter().enumerate() {
        sum += close;
        if i >= window {
            sum -= closes[i - window];
        }
        if i + 1 >= window {
            out[i] = sum / window as f64;
        }
    }
    out
}

/// Exponential moving average
///
/// Adjust-free recursion seeded by the first observation:
/// EMA[0] = x[0], EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
/// with alpha = 2 / (span + 1).
pub fn ema(closes: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = f64::NAN;
    for (i, &close) in closes.iter().enumerate() {
        let value = if i == 0 {
            close
        } else {
            alpha * close + (1.0 - alpha) * prev
        };
        out.push(value);
        prev = value;
    }
    out
}

/// Relative Strength Index
///
/// Average gain and average loss are trailing simple means over `period`
/// signed one-step changes, with gains and losses separately zero-floored:
/// RSI = 100 - 100 / (1 + avg_gain / avg_loss).
///
/// When the average loss is zero the ratio is undefined; the convention
/// here is RSI = 100 (pure upward pressure). NaN during warm-up, i.e. the
/// first `period` points.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    // Zero-floored gains and losses per one-step change; index i holds the
    // change from i-1 to i.
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    for i in period..n {
        let start = i + 1 - period;
        let avg_gain: f64 = gains[start..=i].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[start..=i].iter().sum::<f64>() / period as f64;

        out[i] = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };
    }
    out
}

/// MACD line and signal line
///
/// MACD = EMA(fast) - EMA(slow); signal = EMA of the MACD series over
/// `signal_span`. Standard parameters are (12, 26, 9).
pub fn macd(
    closes: &[f64],
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
) -> (Vec<f64>, Vec<f64>) {
    let fast = ema(closes, fast_span);
    let slow = ema(closes, slow_span);
    let line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal_span);
    (line, signal)
}

/// Bollinger Bands
///
/// Upper = SMA + k * stddev, lower = SMA - k * stddev, with the standard
/// deviation taken over the same trailing window as the SMA (sample
/// variance, n - 1 denominator). NaN during the SMA warm-up.
pub fn bollinger(closes: &[f64], window: usize, k: f64) -> (Vec<f64>, Vec<f64>) {
    let middle = sma(closes, window);
    let std = rolling_std(closes, window);
    let upper = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m + k * s)
        .collect();
    let lower = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m - k * s)
        .collect();
    (upper, lower)
}

/// Trailing-window sample standard deviation, NaN for the first
/// `window - 1` points.
fn rolling_std(closes: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if window < 2 {
        return out;
    }
    for i in (window - 1)..closes.len() {
        let slice = &closes[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        out[i] = var.sqrt();
    }
    out
}

/// All indicator columns the technical-analysis page renders, aligned to
/// the price series index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_20: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub ema_20: Vec<f64>,
    pub rsi_14: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_lower: Vec<f64>,
}

impl IndicatorSet {
    /// Compute the full indicator set from a closing-price series
    pub fn compute(closes: &[f64]) -> Self {
        let (macd_line, macd_signal) = macd(closes, 12, 26, 9);
        let (bb_upper, bb_lower) = bollinger(closes, 20, 2.0);
        Self {
            sma_20: sma(closes, 20),
            sma_50: sma(closes, 50),
            ema_20: ema(closes, 20),
            rsi_14: rsi(closes, 14),
            macd: macd_line,
            macd_signal,
            bb_upper,
            bb_lower,
        }
    }
}
