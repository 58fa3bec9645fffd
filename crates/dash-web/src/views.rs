//! Template contexts and Plotly figure payloads
//!
//! Handlers hand the engine's page models to this module, which flattens
//! them into plain serializable contexts: pre-formatted strings for tables
//! and serialized figure JSON for the client-side charts. Indicator warm-up
//! NaNs become JSON nulls, which Plotly renders as gaps.

use dash_core::engine::{OverviewPage, Section, SentimentPage, TechnicalPage};
use dash_core::{ForecastResult, IndicatorSet, PriceBar};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
pub struct NewsItemView {
    pub title: String,
    pub description: String,
    pub published: String,
    pub url: String,
    pub source: String,
}

#[derive(Serialize)]
pub struct OverviewContext {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub horizon_years: u32,
    pub price_error: Option<String>,
    pub price_chart: Option<String>,
    pub forecast_error: Option<String>,
    pub forecast_chart: Option<String>,
    pub components_chart: Option<String>,
    pub fundamentals_error: Option<String>,
    pub fundamentals_rows: Vec<(String, String)>,
    pub news_error: Option<String>,
    pub news_items: Vec<NewsItemView>,
}

#[derive(Serialize)]
pub struct ScoredArticleView {
    pub title: String,
    pub description: String,
    pub url: String,
    pub label: String,
    pub polarity: String,
}

#[derive(Serialize)]
pub struct SentimentContext {
    pub ticker: String,
    pub error: Option<String>,
    pub no_valid_descriptions: bool,
    pub items: Vec<ScoredArticleView>,
    pub overall_label: Option<String>,
    pub average_polarity: Option<String>,
}

#[derive(Serialize)]
pub struct TechnicalContext {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub error: Option<String>,
    pub chart: Option<String>,
}

pub fn overview_context(page: &OverviewPage) -> OverviewContext {
    let (price_chart, price_error) = match &page.prices {
        Section::Ready(bars) => (
            Some(figure_json(candlestick_figure(&page.ticker, bars, &[]))),
            None,
        ),
        Section::Unavailable(msg) => (None, Some(msg.clone())),
    };

    let (forecast_chart, components_chart, forecast_error) = match &page.forecast {
        Section::Ready(result) => {
            let history = page.prices.value().map(Vec::as_slice).unwrap_or(&[]);
            (
                Some(figure_json(forecast_figure(&page.ticker, history, result))),
                Some(figure_json(components_figure(result))),
                None,
            )
        }
        Section::Unavailable(msg) => (None, None, Some(msg.clone())),
    };

    let (fundamentals_rows, fundamentals_error) = match &page.fundamentals {
        Section::Ready(table) => (table.rows.clone(), None),
        Section::Unavailable(msg) => (Vec::new(), Some(msg.clone())),
    };

    let (news_items, news_error) = match &page.news {
        Section::Ready(articles) => (articles.iter().map(news_item).collect(), None),
        Section::Unavailable(msg) => (Vec::new(), Some(msg.clone())),
    };

    OverviewContext {
        ticker: page.ticker.clone(),
        start: page.start.to_string(),
        end: page.end.to_string(),
        horizon_years: page.horizon_years,
        price_error,
        price_chart,
        forecast_error,
        forecast_chart,
        components_chart,
        fundamentals_error,
        fundamentals_rows,
        news_error,
        news_items,
    }
}

pub fn sentiment_context(page: &SentimentPage) -> SentimentContext {
    match &page.report {
        Section::Ready(report) => SentimentContext {
            ticker: page.ticker.clone(),
            error: None,
            no_valid_descriptions: report.is_empty(),
            items: report
                .scored
                .iter()
                .map(|s| ScoredArticleView {
                    title: display_or(&s.article.title, "No title available"),
                    description: s
                        .article
                        .description
                        .clone()
                        .unwrap_or_else(|| "No description available".to_string()),
                    url: display_or(&s.article.url, "#"),
                    label: s.label.to_string(),
                    polarity: format!("{:.2}", s.polarity),
                })
                .collect(),
            overall_label: report.overall.map(|l| l.to_string()),
            average_polarity: report.average_polarity.map(|p| format!("{p:.2}")),
        },
        Section::Unavailable(msg) => SentimentContext {
            ticker: page.ticker.clone(),
            error: Some(msg.clone()),
            no_valid_descriptions: false,
            items: Vec::new(),
            overall_label: None,
            average_polarity: None,
        },
    }
}

pub fn technical_context(page: &TechnicalPage) -> TechnicalContext {
    let (chart, error) = match (&page.prices, &page.indicators) {
        (Section::Ready(bars), Section::Ready(set)) => {
            let overlays = indicator_overlays(bars, set);
            (
                Some(figure_json(candlestick_figure(
                    &page.ticker,
                    bars,
                    &overlays,
                ))),
                None,
            )
        }
        (Section::Unavailable(msg), _) | (_, Section::Unavailable(msg)) => {
            (None, Some(msg.clone()))
        }
    };

    TechnicalContext {
        ticker: page.ticker.clone(),
        start: page.start.to_string(),
        end: page.end.to_string(),
        error,
        chart,
    }
}

fn news_item(article: &dash_core::NewsArticle) -> NewsItemView {
    NewsItemView {
        title: display_or(&article.title, "No title available"),
        description: article
            .description
            .clone()
            .unwrap_or_else(|| "No description available".to_string()),
        published: article
            .published_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "-".to_string()),
        url: display_or(&article.url, "#"),
        source: display_or(&article.source.name, "-"),
    }
}

fn display_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Warm-up NaNs become nulls so Plotly draws a gap instead of choking
fn nan_to_null(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| if v.is_finite() { Some(*v) } else { None })
        .collect()
}

fn figure_json(figure: Value) -> String {
    figure.to_string()
}

fn bar_dates(bars: &[PriceBar]) -> Vec<String> {
    bars.iter().map(|b| b.date.to_string()).collect()
}

fn candlestick_figure(ticker: &str, bars: &[PriceBar], overlays: &[Value]) -> Value {
    let mut data = vec![json!({
        "type": "candlestick",
        "name": "Candlestick",
        "x": bar_dates(bars),
        "open": bars.iter().map(|b| b.open).collect::<Vec<_>>(),
        "high": bars.iter().map(|b| b.high).collect::<Vec<_>>(),
        "low": bars.iter().map(|b| b.low).collect::<Vec<_>>(),
        "close": bars.iter().map(|b| b.close).collect::<Vec<_>>(),
    })];
    data.extend(overlays.iter().cloned());

    json!({
        "data": data,
        "layout": {
            "title": format!("{ticker} Stock Price"),
            "xaxis": {"title": "Date", "rangeslider": {"visible": false}},
            "yaxis": {"title": "Price"},
        }
    })
}

fn line_trace(name: &str, color: &str, x: &[String], y: Vec<Option<f64>>) -> Value {
    json!({
        "type": "scatter",
        "mode": "lines",
        "name": name,
        "line": {"color": color, "width": 1},
        "x": x,
        "y": y,
    })
}

fn indicator_overlays(bars: &[PriceBar], set: &IndicatorSet) -> Vec<Value> {
    let x = bar_dates(bars);
    vec![
        line_trace("SMA 20", "blue", &x, nan_to_null(&set.sma_20)),
        line_trace("SMA 50", "orange", &x, nan_to_null(&set.sma_50)),
        line_trace("EMA 20", "red", &x, nan_to_null(&set.ema_20)),
        line_trace("RSI", "purple", &x, nan_to_null(&set.rsi_14)),
        line_trace("MACD", "green", &x, nan_to_null(&set.macd)),
        line_trace("Signal", "magenta", &x, nan_to_null(&set.macd_signal)),
        line_trace("Upper Band", "grey", &x, nan_to_null(&set.bb_upper)),
        line_trace("Lower Band", "grey", &x, nan_to_null(&set.bb_lower)),
    ]
}

fn forecast_figure(ticker: &str, history: &[PriceBar], result: &ForecastResult) -> Value {
    let forecast_x: Vec<String> = result.points.iter().map(|p| p.date.to_string()).collect();
    let yhat: Vec<f64> = result.points.iter().map(|p| p.yhat).collect();

    json!({
        "data": [
            {
                "type": "scatter",
                "mode": "markers",
                "name": "Observed",
                "marker": {"color": "black", "size": 3},
                "x": bar_dates(history),
                "y": history.iter().map(|b| b.close).collect::<Vec<_>>(),
            },
            {
                "type": "scatter",
                "mode": "lines",
                "name": "Forecast",
                "line": {"color": "steelblue", "width": 2},
                "x": forecast_x,
                "y": yhat,
            }
        ],
        "layout": {
            "title": format!("{ticker} Forecast"),
            "xaxis": {"title": "Date"},
            "yaxis": {"title": "Price"},
        }
    })
}

fn components_figure(result: &ForecastResult) -> Value {
    let x: Vec<String> = result.points.iter().map(|p| p.date.to_string()).collect();
    json!({
        "data": [
            {
                "type": "scatter", "mode": "lines", "name": "Trend",
                "x": x,
                "y": result.points.iter().map(|p| p.trend).collect::<Vec<_>>(),
            },
            {
                "type": "scatter", "mode": "lines", "name": "Weekly",
                "x": x,
                "y": result.points.iter().map(|p| p.weekly).collect::<Vec<_>>(),
            },
            {
                "type": "scatter", "mode": "lines", "name": "Yearly",
                "x": x,
                "y": result.points.iter().map(|p| p.yearly).collect::<Vec<_>>(),
            }
        ],
        "layout": {
            "title": "Forecast Components",
            "xaxis": {"title": "Date"},
        }
    })
}
