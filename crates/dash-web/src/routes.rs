//! HTTP routes for the three dashboard pages

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::{NaiveDate, Utc};
use dash_core::engine::DashboardRequest;
use dash_core::Dashboard;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::views;

/// Shared application state: the engine plus the compiled templates
pub struct AppState {
    pub dashboard: Dashboard,
    pub templates: Environment<'static>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Result<Self, minijinja::Error> {
        let mut templates = Environment::new();
        templates.add_template("base.html", include_str!("../templates/base.html"))?;
        templates.add_template("overview.html", include_str!("../templates/overview.html"))?;
        templates.add_template(
            "sentiment.html",
            include_str!("../templates/sentiment.html"),
        )?;
        templates.add_template(
            "technical.html",
            include_str!("../templates/technical.html"),
        )?;
        Ok(Self {
            dashboard,
            templates,
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/sentiment", get(sentiment))
        .route("/technical", get(technical))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Raw query parameters; anything unparseable falls back to the page
/// defaults rather than rejecting the request
#[derive(Debug, Deserialize)]
struct PageQuery {
    ticker: Option<String>,
    start: Option<String>,
    end: Option<String>,
    horizon: Option<u32>,
}

fn parse_date(raw: Option<&String>, default: NaiveDate) -> NaiveDate {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(default)
}

fn default_date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

async fn overview(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let request = DashboardRequest::new(
        query.ticker.as_deref().unwrap_or("DOW"),
        parse_date(query.start.as_ref(), default_date(2000)),
        parse_date(query.end.as_ref(), Utc::now().date_naive()),
        query.horizon.unwrap_or(1),
    );

    let page = state.dashboard.overview(&request).await;
    render(&state, "overview.html", &views::overview_context(&page))
}

async fn sentiment(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let ticker = query.ticker.unwrap_or_else(|| "DOW".to_string());
    let page = state.dashboard.sentiment(&ticker).await;
    render(&state, "sentiment.html", &views::sentiment_context(&page))
}

async fn technical(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let request = DashboardRequest::new(
        query.ticker.as_deref().unwrap_or("AAPL"),
        parse_date(query.start.as_ref(), default_date(2020)),
        parse_date(query.end.as_ref(), Utc::now().date_naive()),
        1,
    );

    let page = state.dashboard.technical(&request).await;
    render(&state, "technical.html", &views::technical_context(&page))
}

fn render<S: Serialize>(state: &AppState, name: &str, context: &S) -> Response {
    let result = state
        .templates
        .get_template(name)
        .and_then(|t| t.render(context));

    match result {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            error!(template = name, error = %err, "Template rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render the page.",
            )
                .into_response()
        }
    }
}
