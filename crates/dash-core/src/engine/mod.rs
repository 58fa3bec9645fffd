//! Dashboard engine: per-request orchestration and page view models

mod dashboard;
mod section;

pub use dashboard::{Dashboard, DashboardRequest};
pub use section::{
    FundamentalsTable, OverviewPage, Section, SentimentPage, TechnicalPage,
};
