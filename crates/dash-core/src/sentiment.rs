//! News-sentiment scoring over article descriptions
//!
//! Polarity comes from the VADER lexicon model (compound score in [-1, 1]).
//! Articles without a description are skipped entirely: they are neither
//! scored nor counted in the aggregate.

use crate::api::NewsArticle;
use serde::{Deserialize, Serialize};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Sentiment classification by polarity sign
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Sign rule shared by per-article labels and the aggregate:
    /// > 0 Positive, < 0 Negative, exactly 0 Neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Self::Positive
        } else if polarity < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Negative => write!(f, "Negative"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// One article with its sentiment score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub article: NewsArticle,
    pub label: SentimentLabel,
    /// Polarity in [-1, 1]
    pub polarity: f64,
}

/// Sentiment summary over a batch of articles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub scored: Vec<ScoredArticle>,
    /// Mean polarity over scored articles; `None` when nothing was scorable
    pub average_polarity: Option<f64>,
    /// Label of the mean polarity; `None` when nothing was scorable
    pub overall: Option<SentimentLabel>,
}

impl SentimentReport {
    /// Score every article that has a non-empty description
    pub fn analyze(articles: &[NewsArticle]) -> Self {
        let analyzer = SentimentIntensityAnalyzer::new();

        let scored: Vec<ScoredArticle> = articles
            .iter()
            .filter_map(|article| {
                let description = article.description.as_deref()?;
                if description.is_empty() {
                    return None;
                }
                let polarity = compound_score(&analyzer, description);
                Some(ScoredArticle {
                    article: article.clone(),
                    label: SentimentLabel::from_polarity(polarity),
                    polarity,
                })
            })
            .collect();

        let average_polarity = mean_polarity(&scored);
        let overall = average_polarity.map(SentimentLabel::from_polarity);

        Self {
            scored,
            average_polarity,
            overall,
        }
    }

    /// True when no article carried a scorable description
    pub fn is_empty(&self) -> bool {
        self.scored.is_empty()
    }
}

fn compound_score(analyzer: &SentimentIntensityAnalyzer, text: &str) -> f64 {
    let scores = analyzer.polarity_scores(text);
    scores.get("compound").copied().unwrap_or(0.0)
}

fn mean_polarity(scored: &[ScoredArticle]) -> Option<f64> {
    if scored.is_empty() {
        return None;
    }
    Some(scored.iter().map(|s| s.polarity).sum::<f64>() / scored.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(description: Option<&str>) -> NewsArticle {
        NewsArticle {
            title: "headline".to_string(),
            description: description.map(str::to_string),
            published_at: None,
            url: "https://example.com".to_string(),
            source: Default::default(),
        }
    }

    #[test]
    fn test_label_sign_rule() {
        assert_eq!(SentimentLabel::from_polarity(0.2), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(-0.7), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn test_aggregate_mean_and_label() {
        let scored: Vec<ScoredArticle> = [0.5, -0.5, 0.2]
            .iter()
            .map(|&p| ScoredArticle {
                article: article(Some("text")),
                label: SentimentLabel::from_polarity(p),
                polarity: p,
            })
            .collect();

        let mean = mean_polarity(&scored).unwrap();
        assert!((mean - 0.0667).abs() < 1e-3);
        assert_eq!(SentimentLabel::from_polarity(mean), SentimentLabel::Positive);
    }

    #[test]
    fn test_no_scorable_articles_has_no_aggregate() {
        let articles = vec![article(None), article(Some(""))];
        let report = SentimentReport::analyze(&articles);

        assert!(report.is_empty());
        assert!(report.average_polarity.is_none());
        assert!(report.overall.is_none());
    }

    #[test]
    fn test_descriptionless_articles_are_skipped() {
        let articles = vec![
            article(Some("Record profits and excellent growth, a fantastic quarter.")),
            article(None),
        ];
        let report = SentimentReport::analyze(&articles);

        assert_eq!(report.scored.len(), 1);
        assert_eq!(report.scored[0].label, SentimentLabel::Positive);
        assert!(report.scored[0].polarity > 0.0);
    }

    #[test]
    fn test_negative_text_scores_negative() {
        let articles = vec![article(Some(
            "Terrible losses, the company faces a horrible lawsuit and bankruptcy fears.",
        ))];
        let report = SentimentReport::analyze(&articles);

        assert_eq!(report.scored[0].label, SentimentLabel::Negative);
        assert!(report.average_polarity.unwrap() < 0.0);
        assert_eq!(report.overall, Some(SentimentLabel::Negative));
    }

    #[test]
    fn test_polarity_stays_in_range() {
        let articles = vec![
            article(Some("Best amazing wonderful superb great excellent!!!")),
            article(Some("Worst awful terrible horrible disaster!!!")),
        ];
        let report = SentimentReport::analyze(&articles);
        for s in &report.scored {
            assert!(s.polarity >= -1.0 && s.polarity <= 1.0);
        }
    }
}
