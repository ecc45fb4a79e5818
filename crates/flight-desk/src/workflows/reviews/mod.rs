//! Customer recommendation rates computed from the airline review dataset.

mod parser;

use crate::workflows::domain::{Notice, RetrievalError};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

pub(crate) const REVIEW_DATASET: &str = "review dataset";

/// Share of recommending customers at or above which an airline is a safe pick.
pub const RECOMMENDATION_THRESHOLD_PCT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub airline_name: String,
    pub recommended: String,
}

impl ReviewRecord {
    pub fn new(airline_name: impl Into<String>, recommended: impl Into<String>) -> Self {
        Self {
            airline_name: airline_name.into(),
            recommended: recommended.into(),
        }
    }

    pub fn is_recommended(&self) -> bool {
        self.recommended.eq_ignore_ascii_case("yes")
    }
}

/// Where review rows come from. Implementations are read in full on every call.
pub trait ReviewSource: Send + Sync {
    fn load(&self) -> Result<Vec<ReviewRecord>, RetrievalError>;
}

/// Review dataset stored as a CSV export with `AirLine_Name` and `Recommond` columns.
#[derive(Debug, Clone)]
pub struct CsvReviewSource {
    path: PathBuf,
}

impl CsvReviewSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ReviewRecord>, RetrievalError> {
        parser::parse_reviews(reader).map_err(|err| RetrievalError::csv(REVIEW_DATASET, err))
    }
}

impl ReviewSource for CsvReviewSource {
    fn load(&self) -> Result<Vec<ReviewRecord>, RetrievalError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|err| RetrievalError::io(REVIEW_DATASET, err))?;
        let records = Self::from_reader(file)?;
        debug!(rows = records.len(), path = %self.path.display(), "review dataset read");
        Ok(records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSignal {
    Positive,
    Cautionary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: &'static str,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSummary {
    pub airline: String,
    pub total: usize,
    pub recommended_count: usize,
    pub percent: f64,
}

impl RecommendationSummary {
    pub fn not_recommended_count(&self) -> usize {
        self.total - self.recommended_count
    }

    pub fn signal(&self) -> RecommendationSignal {
        if self.percent >= RECOMMENDATION_THRESHOLD_PCT {
            RecommendationSignal::Positive
        } else {
            RecommendationSignal::Cautionary
        }
    }

    pub fn notice(&self) -> Notice {
        match self.signal() {
            RecommendationSignal::Positive => Notice::success(format!(
                "{:.1}% of customers recommend {}. Good to go!",
                self.percent, self.airline
            )),
            RecommendationSignal::Cautionary => Notice::warning(format!(
                "Only {:.1}% of customers recommend {}. Consider choosing another airline.",
                self.percent, self.airline
            )),
        }
    }

    pub fn chart_title(&self) -> String {
        format!("Customer Recommendation Breakdown for {}", self.airline)
    }

    pub fn breakdown(&self) -> [PieSlice; 2] {
        let slice = |label, count: usize| PieSlice {
            label,
            count,
            percent: round_one_decimal(count as f64 / self.total as f64 * 100.0),
        };

        [
            slice("Recommended", self.recommended_count),
            slice("Not Recommended", self.not_recommended_count()),
        ]
    }
}

/// Aggregates reviews for one airline. `None` means the dataset has no rows for it.
pub fn summarize(reviews: &[ReviewRecord], airline: &str) -> Option<RecommendationSummary> {
    let matching: Vec<&ReviewRecord> = reviews
        .iter()
        .filter(|review| review.airline_name == airline)
        .collect();

    if matching.is_empty() {
        return None;
    }

    let total = matching.len();
    let recommended_count = matching
        .iter()
        .filter(|review| review.is_recommended())
        .count();

    Some(RecommendationSummary {
        airline: airline.to_string(),
        total,
        recommended_count,
        percent: round_one_decimal(recommended_count as f64 / total as f64 * 100.0),
    })
}

/// Reads the source afresh and summarizes it for `airline`.
pub fn recommendation_for<S: ReviewSource + ?Sized>(
    source: &S,
    airline: &str,
) -> Result<Option<RecommendationSummary>, RetrievalError> {
    let reviews = source.load()?;
    Ok(summarize(&reviews, airline))
}

pub fn empty_notice() -> Notice {
    Notice::info("No review data available for this airline.")
}

pub fn retrieval_notice(error: &RetrievalError) -> Notice {
    Notice::error(format!("Could not load review data: {error}"))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
