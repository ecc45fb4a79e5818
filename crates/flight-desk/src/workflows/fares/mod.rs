//! Fare prediction and trend sampling against the pretrained fare artifact.

mod model;

pub use model::{ArtifactError, LinearFareModel};

use crate::workflows::domain::{Airline, TravelClass, ValidationError};
use serde::Serialize;
use tracing::debug;

pub const MAX_DAYS_LEFT: u8 = 60;

/// Feature columns the fare artifact was trained on, in order.
pub const FEATURE_COLUMNS: [&str; 3] = ["airline", "class", "days_left"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FareQuery {
    airline: Airline,
    travel_class: TravelClass,
    days_left: u8,
}

impl FareQuery {
    pub fn new(
        airline: Airline,
        travel_class: TravelClass,
        days_left: i64,
    ) -> Result<Self, ValidationError> {
        if !(0..=i64::from(MAX_DAYS_LEFT)).contains(&days_left) {
            return Err(ValidationError::DaysLeftOutOfRange {
                min: 0,
                max: MAX_DAYS_LEFT,
                found: days_left,
            });
        }

        Ok(Self {
            airline,
            travel_class,
            days_left: days_left as u8,
        })
    }

    pub fn airline(&self) -> Airline {
        self.airline
    }

    pub fn travel_class(&self) -> TravelClass {
        self.travel_class
    }

    pub fn days_left(&self) -> u8 {
        self.days_left
    }
}

/// Column-oriented batch handed to the artifact, one row per query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FareFrame {
    airline: Vec<Airline>,
    class: Vec<TravelClass>,
    days_left: Vec<u8>,
}

impl FareFrame {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            airline: Vec::with_capacity(rows),
            class: Vec::with_capacity(rows),
            days_left: Vec::with_capacity(rows),
        }
    }

    pub fn push(&mut self, query: &FareQuery) {
        self.airline.push(query.airline);
        self.class.push(query.travel_class);
        self.days_left.push(query.days_left);
    }

    pub fn columns(&self) -> [&'static str; 3] {
        FEATURE_COLUMNS
    }

    pub fn len(&self) -> usize {
        self.days_left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days_left.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (Airline, TravelClass, u8)> + '_ {
        self.airline
            .iter()
            .zip(&self.class)
            .zip(&self.days_left)
            .map(|((airline, class), days)| (*airline, *class, *days))
    }
}

impl<'a> FromIterator<&'a FareQuery> for FareFrame {
    fn from_iter<I: IntoIterator<Item = &'a FareQuery>>(iter: I) -> Self {
        let mut frame = FareFrame::default();
        for query in iter {
            frame.push(query);
        }
        frame
    }
}

/// Prediction interface of a loaded fare artifact: one price per frame row, same order.
pub trait FarePredictor: Send + Sync {
    fn predict(&self, frame: &FareFrame) -> Result<Vec<f64>, PredictionError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("fare artifact returned {actual} prediction(s) for {expected} row(s)")]
    CountMismatch { expected: usize, actual: usize },
    #[error("fare artifact has no coefficient for {column} '{value}'")]
    UnknownCategory { column: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareTrendPoint {
    pub days_left: u8,
    pub predicted_price: f64,
}

pub fn predict_fare<P: FarePredictor + ?Sized>(
    predictor: &P,
    query: &FareQuery,
) -> Result<f64, PredictionError> {
    let frame: FareFrame = std::iter::once(query).collect();
    let prices = predictor.predict(&frame)?;

    match prices.as_slice() {
        [price] => {
            debug!(
                airline = %query.airline,
                class = %query.travel_class,
                days_left = query.days_left,
                price,
                "fare predicted"
            );
            Ok(*price)
        }
        _ => Err(PredictionError::CountMismatch {
            expected: 1,
            actual: prices.len(),
        }),
    }
}

/// Predicts the fare for every day from 0 to 60 in a single artifact call.
pub fn sample_trend<P: FarePredictor + ?Sized>(
    predictor: &P,
    airline: Airline,
    travel_class: TravelClass,
) -> Result<Vec<FareTrendPoint>, PredictionError> {
    let mut frame = FareFrame::with_capacity(usize::from(MAX_DAYS_LEFT) + 1);
    for days_left in 0..=MAX_DAYS_LEFT {
        frame.push(&FareQuery {
            airline,
            travel_class,
            days_left,
        });
    }

    let prices = predictor.predict(&frame)?;
    if prices.len() != frame.len() {
        return Err(PredictionError::CountMismatch {
            expected: frame.len(),
            actual: prices.len(),
        });
    }

    Ok(frame
        .rows()
        .zip(prices)
        .map(|((_, _, days_left), predicted_price)| FareTrendPoint {
            days_left,
            predicted_price,
        })
        .collect())
}

pub fn trend_title(airline: Airline, travel_class: TravelClass) -> String {
    format!("Predicted Price Trend for {airline} ({travel_class})")
}
