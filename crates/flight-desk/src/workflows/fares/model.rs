use super::{FareFrame, FarePredictor, PredictionError, FEATURE_COLUMNS};
use crate::workflows::domain::{Airline, TravelClass};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read fare artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("fare artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fare artifact expects features {found:?}, expected airline, class, days_left")]
    IncompatibleFeatures { found: Vec<String> },
    #[error("fare artifact has no {column} coefficient for '{value}'")]
    MissingCategory { column: &'static str, value: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DaysLeftTerms {
    pub linear: f64,
    #[serde(default)]
    pub quadratic: f64,
}

/// Serialized regression over one-hot airline/class offsets and a quadratic
/// days-left curve. Negative outputs are clamped to zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearFareModel {
    features: Vec<String>,
    intercept: f64,
    airline: BTreeMap<Airline, f64>,
    class: BTreeMap<TravelClass, f64>,
    days_left: DaysLeftTerms,
}

impl LinearFareModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.features.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
            return Err(ArtifactError::IncompatibleFeatures {
                found: self.features.clone(),
            });
        }

        if let Some(missing) = Airline::ordered()
            .into_iter()
            .find(|airline| !self.airline.contains_key(airline))
        {
            return Err(ArtifactError::MissingCategory {
                column: "airline",
                value: missing.label(),
            });
        }

        if let Some(missing) = [TravelClass::Economy, TravelClass::Business]
            .into_iter()
            .find(|class| !self.class.contains_key(class))
        {
            return Err(ArtifactError::MissingCategory {
                column: "class",
                value: missing.label(),
            });
        }

        Ok(())
    }

    fn predict_row(
        &self,
        airline: Airline,
        class: TravelClass,
        days_left: u8,
    ) -> Result<f64, PredictionError> {
        let airline_offset =
            self.airline
                .get(&airline)
                .copied()
                .ok_or_else(|| PredictionError::UnknownCategory {
                    column: "airline",
                    value: airline.label().to_string(),
                })?;
        let class_offset =
            self.class
                .get(&class)
                .copied()
                .ok_or_else(|| PredictionError::UnknownCategory {
                    column: "class",
                    value: class.label().to_string(),
                })?;

        let days = f64::from(days_left);
        let price = self.intercept
            + airline_offset
            + class_offset
            + self.days_left.linear * days
            + self.days_left.quadratic * days * days;

        Ok(price.max(0.0))
    }
}

impl FarePredictor for LinearFareModel {
    fn predict(&self, frame: &FareFrame) -> Result<Vec<f64>, PredictionError> {
        frame
            .rows()
            .map(|(airline, class, days_left)| self.predict_row(airline, class, days_left))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::fares::{predict_fare, FareQuery};
    use std::io::Cursor;

    const ARTIFACT: &str = r#"{
        "features": ["airline", "class", "days_left"],
        "intercept": 10000.0,
        "airline": {"Indigo": 0.0, "SpiceJet": 100.0, "AirAsia": -500.0,
                    "GO_FIRST": 50.0, "Vistara": 2000.0, "Air_India": 1500.0},
        "class": {"Economy": 0.0, "Business": 40000.0},
        "days_left": {"linear": -200.0, "quadratic": 2.0}
    }"#;

    #[test]
    fn loads_and_predicts_from_coefficients() {
        let model = LinearFareModel::from_reader(Cursor::new(ARTIFACT)).expect("artifact loads");
        let query = FareQuery::new(Airline::Vistara, TravelClass::Business, 10).expect("valid");
        let price = predict_fare(&model, &query).expect("prediction");
        assert_eq!(price, 10000.0 + 2000.0 + 40000.0 - 2000.0 + 200.0);
    }

    #[test]
    fn predictions_never_go_negative() {
        let artifact = ARTIFACT.replace("\"intercept\": 10000.0", "\"intercept\": -99999.0");
        let model = LinearFareModel::from_reader(Cursor::new(artifact)).expect("artifact loads");
        let query = FareQuery::new(Airline::AirAsia, TravelClass::Economy, 0).expect("valid");
        assert_eq!(predict_fare(&model, &query), Ok(0.0));
    }

    #[test]
    fn rejects_reordered_features() {
        let artifact = ARTIFACT.replace(
            r#"["airline", "class", "days_left"]"#,
            r#"["class", "airline", "days_left"]"#,
        );
        let error = LinearFareModel::from_reader(Cursor::new(artifact)).expect_err("incompatible");
        assert!(matches!(error, ArtifactError::IncompatibleFeatures { .. }));
    }

    #[test]
    fn rejects_route_features() {
        let artifact = ARTIFACT.replace(
            r#"["airline", "class", "days_left"]"#,
            r#"["airline", "class", "days_left", "source_city"]"#,
        );
        assert!(matches!(
            LinearFareModel::from_reader(Cursor::new(artifact)),
            Err(ArtifactError::IncompatibleFeatures { .. })
        ));
    }

    #[test]
    fn rejects_missing_airline_coefficient() {
        let artifact = ARTIFACT.replace("\"GO_FIRST\": 50.0,", "");
        match LinearFareModel::from_reader(Cursor::new(artifact)) {
            Err(ArtifactError::MissingCategory { column, value }) => {
                assert_eq!(column, "airline");
                assert_eq!(value, "GO_FIRST");
            }
            other => panic!("expected missing category, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            LinearFareModel::from_path("./no-such-model.json"),
            Err(ArtifactError::Io(_))
        ));
    }
}
