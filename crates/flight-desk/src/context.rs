//! Artifacts and datasets loaded once at startup and shared read-only
//! between every dashboard action.

use crate::config::DataConfig;
use crate::workflows::domain::RetrievalError;
use crate::workflows::fares::{ArtifactError, FarePredictor, LinearFareModel};
use crate::workflows::meals::{CatalogError, MealCatalog};
use crate::workflows::refunds::{RefundLedger, RefundPolicy};
use crate::workflows::reviews::{CsvReviewSource, ReviewSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("fare artifact at {path}: {source}")]
    FareArtifact {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },
    #[error("sentiment artifact at {path} is unreadable: {source}")]
    SentimentArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    RefundDataset(#[from] RetrievalError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Secondary artifact shipped with the fare model. Only its presence is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentArtifact {
    path: PathBuf,
    size_bytes: u64,
}

impl SentimentArtifact {
    pub fn probe(path: &Path) -> Result<Self, std::io::Error> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        // Opening proves readability beyond the metadata check.
        std::fs::File::open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Immutable bundle behind every dashboard action.
#[derive(Clone)]
pub struct DeskContext {
    fare_model: Arc<dyn FarePredictor>,
    sentiment: Option<SentimentArtifact>,
    refund_policy: RefundPolicy,
    refund_ledger: RefundLedger,
    meal_catalog: MealCatalog,
    reviews: Arc<dyn ReviewSource>,
}

impl DeskContext {
    pub fn new(
        fare_model: Arc<dyn FarePredictor>,
        reviews: Arc<dyn ReviewSource>,
        meal_catalog: MealCatalog,
    ) -> Self {
        Self {
            fare_model,
            sentiment: None,
            refund_policy: RefundPolicy::standard(),
            refund_ledger: RefundLedger::default(),
            meal_catalog,
            reviews,
        }
    }

    pub fn with_refund_ledger(mut self, ledger: RefundLedger) -> Self {
        self.refund_ledger = ledger;
        self
    }

    /// Loads every configured artifact. Any failure aborts startup.
    pub fn load(config: &DataConfig) -> Result<Self, ContextError> {
        let fare_model = LinearFareModel::from_path(&config.fare_model).map_err(|source| {
            ContextError::FareArtifact {
                path: config.fare_model.clone(),
                source,
            }
        })?;
        info!(path = %config.fare_model.display(), "fare artifact loaded");

        let sentiment = config
            .sentiment_model
            .as_deref()
            .map(|path| {
                SentimentArtifact::probe(path).map_err(|source| ContextError::SentimentArtifact {
                    path: path.to_path_buf(),
                    source,
                })
            })
            .transpose()?;
        if let Some(artifact) = &sentiment {
            info!(
                path = %artifact.path().display(),
                bytes = artifact.size_bytes(),
                "sentiment artifact present"
            );
        }

        let refund_policy = RefundPolicy::standard();
        let refund_ledger = RefundLedger::from_path(&config.refund_csv, &refund_policy)?;
        info!(
            path = %config.refund_csv.display(),
            rows = refund_ledger.records().len(),
            "refund dataset loaded"
        );

        let meal_catalog = match &config.meal_catalog {
            Some(path) => MealCatalog::from_path(path)?,
            None => MealCatalog::standard()?,
        };

        Ok(Self {
            fare_model: Arc::new(fare_model),
            sentiment,
            refund_policy,
            refund_ledger,
            meal_catalog,
            reviews: Arc::new(CsvReviewSource::new(&config.review_csv)),
        })
    }

    pub fn fare_model(&self) -> &dyn FarePredictor {
        self.fare_model.as_ref()
    }

    pub fn sentiment(&self) -> Option<&SentimentArtifact> {
        self.sentiment.as_ref()
    }

    pub fn refund_policy(&self) -> &RefundPolicy {
        &self.refund_policy
    }

    pub fn refund_ledger(&self) -> &RefundLedger {
        &self.refund_ledger
    }

    pub fn meal_catalog(&self) -> &MealCatalog {
        &self.meal_catalog
    }

    pub fn reviews(&self) -> &dyn ReviewSource {
        self.reviews.as_ref()
    }
}

impl std::fmt::Debug for DeskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskContext")
            .field("sentiment", &self.sentiment)
            .field("refund_policy", &self.refund_policy)
            .field("refund_rows", &self.refund_ledger.records().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fare_artifact_names_the_path() {
        let config = DataConfig {
            fare_model: PathBuf::from("./missing/fare_model.json"),
            ..DataConfig::default()
        };
        let err = DeskContext::load(&config).expect_err("artifact is missing");
        assert!(matches!(err, ContextError::FareArtifact { .. }));
        assert!(err.to_string().contains("missing/fare_model.json"));
    }

    #[test]
    fn directories_are_not_sentiment_artifacts() {
        let err = SentimentArtifact::probe(Path::new(".")).expect_err("directory rejected");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
