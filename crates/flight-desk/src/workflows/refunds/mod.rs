mod parser;

use crate::workflows::domain::{Notice, RetrievalError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub(crate) const REFUND_DATASET: &str = "refund dataset";

/// Refund outcome for a cancellation at a given distance from departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundTier {
    FullRefund,
    HalfRefund,
    NoRefund,
    Invalid,
}

impl RefundTier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::FullRefund,
            Self::HalfRefund,
            Self::NoRefund,
            Self::Invalid,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullRefund => "Full Refund",
            Self::HalfRefund => "50% Refund",
            Self::NoRefund => "No Refund",
            Self::Invalid => "Invalid",
        }
    }

    pub fn notice(self) -> Notice {
        match self {
            Self::FullRefund => {
                Notice::success(format!("You are eligible for a {}", self.label()))
            }
            Self::HalfRefund => {
                Notice::warning(format!("You are eligible for a {}", self.label()))
            }
            Self::NoRefund => Notice::error(format!(
                "Sorry, you're eligible for {}",
                self.label()
            )),
            Self::Invalid => Notice::info("Invalid input or data"),
        }
    }
}

/// Day thresholds separating the refund tiers.
///
/// Tiers are checked top-down: more than `full_refund_after_days` is a full
/// refund, `[half_refund_from_days, full_refund_after_days]` is half, and
/// anything non-negative below that earns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundPolicy {
    pub full_refund_after_days: f64,
    pub half_refund_from_days: f64,
}

impl RefundPolicy {
    pub const fn standard() -> Self {
        Self {
            full_refund_after_days: 3.0,
            half_refund_from_days: 1.0,
        }
    }

    pub fn evaluate(&self, days_left: f64) -> RefundTier {
        if days_left > self.full_refund_after_days {
            RefundTier::FullRefund
        } else if days_left >= self.half_refund_from_days
            && days_left <= self.full_refund_after_days
        {
            RefundTier::HalfRefund
        } else if (0.0..self.half_refund_from_days).contains(&days_left) {
            RefundTier::NoRefund
        } else {
            RefundTier::Invalid
        }
    }
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Maps days remaining before departure to a refund tier under the standard policy.
pub fn evaluate_refund(days_left: f64) -> RefundTier {
    RefundPolicy::standard().evaluate(days_left)
}

/// Single row of the refund dataset with its derived tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefundRecord {
    pub hours_left: f64,
    pub days_left: f64,
    pub tier: RefundTier,
}

impl RefundRecord {
    pub fn from_hours(hours_left: f64, policy: &RefundPolicy) -> Self {
        let days_left = hours_left / 24.0;
        Self {
            hours_left,
            days_left,
            tier: policy.evaluate(days_left),
        }
    }

    /// Derives the record from a scheduled departure as seen at `now`.
    pub fn from_departure(
        departure: NaiveDateTime,
        now: NaiveDateTime,
        policy: &RefundPolicy,
    ) -> Self {
        let millis = departure.signed_duration_since(now).num_milliseconds();
        Self::from_hours(millis as f64 / 3_600_000.0, policy)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierCountEntry {
    pub tier: RefundTier,
    pub tier_label: &'static str,
    pub count: usize,
}

/// Refund dataset loaded once at startup with tiers already derived.
#[derive(Debug, Clone, Default)]
pub struct RefundLedger {
    records: Vec<RefundRecord>,
}

impl RefundLedger {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        policy: &RefundPolicy,
    ) -> Result<Self, RetrievalError> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|err| RetrievalError::io(REFUND_DATASET, err))?;
        Self::from_reader(file, policy)
    }

    pub fn from_reader<R: Read>(reader: R, policy: &RefundPolicy) -> Result<Self, RetrievalError> {
        let records = parser::parse_hours(reader)
            .map_err(|err| RetrievalError::csv(REFUND_DATASET, err))?
            .into_iter()
            .map(|hours| RefundRecord::from_hours(hours, policy))
            .collect::<Vec<_>>();

        debug!(rows = records.len(), "refund dataset loaded");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[RefundRecord] {
        &self.records
    }

    pub fn breakdown(&self) -> Vec<TierCountEntry> {
        RefundTier::ordered()
            .into_iter()
            .map(|tier| TierCountEntry {
                tier,
                tier_label: tier.label(),
                count: self
                    .records
                    .iter()
                    .filter(|record| record.tier == tier)
                    .count(),
            })
            .collect()
    }
}
