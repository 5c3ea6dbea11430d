//! Heuristic detectors.
//!
//! Every detector is a pure function of the dataset: it reads the shared
//! [`TransactionDataset`] and derives whatever per-row values it needs (day
//! gaps, day-of-month, month) locally, so no detector can observe another's
//! intermediate state.

pub mod cash;
pub mod counterparty;
pub mod description;
pub mod end_of_period;
pub mod frequency;
pub mod layering;
pub mod round_number;
pub mod threshold;

use crate::error::Result;
use crate::types::{Alert, Clock, RiskLevel, TransactionDataset};
use std::sync::Arc;

pub use cash::CashIntensityDetector;
pub use counterparty::CounterpartyConcentrationDetector;
pub use description::SuspiciousDescriptionDetector;
pub use end_of_period::EndOfPeriodDetector;
pub use frequency::FrequencyBurstDetector;
pub use layering::LayeringDetector;
pub use round_number::RoundNumberDetector;
pub use threshold::ThresholdAvoidanceDetector;

/// Everything a detector sees for one analysis run
pub struct DetectionContext<'a> {
    pub dataset: &'a TransactionDataset,
    pub account_id: &'a str,
    pub clock: &'a dyn Clock,
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        dataset: &'a TransactionDataset,
        account_id: &'a str,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            dataset,
            account_id,
            clock,
        }
    }

    /// Start an alert for this account, stamped with the context clock
    pub fn alert(
        &self,
        alert_type: &str,
        risk_level: RiskLevel,
        confidence_score: f64,
        description: impl Into<String>,
    ) -> Alert {
        Alert::new(
            self.account_id,
            alert_type,
            risk_level,
            confidence_score,
            description,
            self.clock.now(),
        )
    }
}

/// Common interface for the independent analyses
pub trait Detector: Send + Sync {
    /// Stable identifier used in logs and metrics
    fn name(&self) -> &'static str;

    /// Inspect the dataset and return zero or more alerts.
    ///
    /// A missing column is not an error: return an empty list.
    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>>;
}

/// The detector battery in its fixed execution order.
///
/// The order is also the tie-break order used when alerts are prioritized,
/// so it must not change.
pub fn default_detectors() -> Vec<Arc<dyn Detector>> {
    vec![
        Arc::new(RoundNumberDetector),
        Arc::new(SuspiciousDescriptionDetector),
        Arc::new(FrequencyBurstDetector),
        Arc::new(ThresholdAvoidanceDetector),
        Arc::new(EndOfPeriodDetector),
        Arc::new(CounterpartyConcentrationDetector),
        Arc::new(CashIntensityDetector),
        Arc::new(LayeringDetector),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detector_order() {
        let names: Vec<&str> = default_detectors().iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                "round_number",
                "suspicious_description",
                "frequency_burst",
                "threshold_avoidance",
                "end_of_period",
                "counterparty_concentration",
                "cash_intensity",
                "layering",
            ]
        );
    }

    #[test]
    fn test_every_detector_handles_empty_dataset() {
        let empty = TransactionDataset::empty();
        for detector in default_detectors() {
            assert!(
                fixtures::run(detector.as_ref(), &empty).is_empty(),
                "{} fired on an empty dataset",
                detector.name()
            );
        }
    }
}
