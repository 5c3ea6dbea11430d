//! Structuring below reporting thresholds.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::format::currency;
use crate::types::{Alert, Column, RiskLevel};

/// Reporting thresholds, checked in this order.
pub const REPORTING_THRESHOLDS: [f64; 4] = [10_000.0, 5_000.0, 3_000.0, 1_000.0];

/// Lower edge of the watched band as a fraction of the threshold.
const BAND_FLOOR: f64 = 0.9;
const MIN_BAND_COUNT: usize = 3;
const HIGH_RISK_THRESHOLD: f64 = 10_000.0;

/// Flags repeated amounts just under a reporting threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdAvoidanceDetector;

impl Detector for ThresholdAvoidanceDetector {
    fn name(&self) -> &'static str {
        "threshold_avoidance"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        if !ctx.dataset.has_column(Column::Amount) {
            return Ok(Vec::new());
        }

        let mut alerts = Vec::new();
        for threshold in REPORTING_THRESHOLDS {
            let lower = threshold * BAND_FLOOR;
            let band: Vec<f64> = ctx
                .dataset
                .transactions()
                .iter()
                .map(|tx| tx.amount)
                .filter(|&amount| amount >= lower && amount < threshold)
                .collect();

            if band.len() <= MIN_BAND_COUNT {
                continue;
            }

            let sum: f64 = band.iter().sum();
            let mean = sum / band.len() as f64;
            let risk_level = if threshold >= HIGH_RISK_THRESHOLD {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            };

            alerts.push(
                ctx.alert(
                    "Threshold Avoidance",
                    risk_level,
                    80.0,
                    format!(
                        "Multiple transactions appear to avoid {} reporting threshold",
                        currency(threshold, 0)
                    ),
                )
                .with_evidence(vec![
                    format!(
                        "{} transactions between {} and {}",
                        band.len(),
                        currency(lower, 0),
                        currency(threshold, 0)
                    ),
                    format!("Average amount: {}", currency(mean, 2)),
                ])
                .with_amount_involved(sum),
            );
        }

        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures::{amounts, run};

    #[test]
    fn test_band_below_ten_thousand() {
        let alerts = run(
            &ThresholdAvoidanceDetector,
            &amounts(&[9100.0, 9300.0, 9500.0, 9700.0, 120.0, 15_000.0]),
        );

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.risk_level(), RiskLevel::High);
        assert_eq!(alert.confidence_score(), 80.0);
        assert_eq!(alert.amount_involved(), 37_600.0);
        assert_eq!(
            alert.description(),
            "Multiple transactions appear to avoid $10,000 reporting threshold"
        );
        assert_eq!(
            alert.evidence(),
            &[
                "4 transactions between $9,000 and $10,000".to_string(),
                "Average amount: $9,400.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_three_in_band_does_not_fire() {
        assert!(run(&ThresholdAvoidanceDetector, &amounts(&[9100.0, 9300.0, 9500.0])).is_empty());
    }

    #[test]
    fn test_band_edges() {
        // 9000 is inside, 10000 is not
        let alerts = run(
            &ThresholdAvoidanceDetector,
            &amounts(&[9000.0, 9000.0, 9000.0, 10_000.0, 10_000.0]),
        );
        assert!(alerts.is_empty());

        let alerts = run(
            &ThresholdAvoidanceDetector,
            &amounts(&[9000.0, 9000.0, 9000.0, 9000.0]),
        );
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_multiple_thresholds_fire_in_order() {
        let alerts = run(
            &ThresholdAvoidanceDetector,
            &amounts(&[
                4999.0, 4999.0, 4999.0, 4999.0, 999.0, 950.0, 920.0, 901.0,
            ]),
        );

        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].description().contains("$5,000"));
        assert_eq!(alerts[0].risk_level(), RiskLevel::Medium);
        assert!(alerts[1].description().contains("$1,000"));
        assert_eq!(alerts[1].amount_involved(), 999.0 + 950.0 + 920.0 + 901.0);
    }
}
