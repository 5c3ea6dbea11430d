//! Round-number amount detection.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::format::percent;
use crate::types::{Alert, Column, RiskLevel};

/// Histories this short are not analysed.
const MIN_TRANSACTIONS: usize = 10;
const ROUND_FRACTION_LIMIT: f64 = 0.6;
const HIGH_RISK_FRACTION: f64 = 0.8;
const MAX_CONFIDENCE: f64 = 95.0;

/// Flags accounts where most amounts are exact multiples of 50 or 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundNumberDetector;

fn is_round(amount: f64) -> bool {
    amount % 100.0 == 0.0 || amount % 50.0 == 0.0
}

impl Detector for RoundNumberDetector {
    fn name(&self) -> &'static str {
        "round_number"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        let dataset = ctx.dataset;
        if !dataset.has_column(Column::Amount) || dataset.len() <= MIN_TRANSACTIONS {
            return Ok(Vec::new());
        }

        let total = dataset.len();
        let (round_count, round_sum) = dataset
            .transactions()
            .iter()
            .filter(|tx| is_round(tx.amount))
            .fold((0usize, 0.0f64), |(n, sum), tx| (n + 1, sum + tx.amount));

        let round_fraction = round_count as f64 / total as f64;
        if round_fraction <= ROUND_FRACTION_LIMIT {
            return Ok(Vec::new());
        }

        let risk_level = if round_fraction < HIGH_RISK_FRACTION {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };

        let alert = ctx
            .alert(
                "Round Number Pattern",
                risk_level,
                (round_fraction * 100.0).min(MAX_CONFIDENCE),
                "Unusually high percentage of round-number transactions",
            )
            .with_evidence(vec![
                format!(
                    "{} out of {} transactions are round numbers",
                    round_count, total
                ),
                format!("Round number percentage: {}", percent(round_fraction)),
            ])
            .with_amount_involved(round_sum);

        Ok(vec![alert])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures::{amounts, run};

    fn history(round: usize, other: usize) -> Vec<f64> {
        let mut values: Vec<f64> = (1..=round).map(|i| i as f64 * 100.0).collect();
        values.extend((0..other).map(|i| 123.45 + i as f64));
        values
    }

    #[test]
    fn test_sixty_five_percent_round_is_medium() {
        let alerts = run(&RoundNumberDetector, &amounts(&history(13, 7)));

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.risk_level(), RiskLevel::Medium);
        assert!((alert.confidence_score() - 65.0).abs() < 1e-9);
        assert_eq!(alert.amount_involved(), 9100.0);
        assert_eq!(
            alert.evidence(),
            &[
                "13 out of 20 transactions are round numbers".to_string(),
                "Round number percentage: 65.00%".to_string(),
            ]
        );
    }

    #[test]
    fn test_exactly_sixty_percent_does_not_fire() {
        assert!(run(&RoundNumberDetector, &amounts(&history(12, 8))).is_empty());
    }

    #[test]
    fn test_high_risk_and_confidence_cap() {
        let alerts = run(&RoundNumberDetector, &amounts(&history(20, 0)));

        assert_eq!(alerts[0].risk_level(), RiskLevel::High);
        assert_eq!(alerts[0].confidence_score(), 95.0);
    }

    #[test]
    fn test_fifty_multiples_count_as_round() {
        let mut values = vec![50.0, 150.0, 250.0, 350.0, 450.0, 550.0, 650.0, 750.0];
        values.extend([1.5, 2.5, 3.5]);
        let alerts = run(&RoundNumberDetector, &amounts(&values));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].evidence()[0], "8 out of 11 transactions are round numbers");
    }

    #[test]
    fn test_short_history_is_skipped() {
        assert!(run(&RoundNumberDetector, &amounts(&[100.0; 10])).is_empty());
    }
}
