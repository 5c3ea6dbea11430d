//! Burst detection over inter-transaction gaps.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::types::{Alert, Column, RiskLevel};
use chrono::NaiveDateTime;

const MAX_GAP_DAYS: i64 = 1;
const BURST_FRACTION_LIMIT: f64 = 0.4;

/// Flags histories where most transactions follow another within a day.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyBurstDetector;

/// Whole-day gaps between consecutive transactions in date order.
fn day_gaps(mut dates: Vec<NaiveDateTime>) -> Vec<i64> {
    dates.sort();
    dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect()
}

impl Detector for FrequencyBurstDetector {
    fn name(&self) -> &'static str {
        "frequency_burst"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        let dataset = ctx.dataset;
        if !dataset.has_column(Column::Date) {
            return Ok(Vec::new());
        }

        let dates: Vec<NaiveDateTime> = dataset
            .transactions()
            .iter()
            .filter_map(|tx| tx.date)
            .collect();
        let burst_count = day_gaps(dates)
            .into_iter()
            .filter(|&gap| gap <= MAX_GAP_DAYS)
            .count();

        if burst_count as f64 <= dataset.len() as f64 * BURST_FRACTION_LIMIT {
            return Ok(Vec::new());
        }

        let alert = ctx
            .alert(
                "Burst Transaction Pattern",
                RiskLevel::Medium,
                65.0,
                "Unusual concentration of transactions in short time periods",
            )
            .with_evidence(vec![
                format!(
                    "{} transactions occurred within 1 day of another transaction",
                    burst_count
                ),
                "Indicates potential burst activity pattern".to_string(),
            ]);

        Ok(vec![alert])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures::{day, run};
    use crate::types::{Transaction, TransactionDataset};
    use chrono::Duration;

    fn dated(dates: Vec<NaiveDateTime>) -> TransactionDataset {
        TransactionDataset::new(
            dates
                .into_iter()
                .map(|d| Transaction::new(250.0).with_date(d))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_day_gaps_are_floored_and_sorted() {
        let start = day(2024, 1, 1);
        let gaps = day_gaps(vec![
            start + Duration::hours(47),
            start,
            start + Duration::days(10),
        ]);
        assert_eq!(gaps, vec![1, 8]);
    }

    #[test]
    fn test_burst_fires() {
        // Five daily transactions, then two spread out: 4 of 7 gaps <= 1 day
        let mut dates: Vec<NaiveDateTime> = (1..=5).map(|d| day(2024, 2, d)).collect();
        dates.push(day(2024, 4, 1));
        dates.push(day(2024, 6, 1));
        let alerts = run(&FrequencyBurstDetector, &dated(dates));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].risk_level(), RiskLevel::Medium);
        assert_eq!(alerts[0].confidence_score(), 65.0);
        assert_eq!(
            alerts[0].evidence()[0],
            "4 transactions occurred within 1 day of another transaction"
        );
    }

    #[test]
    fn test_exactly_forty_percent_does_not_fire() {
        // 2 burst gaps out of 5 transactions
        let dates = vec![
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 3, 1),
            day(2024, 5, 1),
        ];
        assert!(run(&FrequencyBurstDetector, &dated(dates)).is_empty());
    }

    #[test]
    fn test_missing_date_column_is_a_no_op() {
        let dataset = TransactionDataset::new(vec![Transaction::new(1.0); 5]).unwrap();
        assert!(run(&FrequencyBurstDetector, &dataset).is_empty());
    }
}
