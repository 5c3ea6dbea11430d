//! Single-counterparty volume concentration.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::format::percent;
use crate::types::{Alert, Column, RiskLevel};
use std::collections::HashMap;

const SHARE_LIMIT: f64 = 0.5;

/// Flags accounts where one counterparty carries most of the volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterpartyConcentrationDetector;

impl Detector for CounterpartyConcentrationDetector {
    fn name(&self) -> &'static str {
        "counterparty_concentration"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        let dataset = ctx.dataset;
        if !dataset.has_columns(&[Column::Counterparty, Column::Amount]) {
            return Ok(Vec::new());
        }

        // Totals per counterparty, in first-appearance order
        let mut totals: Vec<(&str, f64)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for tx in dataset.transactions() {
            let Some(name) = tx.counterparty.as_deref() else {
                continue;
            };
            match index.get(name) {
                Some(&i) => totals[i].1 += tx.amount,
                None => {
                    index.insert(name, totals.len());
                    totals.push((name, tx.amount));
                }
            }
        }

        // Earliest counterparty wins ties
        let top = totals
            .iter()
            .fold(None::<(&str, f64)>, |best, &(name, total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((name, total)),
            });

        let account_total = dataset.total_amount();
        let Some((name, top_total)) = top else {
            return Ok(Vec::new());
        };
        if account_total <= 0.0 {
            return Ok(Vec::new());
        }

        let share = top_total / account_total;
        if share <= SHARE_LIMIT {
            return Ok(Vec::new());
        }

        let alert = ctx
            .alert(
                "Counterparty Concentration",
                RiskLevel::High,
                80.0,
                "High concentration of transactions with single counterparty",
            )
            .with_evidence(vec![
                format!(
                    "Top counterparty accounts for {} of total transaction volume",
                    percent(share)
                ),
                format!("Counterparty: {}", name),
            ])
            .with_amount_involved(top_total);

        Ok(vec![alert])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures::run;
    use crate::types::{Transaction, TransactionDataset};

    fn flows(rows: &[(&str, f64)]) -> TransactionDataset {
        TransactionDataset::new(
            rows.iter()
                .map(|&(cp, amount)| Transaction::new(amount).with_counterparty(cp))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_sixty_percent_share_fires() {
        let dataset = flows(&[
            ("A", 2000.0),
            ("B", 1500.0),
            ("A", 4000.0),
            ("C", 2500.0),
        ]);
        let alerts = run(&CounterpartyConcentrationDetector, &dataset);

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.risk_level(), RiskLevel::High);
        assert_eq!(alert.confidence_score(), 80.0);
        assert_eq!(alert.amount_involved(), 6000.0);
        assert_eq!(
            alert.evidence(),
            &[
                "Top counterparty accounts for 60.00% of total transaction volume".to_string(),
                "Counterparty: A".to_string(),
            ]
        );
    }

    #[test]
    fn test_half_share_does_not_fire() {
        let dataset = flows(&[("A", 5000.0), ("B", 5000.0)]);
        assert!(run(&CounterpartyConcentrationDetector, &dataset).is_empty());
    }

    #[test]
    fn test_rows_without_counterparty_still_count_toward_total() {
        let dataset = TransactionDataset::new(vec![
            Transaction::new(600.0).with_counterparty("A"),
            Transaction::new(600.0),
        ])
        .unwrap();
        assert!(run(&CounterpartyConcentrationDetector, &dataset).is_empty());
    }

    #[test]
    fn test_zero_volume_is_a_no_op() {
        let dataset = flows(&[("A", 0.0), ("B", 0.0)]);
        assert!(run(&CounterpartyConcentrationDetector, &dataset).is_empty());
    }
}
