//! Same-day deposit and withdrawal activity.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::types::{Alert, Column, RiskLevel};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const DEPOSIT: &str = "deposit";
const WITHDRAWAL: &str = "withdrawal";
const LAYERED_DAY_FRACTION_LIMIT: f64 = 0.3;

/// Flags accounts where funds go in and out on the same calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeringDetector;

#[derive(Debug, Default, Clone, Copy)]
struct DailyFlows {
    deposits: f64,
    withdrawals: f64,
}

impl Detector for LayeringDetector {
    fn name(&self) -> &'static str {
        "layering"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        let dataset = ctx.dataset;
        if !dataset.has_columns(&[Column::Date, Column::TransactionType, Column::Amount]) {
            return Ok(Vec::new());
        }

        // Active days are those with at least one typed transaction
        let mut days: BTreeMap<NaiveDate, DailyFlows> = BTreeMap::new();
        for tx in dataset.transactions() {
            let (Some(date), Some(kind)) = (tx.date, tx.transaction_type.as_deref()) else {
                continue;
            };
            let flows = days.entry(date.date()).or_default();
            // Labels match exactly; other types only mark the day active
            if kind == DEPOSIT {
                flows.deposits += tx.amount;
            } else if kind == WITHDRAWAL {
                flows.withdrawals += tx.amount;
            }
        }

        let layered_days = days
            .values()
            .filter(|f| f.deposits > 0.0 && f.withdrawals > 0.0)
            .count();

        if layered_days as f64 <= days.len() as f64 * LAYERED_DAY_FRACTION_LIMIT {
            return Ok(Vec::new());
        }

        let alert = ctx
            .alert(
                "Layering Pattern",
                RiskLevel::High,
                85.0,
                "Rapid deposit and withdrawal patterns suggest potential layering",
            )
            .with_evidence(vec![
                format!("{} days with both deposits and withdrawals", layered_days),
                "Potential layering pattern detected".to_string(),
            ]);

        Ok(vec![alert])
    }
}
