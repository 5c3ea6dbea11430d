//! Month-end and quarter-end clustering.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::format::percent;
use crate::types::{Alert, Column, RiskLevel};
use chrono::Datelike;

const MONTH_END_FIRST_DAY: u32 = 28;
const MONTH_END_FRACTION_LIMIT: f64 = 0.25;
const QUARTER_END_MONTHS: [u32; 4] = [3, 6, 9, 12];
const QUARTER_END_FRACTION_LIMIT: f64 = 0.4;

/// Flags activity concentrated at the close of a month or quarter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndOfPeriodDetector;

impl EndOfPeriodDetector {
    fn month_end(&self, ctx: &DetectionContext<'_>) -> Option<Alert> {
        let dataset = ctx.dataset;
        let (count, amount) = dataset
            .transactions()
            .iter()
            .filter(|tx| tx.date.is_some_and(|d| d.day() >= MONTH_END_FIRST_DAY))
            .fold((0usize, 0.0f64), |(n, sum), tx| (n + 1, sum + tx.amount));

        let total = dataset.len() as f64;
        if count as f64 <= total * MONTH_END_FRACTION_LIMIT {
            return None;
        }

        let amount_involved = if dataset.has_column(Column::Amount) {
            amount
        } else {
            0.0
        };

        Some(
            ctx.alert(
                "End-of-Period Clustering",
                RiskLevel::Medium,
                70.0,
                "Unusual concentration of transactions at month-end",
            )
            .with_evidence(vec![
                format!("{} transactions occur in last 3 days of month", count),
                format!(
                    "End-of-month transaction percentage: {}",
                    percent(count as f64 / total)
                ),
            ])
            .with_amount_involved(amount_involved),
        )
    }

    fn quarter_end(&self, ctx: &DetectionContext<'_>) -> Option<Alert> {
        let count = ctx
            .dataset
            .transactions()
            .iter()
            .filter(|tx| tx.date.is_some_and(|d| QUARTER_END_MONTHS.contains(&d.month())))
            .count();

        if count as f64 <= ctx.dataset.len() as f64 * QUARTER_END_FRACTION_LIMIT {
            return None;
        }

        Some(
            ctx.alert(
                "Quarter-End Pattern",
                RiskLevel::Medium,
                65.0,
                "Unusual pattern of quarter-end transactions",
            )
            .with_evidence(vec![format!(
                "High concentration of transactions at quarter-ends: {} transactions",
                count
            )]),
        )
    }
}

impl Detector for EndOfPeriodDetector {
    fn name(&self) -> &'static str {
        "end_of_period"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        if !ctx.dataset.has_column(Column::Date) {
            return Ok(Vec::new());
        }

        Ok(self
            .month_end(ctx)
            .into_iter()
            .chain(self.quarter_end(ctx))
            .collect())
    }
}
