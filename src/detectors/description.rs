//! Transaction description analysis: vague language and repetition.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::types::{Alert, Column, RiskLevel};
use std::collections::HashMap;

/// Generic or discretionary wording commonly used to obscure purpose.
pub const SUSPICIOUS_KEYWORDS: [&str; 18] = [
    "consulting",
    "advisory",
    "services",
    "misc",
    "miscellaneous",
    "general",
    "expenses",
    "petty cash",
    "discretionary",
    "contingency",
    "emergency",
    "special projects",
    "undefined",
    "various",
    "entertainment",
    "representation",
    "goodwill",
    "hospitality",
];

const VAGUE_FRACTION_LIMIT: f64 = 0.3;
const REPEAT_LIMIT: usize = 5;
const MAX_LISTED: usize = 5;

/// Flags vague descriptions and descriptions repeated verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuspiciousDescriptionDetector;

/// Leftmost keyword found in `description`; earlier list entries win ties.
fn matched_keyword(description: &str) -> Option<&'static str> {
    let lowered = description.to_lowercase();
    SUSPICIOUS_KEYWORDS
        .iter()
        .filter_map(|kw| lowered.find(kw).map(|pos| (pos, *kw)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, kw)| kw)
}

impl SuspiciousDescriptionDetector {
    fn vague_language(&self, ctx: &DetectionContext<'_>) -> Option<Alert> {
        let dataset = ctx.dataset;
        let mut vague_count = 0usize;
        let mut vague_amount = 0.0;
        let mut keyword_hits: HashMap<&'static str, usize> = HashMap::new();

        for tx in dataset.transactions() {
            let Some(keyword) = tx.description.as_deref().and_then(matched_keyword) else {
                continue;
            };
            vague_count += 1;
            vague_amount += tx.amount;
            *keyword_hits.entry(keyword).or_insert(0) += 1;
        }

        if vague_count as f64 <= dataset.len() as f64 * VAGUE_FRACTION_LIMIT {
            return None;
        }

        let mut keywords: Vec<(&str, usize)> = keyword_hits.into_iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let listed: Vec<&str> = keywords.iter().take(MAX_LISTED).map(|(k, _)| *k).collect();

        let amount_involved = if dataset.has_column(Column::Amount) {
            vague_amount
        } else {
            0.0
        };

        Some(
            ctx.alert(
                "Vague Transaction Descriptions",
                RiskLevel::Medium,
                75.0,
                "High frequency of vague or generic transaction descriptions",
            )
            .with_evidence(vec![
                format!("Found {} transactions with vague descriptions", vague_count),
                format!("Common suspicious keywords: {}", listed.join(", ")),
            ])
            .with_amount_involved(amount_involved),
        )
    }

    fn repetition(&self, ctx: &DetectionContext<'_>) -> Option<Alert> {
        // (description, count) in first-appearance order
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for description in ctx
            .dataset
            .transactions()
            .iter()
            .filter_map(|tx| tx.description.as_deref())
        {
            match index.get(description) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(description, counts.len());
                    counts.push((description, 1));
                }
            }
        }

        let mut repeated: Vec<(&str, usize)> = counts
            .into_iter()
            .filter(|(_, n)| *n > REPEAT_LIMIT)
            .collect();
        if repeated.is_empty() {
            return None;
        }
        // Stable: equal counts keep first-appearance order
        repeated.sort_by(|a, b| b.1.cmp(&a.1));

        let evidence = repeated
            .iter()
            .take(MAX_LISTED)
            .map(|(description, n)| format!("Description '{}' appears {} times", description, n))
            .collect();

        Some(
            ctx.alert(
                "Repeated Transaction Descriptions",
                RiskLevel::Medium,
                60.0,
                "Multiple transactions with identical descriptions",
            )
            .with_evidence(evidence),
        )
    }
}

impl Detector for SuspiciousDescriptionDetector {
    fn name(&self) -> &'static str {
        "suspicious_description"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        if !ctx.dataset.has_column(Column::Description) {
            return Ok(Vec::new());
        }

        Ok(self
            .vague_language(ctx)
            .into_iter()
            .chain(self.repetition(ctx))
            .collect())
    }
}
