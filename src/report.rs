//! Plain-text report rendering.

use crate::format::currency;
use crate::types::{Alert, Clock, RiskLevel, SystemClock};
use std::fmt::Write;
use std::sync::Arc;

const TITLE: &str = "SLUSH FUND DETECTION REPORT";
const HEADER_RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 30;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders ordered alerts into the analyst-facing report.
///
/// The layout (section order, bullet character, number formats) is stable
/// and must not drift.
pub struct ReportGenerator {
    clock: Arc<dyn Clock>,
}

impl ReportGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Render `alerts` in the order given, grouped by descending risk level.
    pub fn generate_report(&self, alerts: &[Alert], account_id: &str) -> String {
        let mut report = String::new();
        // Writing to a String cannot fail
        let _ = self.write_report(&mut report, alerts, account_id);
        report
    }

    fn write_report(
        &self,
        out: &mut String,
        alerts: &[Alert],
        account_id: &str,
    ) -> std::fmt::Result {
        writeln!(out, "{}", TITLE)?;
        writeln!(out, "{}", "=".repeat(HEADER_RULE_WIDTH))?;
        writeln!(out, "Account ID: {}", account_id)?;
        writeln!(out, "Analysis Date: {}", self.clock.now().format(TIMESTAMP_FORMAT))?;
        writeln!(out, "Total Alerts: {}", alerts.len())?;
        writeln!(out)?;

        if alerts.is_empty() {
            writeln!(out, "No suspicious patterns detected.")?;
            return Ok(());
        }

        for level in RiskLevel::DESCENDING {
            let section: Vec<&Alert> = alerts.iter().filter(|a| a.risk_level() == level).collect();
            if section.is_empty() {
                continue;
            }

            writeln!(out)?;
            writeln!(out, "{} RISK ALERTS ({})", level, section.len())?;
            writeln!(out, "{}", "-".repeat(SECTION_RULE_WIDTH))?;

            for alert in section {
                write_alert(out, alert)?;
            }
        }

        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

fn write_alert(out: &mut String, alert: &Alert) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "Alert Type: {}", alert.alert_type())?;
    writeln!(out, "Confidence Score: {:.1}%", alert.confidence_score())?;
    writeln!(out, "Description: {}", alert.description())?;
    if alert.amount_involved() > 0.0 {
        writeln!(out, "Amount Involved: {}", currency(alert.amount_involved(), 2))?;
    }
    writeln!(out, "Evidence:")?;
    for line in alert.evidence() {
        writeln!(out, "  • {}", line)?;
    }
    writeln!(out)
}
