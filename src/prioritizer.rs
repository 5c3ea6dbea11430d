//! Alert ranking.

use crate::types::Alert;

/// Order alerts by risk level, then confidence, both descending.
///
/// The sort is stable: alerts that tie on both keys keep the order the
/// detectors emitted them in.
pub fn prioritize_alerts(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.sort_by(|a, b| {
        b.risk_level()
            .rank()
            .cmp(&a.risk_level().rank())
            .then_with(|| b.confidence_score().total_cmp(&a.confidence_score()))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;
    use chrono::{TimeZone, Utc};

    fn alert(tag: &str, risk: RiskLevel, confidence: f64) -> Alert {
        Alert::new(
            "ACC-1",
            tag,
            risk,
            confidence,
            "test",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_orders_by_risk_then_confidence_stably() {
        let sorted = prioritize_alerts(vec![
            alert("medium-70", RiskLevel::Medium, 70.0),
            alert("high-60-first", RiskLevel::High, 60.0),
            alert("high-60-second", RiskLevel::High, 60.0),
            alert("low-90", RiskLevel::Low, 90.0),
        ]);

        let tags: Vec<&str> = sorted.iter().map(|a| a.alert_type()).collect();
        assert_eq!(
            tags,
            vec!["high-60-first", "high-60-second", "medium-70", "low-90"]
        );
    }

    #[test]
    fn test_confidence_breaks_risk_ties() {
        let sorted = prioritize_alerts(vec![
            alert("a", RiskLevel::Medium, 60.0),
            alert("b", RiskLevel::Medium, 75.0),
            alert("c", RiskLevel::Critical, 10.0),
        ]);

        let tags: Vec<&str> = sorted.iter().map(|a| a.alert_type()).collect();
        assert_eq!(tags, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(prioritize_alerts(Vec::new()).is_empty());
    }
}
