//! Run statistics for the detection engine.

use crate::types::{Alert, RiskLevel};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector shared across analysis runs
pub struct AnalysisMetrics {
    /// Total accounts analyzed
    pub accounts_analyzed: AtomicU64,
    /// Total alerts generated
    pub alerts_generated: AtomicU64,
    /// Alerts by risk level
    alerts_by_level: RwLock<HashMap<RiskLevel, u64>>,
    /// Detector run times (in microseconds)
    detector_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Detector failures (errors, panics, timeouts)
    detector_failures: RwLock<HashMap<String, u64>>,
    start_time: Instant,
}

impl AnalysisMetrics {
    pub fn new() -> Self {
        Self {
            accounts_analyzed: AtomicU64::new(0),
            alerts_generated: AtomicU64::new(0),
            alerts_by_level: RwLock::new(HashMap::new()),
            detector_times: RwLock::new(HashMap::new()),
            detector_failures: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a completed account analysis and its alerts
    pub fn record_analysis(&self, alerts: &[Alert]) {
        self.accounts_analyzed.fetch_add(1, Ordering::Relaxed);
        self.alerts_generated
            .fetch_add(alerts.len() as u64, Ordering::Relaxed);

        if let Ok(mut by_level) = self.alerts_by_level.write() {
            for alert in alerts {
                *by_level.entry(alert.risk_level()).or_insert(0) += 1;
            }
        }
    }

    /// Record how long one detector took
    pub fn record_detector_time(&self, detector: &str, duration: Duration) {
        if let Ok(mut times) = self.detector_times.write() {
            let detector_times = times.entry(detector.to_string()).or_default();
            detector_times.push(duration.as_micros() as u64);
            // Keep only last 1000 per detector
            if detector_times.len() > 1000 {
                detector_times.drain(0..500);
            }
        }
    }

    /// Record a detector that errored, panicked or overran
    pub fn record_detector_failure(&self, detector: &str) {
        if let Ok(mut failures) = self.detector_failures.write() {
            *failures.entry(detector.to_string()).or_insert(0) += 1;
        }
    }

    pub fn get_alerts_by_level(&self) -> HashMap<RiskLevel, u64> {
        self.alerts_by_level
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn get_detector_failures(&self) -> HashMap<String, u64> {
        self.detector_failures
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Per-detector timing statistics
    pub fn get_detector_stats(&self) -> HashMap<String, DetectorStats> {
        let Ok(times) = self.detector_times.read() else {
            return HashMap::new();
        };
        let mut stats = HashMap::new();

        for (detector, detector_times) in times.iter() {
            if detector_times.is_empty() {
                continue;
            }

            let mut sorted = detector_times.clone();
            sorted.sort_unstable();

            let sum: u64 = sorted.iter().sum();
            let count = sorted.len();

            stats.insert(
                detector.clone(),
                DetectorStats {
                    runs: count as u64,
                    mean_us: sum / count as u64,
                    p50_us: sorted[count / 2],
                    max_us: sorted[count - 1],
                },
            );
        }

        stats
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let accounts = self.accounts_analyzed.load(Ordering::Relaxed);
        let alerts = self.alerts_generated.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let by_level = self.get_alerts_by_level();
        let failures = self.get_detector_failures();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            SLUSH FUND DETECTION - METRICS SUMMARY            ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Accounts Analyzed: {:>8}  │  Elapsed: {:>8.2}s            ║",
            accounts, elapsed
        );
        info!("║ Alerts Generated:  {:>8}                                  ║", alerts);
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Alerts by Risk Level:                                        ║");
        for level in RiskLevel::DESCENDING {
            let count = by_level.get(&level).copied().unwrap_or(0);
            let pct = if alerts > 0 {
                (count as f64 / alerts as f64) * 100.0
            } else {
                0.0
            };
            info!("║   {:10}: {:>6} ({:>5.1}%)                                ║", level, count, pct);
        }
        info!("╚══════════════════════════════════════════════════════════════╝");

        let mut detector_stats: Vec<(String, DetectorStats)> =
            self.get_detector_stats().into_iter().collect();
        detector_stats.sort_by(|a, b| a.0.cmp(&b.0));
        if !detector_stats.is_empty() {
            info!("Detector Run Times (μs):");
            for (detector, stats) in &detector_stats {
                info!(
                    "  {}: mean={} p50={} max={} (runs={}, failures={})",
                    detector,
                    stats.mean_us,
                    stats.p50_us,
                    stats.max_us,
                    stats.runs,
                    failures.get(detector).copied().unwrap_or(0)
                );
            }
        }
    }
}

impl Default for AnalysisMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Detector-specific statistics
#[derive(Debug, Clone, Copy)]
pub struct DetectorStats {
    pub runs: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_analysis_recording() {
        let metrics = AnalysisMetrics::new();
        let now = Utc::now();
        let alerts = vec![
            Alert::new("A", "x", RiskLevel::High, 80.0, "d", now),
            Alert::new("A", "y", RiskLevel::High, 70.0, "d", now),
            Alert::new("A", "z", RiskLevel::Medium, 60.0, "d", now),
        ];

        metrics.record_analysis(&alerts);
        metrics.record_analysis(&[]);

        assert_eq!(metrics.accounts_analyzed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.alerts_generated.load(Ordering::Relaxed), 3);
        let by_level = metrics.get_alerts_by_level();
        assert_eq!(by_level.get(&RiskLevel::High), Some(&2));
        assert_eq!(by_level.get(&RiskLevel::Medium), Some(&1));
    }

    #[test]
    fn test_detector_stats() {
        let metrics = AnalysisMetrics::new();
        metrics.record_detector_time("layering", Duration::from_micros(100));
        metrics.record_detector_time("layering", Duration::from_micros(300));
        metrics.record_detector_failure("layering");

        let stats = metrics.get_detector_stats();
        let layering = stats.get("layering").unwrap();
        assert_eq!(layering.runs, 2);
        assert_eq!(layering.mean_us, 200);
        assert_eq!(layering.max_us, 300);
        assert_eq!(metrics.get_detector_failures().get("layering"), Some(&1));
    }
}
