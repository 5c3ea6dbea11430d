//! Detector orchestration for a single account.

use crate::detectors::{default_detectors, DetectionContext, Detector};
use crate::error::{DetectionError, Result};
use crate::metrics::AnalysisMetrics;
use crate::prioritizer::prioritize_alerts;
use crate::types::{AccountMetadata, Alert, Clock, SystemClock, TransactionDataset};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const DEFAULT_DETECTOR_TIMEOUT: Duration = Duration::from_secs(5);

/// A detector that did not complete; its alerts are missing from the outcome.
#[derive(Debug)]
pub struct DetectorFailure {
    pub detector: &'static str,
    pub error: DetectionError,
}

/// Prioritized alerts plus the detectors that failed along the way
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub alerts: Vec<Alert>,
    pub failures: Vec<DetectorFailure>,
}

impl AnalysisOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the detector battery over one account's history.
pub struct SlushFundDetector {
    detectors: Vec<Arc<dyn Detector>>,
    clock: Arc<dyn Clock>,
    metrics: Arc<AnalysisMetrics>,
    detector_timeout: Duration,
}

impl SlushFundDetector {
    /// Engine with the default detectors and the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Engine with the default detectors and an injected clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            detectors: default_detectors(),
            clock,
            metrics: Arc::new(AnalysisMetrics::new()),
            detector_timeout: DEFAULT_DETECTOR_TIMEOUT,
        }
    }

    /// Replace the detector list. Order is the emission and tie-break order.
    pub fn with_detectors(mut self, detectors: Vec<Arc<dyn Detector>>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<AnalysisMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Time budget for each detector in concurrent mode
    pub fn with_detector_timeout(mut self, timeout: Duration) -> Self {
        self.detector_timeout = timeout;
        self
    }

    pub fn metrics(&self) -> &Arc<AnalysisMetrics> {
        &self.metrics
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector and return prioritized alerts.
    ///
    /// Failing detectors are logged and skipped; see [`Self::analyze`] for
    /// access to the failures.
    pub fn analyze_account(
        &self,
        dataset: &TransactionDataset,
        account: &AccountMetadata,
    ) -> Vec<Alert> {
        self.analyze(dataset, account).alerts
    }

    /// Run every detector sequentially, isolating failures.
    pub fn analyze(
        &self,
        dataset: &TransactionDataset,
        account: &AccountMetadata,
    ) -> AnalysisOutcome {
        let account_id = account.account_id();
        let ctx = DetectionContext::new(dataset, &account_id, self.clock.as_ref());
        info!(
            account_id = %account_id,
            transactions = dataset.len(),
            detectors = self.detectors.len(),
            "Starting account analysis"
        );

        let results = self
            .detectors
            .iter()
            .map(|detector| {
                let start = Instant::now();
                let result = run_isolated(detector.as_ref(), &ctx);
                self.metrics.record_detector_time(detector.name(), start.elapsed());
                (detector.name(), result)
            })
            .collect();

        self.finish(&account_id, results)
    }

    /// Run every detector as its own blocking task, bounded by the detector
    /// timeout. Results are reassembled in detector order before
    /// prioritization, so the outcome matches [`Self::analyze`].
    pub async fn analyze_account_concurrent(
        &self,
        dataset: Arc<TransactionDataset>,
        account: &AccountMetadata,
    ) -> AnalysisOutcome {
        let account_id = account.account_id().to_string();
        info!(
            account_id = %account_id,
            transactions = dataset.len(),
            detectors = self.detectors.len(),
            timeout_ms = self.detector_timeout.as_millis() as u64,
            "Starting concurrent account analysis"
        );

        let tasks = self.detectors.iter().map(|detector| {
            let detector = Arc::clone(detector);
            let dataset = Arc::clone(&dataset);
            let clock = Arc::clone(&self.clock);
            let account_id = account_id.clone();
            let timeout = self.detector_timeout;
            let metrics = Arc::clone(&self.metrics);

            async move {
                let name = detector.name();
                let start = Instant::now();
                let handle = tokio::task::spawn_blocking(move || {
                    let ctx = DetectionContext::new(&dataset, &account_id, clock.as_ref());
                    run_isolated(detector.as_ref(), &ctx)
                });

                let result = match tokio::time::timeout(timeout, handle).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_error)) => Err(DetectionError::DetectorFailed {
                        detector: name.to_string(),
                        reason: join_error.to_string(),
                    }),
                    Err(_) => Err(DetectionError::DetectorTimeout {
                        detector: name.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    }),
                };
                metrics.record_detector_time(name, start.elapsed());
                (name, result)
            }
        });

        // join_all yields results in input order regardless of completion order
        let results = futures::future::join_all(tasks).await;
        self.finish(&account_id, results)
    }

    fn finish(
        &self,
        account_id: &str,
        results: Vec<(&'static str, Result<Vec<Alert>>)>,
    ) -> AnalysisOutcome {
        let mut alerts = Vec::new();
        let mut failures = Vec::new();

        for (detector, result) in results {
            match result {
                Ok(found) => {
                    debug!(detector = %detector, alerts = found.len(), "Detector finished");
                    alerts.extend(found);
                }
                Err(error) => {
                    warn!(
                        account_id = %account_id,
                        detector = %detector,
                        error = %error,
                        "Detector failed, continuing with remaining detectors"
                    );
                    self.metrics.record_detector_failure(detector);
                    failures.push(DetectorFailure { detector, error });
                }
            }
        }

        let alerts = prioritize_alerts(alerts);
        self.metrics.record_analysis(&alerts);
        info!(
            account_id = %account_id,
            alerts = alerts.len(),
            failed_detectors = failures.len(),
            "Account analysis complete"
        );

        AnalysisOutcome { alerts, failures }
    }
}

impl Default for SlushFundDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one detector, turning a panic into a detector-local error.
fn run_isolated(detector: &dyn Detector, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
    match panic::catch_unwind(AssertUnwindSafe(|| detector.detect(ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "detector panicked".to_string());
            Err(DetectionError::DetectorFailed {
                detector: detector.name().to_string(),
                reason,
            })
        }
    }
}
