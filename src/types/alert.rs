//! Alert data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Levels from most to least severe, the order report sections appear in.
    pub const DESCENDING: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];

    /// Numeric rank used for ordering (LOW=1 .. CRITICAL=4).
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }

    /// Upper-case label as it appears in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Source of "now" for alert and report timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Used to make reports reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A finding produced by one detector.
///
/// Fields are read-only once the alert has been built; detectors attach
/// evidence and the involved amount through the `with_*` builders before
/// handing the alert off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    account_id: String,
    alert_type: String,
    risk_level: RiskLevel,
    /// Heuristic signal strength, clamped to 0.0 - 100.0
    confidence_score: f64,
    description: String,
    evidence: Vec<String>,
    timestamp: DateTime<Utc>,
    amount_involved: f64,
}

impl Alert {
    /// Create a new alert with no evidence and no involved amount
    pub fn new(
        account_id: impl Into<String>,
        alert_type: impl Into<String>,
        risk_level: RiskLevel,
        confidence_score: f64,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            alert_type: alert_type.into(),
            risk_level,
            confidence_score: clamp_confidence(confidence_score),
            description: description.into(),
            evidence: Vec::new(),
            timestamp,
            amount_involved: 0.0,
        }
    }

    /// Attach supporting evidence lines
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Attach the monetary total attributable to the pattern
    pub fn with_amount_involved(mut self, amount: f64) -> Self {
        self.amount_involved = amount;
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn alert_type(&self) -> &str {
        &self.alert_type
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn amount_involved(&self) -> f64 {
        self.amount_involved
    }
}

fn clamp_confidence(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}
