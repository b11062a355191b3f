//! Gray events: the uniform record for canon violations and degeneracy
//!
//! Every validator in this crate reports problems as a [`GrayEvent`]. The wire
//! form is a sparse JSON object: `type`, `index`, `timestamp`, `reason` and
//! `severity` are always present, and `from`, `to`, `delta`,
//! `entropy_metrics`, `context` and `metadata` appear only when set.
//!
//! Events are immutable once built. The `with_*` finishers consume the event
//! and are meant to be chained at construction time.
//!
//! # Example
//!
//! ```
//! use codex_canon::gray_event::{GrayEvent, Severity};
//!
//! let event = GrayEvent::adjacency_violation(3, 0, 2);
//! assert_eq!(event.delta(), Some(2));
//! assert_eq!(event.severity(), Severity::Error);
//!
//! let json = serde_json::to_value(&event).unwrap();
//! assert_eq!(json["type"], "adjacency_violation");
//! assert!(json.get("entropy_metrics").is_none());
//!
//! // String-typed construction rejects anything outside the closed sets
//! assert!(GrayEvent::new("bogus", 0, "error", "nope").is_err());
//! ```

use crate::canon::{transition_delta_mod, MODULUS};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a Gray event cannot be constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrayEventError {
    #[error("Invalid Gray event type: {0}")]
    InvalidType(String),

    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("Index must be non-negative, got {0}")]
    NegativeIndex(i64),
}

pub type Result<T> = std::result::Result<T, GrayEventError>;

/// Closed set of Gray event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrayEventKind {
    /// Transition whose cyclic distance is not ±1
    AdjacencyViolation,
    /// Compression or entropy signals a repetitive, information-poor sequence
    DegeneracyDetected,
    /// Input token outside the canonical alphabet
    UnknownToken,
    /// Reserved for dedicated plateau analyzers
    EntropyPlateau,
    /// Reserved for dedicated loop analyzers
    MimicLoop,
}

impl GrayEventKind {
    pub const ALL: [GrayEventKind; 5] = [
        GrayEventKind::AdjacencyViolation,
        GrayEventKind::DegeneracyDetected,
        GrayEventKind::UnknownToken,
        GrayEventKind::EntropyPlateau,
        GrayEventKind::MimicLoop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GrayEventKind::AdjacencyViolation => "adjacency_violation",
            GrayEventKind::DegeneracyDetected => "degeneracy_detected",
            GrayEventKind::UnknownToken => "unknown_token",
            GrayEventKind::EntropyPlateau => "entropy_plateau",
            GrayEventKind::MimicLoop => "mimic_loop",
        }
    }
}

impl FromStr for GrayEventKind {
    type Err = GrayEventError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| GrayEventError::InvalidType(s.to_string()))
    }
}

impl fmt::Display for GrayEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a Gray event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = GrayEventError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(GrayEventError::InvalidSeverity(other.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compression/entropy figures attached to degeneracy events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntropyMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncd_score: Option<f64>,
    /// Threshold that the triggering figure was compared against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degeneracy_threshold: Option<f64>,
}

/// Where in the input a Gray event was observed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_length: Option<usize>,
    /// Slice of indices surrounding the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Free-form metadata carried alongside an event
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A canon violation, unknown token, or degeneracy signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayEvent {
    #[serde(rename = "type")]
    kind: GrayEventKind,
    index: usize,
    timestamp: String,
    reason: String,
    severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delta: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entropy_metrics: Option<EntropyMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<EventContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

/// Current UTC time as RFC 3339 with a `Z` suffix
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl GrayEvent {
    fn build(kind: GrayEventKind, index: usize, severity: Severity, reason: String) -> Self {
        Self {
            kind,
            index,
            timestamp: utc_timestamp(),
            reason,
            severity,
            from: None,
            to: None,
            delta: None,
            entropy_metrics: None,
            context: None,
            metadata: None,
        }
    }

    /// Construct from untyped input, validating every closed field
    ///
    /// # Errors
    /// Fails if `kind` or `severity` is outside its closed set, or if
    /// `index` is negative.
    pub fn new(kind: &str, index: i64, severity: &str, reason: impl Into<String>) -> Result<Self> {
        let kind = kind.parse::<GrayEventKind>()?;
        let severity = severity.parse::<Severity>()?;
        let index = usize::try_from(index).map_err(|_| GrayEventError::NegativeIndex(index))?;
        Ok(Self::build(kind, index, severity, reason.into()))
    }

    /// Illegal jump between two colors under the canon modulus
    pub fn adjacency_violation(index: usize, from: usize, to: usize) -> Self {
        Self::adjacency_violation_mod(index, from, to, MODULUS)
    }

    /// Illegal jump between two states of a cycle of length `modulus`
    pub fn adjacency_violation_mod(index: usize, from: usize, to: usize, modulus: usize) -> Self {
        let delta = transition_delta_mod(from, to, modulus);
        let mut event = Self::build(
            GrayEventKind::AdjacencyViolation,
            index,
            Severity::Error,
            format!("Illegal jump: delta {} not in [1, {}]", delta, modulus.saturating_sub(1)),
        );
        event.from = Some(from);
        event.to = Some(to);
        event.delta = Some(delta);
        event
    }

    /// Compression/entropy analysis flagged the sequence
    pub fn degeneracy_detected(index: usize, entropy_metrics: EntropyMetrics) -> Self {
        let mut event = Self::build(
            GrayEventKind::DegeneracyDetected,
            index,
            Severity::Warning,
            "Compression/entropy indicates mimic loop or degeneracy".to_string(),
        );
        event.entropy_metrics = Some(entropy_metrics);
        event
    }

    /// Input token not found in the canonical alphabet
    pub fn unknown_token(index: usize, token: &str) -> Self {
        Self::build(
            GrayEventKind::UnknownToken,
            index,
            Severity::Error,
            format!("Encountered unknown token '{}' not in canonical sequence", token),
        )
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Replace the creation timestamp (used for deterministic fixtures)
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn kind(&self) -> GrayEventKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// `(from, to)` for adjacency violations
    pub fn transition(&self) -> Option<(usize, usize)> {
        self.from.zip(self.to)
    }

    pub fn delta(&self) -> Option<usize> {
        self.delta
    }

    pub fn entropy_metrics(&self) -> Option<&EntropyMetrics> {
        self.entropy_metrics.as_ref()
    }

    pub fn context(&self) -> Option<&EventContext> {
        self.context.as_ref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Pretty-printed sparse JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for GrayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GrayEvent({} at index {}: {})",
            self.kind, self.index, self.reason
        )
    }
}
