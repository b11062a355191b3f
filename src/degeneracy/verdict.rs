// Degeneracy verdict: combine global and windowed signals

use super::config::DegeneracyConfig;
use super::metrics::{compression_ratio, entropy_estimate, sequence_to_bytes};
use super::windows::{analyze_windows, longest_similar_run};
use crate::gray_event::{EntropyMetrics, EventContext, GrayEvent, Metadata};
use serde::{Deserialize, Serialize};

/// Which signal decided a degenerate verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneracyTrigger {
    CompressionRatio { threshold: f64 },
    EntropyEstimate { threshold: f64 },
    Plateau { threshold: f64, run: usize },
}

impl DegeneracyTrigger {
    pub fn threshold(&self) -> f64 {
        match *self {
            DegeneracyTrigger::CompressionRatio { threshold }
            | DegeneracyTrigger::EntropyEstimate { threshold }
            | DegeneracyTrigger::Plateau { threshold, .. } => threshold,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DegeneracyTrigger::CompressionRatio { .. } => "compression_ratio",
            DegeneracyTrigger::EntropyEstimate { .. } => "entropy_estimate",
            DegeneracyTrigger::Plateau { .. } => "entropy_plateau",
        }
    }
}

/// Result of one degeneracy analysis pass
///
/// Raw figures are always populated, degenerate or not, so callers can apply
/// their own thresholds afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegeneracyMetrics {
    pub is_degenerate: bool,
    pub compression_ratio: f64,
    pub entropy_estimate: f64,
    pub window_ncds: Vec<f64>,
    pub plateau_detected: bool,
    /// Human-readable reason for the first signal that fired
    pub trigger_reason: Option<String>,
    pub window_size: usize,
    pub num_windows: usize,
    #[serde(skip)]
    pub trigger: Option<DegeneracyTrigger>,
    #[serde(skip)]
    pub sequence_length: usize,
}

impl DegeneracyMetrics {
    fn empty(window_size: usize) -> Self {
        Self {
            is_degenerate: false,
            compression_ratio: 0.0,
            entropy_estimate: 0.0,
            window_ncds: Vec::new(),
            plateau_detected: false,
            trigger_reason: None,
            window_size,
            num_windows: 0,
            trigger: None,
            sequence_length: 0,
        }
    }

    /// Smallest window-pair NCD, if any pair was scored
    pub fn min_ncd(&self) -> Option<f64> {
        self.window_ncds.iter().copied().reduce(f64::min)
    }

    /// A `degeneracy_detected` Gray event, or `None` when the sequence is healthy
    pub fn to_gray_event(&self, index: usize) -> Option<GrayEvent> {
        if !self.is_degenerate {
            return None;
        }

        let metrics = EntropyMetrics {
            compression_ratio: Some(self.compression_ratio),
            entropy_estimate: Some(self.entropy_estimate),
            ncd_score: self.min_ncd(),
            degeneracy_threshold: self.trigger.map(|t| t.threshold()),
        };

        let mut metadata = Metadata::new();
        if let Some(trigger) = &self.trigger {
            metadata.insert("trigger".into(), trigger.name().into());
        }
        if let Some(reason) = &self.trigger_reason {
            metadata.insert("trigger_reason".into(), reason.clone().into());
        }
        metadata.insert("plateau_detected".into(), self.plateau_detected.into());
        metadata.insert("num_windows".into(), self.num_windows.into());

        Some(
            GrayEvent::degeneracy_detected(index, metrics)
                .with_context(EventContext {
                    sequence_length: Some(self.sequence_length),
                    ..Default::default()
                })
                .with_metadata(metadata),
        )
    }
}

/// Analyze a color-index sequence for degeneracy
///
/// Verdict is degenerate iff compression ratio < `compression_threshold`,
/// else entropy estimate < `entropy_threshold`, else a plateau of
/// `min_consecutive` near-identical window pairs. Only the first signal that
/// fires is reported in `trigger_reason`.
///
/// # Example
/// ```
/// use codex_canon::degeneracy::{detect_degeneracy, DegeneracyConfig};
///
/// let stuck = vec![0usize; 100];
/// let metrics = detect_degeneracy(&stuck, &DegeneracyConfig::default());
/// assert!(metrics.is_degenerate);
///
/// let empty = detect_degeneracy(&[], &DegeneracyConfig::default());
/// assert!(!empty.is_degenerate);
/// assert_eq!(empty.num_windows, 0);
/// ```
pub fn detect_degeneracy(sequence: &[usize], config: &DegeneracyConfig) -> DegeneracyMetrics {
    if sequence.is_empty() {
        return DegeneracyMetrics::empty(config.window_size);
    }

    let data = sequence_to_bytes(sequence);
    let ratio = compression_ratio(&data);
    let entropy = entropy_estimate(&data);
    let (windows, window_ncds) = analyze_windows(&data, config.window_size);
    let run = longest_similar_run(&window_ncds, config.similarity_threshold);
    let plateau_detected = run >= config.min_consecutive.max(1);

    let trigger = if ratio < config.compression_threshold {
        Some(DegeneracyTrigger::CompressionRatio {
            threshold: config.compression_threshold,
        })
    } else if entropy < config.entropy_threshold {
        Some(DegeneracyTrigger::EntropyEstimate {
            threshold: config.entropy_threshold,
        })
    } else if plateau_detected {
        Some(DegeneracyTrigger::Plateau {
            threshold: config.similarity_threshold,
            run,
        })
    } else {
        None
    };

    let trigger_reason = trigger.map(|t| match t {
        DegeneracyTrigger::CompressionRatio { threshold } => format!(
            "Compression ratio {:.3} below threshold {:.2} (highly repetitive)",
            ratio, threshold
        ),
        DegeneracyTrigger::EntropyEstimate { threshold } => format!(
            "Entropy estimate {:.3} below threshold {:.2} (low information content)",
            entropy, threshold
        ),
        DegeneracyTrigger::Plateau { threshold, run } => format!(
            "Entropy plateau detected: {} consecutive window pairs with NCD below {:.2} (mimic loop)",
            run, threshold
        ),
    });

    if let Some(reason) = &trigger_reason {
        tracing::warn!(length = sequence.len(), %reason, "degenerate sequence");
    } else {
        tracing::debug!(
            length = sequence.len(),
            ratio,
            windows = windows.len(),
            "sequence not degenerate"
        );
    }

    DegeneracyMetrics {
        is_degenerate: trigger.is_some(),
        compression_ratio: ratio,
        entropy_estimate: entropy,
        window_ncds,
        plateau_detected,
        trigger_reason,
        window_size: config.window_size,
        num_windows: windows.len(),
        trigger,
        sequence_length: sequence.len(),
    }
}
