//! JSON report format for `codex check`

use crate::degeneracy::DegeneracyMetrics;
use crate::gray_event::GrayEvent;
use serde::{Deserialize, Serialize};

/// Root JSON output for a canon check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// False if any unknown token, adjacency violation, or (when analyzed)
    /// degeneracy was found
    pub is_valid: bool,
    /// Number of recognized tokens
    pub sequence_length: usize,
    /// Unknown tokens first, then adjacency violations, then degeneracy
    pub gray_events: Vec<GrayEvent>,
    /// Degeneracy analysis (if --degeneracy enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degeneracy: Option<DegeneracyMetrics>,
}

impl CheckReport {
    pub fn new(sequence_length: usize) -> Self {
        Self {
            is_valid: true,
            sequence_length,
            gray_events: Vec::new(),
            degeneracy: None,
        }
    }

    /// Append events; any event makes the report invalid
    pub fn add_events<I: IntoIterator<Item = GrayEvent>>(&mut self, events: I) {
        self.gray_events.extend(events);
        if !self.gray_events.is_empty() {
            self.is_valid = false;
        }
    }

    /// Attach degeneracy analysis, emitting its Gray event if degenerate
    pub fn add_degeneracy(&mut self, metrics: DegeneracyMetrics) {
        if let Some(event) = metrics.to_gray_event(0) {
            self.add_events([event]);
        }
        self.degeneracy = Some(metrics);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::validate_sequence;
    use crate::degeneracy::{detect_degeneracy, DegeneracyConfig};

    #[test]
    fn test_clean_report() {
        let report = CheckReport::new(3);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["is_valid"], true);
        assert_eq!(value["sequence_length"], 3);
        assert!(value["gray_events"].as_array().unwrap().is_empty());
        assert!(value.get("degeneracy").is_none());
    }

    #[test]
    fn test_unknown_token_invalidates_report() {
        let mut report = CheckReport::new(2);
        report.add_events([GrayEvent::unknown_token(1, "Violet")]);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_violations_invalidate_report() {
        let sequence = [0, 3];
        let mut report = CheckReport::new(sequence.len());
        report.add_events(validate_sequence(&sequence).to_gray_events());
        assert!(!report.is_valid);
        assert_eq!(report.gray_events.len(), 1);
    }

    #[test]
    fn test_degeneracy_attached() {
        let sequence = vec![0usize; 100];
        let mut report = CheckReport::new(sequence.len());
        report.add_degeneracy(detect_degeneracy(&sequence, &DegeneracyConfig::default()));
        assert!(!report.is_valid);
        assert_eq!(report.gray_events.len(), 1);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["degeneracy"]["is_degenerate"], true);
        assert_eq!(value["gray_events"][0]["type"], "degeneracy_detected");
    }
}
