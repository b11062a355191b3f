//! Step-by-step execution trace of color transitions
//!
//! Unlike [`validate_sequence`](crate::canon::validate_sequence), which checks
//! a finished sequence in one pass, an [`ExecutionTrace`] is built as
//! transitions happen. Each call to [`ExecutionTrace::add_step`] classifies one
//! transition, updates the running counters and, for an illegal jump, records
//! an `adjacency_violation` Gray event both on the step and in the trace-wide
//! event list.
//!
//! Traces persist as JSON and load back losslessly:
//!
//! ```
//! use codex_canon::trace::ExecutionTrace;
//!
//! let mut trace = ExecutionTrace::new("demo");
//! trace.add_step(0, "forward", 1, None, None);
//! trace.add_step(1, "jump", 4, None, None);
//!
//! assert_eq!(trace.legal_steps, 1);
//! assert_eq!(trace.illegal_steps, 1);
//!
//! let json = trace.to_json().unwrap();
//! let restored = ExecutionTrace::from_json(&json).unwrap();
//! assert_eq!(restored, trace);
//! ```

use crate::canon::{is_adjacent, transition_delta};
use crate::gray_event::{utc_timestamp, GrayEvent, Metadata};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur persisting or restoring a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trace document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent trace counters: {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, TraceError>;

/// Named cost figures attached to a step (e.g. energy, latency)
pub type CostMetrics = BTreeMap<String, f64>;

/// A single recorded transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepTrace {
    pub step_number: usize,
    pub timestamp: String,
    pub input_state: usize,
    /// Label of whatever produced the transition ("forward", "backward", ...)
    pub operator: String,
    pub output_state: usize,
    pub is_legal: bool,
    pub delta: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_metrics: Option<CostMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gray_event: Option<GrayEvent>,
}

/// Append-only log of transitions for one validation session
///
/// A trace has a single owner; concurrent sessions use separate traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionTrace {
    pub trace_id: String,
    pub start_time: String,
    pub total_steps: usize,
    pub legal_steps: usize,
    pub illegal_steps: usize,
    pub gray_events: Vec<GrayEvent>,
    pub steps: Vec<StepTrace>,
}

impl ExecutionTrace {
    /// Start an empty trace
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            start_time: utc_timestamp(),
            total_steps: 0,
            legal_steps: 0,
            illegal_steps: 0,
            gray_events: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Start a trace, generating `trace-YYYYmmdd-HHMMSS` when no id is given
    pub fn create(trace_id: Option<String>) -> Self {
        let trace_id = trace_id
            .unwrap_or_else(|| format!("trace-{}", Local::now().format("%Y%m%d-%H%M%S")));
        Self::new(trace_id)
    }

    /// Record one transition and classify it against the adjacency law
    ///
    /// An illegal step gets an `adjacency_violation` Gray event whose index
    /// is the step number.
    pub fn add_step(
        &mut self,
        input_state: usize,
        operator: impl Into<String>,
        output_state: usize,
        cost_metrics: Option<CostMetrics>,
        metadata: Option<Metadata>,
    ) -> &StepTrace {
        let step_number = self.total_steps;
        let is_legal = is_adjacent(input_state, output_state);
        let delta = transition_delta(input_state, output_state);
        let operator = operator.into();

        let gray_event = if is_legal {
            self.legal_steps += 1;
            None
        } else {
            let event = GrayEvent::adjacency_violation(step_number, input_state, output_state);
            tracing::warn!(
                trace_id = %self.trace_id,
                step = step_number,
                from = input_state,
                to = output_state,
                operator = %operator,
                "illegal transition"
            );
            self.gray_events.push(event.clone());
            self.illegal_steps += 1;
            Some(event)
        };

        let position = self.steps.len();
        self.steps.push(StepTrace {
            step_number,
            timestamp: utc_timestamp(),
            input_state,
            operator,
            output_state,
            is_legal,
            delta,
            cost_metrics,
            metadata,
            gray_event,
        });
        self.total_steps += 1;

        &self.steps[position]
    }

    /// True when no illegal step has been recorded
    pub fn is_clean(&self) -> bool {
        self.illegal_steps == 0
    }

    /// States visited, in order: the first input followed by every output
    pub fn states(&self) -> Vec<usize> {
        let mut states = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            states.push(first.input_state);
        }
        states.extend(self.steps.iter().map(|s| s.output_state));
        states
    }

    /// Pretty-printed trace document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild a trace from its JSON document
    ///
    /// # Errors
    /// Rejects documents with unknown fields, invalid Gray events, or
    /// counters that disagree with the recorded steps.
    pub fn from_json(json: &str) -> Result<Self> {
        let trace: Self = serde_json::from_str(json)?;
        trace.check_counters()?;
        Ok(trace)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        tracing::debug!(
            trace_id = %self.trace_id,
            steps = self.total_steps,
            path = %path.as_ref().display(),
            "saved trace"
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    fn check_counters(&self) -> Result<()> {
        if self.total_steps != self.steps.len() {
            return Err(TraceError::Inconsistent(format!(
                "total_steps is {} but {} steps are recorded",
                self.total_steps,
                self.steps.len()
            )));
        }
        if self.legal_steps + self.illegal_steps != self.total_steps {
            return Err(TraceError::Inconsistent(format!(
                "legal_steps ({}) + illegal_steps ({}) != total_steps ({})",
                self.legal_steps, self.illegal_steps, self.total_steps
            )));
        }
        let illegal_recorded = self.steps.iter().filter(|s| !s.is_legal).count();
        if illegal_recorded != self.illegal_steps {
            return Err(TraceError::Inconsistent(format!(
                "illegal_steps is {} but {} steps are marked illegal",
                self.illegal_steps, illegal_recorded
            )));
        }
        if self.gray_events.len() != self.illegal_steps {
            return Err(TraceError::Inconsistent(format!(
                "{} gray events recorded for {} illegal steps",
                self.gray_events.len(),
                self.illegal_steps
            )));
        }
        if let Some(step) = self
            .steps
            .iter()
            .find(|s| s.is_legal == s.gray_event.is_some())
        {
            return Err(TraceError::Inconsistent(format!(
                "step {} has is_legal = {} but {} gray event",
                step.step_number,
                step.is_legal,
                if step.is_legal { "a" } else { "no" }
            )));
        }
        Ok(())
    }
}
