//! Human-readable summaries for the terminal

use crate::canon::{Color, ADJACENCY_RULE};
use crate::degeneracy::DegeneracyMetrics;
use crate::gray_event::GrayEvent;
use crate::trace::ExecutionTrace;

/// Render a canon check result
pub fn format_summary(
    indices: &[usize],
    is_valid: bool,
    events: &[GrayEvent],
    verbose: bool,
) -> String {
    let mut out = String::new();

    let status = if is_valid { "PASS ✓" } else { "FAIL ✗" };
    out.push_str(&format!("Canon Check: {}\n\n", status));
    out.push_str(&format!("Sequence length: {}\n", indices.len()));
    out.push_str(&format!("Adjacency rule: {}\n\n", ADJACENCY_RULE));

    if events.is_empty() {
        out.push_str("No Gray events detected.\n\n");
    } else {
        out.push_str(&format!("Gray Events: {}\n\n", events.len()));
        for event in events {
            out.push_str(&format_event(event));
        }
    }

    if verbose && !indices.is_empty() {
        out.push_str("Full sequence:\n");
        for (i, &index) in indices.iter().enumerate() {
            let color = Color::from_index(index as i64);
            out.push_str(&format!(
                "  {:3}: {} {} ({})\n",
                i,
                color.symbol(),
                color.name(),
                index
            ));
        }
        out.push('\n');
    }

    out
}

fn format_event(event: &GrayEvent) -> String {
    let mut out = format!(
        "  [{}] Index {}\n    Type: {}\n",
        event.severity().as_str().to_uppercase(),
        event.index(),
        event.kind()
    );
    if let Some((from, to)) = event.transition() {
        out.push_str(&format!(
            "    Transition: {}({}) → {}({})\n",
            Color::from_index(from as i64).name(),
            from,
            Color::from_index(to as i64).name(),
            to
        ));
        if let Some(delta) = event.delta() {
            out.push_str(&format!("    Delta: {} (expected ±1 mod 7)\n", delta));
        }
    }
    out.push_str(&format!("    Reason: {}\n\n", event.reason()));
    out
}

/// Render the degeneracy figures beneath a check summary
pub fn format_degeneracy(metrics: &DegeneracyMetrics) -> String {
    let verdict = if metrics.is_degenerate {
        "DEGENERATE"
    } else {
        "ok"
    };
    let mut out = format!("Degeneracy: {}\n", verdict);
    out.push_str(&format!(
        "  Compression ratio: {:.3}\n",
        metrics.compression_ratio
    ));
    out.push_str(&format!(
        "  Entropy estimate:  {:.3}\n",
        metrics.entropy_estimate
    ));
    out.push_str(&format!(
        "  Windows: {} (size {})\n",
        metrics.num_windows, metrics.window_size
    ));
    if let Some(min) = metrics.min_ncd() {
        out.push_str(&format!("  Min window NCD:    {:.3}\n", min));
    }
    let plateau = if metrics.plateau_detected { "yes" } else { "no" };
    out.push_str(&format!("  Plateau: {}\n", plateau));
    if let Some(reason) = &metrics.trigger_reason {
        out.push_str(&format!("  Trigger: {}\n", reason));
    }
    out
}

/// One-screen summary of a recorded trace
pub fn format_trace(trace: &ExecutionTrace) -> String {
    let mut out = format!("Trace: {}\nStarted: {}\n", trace.trace_id, trace.start_time);
    out.push_str(&format!(
        "Steps: {} ({} legal, {} illegal)\n",
        trace.total_steps, trace.legal_steps, trace.illegal_steps
    ));
    for step in trace.steps.iter().filter(|s| !s.is_legal) {
        out.push_str(&format!(
            "  step {:>4}: {} → {} via '{}' (delta {})\n",
            step.step_number,
            Color::from_index(step.input_state as i64).name(),
            Color::from_index(step.output_state as i64).name(),
            step.operator,
            step.delta
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::validate_sequence;
    use crate::degeneracy::{detect_degeneracy, DegeneracyConfig};

    #[test]
    fn test_pass_summary() {
        let summary = format_summary(&[0, 1, 2], true, &[], false);
        assert!(summary.starts_with("Canon Check: PASS ✓"));
        assert!(summary.contains("Sequence length: 3"));
        assert!(summary.contains("No Gray events detected."));
        assert!(!summary.contains("Full sequence"));
    }

    #[test]
    fn test_fail_summary_lists_transition() {
        let events = validate_sequence(&[0, 2]).to_gray_events();
        let summary = format_summary(&[0, 2], false, &events, false);
        assert!(summary.starts_with("Canon Check: FAIL ✗"));
        assert!(summary.contains("[ERROR] Index 0"));
        assert!(summary.contains("Transition: Black(0) → Yellow(2)"));
        assert!(summary.contains("Delta: 2"));
    }

    #[test]
    fn test_verbose_lists_sequence() {
        let summary = format_summary(&[6, 0], true, &[], true);
        assert!(summary.contains("Full sequence:"));
        assert!(summary.contains("  0: 🔵 Blue (6)"));
        assert!(summary.contains("  1: ⚫ Black (0)"));
    }

    #[test]
    fn test_degeneracy_block() {
        let metrics = detect_degeneracy(&[1; 100], &DegeneracyConfig::default());
        let text = format_degeneracy(&metrics);
        assert!(text.starts_with("Degeneracy: DEGENERATE"));
        assert!(text.contains("Trigger: Compression ratio"));
    }

    #[test]
    fn test_trace_summary_lists_illegal_steps() {
        let mut trace = ExecutionTrace::new("t");
        trace.add_step(0, "forward", 1, None, None);
        trace.add_step(1, "leap", 3, None, None);
        let text = format_trace(&trace);
        assert!(text.contains("Steps: 2 (1 legal, 1 illegal)"));
        assert!(text.contains("White → Brown via 'leap' (delta 2)"));
    }
}
