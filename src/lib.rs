//! Codex Canon - adjacency law, Gray events and degeneracy detection for
//! seven-color sequences
//!
//! This library provides the canonical seven-color cycle, the ±1 (mod 7)
//! adjacency check, structured Gray event records for every anomaly, a
//! compression-based degeneracy analyzer, and a streaming execution trace
//! that persists as JSON.

pub mod canon;
pub mod cli;
pub mod degeneracy;
pub mod gray_event;
pub mod json_output;
pub mod parser;
pub mod text_output;
pub mod trace;
