//! Seven-color canon: the ordered alphabet and its adjacency law
//!
//! The canon is a fixed cycle of seven colors. A transition between two colors
//! is lawful only when it moves exactly one step forward or backward around
//! the cycle (±1 mod 7). Everything here is `'static` and read-only, so the
//! registry can be shared across threads without synchronization.
//!
//! ```text
//!   ⚫ Black → ⚪ White → 🟡 Yellow → 🟤 Brown → 🔴 Red → 🟢 Green → 🔵 Blue
//!      ↑                                                              │
//!      └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use codex_canon::canon::{is_adjacent, validate_sequence, Color};
//!
//! assert!(is_adjacent(6, 0)); // Blue wraps back to Black
//! assert!(!is_adjacent(0, 2)); // Black cannot jump to Yellow
//!
//! let result = validate_sequence(&[0, 1, 2, 1, 0, 6]);
//! assert!(result.is_valid);
//!
//! assert_eq!(Color::from_name("red").unwrap(), Color::Red);
//! ```

use crate::gray_event::{GrayEvent, GrayEventKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Canon definition version
pub const CANON_VERSION: &str = "1.0.0";

/// Number of colors in the cycle
pub const MODULUS: usize = 7;

/// Legal transition deltas (`-1` is the same step as `6` mod 7)
pub const VALID_DELTAS: [i8; 3] = [1, -1, 6];

/// Human-readable statement of the adjacency law
pub const ADJACENCY_RULE: &str = "Each transition must move exactly one step around the cycle (delta ±1 mod 7)";

/// Errors raised by registry lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    #[error("Unknown color name: {0}")]
    UnknownName(String),

    #[error("Unknown color symbol: {0}")]
    UnknownSymbol(String),
}

/// The seven canonical colors, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Yellow,
    Brown,
    Red,
    Green,
    Blue,
}

/// Static metadata attached to each color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorInfo {
    pub index: usize,
    pub name: &'static str,
    pub symbol: &'static str,
}

static COLOR_TABLE: [ColorInfo; MODULUS] = [
    ColorInfo { index: 0, name: "Black", symbol: "⚫" },
    ColorInfo { index: 1, name: "White", symbol: "⚪" },
    ColorInfo { index: 2, name: "Yellow", symbol: "🟡" },
    ColorInfo { index: 3, name: "Brown", symbol: "🟤" },
    ColorInfo { index: 4, name: "Red", symbol: "🔴" },
    ColorInfo { index: 5, name: "Green", symbol: "🟢" },
    ColorInfo { index: 6, name: "Blue", symbol: "🔵" },
];

impl Color {
    /// All colors in canonical order
    pub const ALL: [Color; MODULUS] = [
        Color::Black,
        Color::White,
        Color::Yellow,
        Color::Brown,
        Color::Red,
        Color::Green,
        Color::Blue,
    ];

    /// Look up a color by index, wrapping modulo 7
    ///
    /// Any integer resolves: `from_index(9)` is Yellow and `from_index(-1)`
    /// is Blue. This is a convenience, not validation.
    pub fn from_index(index: i64) -> Color {
        Self::ALL[index.rem_euclid(MODULUS as i64) as usize]
    }

    /// Look up a color by name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Color, CanonError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CanonError::UnknownName(name.to_string()))
    }

    /// Look up a color by its glyph
    pub fn from_symbol(symbol: &str) -> Result<Color, CanonError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.symbol() == symbol)
            .ok_or_else(|| CanonError::UnknownSymbol(symbol.to_string()))
    }

    pub fn info(self) -> &'static ColorInfo {
        &COLOR_TABLE[self as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    /// Next color forward around the cycle
    pub fn next(self) -> Color {
        Self::from_index(self as i64 + 1)
    }

    /// Previous color around the cycle
    pub fn prev(self) -> Color {
        Self::from_index(self as i64 - 1)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.name())
    }
}

/// Static metadata for every color, in canonical order
pub fn colors() -> &'static [ColorInfo; MODULUS] {
    &COLOR_TABLE
}

/// Cyclic distance from `from` to `to`, in `0..modulus`
pub fn transition_delta_mod(from: usize, to: usize, modulus: usize) -> usize {
    let modulus = modulus.max(1);
    (to % modulus + modulus - from % modulus) % modulus
}

/// Cyclic distance from `from` to `to` under the canon modulus
pub fn transition_delta(from: usize, to: usize) -> usize {
    transition_delta_mod(from, to, MODULUS)
}

/// Check whether `from → to` respects the adjacency law
///
/// Self-transitions (delta 0) are never lawful.
pub fn is_adjacent(from: usize, to: usize) -> bool {
    let delta = transition_delta(from, to);
    VALID_DELTAS
        .iter()
        .any(|&d| (d as i64).rem_euclid(MODULUS as i64) as usize == delta)
}

/// A single illegal transition found by [`validate_sequence`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: GrayEventKind,
    /// Position of the first element of the offending pair
    pub index: usize,
    pub from: usize,
    pub to: usize,
    pub delta: usize,
    pub reason: String,
}

impl Violation {
    fn adjacency(index: usize, from: usize, to: usize) -> Self {
        let delta = transition_delta(from, to);
        Self {
            kind: GrayEventKind::AdjacencyViolation,
            index,
            from,
            to,
            delta,
            reason: format!("Illegal jump: delta {} not in {:?}", delta, VALID_DELTAS),
        }
    }
}

/// Outcome of batch validation over a complete sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Promote each violation to a full adjacency Gray event
    pub fn to_gray_events(&self) -> Vec<GrayEvent> {
        self.violations
            .iter()
            .map(|v| GrayEvent::adjacency_violation(v.index, v.from, v.to))
            .collect()
    }
}

/// Validate every consecutive pair of a color-index sequence
///
/// Sequences of length 0 or 1 are trivially valid. Indices are assumed to be
/// canonical already; out-of-range values are never rejected here, only
/// reduced modulo 7 when computing the delta.
pub fn validate_sequence(sequence: &[usize]) -> ValidationResult {
    let violations: Vec<Violation> = sequence
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| !is_adjacent(pair[0], pair[1]))
        .map(|(i, pair)| Violation::adjacency(i, pair[0], pair[1]))
        .collect();

    tracing::debug!(
        length = sequence.len(),
        violations = violations.len(),
        "validated sequence"
    );

    ValidationResult {
        is_valid: violations.is_empty(),
        violations,
    }
}
