//! Token parsing: free-form input to canonical color indices
//!
//! Three input shapes are accepted:
//! - a JSON array of indices and/or names: `[0, 1, "Yellow"]`
//! - a run of color glyphs, whitespace ignored: `⚫⚪🟡`
//! - one color name per line: `Black\nWhite\nYellow`
//!
//! Tokens outside the alphabet never abort parsing; each becomes an
//! `unknown_token` Gray event and parsing continues.

use crate::canon::{Color, MODULUS};
use crate::gray_event::GrayEvent;
use serde_json::Value;
use thiserror::Error;

/// Emoji presentation selector some editors append to ⚫ and ⚪
const VARIATION_SELECTOR: char = '\u{FE0F}';

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Error parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON input must be an array")]
    NotAnArray,
}

/// Indices recovered from the input, plus one event per rejected token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTokens {
    pub indices: Vec<usize>,
    pub unknown: Vec<GrayEvent>,
}

impl ParsedTokens {
    pub fn has_unknown(&self) -> bool {
        !self.unknown.is_empty()
    }
}

/// Parse token content into color indices
///
/// # Example
/// ```
/// use codex_canon::parser::parse_tokens;
///
/// let parsed = parse_tokens(r#"[0, 9, "Red"]"#).unwrap();
/// assert_eq!(parsed.indices, vec![0, 4]);
/// assert_eq!(parsed.unknown.len(), 1);
/// assert_eq!(parsed.unknown[0].index(), 1);
///
/// let parsed = parse_tokens("⚫ ⚪ 🟡").unwrap();
/// assert_eq!(parsed.indices, vec![0, 1, 2]);
/// ```
pub fn parse_tokens(content: &str) -> Result<ParsedTokens, ParseError> {
    let content = content.trim();

    let parsed = if content.starts_with('[') {
        parse_json(content)?
    } else if let Some(indices) = parse_symbols(content) {
        ParsedTokens {
            indices,
            unknown: Vec::new(),
        }
    } else {
        parse_names(content)
    };

    tracing::debug!(
        indices = parsed.indices.len(),
        unknown = parsed.unknown.len(),
        "parsed tokens"
    );
    Ok(parsed)
}

fn parse_json(content: &str) -> Result<ParsedTokens, ParseError> {
    let value: Value = serde_json::from_str(content)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(ParseError::NotAnArray),
    };

    let mut parsed = ParsedTokens::default();
    for (i, item) in items.iter().enumerate() {
        let index = match item {
            Value::Number(n) => n.as_u64().filter(|&v| v < MODULUS as u64).map(|v| v as usize),
            Value::String(name) => Color::from_name(name).ok().map(Color::index),
            _ => None,
        };
        match index {
            Some(index) => parsed.indices.push(index),
            None => {
                let token = match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                parsed.unknown.push(GrayEvent::unknown_token(i, &token));
            }
        }
    }
    Ok(parsed)
}

/// `Some` only when every non-whitespace char is a color glyph
fn parse_symbols(content: &str) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    let mut buf = [0u8; 4];
    for ch in content.chars() {
        if ch.is_whitespace() || ch == VARIATION_SELECTOR {
            continue;
        }
        let color = Color::from_symbol(ch.encode_utf8(&mut buf)).ok()?;
        indices.push(color.index());
    }
    if indices.is_empty() {
        None
    } else {
        Some(indices)
    }
}

fn parse_names(content: &str) -> ParsedTokens {
    let mut parsed = ParsedTokens::default();
    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Color::from_name(line) {
            Ok(color) => parsed.indices.push(color.index()),
            Err(_) => parsed
                .unknown
                .push(GrayEvent::unknown_token(line_number, line)),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gray_event::GrayEventKind;

    #[test]
    fn test_json_indices() {
        let parsed = parse_tokens("[0, 1, 2, 3]").unwrap();
        assert_eq!(parsed.indices, vec![0, 1, 2, 3]);
        assert!(!parsed.has_unknown());
    }

    #[test]
    fn test_json_names_case_insensitive() {
        let parsed = parse_tokens(r#"["Black", "white", "YELLOW"]"#).unwrap();
        assert_eq!(parsed.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_json_out_of_range_and_odd_items() {
        let parsed = parse_tokens(r#"[0, 7, -1, "Purple", true, 1]"#).unwrap();
        assert_eq!(parsed.indices, vec![0, 1]);
        let positions: Vec<_> = parsed.unknown.iter().map(|e| e.index()).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert!(parsed
            .unknown
            .iter()
            .all(|e| e.kind() == GrayEventKind::UnknownToken));
        assert!(parsed.unknown[2].reason().contains("'Purple'"));
    }

    #[test]
    fn test_json_malformed() {
        assert!(matches!(parse_tokens("[0, 1"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_symbols() {
        let parsed = parse_tokens("⚫⚪🟡🟤🔴🟢🔵").unwrap();
        assert_eq!(parsed.indices, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_symbols_with_variation_selectors_and_newlines() {
        let parsed = parse_tokens("⚫\u{FE0F}\n⚪\u{FE0F} 🟡\n").unwrap();
        assert_eq!(parsed.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_names_per_line() {
        let parsed = parse_tokens("Black\nWhite\n\nYellow\n").unwrap();
        assert_eq!(parsed.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_name_reports_line() {
        let parsed = parse_tokens("Black\nViolet\nWhite").unwrap();
        assert_eq!(parsed.indices, vec![0, 1]);
        assert_eq!(parsed.unknown.len(), 1);
        assert_eq!(parsed.unknown[0].index(), 1);
    }

    #[test]
    fn test_mixed_symbols_fall_back_to_names() {
        let parsed = parse_tokens("⚫⚪🟣").unwrap();
        assert!(parsed.indices.is_empty());
        assert_eq!(parsed.unknown.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_tokens("   \n").unwrap();
        assert!(parsed.indices.is_empty());
        assert!(!parsed.has_unknown());
    }
}
