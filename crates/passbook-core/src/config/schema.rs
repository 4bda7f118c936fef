use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Grammars and keyword vocabulary for one statement layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Money grammar. Matches touching further digits are rejected by the
    /// extractor, so the pattern itself needs no lookaround.
    pub money_pattern: String,
    /// Date grammars in priority order. Capture group 1 is the date when
    /// present, otherwise the whole match.
    pub date_patterns: Vec<String>,
    pub credit_hints: Vec<String>,
    pub debit_hints: Vec<String>,
    /// Trailing tokens stripped from particulars (e.g. "CR", "DR").
    #[serde(default)]
    pub direction_tags: Vec<String>,
    /// Cheque number grammars; capture group 1 is the number.
    #[serde(default)]
    pub cheque_patterns: Vec<String>,
    /// Maximum discrepancy accepted when matching a balance delta.
    pub tolerance: Decimal,
    /// Vertical distance (pixels) within which OCR words share a line.
    pub line_threshold: f64,
    /// Characters before the amount searched for a minus sign.
    #[serde(default = "default_sign_window")]
    pub sign_window: usize,
    /// Characters on each side of the amount searched for debit keywords.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

fn default_sign_window() -> usize {
    3
}

fn default_context_window() -> usize {
    12
}
