pub mod assemble;
pub mod classify;
pub mod cluster;
pub mod hints;
pub mod normalize;
pub mod patterns;

use crate::config::schema::ParserConfig;
use crate::error::PassbookError;
use crate::extraction::WordToken;
use crate::model::TransactionRecord;
use assemble::RecordAssembler;
use hints::DirectionHints;
use patterns::Patterns;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

/// Line classification and record reconstruction engine.
///
/// Built once from a [`ParserConfig`]; immutable afterwards, so one parser
/// can serve any number of independent parse passes.
#[derive(Debug, Clone)]
pub struct StatementParser {
    patterns: Patterns,
    hints: DirectionHints,
    tag_strip: Option<Regex>,
    tolerance: Decimal,
    line_threshold: f64,
    sign_window: usize,
    context_window: usize,
}

impl StatementParser {
    pub fn new(config: &ParserConfig) -> Result<Self, PassbookError> {
        Ok(StatementParser {
            patterns: Patterns::compile(config)?,
            hints: DirectionHints::from_config(config),
            tag_strip: build_tag_strip(&config.direction_tags)?,
            tolerance: config.tolerance,
            line_threshold: config.line_threshold,
            sign_window: config.sign_window,
            context_window: config.context_window,
        })
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    /// Parse an ordered sequence of text lines into records.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<TransactionRecord> {
        let mut assembler = RecordAssembler::new();
        for line in lines {
            let class = self.classify_line(line.as_ref(), assembler.previous_balance());
            assembler.push(class);
        }
        let records = assembler.finish();
        debug!(lines = lines.len(), records = records.len(), "parse pass done");
        records
    }

    /// Cluster OCR words of one page into text lines.
    pub fn cluster_lines(&self, words: &[WordToken]) -> Vec<String> {
        cluster::cluster_lines(words, self.line_threshold)
    }

    /// Cluster positioned words into lines, then parse them.
    pub fn parse_words(&self, words: &[WordToken]) -> Vec<TransactionRecord> {
        self.parse_lines(&self.cluster_lines(words))
    }
}

/// `(?i)\b(?:CR|DR)\s*$` for the configured tags.
fn build_tag_strip(tags: &[String]) -> Result<Option<Regex>, PassbookError> {
    if tags.is_empty() {
        return Ok(None);
    }
    let alternatives = tags
        .iter()
        .map(|t| regex::escape(t.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\s*$", alternatives))
        .map(Some)
        .map_err(|e| PassbookError::ConfigInvalid(format!("invalid direction_tags: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin::load_preset;
    use crate::model::Movement;
    use rust_decimal_macros::dec;

    fn parser() -> StatementParser {
        StatementParser::new(&load_preset("default").unwrap()).unwrap()
    }

    #[test]
    fn test_multi_line_statement() {
        let lines = [
            "Date Description Debit Credit Balance",
            "01-01-23",
            "Opening transfer from savings",
            "NEFT 5,000.00 5,000.00",
            "ATM WDL 500.00 4,500.00",
            "02-01-23",
            "Grocery store 120.50 4,379.50",
            "Page 1 of 2",
            "salary june 10,000.00 14,379.50",
        ];
        let records = parser().parse_lines(&lines);
        assert_eq!(records.len(), 4);

        // header text is buffered as a fragment and lands on the first record
        assert_eq!(
            records[0].particulars,
            "Date Description Debit Credit Balance Opening transfer from savings NEFT"
        );
        assert_eq!(records[0].date, "01-01-23");

        assert_eq!(records[1].movement, Movement::Debit(dec!(500.00)));
        assert_eq!(records[1].date, "01-01-23");

        // no keyword: balance fell by the amount
        assert_eq!(records[2].movement, Movement::Debit(dec!(120.50)));
        assert_eq!(records[2].date, "02-01-23");

        // "Page 1 of 2" is a fragment of the next record
        assert_eq!(records[3].particulars, "Page 1 of 2 salary june");
        assert_eq!(records[3].movement, Movement::Credit(dec!(10000.00)));
    }

    #[test]
    fn test_exactly_one_side_non_zero() {
        let lines = [
            "01-03-23 POS AMAZON 1,499.00 8,501.00",
            "IMPS JANE 1.00 8,502.00",
            "REFUND AMAZON 1,499.00 10,001.00",
            "TRANSFER -2,000.00 3,000.00",
            "Opening Balance 0.00 3,000.00",
            "NEFT JOHN 0.00 3,000.00",
        ];
        let records = parser().parse_lines(&lines);
        // zero-amount lines never become records
        assert_eq!(records.len(), 4);
        for r in records {
            let zero = Decimal::ZERO;
            assert!((r.debit() == zero) != (r.credit() == zero), "{r:?}");
        }
    }

    #[test]
    fn test_parse_words() {
        let words = vec![
            WordToken {
                x_left: 400.0,
                y_center: 52.0,
                text: "4,500.00".into(),
                confidence: Some(91.0),
            },
            WordToken {
                x_left: 10.0,
                y_center: 50.0,
                text: "ATM".into(),
                confidence: Some(96.0),
            },
            WordToken {
                x_left: 300.0,
                y_center: 49.0,
                text: "500.00".into(),
                confidence: Some(88.0),
            },
        ];
        let records = parser().parse_words(&words);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].debit(), dec!(500.00));
        assert_eq!(records[0].raw, "ATM 500.00 4,500.00");
    }

    #[test]
    fn test_no_tags_keeps_trailing_cr() {
        let mut cfg = load_preset("default").unwrap();
        cfg.direction_tags.clear();
        let parser = StatementParser::new(&cfg).unwrap();
        let records = parser.parse_lines(&["Salary CR 500.00 1500.00"]);
        assert_eq!(records[0].particulars, "Salary CR");
    }
}
