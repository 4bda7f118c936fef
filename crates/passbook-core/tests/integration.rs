//! Integration tests for the parse_pdf() two-tier pipeline.
//!
//! Uses mock extractors that return pre-built pages without invoking
//! pdftotext, pdftoppm or tesseract.

use std::sync::atomic::{AtomicUsize, Ordering};

use passbook_core::config::builtin::load_preset;
use passbook_core::error::PassbookError;
use passbook_core::extraction::{PageContent, PageWords, PdfExtractor, WordExtractor, WordToken};
use passbook_core::model::{ExtractionMode, StatementSummary};
use passbook_core::parsing::StatementParser;
use passbook_core::{parse_pdf, parse_text, Movement};
use rust_decimal_macros::dec;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PassbookError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct MockOcr {
    pages: Vec<PageWords>,
    calls: AtomicUsize,
}

impl WordExtractor for MockOcr {
    fn extract_words(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageWords>, PassbookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock-ocr"
    }
}

struct FailingOcr;

impl WordExtractor for FailingOcr {
    fn extract_words(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageWords>, PassbookError> {
        Err(PassbookError::ToolNotFound("tesseract".into()))
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

fn parser() -> StatementParser {
    StatementParser::new(&load_preset("default").unwrap()).unwrap()
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn word(x: f64, y: f64, text: &str) -> WordToken {
    WordToken {
        x_left: x,
        y_center: y,
        text: text.into(),
        confidence: Some(90.0),
    }
}

fn scanned_only() -> MockExtractor {
    MockExtractor {
        pages: vec![page(1, &["", "   "])],
    }
}

// ---------------------------------------------------------------------------
// Text tier succeeds: OCR is never invoked
// ---------------------------------------------------------------------------
#[test]
fn text_tier_used_when_it_yields_records() {
    let extractor = MockExtractor {
        pages: vec![
            page(
                1,
                &[
                    "   STATEMENT OF ACCOUNT",
                    "   Date        Particulars                 Withdrawals   Deposits     Balance",
                    "   01-06-2023  OPENING BALANCE                                        10,000.00",
                    "   02-06-2023  UPI/CR/314159/ACME PAYROLL                52,000.00   62,000.00",
                    "   03-06-2023  ATM WDL MG ROAD            5,000.00                   57,000.00",
                ],
            ),
            page(
                2,
                &[
                    "   05-06-2023  NEFT RENT                 15,000.00                   42,000.00",
                    "               ELECTRICITY BILL",
                    "               BESCOM                     1,234.56                   40,765.44",
                ],
            ),
        ],
    };
    let ocr = MockOcr {
        pages: vec![],
        calls: AtomicUsize::new(0),
    };

    let parsed = parse_pdf(&[], &extractor, Some(&ocr), &parser()).unwrap();

    assert_eq!(parsed.mode, ExtractionMode::Text);
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    assert_eq!(parsed.records.len(), 4);

    let r = &parsed.records;
    assert_eq!(r[0].movement, Movement::Credit(dec!(52000.00)));
    assert_eq!(r[0].date, "02-06-2023");
    // opening balance line has one amount: buffered as description
    assert_eq!(
        r[0].particulars,
        "STATEMENT OF ACCOUNT Date Particulars Withdrawals Deposits Balance 01-06-2023 OPENING BALANCE 10,000.00 02-06-2023 UPI/CR/314159/ACME PAYROLL"
    );
    assert_eq!(r[1].movement, Movement::Debit(dec!(5000.00)));
    assert_eq!(r[2].movement, Movement::Debit(dec!(15000.00)));

    // continuation line without a date is forward-filled
    assert_eq!(r[3].date, "05-06-2023");
    assert_eq!(r[3].particulars, "ELECTRICITY BILL BESCOM");
    assert_eq!(r[3].movement, Movement::Debit(dec!(1234.56)));
    assert_eq!(r[3].balance, dec!(40765.44));

    let summary = StatementSummary::from_records(r, parser().tolerance());
    assert_eq!(summary.balance_breaks, 0);
    assert_eq!(summary.total_debit, dec!(21234.56));
    assert_eq!(summary.closing_balance, Some(dec!(40765.44)));
}

// ---------------------------------------------------------------------------
// Empty text layer falls back to clustered words
// ---------------------------------------------------------------------------
#[test]
fn ocr_tier_used_when_text_layer_is_empty() {
    let ocr = MockOcr {
        pages: vec![
            PageWords {
                page_number: 1,
                words: vec![
                    word(900.0, 401.0, "4,500.00"),
                    word(100.0, 400.0, "01-01-23"),
                    word(300.0, 399.0, "ATM"),
                    word(700.0, 402.0, "500.00"),
                    word(400.0, 400.0, "WDL"),
                ],
            },
            PageWords {
                page_number: 2,
                words: vec![
                    word(100.0, 200.0, "NEFT"),
                    word(200.0, 201.0, "SALARY"),
                    word(700.0, 199.0, "2,000.00"),
                    word(900.0, 200.0, "6,500.00"),
                ],
            },
        ],
        calls: AtomicUsize::new(0),
    };

    // a text layer with no amounts: kept for diagnostics, then the word tier runs
    let extractor = MockExtractor {
        pages: vec![page(1, &["  Scanned   statement ", ""])],
    };
    let parsed = parse_pdf(&[], &extractor, Some(&ocr), &parser()).unwrap();

    assert_eq!(parsed.mode, ExtractionMode::Ocr);
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(parsed.text_lines, vec!["Scanned statement"]);
    assert_eq!(
        parsed.ocr_lines,
        vec!["01-01-23 ATM WDL 500.00 4,500.00", "NEFT SALARY 2,000.00 6,500.00"]
    );
    assert_eq!(parsed.lines(), parsed.ocr_lines.as_slice());
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].movement, Movement::Debit(dec!(500.00)));
    // balance carried across pages: +2,000.00 is a credit
    assert_eq!(parsed.records[1].movement, Movement::Credit(dec!(2000.00)));
    assert_eq!(parsed.records[1].date, "01-01-23");
}

// ---------------------------------------------------------------------------
// No fallback backend: empty result is not an error
// ---------------------------------------------------------------------------
#[test]
fn empty_result_without_fallback() {
    let parsed = parse_pdf(&[], &scanned_only(), None, &parser()).unwrap();
    assert_eq!(parsed.mode, ExtractionMode::Text);
    assert!(parsed.is_empty());
    assert!(parsed.text_lines.is_empty());
    assert!(parsed.ocr_lines.is_empty());
}

#[test]
fn fallback_errors_propagate() {
    let err = parse_pdf(&[], &scanned_only(), Some(&FailingOcr), &parser()).unwrap_err();
    assert!(matches!(err, PassbookError::ToolNotFound(_)));
}

// ---------------------------------------------------------------------------
// Plain text input
// ---------------------------------------------------------------------------
#[test]
fn parse_text_forward_fills_dates() {
    let text = "\
12 Jan 2023
Cash deposit branch 1,000.00 3,000.00
Transfer to savings 500.00 2,500.00

15 Jan 2023
IMPS JANE 250.00 2,750.00
Bank charges 10.00 2,740.00
";
    let parsed = parse_text(text, &parser());
    let dates: Vec<&str> = parsed.records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["12 Jan 2023", "12 Jan 2023", "15 Jan 2023", "15 Jan 2023"]
    );
    assert_eq!(parsed.records[0].movement, Movement::Credit(dec!(1000.00)));
    assert_eq!(parsed.records[1].movement, Movement::Debit(dec!(500.00)));
    assert_eq!(parsed.records[2].movement, Movement::Credit(dec!(250.00)));
    assert_eq!(parsed.records[3].movement, Movement::Debit(dec!(10.00)));
}

#[test]
fn records_serialize_with_decimal_strings() {
    let parsed = parse_text("ATM WDL 500.00 4,500.00", &parser());
    let json = serde_json::to_value(&parsed.records[0]).unwrap();
    assert_eq!(json["balance"], "4500.00");
    assert_eq!(json["movement"]["direction"], "debit");
    assert_eq!(json["direction_basis"], "debit_hint");
    assert!(json.get("cheque_number").is_none());
}
