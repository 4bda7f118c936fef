pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;

use error::PassbookError;
use extraction::{PdfExtractor, WordExtractor};
use model::{ExtractionMode, ParsedStatement};
use parsing::normalize::normalize_spaces;
use parsing::StatementParser;
use tracing::{info, warn};

pub use model::{Movement, TransactionRecord};

/// Main API entry point: extract transactions from a PDF statement.
///
/// Tries the text layer first. Only when that yields no records, and a
/// word backend is given, the pages are re-read as positioned words,
/// clustered into lines and parsed again.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    text: &dyn PdfExtractor,
    fallback: Option<&dyn WordExtractor>,
    parser: &StatementParser,
) -> Result<ParsedStatement, PassbookError> {
    let pages = text.extract_pages(pdf_bytes)?;
    let text_lines: Vec<String> = pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .map(|l| normalize_spaces(l))
        .filter(|l| !l.is_empty())
        .collect();

    let records = parser.parse_lines(&text_lines);
    info!(
        backend = text.backend_name(),
        lines = text_lines.len(),
        records = records.len(),
        "text tier"
    );
    if !records.is_empty() {
        return Ok(ParsedStatement {
            mode: ExtractionMode::Text,
            text_lines,
            ocr_lines: Vec::new(),
            records,
        });
    }

    let ocr = match fallback {
        Some(ocr) => ocr,
        None => {
            warn!("no transactions in the text layer and no fallback backend configured");
            return Ok(ParsedStatement {
                mode: ExtractionMode::Text,
                text_lines,
                ocr_lines: Vec::new(),
                records,
            });
        }
    };

    warn!(
        backend = ocr.backend_name(),
        "no transactions in the text layer; falling back to positioned words"
    );
    let pages = ocr.extract_words(pdf_bytes)?;
    let ocr_lines: Vec<String> = pages
        .iter()
        .flat_map(|p| parser.cluster_lines(&p.words))
        .collect();
    let records = parser.parse_lines(&ocr_lines);
    info!(
        backend = ocr.backend_name(),
        pages = pages.len(),
        lines = ocr_lines.len(),
        records = records.len(),
        "word tier"
    );

    Ok(ParsedStatement {
        mode: ExtractionMode::Ocr,
        text_lines,
        ocr_lines,
        records,
    })
}

/// Extract transactions from already-extracted statement text.
pub fn parse_text(text: &str, parser: &StatementParser) -> ParsedStatement {
    let lines: Vec<String> = text
        .lines()
        .map(normalize_spaces)
        .filter(|l| !l.is_empty())
        .collect();
    let records = parser.parse_lines(&lines);
    ParsedStatement {
        mode: ExtractionMode::Text,
        text_lines: lines,
        ocr_lines: Vec::new(),
        records,
    }
}
