use crate::error::PassbookError;
use crate::extraction::{PageContent, PageWords, PdfExtractor, WordExtractor, WordToken};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so that amount and balance columns stay on the
/// same line as their description. As a [`WordExtractor`] it reads the
/// embedded word layer with `-bbox`, which gives the clusterer positioned
/// words without running OCR.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PassbookError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let output = run_pdftotext("-layout", tmpfile.path())?;
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_pages(&text))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

impl WordExtractor for PdftotextExtractor {
    fn extract_words(&self, pdf_bytes: &[u8]) -> Result<Vec<PageWords>, PassbookError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let output = run_pdftotext("-bbox", tmpfile.path())?;
        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_words(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext-bbox"
    }
}

fn write_temp_pdf(pdf_bytes: &[u8]) -> Result<tempfile::NamedTempFile, PassbookError> {
    let mut tmpfile =
        tempfile::NamedTempFile::new().map_err(|e| PassbookError::Extraction(e.to_string()))?;
    tmpfile
        .write_all(pdf_bytes)
        .map_err(|e| PassbookError::Extraction(e.to_string()))?;
    Ok(tmpfile)
}

fn run_pdftotext(mode: &str, pdf_path: &Path) -> Result<Output, PassbookError> {
    let output = Command::new("pdftotext")
        .arg(mode)
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PassbookError::PdftotextNotFound
            } else {
                PassbookError::Extraction(format!("pdftotext {} failed: {}", mode, e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(PassbookError::PdftotextFailed { code, stderr });
    }

    Ok(output)
}

/// Split pdftotext output into pages (form feed separates pages).
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            lines: page_text.lines().map(|l| l.to_string()).collect(),
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

/// Read `pdftotext -bbox` XHTML into positioned words, one entry per `<page>`.
fn parse_bbox_words(xml: &str) -> Result<Vec<PageWords>, PassbookError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageWords> = Vec::new();
    let mut word: Option<WordToken> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"page" => {
                pages.push(PageWords {
                    page_number: pages.len() + 1,
                    words: Vec::new(),
                });
            }
            Event::Start(ref e) if e.name().as_ref() == b"word" => word = word_box(e),
            Event::Text(ref t) => {
                if let Some(w) = word.as_mut() {
                    w.text.push_str(&t.unescape()?);
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"word" => {
                if let (Some(mut w), Some(page)) = (word.take(), pages.last_mut()) {
                    w.text = w.text.trim().to_string();
                    if !w.text.is_empty() {
                        page.words.push(w);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

/// Coordinates of a `<word>` tag; `None` when any of them is missing.
fn word_box(tag: &BytesStart<'_>) -> Option<WordToken> {
    let (mut x_min, mut y_min, mut y_max) = (None, None, None);
    for attr in tag.attributes().flatten() {
        let value = std::str::from_utf8(&attr.value)
            .ok()
            .and_then(|v| v.parse::<f64>().ok());
        match attr.key.as_ref() {
            b"xMin" => x_min = value,
            b"yMin" => y_min = value,
            b"yMax" => y_max = value,
            _ => {}
        }
    }
    Some(WordToken {
        x_left: x_min?,
        y_center: (y_min? + y_max?) / 2.0,
        text: String::new(),
        confidence: None,
    })
}
