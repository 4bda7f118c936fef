use crate::error::PassbookError;
use crate::extraction::{PageWords, WordExtractor, WordToken};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_LANG: &str = "eng";

/// OCR backend: renders pages with `pdftoppm`, recognises them with the
/// `tesseract` CLI and reads its TSV word boxes.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pub dpi: u32,
    pub lang: String,
}

impl TesseractOcr {
    pub fn new(dpi: u32, lang: impl Into<String>) -> Self {
        TesseractOcr {
            dpi,
            lang: lang.into(),
        }
    }

    fn render_pages(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, PassbookError> {
        let prefix = out_dir.join("page");
        check_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .arg("-r")
                .arg(self.dpi.to_string())
                .arg("-png")
                .arg(pdf_path)
                .arg(&prefix)
                .output(),
        )?;

        // pdftoppm zero-pads page numbers, so name order is page order
        let mut images: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();
        Ok(images)
    }

    fn recognize(&self, image: &Path) -> Result<Vec<WordToken>, PassbookError> {
        let output = check_tool(
            "tesseract",
            Command::new("tesseract")
                .arg(image)
                .arg("stdout")
                .arg("-l")
                .arg(&self.lang)
                .arg("tsv")
                .output(),
        )?;
        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(DEFAULT_DPI, DEFAULT_LANG)
    }
}

impl WordExtractor for TesseractOcr {
    fn extract_words(&self, pdf_bytes: &[u8]) -> Result<Vec<PageWords>, PassbookError> {
        let workdir = tempfile::tempdir().map_err(|e| PassbookError::Extraction(e.to_string()))?;
        let pdf_path = workdir.path().join("statement.pdf");
        std::fs::write(&pdf_path, pdf_bytes)?;

        let images_dir = workdir.path().join("pages");
        std::fs::create_dir(&images_dir)?;
        let images = self.render_pages(&pdf_path, &images_dir)?;

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let words = self.recognize(image)?;
            debug!(page = i + 1, words = words.len(), "ocr page recognised");
            pages.push(PageWords {
                page_number: i + 1,
                words,
            });
        }
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

fn check_tool(tool: &str, result: std::io::Result<Output>) -> Result<Output, PassbookError> {
    let output = result.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PassbookError::ToolNotFound(tool.to_string())
        } else {
            PassbookError::Extraction(format!("{} failed: {}", tool, e))
        }
    })?;

    if !output.status.success() {
        return Err(PassbookError::ToolFailed {
            tool: tool.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(output)
}

/// Parse tesseract TSV output into word tokens.
///
/// Columns are located by header name. Only level-5 rows (words) with text
/// are kept. Quoting is off: OCR text may carry stray `"` characters.
fn parse_tsv(tsv: &str) -> Result<Vec<WordToken>, PassbookError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(tsv.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            PassbookError::Extraction(format!("tesseract TSV has no '{}' column", name))
        })
    };
    let level = column("level")?;
    let left = column("left")?;
    let top = column("top")?;
    let height = column("height")?;
    let conf = column("conf")?;
    let text = column("text")?;

    let mut words = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.get(level).map(str::trim) != Some("5") {
            continue;
        }
        let Some(word) = row.get(text).map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        let number = |i: usize| row.get(i).and_then(|v| v.trim().parse::<f64>().ok());
        let (Some(x), Some(y), Some(h)) = (number(left), number(top), number(height)) else {
            continue;
        };
        words.push(WordToken {
            x_left: x,
            y_center: y + h / 2.0,
            text: word.to_string(),
            confidence: row
                .get(conf)
                .and_then(|c| c.trim().parse::<f32>().ok())
                .filter(|c| *c >= 0.0),
        });
    }
    Ok(words)
}
