pub mod pdftotext;
pub mod tesseract;

use crate::error::PassbookError;

/// Text lines extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// A recognised word with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    pub x_left: f64,
    pub y_center: f64,
    pub text: String,
    /// Recognition confidence when the backend reports one.
    pub confidence: Option<f32>,
}

/// Positioned words of a single page.
#[derive(Debug, Clone)]
pub struct PageWords {
    pub page_number: usize,
    pub words: Vec<WordToken>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, PassbookError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for backends that yield positioned words (OCR or a PDF word layer).
pub trait WordExtractor: Send + Sync {
    fn extract_words(&self, pdf_bytes: &[u8]) -> Result<Vec<PageWords>, PassbookError>;

    fn backend_name(&self) -> &str;
}
