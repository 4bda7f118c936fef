use passbook_core::config::{builtin, load_config};
use passbook_core::error::PassbookError;
use passbook_core::export;
use passbook_core::extraction::pdftotext::PdftotextExtractor;
use passbook_core::extraction::tesseract::TesseractOcr;
use passbook_core::extraction::WordExtractor;
use passbook_core::model::{ExtractionMode, ParsedStatement, StatementSummary};
use passbook_core::parsing::StatementParser;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output;
use crate::Fallback;

pub struct ParseArgs {
    pub input_file: PathBuf,
    pub output_format: String,
    pub output_file: Option<PathBuf>,
    pub preset: String,
    pub config: Option<PathBuf>,
    pub fallback: Fallback,
    pub dpi: u32,
    pub lang: String,
    pub debug_dir: Option<PathBuf>,
}

pub fn run(args: ParseArgs) -> Result<(), PassbookError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => builtin::load_preset(&args.preset)?,
    };
    let parser = StatementParser::new(&config)?;

    // Determine input type by extension
    let is_text = args
        .input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    let parsed = if is_text {
        let text = std::fs::read_to_string(&args.input_file)?;
        passbook_core::parse_text(&text, &parser)
    } else {
        let pdf_bytes = std::fs::read(&args.input_file)?;
        let extractor = PdftotextExtractor::new();
        let ocr = TesseractOcr::new(args.dpi, args.lang.clone());
        let fallback: Option<&dyn WordExtractor> = match args.fallback {
            Fallback::Ocr => Some(&ocr),
            Fallback::Words => Some(&extractor),
            Fallback::Disabled => None,
        };
        passbook_core::parse_pdf(&pdf_bytes, &extractor, fallback, &parser)?
    };

    if let Some(dir) = &args.debug_dir {
        write_debug_files(dir, &parsed)?;
    }

    let summary = StatementSummary::from_records(&parsed.records, parser.tolerance());

    match &args.output_file {
        Some(path) => {
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            let body = if is_csv {
                export::csv_string(&parsed.records)?
            } else {
                export::json_string(&parsed.records)?
            };
            std::fs::write(path, body)?;
            eprintln!(
                "Parsed {} transaction(s) via {} extraction, written to {}",
                parsed.records.len(),
                parsed.mode,
                path.display()
            );
            if summary.balance_breaks > 0 {
                eprintln!(
                    "  {} balance break(s): running balance does not follow the movements",
                    summary.balance_breaks
                );
            }
        }
        None => match args.output_format.as_str() {
            "json" => output::json::print(&parsed.records)?,
            "csv" => output::csv::print(&parsed.records)?,
            _ => output::table::print(&parsed, &summary),
        },
    }

    if parsed.is_empty() {
        eprintln!("No transactions found. Re-run with --debug-dir to inspect extracted lines.");
    }

    Ok(())
}

fn write_debug_files(dir: &Path, parsed: &ParsedStatement) -> Result<(), PassbookError> {
    std::fs::create_dir_all(dir)?;

    std::fs::write(dir.join("text_lines.txt"), parsed.text_lines.join("\n"))?;
    if parsed.mode == ExtractionMode::Ocr {
        std::fs::write(dir.join("ocr_lines.txt"), parsed.ocr_lines.join("\n"))?;
    }

    std::fs::write(
        dir.join("parsed_preview.json"),
        serde_json::to_string_pretty(parsed)?,
    )?;
    std::fs::write(
        dir.join("parsed_preview.csv"),
        export::csv_string(&parsed.records)?,
    )?;

    info!(dir = %dir.display(), mode = %parsed.mode, "wrote debug files");
    Ok(())
}
