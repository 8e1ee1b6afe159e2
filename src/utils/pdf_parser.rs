use lopdf::Document;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use super::text_processor::join_sections;
use crate::config::ExtractConfig;
use crate::error::{guard_panics, ExitStatus, ExtractionError};
use crate::result::{ExtractionResult, Outcome};

/// Reads per-page text from a PDF.
pub trait PdfBackend {
    /// Text of every page, in document order.
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// Position of a backend in the fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfTier {
    Primary,
    Secondary,
}

impl PdfTier {
    /// Prefix used for this tier's entry in `details`. Callers match on these
    /// exact strings.
    pub fn label(self) -> &'static str {
        match self {
            PdfTier::Primary => "pypdf",
            PdfTier::Secondary => "pdfplumber",
        }
    }
}

impl fmt::Display for PdfTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Primary backend: `pdf-extract`, one string per page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

impl PdfBackend for PdfExtractBackend {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        let bytes = std::fs::read(path).map_err(ExtractionError::open)?;
        guard_panics(ExtractionError::read, || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(ExtractionError::read)
        })
    }
}

/// Secondary backend: `lopdf`, walking the page tree and extracting each page.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        guard_panics(ExtractionError::read, || {
            let doc = Document::load(path).map_err(ExtractionError::open)?;

            let pages = doc.get_pages();
            debug!("lopdf found {} pages", pages.len());

            pages
                .keys()
                .map(|&number| {
                    doc.extract_text(&[number])
                        .map_err(|e| ExtractionError::page(number as usize, e))
                })
                .collect()
        })
    }
}

/// Run one tier: per-page text, blank pages dropped, joined and trimmed.
fn run_tier(
    tier: PdfTier,
    backend: &dyn PdfBackend,
    path: &Path,
    config: &ExtractConfig,
) -> Result<String, ExtractionError> {
    let pages = backend.page_texts(path)?;
    let text = join_sections(&pages, &config.section_separator);
    info!("{} tier read {} pages, {} characters", tier, pages.len(), text.len());
    Ok(text)
}

/// Try the primary backend, then the secondary only if the primary produced
/// no text. Each tier runs at most once.
///
/// On failure the error holds one `"<tier>:<message>"` entry per tier that
/// raised; a tier that merely produced empty text adds nothing.
pub fn extract_pdf_text(
    primary: &dyn PdfBackend,
    secondary: &dyn PdfBackend,
    path: &Path,
    config: &ExtractConfig,
) -> Result<String, Vec<String>> {
    info!("Extracting text from PDF: {:?}", path);

    let tiers = [(PdfTier::Primary, primary), (PdfTier::Secondary, secondary)];
    let mut details = Vec::new();

    for (tier, backend) in tiers {
        match run_tier(tier, backend, path, config) {
            Ok(text) if !text.is_empty() => return Ok(text),
            Ok(_) => warn!("{} tier produced no text for {:?}", tier, path),
            Err(e) => {
                warn!("{} tier failed for {:?}: {}", tier, path, e);
                details.push(format!("{}:{}", tier.label(), e));
            }
        }
    }

    Err(details)
}

/// Full PDF tool flow: argument check, two-tier extraction, and exit status.
pub fn run_pdf(
    primary: &dyn PdfBackend,
    secondary: &dyn PdfBackend,
    path: Option<&Path>,
    config: &ExtractConfig,
) -> Outcome {
    let Some(path) = path else {
        return Outcome::missing_argument("pdf");
    };

    match extract_pdf_text(primary, secondary, path, config) {
        Ok(text) => Outcome::success(text),
        Err(details) => Outcome::new(
            ExtractionResult::failure_with_details("pdf extraction failed", details),
            ExitStatus::ExtractionFailed,
        ),
    }
}
