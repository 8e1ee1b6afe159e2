use epub::doc::EpubDoc;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use super::text_processor::{decode_lossy, html_to_text, join_sections};
use crate::config::ExtractConfig;
use crate::error::{guard_panics, ExitStatus, ExtractionError};
use crate::result::{ExtractionResult, Outcome};

/// Reads the raw document items of an EPUB archive.
pub trait EpubBackend {
    /// Raw bytes of every document item: spine order first, then any
    /// manifest documents outside the spine.
    fn document_items(&self, path: &Path) -> Result<Vec<Vec<u8>>, ExtractionError>;
}

/// Backend over the `epub` crate. Spine items come first, in reading order,
/// followed by manifest documents the spine never references, sorted by id.
/// Only (X)HTML items count as documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct EpubDocBackend;

impl EpubBackend for EpubDocBackend {
    fn document_items(&self, path: &Path) -> Result<Vec<Vec<u8>>, ExtractionError> {
        guard_panics(ExtractionError::read, || {
            let mut doc = EpubDoc::new(path).map_err(ExtractionError::open)?;

            let spine_len = doc.spine.len();
            debug!("EPUB spine has {} entries", spine_len);

            let mut items = Vec::with_capacity(spine_len);
            let mut visited = HashSet::new();
            for i in 0..spine_len {
                doc.set_current_chapter(i);
                if let Some(id) = doc.get_current_id() {
                    if !visited.insert(id) {
                        continue;
                    }
                }

                let (content, mime) = doc
                    .get_current()
                    .ok_or_else(|| ExtractionError::page(i, "spine item has no readable resource"))?;

                if is_document_mime(&mime) {
                    items.push(content);
                } else {
                    debug!("Skipping spine item {} with media type {}", i, mime);
                }
            }

            let mut unlisted: Vec<String> = doc
                .resources
                .keys()
                .filter(|id| !visited.contains(*id))
                .filter(|id| doc.get_resource_mime(id).is_some_and(|m| is_document_mime(&m)))
                .cloned()
                .collect();
            unlisted.sort();

            for id in unlisted {
                let (content, _mime) = doc.get_resource(&id).ok_or_else(|| {
                    ExtractionError::read(format!("manifest item {} has no readable resource", id))
                })?;
                debug!("Including manifest document {} outside the spine", id);
                items.push(content);
            }

            Ok(items)
        })
    }
}

fn is_document_mime(mime: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    mime == "application/xhtml+xml" || mime == "text/html"
}

/// Extract the plain text of every document item, joined by the configured
/// separator. An empty string means the archive had no visible text.
pub fn extract_epub_text<B: EpubBackend>(
    backend: &B,
    path: &Path,
    config: &ExtractConfig,
) -> Result<String, ExtractionError> {
    info!("Extracting text from EPUB: {:?}", path);

    let items = backend.document_items(path)?;
    let sections: Vec<String> = items
        .iter()
        .map(|bytes| html_to_text(&decode_lossy(bytes)))
        .collect();

    let text = join_sections(&sections, &config.section_separator);
    info!(
        "Extracted {} non-empty sections from {} document items",
        sections.iter().filter(|s| !s.is_empty()).count(),
        items.len()
    );

    Ok(text)
}

/// Full EPUB tool flow: argument check, extraction, and exit status.
pub fn run_epub<B: EpubBackend>(backend: &B, path: Option<&Path>, config: &ExtractConfig) -> Outcome {
    let Some(path) = path else {
        return Outcome::missing_argument("epub");
    };

    match extract_epub_text(backend, path, config) {
        Ok(text) if text.is_empty() => {
            warn!("No text extracted from EPUB: {:?}", path);
            Outcome::new(
                ExtractionResult::failure("no text extracted from epub"),
                ExitStatus::EmptyText,
            )
        }
        Ok(text) => Outcome::success(text),
        Err(e) => {
            warn!("EPUB extraction failed for {:?}: {}", path, e);
            Outcome::new(
                ExtractionResult::failure(format!("ebooklib extraction failed: {}", e)),
                ExitStatus::ExtractionFailed,
            )
        }
    }
}
