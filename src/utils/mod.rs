pub mod epub_parser;
pub mod pdf_parser;
pub mod text_processor;

pub use epub_parser::{extract_epub_text, run_epub, EpubBackend, EpubDocBackend};
pub use pdf_parser::{extract_pdf_text, run_pdf, LopdfBackend, PdfBackend, PdfExtractBackend, PdfTier};
pub use text_processor::{collapse_whitespace, decode_entities, decode_lossy, html_to_text, join_sections};
