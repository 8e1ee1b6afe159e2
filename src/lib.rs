// Library exports for the extraction binaries

pub mod config;
pub mod error;
pub mod result;
pub mod utils;

// Re-export commonly used types
pub use config::ExtractConfig;
pub use error::{ExitStatus, ExtractionError};
pub use result::{ExtractionResult, Outcome};
