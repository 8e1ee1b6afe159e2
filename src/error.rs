use std::process::ExitCode;
use thiserror::Error;

/// Failure of a single call into a document library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    LibraryOpenFailed(String),

    #[error("{}", page_message(.page, .message))]
    PageReadFailed { page: Option<usize>, message: String },
}

fn page_message(page: &Option<usize>, message: &str) -> String {
    match page {
        Some(page) => format!("page {}: {}", page, message),
        None => message.to_string(),
    }
}

impl ExtractionError {
    pub fn open(err: impl std::fmt::Display) -> Self {
        Self::LibraryOpenFailed(err.to_string())
    }

    pub fn page(page: usize, err: impl std::fmt::Display) -> Self {
        Self::PageReadFailed {
            page: Some(page),
            message: err.to_string(),
        }
    }

    pub fn read(err: impl std::fmt::Display) -> Self {
        Self::PageReadFailed {
            page: None,
            message: err.to_string(),
        }
    }
}

/// Process exit status reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    MissingArgument,
    ExtractionFailed,
    EmptyText,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::MissingArgument => 1,
            ExitStatus::ExtractionFailed => 2,
            ExitStatus::EmptyText => 3,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Run a library call, turning a panic inside it into an error.
///
/// Some parsers panic on malformed input instead of returning an error; the
/// process must still answer with the structured JSON shape.
pub fn guard_panics<T, F>(on_panic: fn(String) -> ExtractionError, f: F) -> Result<T, ExtractionError>
where
    F: FnOnce() -> Result<T, ExtractionError>,
{
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "library panicked".to_string());
            Err(on_panic(message))
        }
    }
}
