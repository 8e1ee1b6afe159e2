use serde::Serialize;
use std::io::Write;

use crate::error::ExitStatus;

/// The JSON object printed once per invocation.
///
/// `text` is present only on success, `error` only on failure, and `details`
/// only when a failure carries per-tier messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ExtractionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            error: None,
            details: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: None,
            error: Some(error.into()),
            details: None,
        }
    }

    pub fn failure_with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            details: Some(details),
            ..Self::failure(error)
        }
    }
}

/// A result together with the exit status it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result: ExtractionResult,
    pub status: ExitStatus,
}

impl Outcome {
    pub fn new(result: ExtractionResult, status: ExitStatus) -> Self {
        Self { result, status }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(ExtractionResult::success(text), ExitStatus::Success)
    }

    pub fn missing_argument(what: &str) -> Self {
        Self::new(
            ExtractionResult::failure(format!("{} path required", what)),
            ExitStatus::MissingArgument,
        )
    }

    /// Write the result as one JSON line. Non-ASCII text is written as-is.
    pub fn emit<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        serde_json::to_writer(&mut out, &self.result)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}
