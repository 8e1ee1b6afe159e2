use serde::{Deserialize, Serialize};
use std::fmt;
use tracing_subscriber::EnvFilter;

/// Environment variable checked first for the log filter.
pub const LOG_ENV: &str = "EXTRACT_LOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// `tracing` filter directive, e.g. `warn` or `studio_text_extract=debug`.
    pub log_filter: String,
    /// Placed between non-empty sections (EPUB items, PDF pages).
    pub section_separator: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            section_separator: default_section_separator(),
        }
    }
}

impl ExtractConfig {
    /// Build the configuration from the environment.
    ///
    /// `EXTRACT_LOG` wins over `RUST_LOG`; with neither set the default
    /// filter is used.
    pub fn from_env() -> Self {
        let log_filter = std::env::var(LOG_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_log_filter);

        Self {
            log_filter,
            ..Self::default()
        }
    }

    pub fn validate(&self) {
        assert!(!self.section_separator.is_empty(), "section_separator must not be empty");
    }

    /// Install the global fmt subscriber. Logs go to stderr; stdout is
    /// reserved for the JSON result.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_new(&self.log_filter)
            .unwrap_or_else(|_| EnvFilter::new(default_log_filter()));

        // A subscriber may already be installed (tests); that is fine.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

impl fmt::Display for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_section_separator() -> String {
    "\n\n".to_string()
}
