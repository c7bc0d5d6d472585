//! GitHub Actions workflow commands.
//!
//! Messages go to stdout as `::command::data` lines; outputs are appended to
//! the file named by `GITHUB_OUTPUT` using the multi-line heredoc syntax.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::boundary::ReleaseWarning;
use crate::error::{ReleaseError, Result};
use crate::ui::Reporter;

/// Environment variable naming the step output file.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Escapes command data the way the runner expects.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Heredoc entry for the output file. The delimiter never occurs in `value`.
pub fn output_entry(name: &str, value: &str) -> String {
    let mut delimiter = format!(
        "ghadelimiter_{}_{}",
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    while value.contains(&delimiter) {
        delimiter.push('_');
    }

    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Reporter speaking the GitHub Actions runner protocol.
#[derive(Debug, Clone, Default)]
pub struct ActionsReporter {
    output_file: Option<PathBuf>,
}

impl ActionsReporter {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        ActionsReporter { output_file }
    }

    /// Picks up the output file from `GITHUB_OUTPUT`.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(OUTPUT_ENV).map(PathBuf::from))
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }
}

impl Reporter for ActionsReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, warning: &ReleaseWarning) {
        println!("::warning::{}", escape_data(&warning.to_string()));
    }

    fn start_group(&self, title: &str) {
        println!("::group::{}", escape_data(title));
    }

    fn end_group(&self) {
        println!("::endgroup::");
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            // Old runners without an output file only see the log.
            println!("{}={}", name, escape_data(value));
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ReleaseError::file(path.display().to_string(), e))?;
        file.write_all(output_entry(name, value).as_bytes())
            .map_err(|e| ReleaseError::file(path.display().to_string(), e))
    }

    fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}
