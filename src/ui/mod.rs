//! Reporting channel for release runs.
//!
//! The pipeline never writes to the terminal directly; it talks to a
//! [Reporter]. Implementations:
//! - `formatter::ConsoleReporter` - coloured terminal output
//! - `actions::ActionsReporter` - GitHub Actions workflow commands
//! - `memory::MemoryReporter` - records events for tests

use crate::boundary::ReleaseWarning;
use crate::error::Result;

pub mod actions;
pub mod formatter;
pub mod memory;

pub use actions::ActionsReporter;
pub use formatter::ConsoleReporter;
pub use memory::{MemoryReporter, ReportEvent};

/// Observer for progress, warnings and outputs of a release run.
///
/// Nothing returned from here steers control flow except `set_output`,
/// whose failure is an I/O failure like any other.
pub trait Reporter {
    fn info(&self, message: &str);

    /// A step that finished the release; plain info unless overridden.
    fn success(&self, message: &str) {
        self.info(message);
    }

    fn warning(&self, warning: &ReleaseWarning);

    fn start_group(&self, title: &str);

    fn end_group(&self);

    /// Publish a named output value for whoever invoked us.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Report the run as failed with a single message.
    fn set_failed(&self, message: &str);
}

/// Runs `f` inside a reporter group, closing the group on success and failure.
pub fn group<R, T, F>(reporter: &R, title: &str, f: F) -> Result<T>
where
    R: Reporter + ?Sized,
    F: FnOnce() -> Result<T>,
{
    reporter.start_group(title);
    let result = f();
    reporter.end_group();
    result
}

/// Which reporter the binary should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReporterKind {
    /// Actions when running under GitHub Actions, console otherwise
    Auto,
    Console,
    Actions,
}

impl ReporterKind {
    /// Resolves `Auto` from the `GITHUB_ACTIONS` environment variable.
    pub fn resolve(self) -> ReporterKind {
        match self {
            ReporterKind::Auto => {
                if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
                    ReporterKind::Actions
                } else {
                    ReporterKind::Console
                }
            }
            other => other,
        }
    }

    pub fn build(self) -> Box<dyn Reporter> {
        match self.resolve() {
            ReporterKind::Actions => Box::new(ActionsReporter::from_env()),
            _ => Box::new(ConsoleReporter::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    #[test]
    fn test_group_closes_on_error() {
        let reporter = MemoryReporter::new();
        let result: Result<()> = group(&reporter, "Write files", || Err(ReleaseError::config("x")));

        assert!(result.is_err());
        assert_eq!(
            reporter.events(),
            vec![
                ReportEvent::StartGroup("Write files".to_string()),
                ReportEvent::EndGroup,
            ]
        );
    }

    #[test]
    fn test_group_returns_value() {
        let reporter = MemoryReporter::new();
        let value = group(&reporter, "g", || {
            reporter.info("inside");
            Ok(42)
        })
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(reporter.events().len(), 3);
    }

    #[test]
    fn test_success_defaults_to_info() {
        let reporter = MemoryReporter::new();
        reporter.success("Released v2.0.1 (2.0.1)");

        assert_eq!(
            reporter.events(),
            vec![ReportEvent::Info("Released v2.0.1 (2.0.1)".to_string())]
        );
    }

    #[test]
    fn test_explicit_kinds_resolve_to_themselves() {
        assert_eq!(ReporterKind::Console.resolve(), ReporterKind::Console);
        assert_eq!(ReporterKind::Actions.resolve(), ReporterKind::Actions);
    }
}
