//! Terminal output for interactive runs.

use console::style;

use crate::boundary::ReleaseWarning;
use crate::error::Result;
use crate::ui::Reporter;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display a section header.
pub fn display_header(title: &str) {
    println!("\n{}", style(title).bold());
}

/// Reporter printing to the terminal.
///
/// Group contents are indented; outputs are shown as `name: value`.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    depth: std::cell::Cell<usize>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth.get())
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        display_status(&format!("{}{}", self.indent(), message));
    }

    fn success(&self, message: &str) {
        display_success(&format!("{}{}", self.indent(), message));
    }

    fn warning(&self, warning: &ReleaseWarning) {
        display_warning(warning);
    }

    fn start_group(&self, title: &str) {
        display_header(title);
        self.depth.set(self.depth.get() + 1);
    }

    fn end_group(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        println!("{}", style(format!("{}:", name)).underlined());
        for line in value.lines() {
            println!("  {}", line);
        }
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        display_error(message);
    }
}
