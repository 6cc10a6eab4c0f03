//! Terminal reporting for CLI commands.
//!
//! Status lines go to stderr so that `docshelf sitemap` can be piped.

use std::fmt::Display;

use console::{Style, Term};

pub(crate) struct Output {
    stderr: Term,
    stdout: Term,
    heading: Style,
    label: Style,
    passed: Style,
    failed: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stderr: Term::stderr(),
            stdout: Term::stdout(),
            heading: Style::new().cyan().bold(),
            label: Style::new().dim(),
            passed: Style::new().green(),
            failed: Style::new().red(),
        }
    }

    pub(crate) fn heading(&self, text: impl Display) {
        self.status(&self.heading.apply_to(text).to_string());
    }

    /// `  label: value`, label dimmed.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        self.status(&format!("  {} {value}", self.label.apply_to(format!("{label}:"))));
    }

    pub(crate) fn passed(&self, text: impl Display) {
        self.status(&self.passed.apply_to(text).to_string());
    }

    pub(crate) fn failed(&self, text: impl Display) {
        self.status(&self.failed.apply_to(text).to_string());
    }

    /// Write one line of command output to stdout.
    pub(crate) fn line(&self, text: &str) -> std::io::Result<()> {
        self.stdout.write_line(text)
    }

    // A closed stderr is not worth aborting a command over.
    fn status(&self, text: &str) {
        let _ = self.stderr.write_line(text);
    }
}
