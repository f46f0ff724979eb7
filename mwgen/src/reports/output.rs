//! Where reports go.

use mwgen_core::Severity;

/// Sink for rendered reports.
///
/// Results belong on stdout so they can be piped; diagnostics go to stderr.
/// Implementors only provide the two sinks; the formatting helpers are
/// shared.
pub trait Output {
    /// One line of the command's result.
    fn result(&mut self, text: &str);

    /// One diagnostic line.
    fn diagnostic(&mut self, severity: Severity, text: &str);

    fn field(&mut self, key: &str, value: &str) {
        self.result(&format!("{}: {}", key, value));
    }

    fn item(&mut self, text: &str) {
        self.result(&format!("  - {}", text));
    }

    fn divider(&mut self, label: &str) {
        self.result(&format!("── {} ──", label));
    }

    fn blank(&mut self) {
        self.result("");
    }
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Prints to the process's stdout and stderr.
#[derive(Default)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for TerminalOutput {
    fn result(&mut self, text: &str) {
        println!("{}", text);
    }

    fn diagnostic(&mut self, severity: Severity, text: &str) {
        let prefix = match severity {
            Severity::Warning => "warning",
            Severity::Info => "note",
        };
        eprintln!("{}: {}", prefix, text);
    }
}

/// Collects rendered lines, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct BufferOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<(Severity, String)>,
}

#[cfg(test)]
impl Output for BufferOutput {
    fn result(&mut self, text: &str) {
        self.stdout.push(text.to_string());
    }

    fn diagnostic(&mut self, severity: Severity, text: &str) {
        self.stderr.push((severity, text.to_string()));
    }
}
