//! Non-fatal findings collected while generating a unit.
//!
//! Anything that stops generation is an error type of its own; a
//! [`Diagnostic`] only tells the user that something was skipped, guessed
//! or handled in a way worth reviewing.

use std::fmt;

use serde::Serialize;

/// How much attention a diagnostic deserves. Ordered from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// How the unit was generated; shown with `-v`.
    Info,
    /// The generated unit may need a manual fix.
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the pipeline a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Extracting method signatures from Go source.
    Reflect,
    /// Rendering the wrapper.
    Synthesize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub phase: Phase,
    pub message: String,
    /// `Interface` or `Interface.Method` the diagnostic refers to.
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, phase: Phase, message: impl Into<String>) -> Self {
        Self {
            severity,
            phase,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(phase: Phase, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, phase, message)
    }

    pub fn info(phase: Phase, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, phase, message)
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The message followed by its location, without the severity.
    pub fn describe(&self) -> String {
        match &self.location {
            Some(location) => format!("{} (at {})", self.message, location),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let diag = Diagnostic::warning(Phase::Reflect, "embedded elements are not wrapped: io.Closer")
            .at("Service");
        assert_eq!(
            diag.to_string(),
            "warning: embedded elements are not wrapped: io.Closer (at Service)"
        );
    }

    #[test]
    fn test_describe_without_location() {
        let diag = Diagnostic::info(Phase::Synthesize, "Split returns 3 values");
        assert_eq!(diag.describe(), "Split returns 3 values");
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
    }

    #[test]
    fn test_serialize() {
        let diag = Diagnostic::warning(Phase::Synthesize, "bad").at("Service.Get");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["phase"], "synthesize");
        assert_eq!(json["location"], "Service.Get");
    }
}
