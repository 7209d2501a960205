use std::fmt;

use serde::Serialize;

use crate::source::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A recoverable problem found while parsing or linking, tagged with the
/// entity whose comment caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub entity: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn warning(
        entity: impl Into<String>,
        position: SourcePosition,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, entity, position, message)
    }

    pub fn error(
        entity: impl Into<String>,
        position: SourcePosition,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, entity, position, message)
    }

    fn new(
        severity: Severity,
        entity: impl Into<String>,
        position: SourcePosition,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            entity: entity.into(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }

    /// Forward the diagnostic to the `log` facade.
    pub(crate) fn log(&self) {
        match self.severity {
            Severity::Warning => log::warn!("{self}"),
            Severity::Error => log::error!("{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when processing '{}' ({}:{}): {}",
            self.entity, self.line, self.column, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_entity_and_location() {
        let diagnostic = Diagnostic::warning("foo()", SourcePosition::new(2, 1), "Unknown command 'efects'");
        assert_eq!(
            diagnostic.to_string(),
            "when processing 'foo()' (2:1): Unknown command 'efects'"
        );
        assert_eq!(diagnostic.severity, Severity::Warning);
    }
}
