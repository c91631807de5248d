//! Structured diagnostics for schema generation.
//!
//! A malformed field never aborts a run: the offending property degrades to a
//! syntactically valid but locally incomplete node, and the finding lands
//! here for the operator to fix the type definition.

use serde::Serialize;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// Stable diagnostic codes.
pub mod codes {
    /// A collection element shape could not be resolved.
    pub const SHAPE_RESOLUTION: &str = "S001";
    /// Record-collection field emitted without a definition registry.
    pub const NO_DEFINITIONS: &str = "S002";
    /// Field dropped because its name is empty.
    pub const EMPTY_NAME: &str = "S003";
    /// Enum field with no constants.
    pub const EMPTY_ENUM: &str = "S004";
}

/// A single finding recorded while describing a record type.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    /// Qualified name of the record under description.
    pub record: String,
    /// Field the finding refers to, when one is identifiable.
    pub field: Option<String>,
}

impl Diagnostic {
    /// Render without colors (for logs, tests)
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        let severity_label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        if let Some(code) = self.code {
            out.push_str(&format!("{}[{}]: ", severity_label, code));
        } else {
            out.push_str(&format!("{}: ", severity_label));
        }
        out.push_str(&self.message);
        out.push_str(&format!("\n  --> {}", self.record));
        if let Some(ref field) = self.field {
            out.push_str(&format!(".{}", field));
        }
        out
    }
}

/// Accumulating diagnostic sink, owned by one generator run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(
        &mut self,
        code: &'static str,
        record: &str,
        field: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(Severity::Error, code, record, field, message);
    }

    pub fn warning(
        &mut self,
        code: &'static str,
        record: &str,
        field: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(Severity::Warning, code, record, field, message);
    }

    fn push(
        &mut self,
        severity: Severity,
        code: &'static str,
        record: &str,
        field: Option<&str>,
        message: impl Into<String>,
    ) {
        self.items.push(Diagnostic {
            severity,
            code: Some(code),
            message: message.into(),
            record: record.to_string(),
            field: field.map(|f| f.to_string()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Drain all accumulated findings.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let mut diags = Diagnostics::new();
        diags.error(
            codes::SHAPE_RESOLUTION,
            "app::EditorOptions",
            Some("plugins"),
            "collection element type is unresolved",
        );
        let rendered = diags.iter().next().unwrap().render_plain();
        assert!(rendered.contains("error[S001]"));
        assert!(rendered.contains("collection element type is unresolved"));
        assert!(rendered.contains("--> app::EditorOptions.plugins"));
    }

    #[test]
    fn test_has_errors_ignores_warnings() {
        let mut diags = Diagnostics::new();
        diags.warning(codes::EMPTY_ENUM, "app::EditorOptions", Some("mode"), "empty enum");
        assert!(!diags.has_errors());
        assert_eq!(diags.len(), 1);
        diags.error(codes::EMPTY_NAME, "app::EditorOptions", None, "field name is empty");
        assert!(diags.has_errors());
    }

    #[test]
    fn test_take_drains() {
        let mut diags = Diagnostics::new();
        diags.warning(codes::EMPTY_ENUM, "r", Some("f"), "m");
        let taken = diags.take();
        assert_eq!(taken.len(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_serializes_for_machine_output() {
        let mut diags = Diagnostics::new();
        diags.error(codes::NO_DEFINITIONS, "r::T", Some("children"), "no registry");
        let json = serde_json::to_string(&diags).unwrap();
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("S002"));
    }
}
