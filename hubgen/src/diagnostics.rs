//! Per-item findings reported alongside generated output.

use std::fmt;

use serde::Serialize;

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A parameter, return, or nested type argument could not be mapped.
    UnsupportedType,
    /// A method's return type is not a recognized RPC shape.
    ShapeViolation,
    /// A marker attribute was applied to a generic interface.
    GenericMisuse,
    /// Two methods of one interface share a generated local name.
    NameCollision,
}

impl DiagnosticKind {
    /// Stable identifier for tooling.
    pub fn code(self) -> &'static str {
        match self {
            Self::UnsupportedType => "HG001",
            Self::ShapeViolation => "HG002",
            Self::GenericMisuse => "HG003",
            Self::NameCollision => "HG004",
        }
    }
}

/// A localized, non-fatal finding.
///
/// The member it names is omitted from output; the rest of the run is
/// unaffected. A [`DiagnosticKind::GenericMisuse`] finding has no method and
/// drops the whole interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Qualified name of the interface the finding belongs to.
    pub interface: String,
    pub method: Option<String>,
    pub parameter: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, interface: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            interface: interface.into(),
            method: None,
            parameter: None,
            message: message.into(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.code(), self.interface)?;
        if let Some(method) = &self.method {
            write!(f, ".{}", method)?;
        }
        if let Some(parameter) = &self.parameter {
            write!(f, "({})", parameter)?;
        }
        write!(f, ": {}", self.message)
    }
}
