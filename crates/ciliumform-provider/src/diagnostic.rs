//! Diagnostics returned to the host
//!
//! Nothing a user can put in a configuration panics or aborts the process; it
//! ends up here as an error diagnostic, optionally pointing at an attribute.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::Error;

/// Diagnostic severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation failed
    Error,
}

/// One step in an attribute path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathStep {
    /// Named attribute of an object
    Attribute(String),
    /// Element of a list
    Index(usize),
    /// Value of a map
    Key(String),
}

/// Location of a value inside a configuration, e.g. `spec.ingress[0].fromCIDR[1]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    /// Path to the root of the configuration
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend with a named attribute
    pub fn attribute(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::Attribute(name.into()))
    }

    /// Extend with a list index
    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    /// Extend with a map key
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathStep::Key(key.into()))
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
                PathStep::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A message for the host
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Short summary
    pub summary: String,
    /// Longer explanation
    pub detail: String,
    /// Attribute the diagnostic is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    /// Error diagnostic not tied to an attribute
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    /// Error diagnostic at an attribute
    pub fn attribute_error(
        path: &AttributePath,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            attribute: (!path.is_root()).then(|| path.clone()),
            ..Self::error(summary, detail)
        }
    }

    /// Whether this diagnostic is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        Diagnostic::error(err.summary(), err.to_string())
    }
}

impl From<Error> for Diagnostic {
    fn from(err: Error) -> Self {
        Diagnostic::from(&err)
    }
}

/// Whether any diagnostic is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(path) => write!(f, "Error: {} ({path}): {}", self.summary, self.detail),
            None => write!(f, "Error: {}: {}", self.summary, self.detail),
        }
    }
}
