//! Validation results.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed validation rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Field, or column, the rule applies to.
    pub field: String,
    /// Human readable description of the failure.
    pub message: String,
}

impl Violation {
    /// Creates a violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A model rejected by its validation rules.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{model} failed validation: {}", summary(.violations))]
pub struct ValidationError {
    model: &'static str,
    violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an error for `model` carrying `violations`.
    #[must_use]
    pub const fn new(model: &'static str, violations: Vec<Violation>) -> Self {
        Self { model, violations }
    }

    /// Name of the rejected model.
    #[must_use]
    pub const fn model(&self) -> &'static str {
        self.model
    }

    /// The violations found.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the error, returning the violations found.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
