//! Values held by the structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// An opaque value held by a structure; equality is by value.
///
/// Serialized untagged, so the store sees plain JSON numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Number(f64),
    Text(String),
}

impl Element {
    /// Parse raw user input.
    ///
    /// Blank input is rejected. Anything that reads as a finite number becomes
    /// `Number`, everything else is kept verbatim (trimmed) as `Text`.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput("value required".into()));
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Element::Number(n)),
            _ => Ok(Element::Text(trimmed.to_string())),
        }
    }

    /// Numeric view, used where an ordering is required.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Element::Number(n) => Some(*n),
            Element::Text(_) => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 Display already drops a trailing ".0"
            Element::Number(n) => write!(f, "{}", n),
            Element::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Element {
    fn from(n: f64) -> Self {
        Element::Number(n)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::Text(s.to_string())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::Text(s)
    }
}
