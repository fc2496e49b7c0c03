//! Operation dispatch over the five live structures
//!
//! Every operation produces exactly one log line. Domain failures (empty
//! structure, miss, bad input) are rendered into that line and never
//! propagate to the caller.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::domain::{DomainError, Element, Operation, Outcome, Structures, StructureKind};

/// Number of log lines retained.
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Default)]
pub struct WorkbenchService {
    structures: Structures,
    history: VecDeque<String>,
}

impl WorkbenchService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structures(structures: Structures) -> Self {
        Self {
            structures,
            history: VecDeque::new(),
        }
    }

    pub fn structures(&self) -> &Structures {
        &self.structures
    }

    /// Swap in a whole new set of structures, e.g. after loading a session.
    pub fn replace(&mut self, structures: Structures) {
        self.structures = structures;
    }

    pub fn items(&self, kind: StructureKind) -> Vec<Element> {
        self.structures.get(kind).items()
    }

    /// Run `operation` on `kind` and return the resulting log line.
    ///
    /// `raw_value` is user input; it is parsed only for operations that
    /// consume a value.
    #[instrument(level = "debug", skip(self))]
    pub fn perform(
        &mut self,
        kind: StructureKind,
        operation: Operation,
        raw_value: Option<&str>,
    ) -> String {
        let line = match self.try_perform(kind, operation, raw_value) {
            Ok(outcome) => outcome.to_string(),
            Err(e) => failure_line(operation, &e),
        };
        debug!("perform: {}", line);
        self.record(line.clone());
        line
    }

    fn try_perform(
        &mut self,
        kind: StructureKind,
        operation: Operation,
        raw_value: Option<&str>,
    ) -> Result<Outcome, DomainError> {
        let value = if operation.requires_value() {
            Some(Element::parse(raw_value.unwrap_or_default())?)
        } else {
            None
        };
        self.structures.get_mut(kind).perform(operation, value)
    }

    pub fn clear(&mut self, kind: StructureKind) -> String {
        self.structures.clear(kind);
        let line = "Structure cleared".to_string();
        self.record(line.clone());
        line
    }

    /// Most recent log lines, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    fn record(&mut self, line: String) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(line);
    }
}

fn failure_line(operation: Operation, error: &DomainError) -> String {
    match (error, operation) {
        (DomainError::EmptyStructure { .. }, Operation::Dequeue) => {
            "Dequeue failed: queue empty".to_string()
        }
        (DomainError::EmptyStructure { .. }, _) => "Pop failed: structure empty".to_string(),
        (DomainError::NotFound(v), Operation::Remove) => format!("Remove failed: {v} not found"),
        (DomainError::NotFound(v), _) => format!("Not found: {v}"),
        (DomainError::InvalidInput(reason), _) => format!("Invalid input: {reason}"),
        (DomainError::UnsupportedOperation { kind, operation }, _) => {
            format!("Unsupported operation: {operation} on {kind}")
        }
    }
}
