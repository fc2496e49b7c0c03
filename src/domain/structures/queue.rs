use std::collections::VecDeque;

use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::structures::{
    require_value, unsupported, Operation, Outcome, Structure, StructureKind,
};

/// FIFO sequence: enqueue at the tail, dequeue at the head.
///
/// Backed by a ring buffer, so both ends are O(1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    items: VecDeque<Element>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, value: Element) {
        self.items.push_back(value);
    }

    pub fn dequeue(&mut self) -> Option<Element> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&Element> {
        self.items.front()
    }
}

impl Structure for Queue {
    fn kind(&self) -> StructureKind {
        StructureKind::Queue
    }

    fn items(&self) -> Vec<Element> {
        self.items.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn perform(&mut self, operation: Operation, value: Option<Element>) -> DomainResult<Outcome> {
        match operation {
            Operation::Enqueue => {
                let value = require_value(value)?;
                self.enqueue(value.clone());
                Ok(Outcome::Enqueued(value))
            }
            Operation::Dequeue => {
                self.dequeue()
                    .map(Outcome::Dequeued)
                    .ok_or(DomainError::EmptyStructure {
                        kind: StructureKind::Queue,
                    })
            }
            other => Err(unsupported(StructureKind::Queue, other)),
        }
    }
}
