use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::structures::{
    require_value, unsupported, Operation, Outcome, Structure, StructureKind,
};

/// LIFO sequence; the top is the end of `items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    items: Vec<Element>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Element) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<Element> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&Element> {
        self.items.last()
    }
}

impl Structure for Stack {
    fn kind(&self) -> StructureKind {
        StructureKind::Stack
    }

    fn items(&self) -> Vec<Element> {
        self.items.clone()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn perform(&mut self, operation: Operation, value: Option<Element>) -> DomainResult<Outcome> {
        match operation {
            Operation::Push => {
                let value = require_value(value)?;
                self.push(value.clone());
                Ok(Outcome::Pushed(value))
            }
            Operation::Pop => self.pop().map(Outcome::Popped).ok_or(DomainError::EmptyStructure {
                kind: StructureKind::Stack,
            }),
            other => Err(unsupported(StructureKind::Stack, other)),
        }
    }
}
