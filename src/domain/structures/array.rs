use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::structures::{
    require_value, unsupported, Operation, Outcome, Structure, StructureKind,
};

/// Index-addressable sequence; indices are always contiguous `0..len`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicArray {
    items: Vec<Element>,
}

impl DynamicArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Element>) -> Self {
        Self { items }
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.items
    }

    pub fn push(&mut self, value: Element) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<Element> {
        self.items.pop()
    }

    /// Position of the first element equal to `value`.
    pub fn search(&self, value: &Element) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    /// Insert before `index`, shifting the tail. Not part of the capability set.
    pub fn insert_at(&mut self, index: usize, value: Element) -> DomainResult<()> {
        if index > self.items.len() {
            return Err(DomainError::InvalidInput(format!(
                "index {index} out of range 0..={}",
                self.items.len()
            )));
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Remove and return the element at `index`. Not part of the capability set.
    pub fn delete_at(&mut self, index: usize) -> DomainResult<Element> {
        if index >= self.items.len() {
            return Err(DomainError::InvalidInput(format!(
                "index {index} out of range 0..{}",
                self.items.len()
            )));
        }
        Ok(self.items.remove(index))
    }
}

impl Structure for DynamicArray {
    fn kind(&self) -> StructureKind {
        StructureKind::Array
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
                kind: StructureKind::Array,
            }),
            Operation::Search => {
                let value = require_value(value)?;
                match self.search(&value) {
                    Some(index) => Ok(Outcome::FoundAt { value, index }),
                    None => Err(DomainError::NotFound(value.to_string())),
                }
            }
            other => Err(unsupported(StructureKind::Array, other)),
        }
    }
}
