//! The five data structures and their capability sets
//!
//! The structures share no behavior, only a common "operation in, outcome out"
//! shape, expressed by the [`Structure`] trait.

pub mod array;
pub mod bst;
pub mod linked_list;
pub mod queue;
pub mod stack;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};

pub use array::DynamicArray;
pub use bst::{BinarySearchTree, BstNode, InOrderIter, PreOrderIter, Side};
pub use linked_list::LinkedList;
pub use queue::Queue;
pub use stack::Stack;

/// Which structure an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureKind {
    Array,
    Stack,
    Queue,
    LinkedList,
    BinaryTree,
}

impl StructureKind {
    pub const ALL: [StructureKind; 5] = [
        StructureKind::Array,
        StructureKind::Stack,
        StructureKind::Queue,
        StructureKind::LinkedList,
        StructureKind::BinaryTree,
    ];

    /// Key used by the store and the complexity catalog.
    pub fn key(self) -> &'static str {
        match self {
            StructureKind::Array => "array",
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
            StructureKind::LinkedList => "linkedList",
            StructureKind::BinaryTree => "binaryTree",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StructureKind::Array => "Dynamic Array",
            StructureKind::Stack => "Stack (LIFO)",
            StructureKind::Queue => "Queue (FIFO)",
            StructureKind::LinkedList => "Linked List",
            StructureKind::BinaryTree => "Binary Search Tree",
        }
    }

    /// Operations this structure legally supports, in display order.
    pub fn capabilities(self) -> &'static [Operation] {
        match self {
            StructureKind::Array => &[Operation::Push, Operation::Pop, Operation::Search],
            StructureKind::Stack => &[Operation::Push, Operation::Pop],
            StructureKind::Queue => &[Operation::Enqueue, Operation::Dequeue],
            StructureKind::LinkedList => &[Operation::Add, Operation::Remove, Operation::Search],
            StructureKind::BinaryTree => &[Operation::Insert, Operation::Search],
        }
    }

    pub fn supports(self, operation: Operation) -> bool {
        self.capabilities().contains(&operation)
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureKind::Array => "array",
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
            StructureKind::LinkedList => "linked-list",
            StructureKind::BinaryTree => "bst",
        };
        f.write_str(name)
    }
}

impl FromStr for StructureKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(StructureKind::Array),
            "stack" => Ok(StructureKind::Stack),
            "queue" => Ok(StructureKind::Queue),
            "linked-list" | "linkedlist" | "list" => Ok(StructureKind::LinkedList),
            "bst" | "binary-tree" | "binarytree" | "tree" => Ok(StructureKind::BinaryTree),
            other => Err(DomainError::InvalidInput(format!(
                "unknown structure '{other}'"
            ))),
        }
    }
}

/// A named mutation or query on a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Push,
    Pop,
    Insert,
    Search,
    Enqueue,
    Dequeue,
    Add,
    Remove,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Push => "push",
            Operation::Pop => "pop",
            Operation::Insert => "insert",
            Operation::Search => "search",
            Operation::Enqueue => "enqueue",
            Operation::Dequeue => "dequeue",
            Operation::Add => "add",
            Operation::Remove => "remove",
        }
    }

    /// Whether the operation consumes a user-supplied value.
    pub fn requires_value(self) -> bool {
        !matches!(self, Operation::Pop | Operation::Dequeue)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" => Ok(Operation::Push),
            "pop" => Ok(Operation::Pop),
            "insert" => Ok(Operation::Insert),
            "search" => Ok(Operation::Search),
            "enqueue" => Ok(Operation::Enqueue),
            "dequeue" => Ok(Operation::Dequeue),
            "add" => Ok(Operation::Add),
            "remove" => Ok(Operation::Remove),
            other => Err(DomainError::InvalidInput(format!(
                "unknown operation '{other}'"
            ))),
        }
    }
}

/// What a successful operation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pushed(Element),
    Popped(Element),
    Enqueued(Element),
    Dequeued(Element),
    Added(Element),
    Removed(Element),
    Inserted(Element),
    /// Positional search hit (array index or list position).
    FoundAt { value: Element, index: usize },
    /// Membership search hit (BST).
    Found(Element),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pushed(v) => write!(f, "Pushed: {v}"),
            Outcome::Popped(v) => write!(f, "Popped: {v}"),
            Outcome::Enqueued(v) => write!(f, "Enqueued: {v}"),
            Outcome::Dequeued(v) => write!(f, "Dequeued: {v}"),
            Outcome::Added(v) => write!(f, "Added: {v}"),
            Outcome::Removed(v) => write!(f, "Removed: {v}"),
            Outcome::Inserted(v) => write!(f, "Inserted: {v}"),
            Outcome::FoundAt { value, index } => write!(f, "Found: {value} at index {index}"),
            Outcome::Found(v) => write!(f, "Found: {v}"),
        }
    }
}

/// Common "operation + outcome" shape of every structure.
pub trait Structure {
    fn kind(&self) -> StructureKind;

    /// Items in display order (in-order for the BST).
    fn items(&self) -> Vec<Element>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one operation from the structure's capability set.
    ///
    /// `value` is required for value-consuming operations; the caller has
    /// already parsed it.
    fn perform(&mut self, operation: Operation, value: Option<Element>) -> DomainResult<Outcome>;
}

/// Unwrap the operand of a value-consuming operation.
pub(crate) fn require_value(value: Option<Element>) -> DomainResult<Element> {
    value.ok_or_else(|| DomainError::InvalidInput("value required".into()))
}

pub(crate) fn unsupported(kind: StructureKind, operation: Operation) -> DomainError {
    DomainError::UnsupportedOperation {
        kind,
        operation: operation.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_kind_names_when_parsing_then_accepts_aliases() {
        assert_eq!("bst".parse::<StructureKind>().unwrap(), StructureKind::BinaryTree);
        assert_eq!("Linked-List".parse::<StructureKind>().unwrap(), StructureKind::LinkedList);
        assert!("heap".parse::<StructureKind>().is_err());
    }

    #[test]
    fn given_capabilities_when_checking_then_stack_has_no_search() {
        assert!(!StructureKind::Stack.supports(Operation::Search));
        assert!(StructureKind::Array.supports(Operation::Search));
        assert!(!StructureKind::Array.supports(Operation::Insert));
    }

    #[test]
    fn given_outcomes_when_displaying_then_matches_log_format() {
        let hit = Outcome::FoundAt { value: Element::from(7.0), index: 2 };
        assert_eq!(hit.to_string(), "Found: 7 at index 2");
        assert_eq!(Outcome::Pushed(Element::from("a")).to_string(), "Pushed: a");
    }
}
