use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::structures::{
    require_value, unsupported, Operation, Outcome, Structure, StructureKind,
};

#[derive(Debug)]
struct ListNode {
    value: Element,
    next: Option<Box<ListNode>>,
}

/// Singly linked list with the head as sole entry point.
///
/// There is no tail pointer: `add` walks the chain, which keeps the O(n)
/// append the complexity catalog documents.
#[derive(Debug, Default)]
pub struct LinkedList {
    head: Option<Box<ListNode>>,
    size: usize,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail.
    pub fn add(&mut self, value: Element) {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(ListNode { value, next: None }));
        self.size += 1;
    }

    /// Unlink the first node holding `value`. Returns false if absent.
    pub fn remove(&mut self, value: &Element) -> bool {
        let mut cursor = &mut self.head;
        loop {
            match cursor {
                None => return false,
                Some(node) if node.value == *value => {
                    let next = node.next.take();
                    *cursor = next;
                    self.size -= 1;
                    return true;
                }
                Some(node) => cursor = &mut node.next,
            }
        }
    }

    /// 0-based position of the first node holding `value`.
    pub fn search(&self, value: &Element) -> Option<usize> {
        self.iter().position(|v| v == value)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl Drop for LinkedList {
    // iterative drop; the default recursive one can overflow on long chains
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl Clone for LinkedList {
    fn clone(&self) -> Self {
        // prepend in reverse: O(n) instead of n tail walks
        let values: Vec<&Element> = self.iter().collect();
        let mut head = None;
        for value in values.into_iter().rev() {
            head = Some(Box::new(ListNode {
                value: value.clone(),
                next: head,
            }));
        }
        Self {
            head,
            size: self.size,
        }
    }
}

impl PartialEq for LinkedList {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

pub struct Iter<'a> {
    next: Option<&'a ListNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

impl Structure for LinkedList {
    fn kind(&self) -> StructureKind {
        StructureKind::LinkedList
    }

    fn items(&self) -> Vec<Element> {
        self.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.size
    }

    fn perform(&mut self, operation: Operation, value: Option<Element>) -> DomainResult<Outcome> {
        match operation {
            Operation::Add => {
                let value = require_value(value)?;
                self.add(value.clone());
                Ok(Outcome::Added(value))
            }
            Operation::Remove => {
                let value = require_value(value)?;
                if self.remove(&value) {
                    Ok(Outcome::Removed(value))
                } else {
                    Err(DomainError::NotFound(value.to_string()))
                }
            }
            Operation::Search => {
                let value = require_value(value)?;
                match self.search(&value) {
                    Some(index) => Ok(Outcome::FoundAt { value, index }),
                    None => Err(DomainError::NotFound(value.to_string())),
                }
            }
            other => Err(unsupported(StructureKind::LinkedList, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(values: &[&str]) -> LinkedList {
        let mut list = LinkedList::new();
        for v in values {
            list.add((*v).into());
        }
        list
    }

    #[test]
    fn given_adds_when_listing_then_insertion_order() {
        let list = list_of(&["a", "b", "c"]);
        assert_eq!(list.items(), vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn given_head_match_when_removing_then_head_advances() {
        let mut list = list_of(&["a", "b"]);
        assert!(list.remove(&"a".into()));
        assert_eq!(list.items(), vec!["b".into()]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn given_duplicates_when_removing_then_only_first_removed() {
        let mut list = list_of(&["a", "b", "a"]);
        assert!(list.remove(&"a".into()));
        assert_eq!(list.items(), vec!["b".into(), "a".into()]);
    }

    #[test]
    fn given_absent_value_when_removing_then_size_unchanged() {
        let mut list = list_of(&["a", "b"]);
        assert!(!list.remove(&"z".into()));
        assert_eq!(list.len(), 2);
        assert_eq!(list.len(), list.iter().count());
    }

    #[test]
    fn given_list_when_searching_then_zero_based_position() {
        let list = list_of(&["a", "b", "c"]);
        assert_eq!(list.search(&"c".into()), Some(2));
        assert_eq!(list.search(&"x".into()), None);
    }

    #[test]
    fn given_long_chain_when_dropped_then_no_overflow() {
        let mut list = LinkedList::new();
        let mut cursor = &mut list.head;
        for i in 0..100_000 {
            *cursor = Some(Box::new(ListNode {
                value: Element::Number(i as f64),
                next: None,
            }));
            if let Some(node) = cursor {
                cursor = &mut node.next;
            }
        }
        drop(list);
    }
}
