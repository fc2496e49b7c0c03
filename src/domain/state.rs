//! The five live structures and their persisted snapshot shape

use std::collections::HashMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::structures::{
    BinarySearchTree, DynamicArray, LinkedList, Queue, Side, Stack, Structure, StructureKind,
};

/// One instance of every structure kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structures {
    pub array: DynamicArray,
    pub stack: Stack,
    pub queue: Queue,
    pub linked_list: LinkedList,
    pub binary_tree: BinarySearchTree,
}

impl Structures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StructureKind) -> &dyn Structure {
        match kind {
            StructureKind::Array => &self.array,
            StructureKind::Stack => &self.stack,
            StructureKind::Queue => &self.queue,
            StructureKind::LinkedList => &self.linked_list,
            StructureKind::BinaryTree => &self.binary_tree,
        }
    }

    pub fn get_mut(&mut self, kind: StructureKind) -> &mut dyn Structure {
        match kind {
            StructureKind::Array => &mut self.array,
            StructureKind::Stack => &mut self.stack,
            StructureKind::Queue => &mut self.queue,
            StructureKind::LinkedList => &mut self.linked_list,
            StructureKind::BinaryTree => &mut self.binary_tree,
        }
    }

    /// Reset one structure to empty.
    pub fn clear(&mut self, kind: StructureKind) {
        match kind {
            StructureKind::Array => self.array = DynamicArray::new(),
            StructureKind::Stack => self.stack = Stack::new(),
            StructureKind::Queue => self.queue = Queue::new(),
            StructureKind::LinkedList => self.linked_list = LinkedList::new(),
            StructureKind::BinaryTree => self.binary_tree = BinarySearchTree::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        StructureKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}

/// Nested BST node as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub value: f64,
    #[serde(default)]
    pub left: Option<Box<SerializedNode>>,
    #[serde(default)]
    pub right: Option<Box<SerializedNode>>,
}

impl SerializedNode {
    pub fn leaf(value: f64) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

impl Drop for SerializedNode {
    fn drop(&mut self) {
        // unlink children first so a degenerate chain is freed without recursion
        let mut pending: Vec<Box<SerializedNode>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// Storable snapshot of all five structures.
///
/// Sequences are stored front to back; the BST keeps its exact shape.
/// Missing keys load as empty structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedState {
    pub array: Vec<Element>,
    pub stack: Vec<Element>,
    pub queue: Vec<Element>,
    pub linked_list: Vec<Element>,
    pub binary_tree: Option<SerializedNode>,
}

impl SavedState {
    pub fn capture(structures: &Structures) -> Self {
        Self {
            array: structures.array.items(),
            stack: structures.stack.items(),
            queue: structures.queue.items(),
            linked_list: structures.linked_list.items(),
            binary_tree: capture_tree(&structures.binary_tree),
        }
    }

    /// Rebuild live structures by replaying their own insert operations in
    /// stored order; the tree is rebuilt node by node so its topology matches
    /// the snapshot.
    pub fn restore(&self) -> DomainResult<Structures> {
        let mut structures = Structures::new();
        for item in &self.array {
            structures.array.push(item.clone());
        }
        for item in &self.stack {
            structures.stack.push(item.clone());
        }
        for item in &self.queue {
            structures.queue.enqueue(item.clone());
        }
        for item in &self.linked_list {
            structures.linked_list.add(item.clone());
        }
        structures.binary_tree = restore_tree(self.binary_tree.as_ref())?;
        Ok(structures)
    }
}

fn capture_tree(tree: &BinarySearchTree) -> Option<SerializedNode> {
    let root = tree.root()?;
    let order: Vec<_> = tree.iter_preorder().collect();

    // reverse pre-order: both subtrees are finished before their parent
    let mut built: HashMap<Index, SerializedNode> = HashMap::with_capacity(order.len());
    for (idx, node) in order.into_iter().rev() {
        let serialized = SerializedNode {
            value: node.value,
            left: node.left.and_then(|l| built.remove(&l)).map(Box::new),
            right: node.right.and_then(|r| built.remove(&r)).map(Box::new),
        };
        built.insert(idx, serialized);
    }
    built.remove(&root)
}

fn restore_tree(root: Option<&SerializedNode>) -> DomainResult<BinarySearchTree> {
    let mut tree = BinarySearchTree::new();
    let mut pending = match root {
        Some(node) => vec![(node, None)],
        None => return Ok(tree),
    };
    while let Some((node, parent)) = pending.pop() {
        if !node.value.is_finite() {
            return Err(DomainError::InvalidInput(format!(
                "tree value {} is not a finite number",
                node.value
            )));
        }
        let idx = tree
            .attach(node.value, parent)
            .ok_or_else(|| DomainError::InvalidInput("malformed tree snapshot".into()))?;
        if let Some(right) = node.right.as_deref() {
            pending.push((right, Some((idx, Side::Right))));
        }
        if let Some(left) = node.left.as_deref() {
            pending.push((left, Some((idx, Side::Left))));
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::structures::Operation;

    #[test]
    fn given_empty_structures_when_capturing_then_default_state() {
        let state = SavedState::capture(&Structures::new());
        assert_eq!(state, SavedState::default());
        assert!(state.restore().unwrap().is_empty());
    }

    #[test]
    fn given_state_when_serializing_then_uses_camel_case_keys() {
        let mut structures = Structures::new();
        structures.linked_list.add(Element::from(1.0));
        structures.binary_tree.insert(4.0);

        let json = serde_json::to_value(SavedState::capture(&structures)).unwrap();

        assert_eq!(json["linkedList"], serde_json::json!([1.0]));
        assert_eq!(json["binaryTree"]["value"], serde_json::json!(4.0));
        assert!(json["binaryTree"]["left"].is_null());
    }

    #[test]
    fn given_partial_json_when_deserializing_then_missing_keys_are_empty() {
        let state: SavedState = serde_json::from_str(r#"{"stack":[1,"x"]}"#).unwrap();
        assert_eq!(state.stack, vec![Element::from(1.0), Element::from("x")]);
        assert!(state.array.is_empty());
        assert!(state.binary_tree.is_none());
    }

    #[test]
    fn given_tree_when_roundtripping_then_shape_preserved() {
        let mut structures = Structures::new();
        for v in [50.0, 30.0, 70.0, 20.0, 40.0, 40.0] {
            structures
                .get_mut(StructureKind::BinaryTree)
                .perform(Operation::Insert, Some(Element::from(v)))
                .unwrap();
        }

        let restored = SavedState::capture(&structures).restore().unwrap();

        assert!(restored.binary_tree.same_shape(&structures.binary_tree));
        assert_eq!(restored.binary_tree.values(), vec![20.0, 30.0, 40.0, 40.0, 50.0, 70.0]);
    }

    #[test]
    fn given_sequences_when_restoring_then_top_and_front_preserved() {
        let state = SavedState {
            array: vec![Element::from(1.0), Element::from("b")],
            stack: vec![Element::from("bottom"), Element::from("top")],
            queue: vec![Element::from("first"), Element::from("last")],
            ..SavedState::default()
        };

        let mut restored = state.restore().unwrap();

        assert_eq!(restored.array.as_slice(), state.array.as_slice());
        assert_eq!(restored.stack.peek(), Some(&Element::from("top")));
        assert_eq!(restored.queue.front(), Some(&Element::from("first")));
        assert_eq!(restored.stack.pop(), Some(Element::from("top")));
        assert_eq!(restored.queue.dequeue(), Some(Element::from("first")));
        assert_eq!(SavedState::capture(&state.restore().unwrap()), state);
    }

    #[test]
    fn given_degenerate_tree_when_capturing_then_nested_to_full_depth() {
        let mut structures = Structures::new();
        let mut parent = None;
        for v in 1..=100_000 {
            let idx = structures.binary_tree.attach(f64::from(v), parent).unwrap();
            parent = Some((idx, Side::Right));
        }

        let state = SavedState::capture(&structures);

        let mut depth = 0;
        let mut node = state.binary_tree.as_ref();
        while let Some(n) = node {
            assert!(n.left.is_none());
            depth += 1;
            node = n.right.as_deref();
        }
        assert_eq!(depth, 100_000);
        // dropping the nested snapshot must not overflow the stack
        drop(state);
    }

    #[test]
    fn given_clear_when_called_then_only_that_kind_is_reset() {
        let mut structures = Structures::new();
        structures.stack.push(Element::from(1.0));
        structures.queue.enqueue(Element::from(2.0));

        structures.clear(StructureKind::Stack);

        assert!(structures.stack.is_empty());
        assert_eq!(structures.queue.len(), 1);
    }
}
