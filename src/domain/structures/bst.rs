use std::collections::HashMap;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::element::Element;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::structures::{
    require_value, unsupported, Operation, Outcome, Structure, StructureKind,
};

/// Tree node in the arena-backed BST.
#[derive(Debug, Clone)]
pub struct BstNode {
    pub value: f64,
    /// Index of the left child in the arena
    pub left: Option<Index>,
    /// Index of the right child in the arena
    pub right: Option<Index>,
}

/// Unbalanced binary search tree stored in a generational arena.
///
/// Values smaller than a node go left, everything else (ties included) goes
/// right. There is no rebalancing, so sorted input degrades to a chain.
#[derive(Debug, Clone)]
pub struct BinarySearchTree {
    /// Arena storage for all tree nodes
    arena: Arena<BstNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for BinarySearchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BinarySearchTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&BstNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Place `value` by comparing down from the root.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, value: f64) -> Index {
        let new_idx = self.arena.insert(BstNode {
            value,
            left: None,
            right: None,
        });

        let Some(mut current) = self.root else {
            self.root = Some(new_idx);
            return new_idx;
        };

        while let Some(node) = self.arena.get_mut(current) {
            let slot = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
            match *slot {
                Some(child) => current = child,
                None => {
                    *slot = Some(new_idx);
                    break;
                }
            }
        }
        new_idx
    }

    /// Follow the insertion path looking for `value`.
    #[instrument(level = "trace", skip(self))]
    pub fn search(&self, value: f64) -> bool {
        let mut current = self.root;
        while let Some(node) = current.and_then(|idx| self.get_node(idx)) {
            if node.value == value {
                return true;
            }
            current = if value < node.value {
                node.left
            } else {
                node.right
            };
        }
        false
    }

    /// Attach a node directly, bypassing ordering.
    ///
    /// Used to rebuild a stored topology exactly; `parent == None` makes the
    /// node the root. Returns None if the parent is unknown or the slot is
    /// already taken.
    pub fn attach(&mut self, value: f64, parent: Option<(Index, Side)>) -> Option<Index> {
        match parent {
            None => {
                if self.root.is_some() {
                    return None;
                }
                let idx = self.arena.insert(BstNode {
                    value,
                    left: None,
                    right: None,
                });
                self.root = Some(idx);
                Some(idx)
            }
            Some((parent_idx, side)) => {
                let occupied = {
                    let parent = self.arena.get(parent_idx)?;
                    match side {
                        Side::Left => parent.left.is_some(),
                        Side::Right => parent.right.is_some(),
                    }
                };
                if occupied {
                    return None;
                }
                let idx = self.arena.insert(BstNode {
                    value,
                    left: None,
                    right: None,
                });
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    match side {
                        Side::Left => parent.left = Some(idx),
                        Side::Right => parent.right = Some(idx),
                    }
                }
                Some(idx)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn iter_inorder(&self) -> InOrderIter<'_> {
        InOrderIter::new(self)
    }

    pub fn iter_preorder(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Values in sorted (in-order) sequence.
    pub fn values(&self) -> Vec<f64> {
        self.iter_inorder().map(|(_, node)| node.value).collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        // explicit stack: a degenerate chain is as deep as it is long
        let mut max_depth = 0;
        let mut stack = vec![(node_idx, 1)];
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                max_depth = max_depth.max(depth);
                stack.extend(node.left.map(|l| (l, depth + 1)));
                stack.extend(node.right.map(|r| (r, depth + 1)));
            }
        }
        max_depth
    }

    /// Structural equality: same values in the same shape.
    ///
    /// Arena indices are not compared, only topology and values.
    pub fn same_shape(&self, other: &BinarySearchTree) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => match (self.get_node(a), other.get_node(b)) {
                    (Some(x), Some(y)) if x.value == y.value => {
                        stack.push((x.left, y.left));
                        stack.push((x.right, y.right));
                    }
                    _ => return false,
                },
                _ => return false,
            }
        }
        true
    }

    /// Render the actual shape, children labelled L/R.
    pub fn to_tree_string(&self) -> Tree<String> {
        let Some(root) = self.root else {
            return Tree::new("(empty)".to_string());
        };

        let mut order = Vec::with_capacity(self.len());
        let mut pending = vec![(root, "")];
        while let Some((idx, label)) = pending.pop() {
            order.push((idx, label));
            if let Some(node) = self.get_node(idx) {
                if let Some(right) = node.right {
                    pending.push((right, "R: "));
                }
                if let Some(left) = node.left {
                    pending.push((left, "L: "));
                }
            }
        }

        // reverse pre-order: both subtrees are finished before their parent
        let mut built: HashMap<Index, Tree<String>> = HashMap::with_capacity(order.len());
        for (idx, label) in order.into_iter().rev() {
            let tree = match self.get_node(idx) {
                Some(node) => {
                    let mut tree = Tree::new(format!("{label}{}", Element::Number(node.value)));
                    for child in [node.left, node.right].into_iter().flatten() {
                        if let Some(subtree) = built.remove(&child) {
                            tree.push(subtree);
                        }
                    }
                    tree
                }
                None => Tree::new(format!("{label}?")),
            };
            built.insert(idx, tree);
        }
        built
            .remove(&root)
            .unwrap_or_else(|| Tree::new("(empty)".to_string()))
    }
}

/// Which child slot a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl PartialEq for BinarySearchTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other)
    }
}

impl Structure for BinarySearchTree {
    fn kind(&self) -> StructureKind {
        StructureKind::BinaryTree
    }

    fn items(&self) -> Vec<Element> {
        self.values().into_iter().map(Element::Number).collect()
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn perform(&mut self, operation: Operation, value: Option<Element>) -> DomainResult<Outcome> {
        match operation {
            Operation::Insert => {
                let value = require_value(value)?;
                let number = numeric(&value)?;
                self.insert(number);
                Ok(Outcome::Inserted(value))
            }
            Operation::Search => {
                let value = require_value(value)?;
                let number = numeric(&value)?;
                if self.search(number) {
                    Ok(Outcome::Found(value))
                } else {
                    Err(DomainError::NotFound(value.to_string()))
                }
            }
            other => Err(unsupported(StructureKind::BinaryTree, other)),
        }
    }
}

fn numeric(value: &Element) -> DomainResult<f64> {
    value
        .as_number()
        .ok_or_else(|| DomainError::InvalidInput(format!("'{value}' is not a number")))
}

pub struct InOrderIter<'a> {
    tree: &'a BinarySearchTree,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIter<'a> {
    fn new(tree: &'a BinarySearchTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            current: tree.root(),
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = (Index, &'a BstNode);

    fn next(&mut self) -> Option<Self::Item> {
        // Descend left as far as possible, then visit and step right
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.tree.get_node(idx).and_then(|n| n.left);
        }
        let idx = self.stack.pop()?;
        let node = self.tree.get_node(idx)?;
        self.current = node.right;
        Some((idx, node))
    }
}

pub struct PreOrderIter<'a> {
    tree: &'a BinarySearchTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a BinarySearchTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a BstNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push right first for left-to-right traversal
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(values: &[f64]) -> BinarySearchTree {
        let mut bst = BinarySearchTree::new();
        for v in values {
            bst.insert(*v);
        }
        bst
    }

    #[test]
    fn given_inserts_when_traversing_inorder_then_sorted() {
        let bst = tree_of(&[5.0, 3.0, 8.0, 1.0, 4.0]);
        assert_eq!(bst.values(), vec![1.0, 3.0, 4.0, 5.0, 8.0]);
        assert_eq!(bst.len(), 5);
    }

    #[test]
    fn given_tie_when_inserting_then_goes_right() {
        let bst = tree_of(&[5.0, 5.0]);
        let root = bst.get_node(bst.root().unwrap()).unwrap();
        assert!(root.left.is_none());
        let right = bst.get_node(root.right.unwrap()).unwrap();
        assert_eq!(right.value, 5.0);
    }

    #[test]
    fn given_tree_when_searching_then_follows_comparison_path() {
        let bst = tree_of(&[5.0, 3.0, 8.0, 1.0]);
        assert!(bst.search(8.0));
        assert!(bst.search(1.0));
        assert!(!bst.search(7.0));
        assert!(!BinarySearchTree::new().search(1.0));
    }

    #[test]
    fn given_sorted_input_when_inserting_then_degrades_to_chain() {
        let bst = tree_of(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(bst.depth(), 4);
    }

    #[test]
    fn given_tree_when_preorder_then_root_left_right() {
        let bst = tree_of(&[5.0, 3.0, 8.0, 1.0]);
        let order: Vec<f64> = bst.iter_preorder().map(|(_, n)| n.value).collect();
        assert_eq!(order, vec![5.0, 3.0, 1.0, 8.0]);
    }

    #[test]
    fn given_same_values_different_order_when_comparing_shape_then_differs() {
        let a = tree_of(&[2.0, 1.0, 3.0]);
        let b = tree_of(&[1.0, 2.0, 3.0]);
        assert_eq!(a.values(), b.values());
        assert!(!a.same_shape(&b));
        assert!(a.same_shape(&tree_of(&[2.0, 3.0, 1.0])));
    }

    #[test]
    fn given_attach_when_rebuilding_then_shape_preserved() {
        let mut bst = BinarySearchTree::new();
        let root = bst.attach(1.0, None).unwrap();
        // 3 hangs left of 1: violates ordering but shape is kept as given
        bst.attach(3.0, Some((root, Side::Left))).unwrap();
        assert!(bst.attach(4.0, Some((root, Side::Left))).is_none());
        assert!(bst.attach(9.0, None).is_none());
        assert_eq!(bst.values(), vec![3.0, 1.0]);
    }

    #[test]
    fn given_text_value_when_inserting_then_invalid_input() {
        let mut bst = BinarySearchTree::new();
        let err = bst.perform(Operation::Insert, Some("abc".into())).unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("'abc' is not a number".into()));
    }

    #[test]
    fn given_tree_when_rendering_then_labels_children() {
        let rendered = tree_of(&[5.0, 3.0]).to_tree_string().to_string();
        assert!(rendered.contains('5'));
        assert!(rendered.contains("L: 3"));
    }

    #[test]
    fn given_long_chain_when_rendering_then_every_node_listed() {
        let values: Vec<f64> = (1..=1000).map(f64::from).collect();
        let bst = tree_of(&values);

        let rendered = bst.to_tree_string().to_string();

        assert_eq!(rendered.lines().count(), 1000);
        assert!(rendered.lines().next().unwrap().ends_with('1'));
        assert!(rendered.lines().last().unwrap().ends_with("R: 1000"));
    }
}
