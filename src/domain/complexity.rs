//! Static time/space cost tables for structure operations and sort algorithms

use serde::Serialize;

use crate::domain::sort::Algorithm;
use crate::domain::structures::{Operation, StructureKind};

/// Cost of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub time: &'static str,
    pub space: &'static str,
    pub description: &'static str,
}

/// Display data for a sort algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub time: &'static str,
    pub space: &'static str,
    pub description: &'static str,
}

const fn entry(time: &'static str, space: &'static str, description: &'static str) -> Complexity {
    Complexity {
        time,
        space,
        description,
    }
}

static ARRAY_PUSH: Complexity = entry(
    "O(1)",
    "O(1)",
    "Adding an element to the end of an array is constant time as it just appends to the existing structure.",
);
static ARRAY_POP: Complexity = entry(
    "O(1)",
    "O(1)",
    "Removing the last element is constant time since no shifting of elements is required.",
);
static ARRAY_INSERT: Complexity = entry(
    "O(n)",
    "O(1)",
    "Inserting at a specific position requires shifting all subsequent elements, making it linear time.",
);
static ARRAY_SEARCH: Complexity = entry(
    "O(n)",
    "O(1)",
    "Linear search requires checking each element until the target is found or all elements are checked.",
);
static STACK_PUSH: Complexity = entry(
    "O(1)",
    "O(1)",
    "Push operation adds element to the top of the stack in constant time.",
);
static STACK_POP: Complexity = entry(
    "O(1)",
    "O(1)",
    "Pop operation removes the top element in constant time (LIFO principle).",
);
static QUEUE_ENQUEUE: Complexity = entry(
    "O(1)",
    "O(1)",
    "Enqueue adds an element to the rear of the queue in constant time.",
);
static QUEUE_DEQUEUE: Complexity = entry(
    "O(1)",
    "O(1)",
    "Dequeue removes from the front of a ring buffer by advancing the head pointer, so no elements move. An array-backed queue that shifts on removal would be O(n).",
);
static LIST_ADD: Complexity = entry(
    "O(n)",
    "O(1)",
    "Adding to the end requires traversing the entire list to find the last node, making it O(n). With a tail pointer, this would be O(1).",
);
static LIST_REMOVE: Complexity = entry(
    "O(n)",
    "O(1)",
    "Removing a specific value requires traversing the list to find it, which takes linear time.",
);
static LIST_SEARCH: Complexity = entry(
    "O(n)",
    "O(1)",
    "Searching requires traversing from head to tail in the worst case, checking each node.",
);
static BST_INSERT: Complexity = entry(
    "O(log n) average, O(n) worst",
    "O(log n)",
    "In a balanced BST, insertion is O(log n). In worst case (skewed tree), it degrades to O(n). Space complexity accounts for recursion stack.",
);
static BST_SEARCH: Complexity = entry(
    "O(log n) average, O(n) worst",
    "O(log n)",
    "Balanced BST allows binary search with O(log n). Worst case (skewed tree) requires checking all nodes O(n).",
);

/// Look up the cost of `operation` on `kind`.
///
/// Returns None when the catalog has no entry, e.g. search on a stack.
pub fn lookup(kind: StructureKind, operation: Operation) -> Option<&'static Complexity> {
    use Operation::*;
    use StructureKind::*;

    match (kind, operation) {
        (Array, Push) => Some(&ARRAY_PUSH),
        (Array, Pop) => Some(&ARRAY_POP),
        (Array, Insert) => Some(&ARRAY_INSERT),
        (Array, Search) => Some(&ARRAY_SEARCH),
        (Stack, Push) => Some(&STACK_PUSH),
        (Stack, Pop) => Some(&STACK_POP),
        (Queue, Enqueue) => Some(&QUEUE_ENQUEUE),
        (Queue, Dequeue) => Some(&QUEUE_DEQUEUE),
        (LinkedList, Add) => Some(&LIST_ADD),
        (LinkedList, Remove) => Some(&LIST_REMOVE),
        (LinkedList, Search) => Some(&LIST_SEARCH),
        (BinaryTree, Insert) => Some(&BST_INSERT),
        (BinaryTree, Search) => Some(&BST_SEARCH),
        _ => None,
    }
}

/// All catalog entries for one structure, in capability order first.
pub fn entries(kind: StructureKind) -> Vec<(Operation, &'static Complexity)> {
    const ORDER: [Operation; 8] = [
        Operation::Push,
        Operation::Pop,
        Operation::Insert,
        Operation::Search,
        Operation::Enqueue,
        Operation::Dequeue,
        Operation::Add,
        Operation::Remove,
    ];
    let mut ops: Vec<Operation> = kind.capabilities().to_vec();
    ops.extend(ORDER.iter().filter(|op| !kind.supports(**op)));
    ops.into_iter()
        .filter_map(|op| lookup(kind, op).map(|c| (op, c)))
        .collect()
}

pub fn algorithm_info(algorithm: Algorithm) -> AlgorithmInfo {
    match algorithm {
        Algorithm::Bubble => AlgorithmInfo {
            name: "Bubble Sort",
            time: "O(n²)",
            space: "O(1)",
            description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
        },
        Algorithm::Quick => AlgorithmInfo {
            name: "Quick Sort",
            time: "O(n log n) average",
            space: "O(log n)",
            description: "Picks a pivot element and partitions the array around it, recursively sorting the sub-arrays.",
        },
        Algorithm::Merge => AlgorithmInfo {
            name: "Merge Sort",
            time: "O(n log n)",
            space: "O(n)",
            description: "Divides the array into halves, recursively sorts them, and then merges the sorted halves.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_stack_when_looking_up_search_then_not_found() {
        assert!(lookup(StructureKind::Stack, Operation::Search).is_none());
    }

    #[test]
    fn given_every_capability_when_looking_up_then_entry_exists() {
        for kind in StructureKind::ALL {
            for op in kind.capabilities() {
                assert!(
                    lookup(kind, *op).is_some(),
                    "missing catalog entry for {kind} {op}"
                );
            }
        }
    }

    #[test]
    fn given_array_when_listing_entries_then_hidden_insert_last() {
        let ops: Vec<Operation> = entries(StructureKind::Array).into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            ops,
            vec![Operation::Push, Operation::Pop, Operation::Search, Operation::Insert]
        );
    }
}
