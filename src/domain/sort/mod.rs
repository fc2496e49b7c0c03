//! Step-animated sort engine
//!
//! A [`SortRun`] executes one algorithm over a private copy of the input and
//! yields a [`Step`] per observable mutation. Each algorithm is an explicit
//! state machine, so the run is a plain lazy iterator: nothing happens until
//! the caller asks for the next step, and dropping the run mid-way cancels it
//! with the array left exactly as the last step showed.
//!
//! Invariant: every mutation of the run's state (array, highlights, sorted
//! set, counters) is published by exactly one step. The last emitted step
//! therefore always equals the run's internal state.

mod bubble;
mod merge;
mod quick;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

use bubble::Bubble;
use merge::Merge;
use quick::Quick;

/// Sort algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" => Ok(Algorithm::Bubble),
            "quick" => Ok(Algorithm::Quick),
            "merge" => Ok(Algorithm::Merge),
            other => Err(DomainError::InvalidInput(format!(
                "unknown algorithm '{other}'"
            ))),
        }
    }
}

/// What a step published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Two elements were compared; `comparisons` went up by one.
    Compare,
    /// Two positions were exchanged in place; `swaps` went up by one.
    Swap,
    /// A merge wrote one value into the destination range; counted as a swap.
    Write,
    /// One index joined the sorted set.
    MarkSorted,
    /// Terminal step. Highlights are cleared and every index is sorted.
    Complete,
}

/// One observable snapshot of a run in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<T> {
    pub kind: StepKind,
    pub array: Vec<T>,
    pub highlighted: Vec<usize>,
    pub sorted: BTreeSet<usize>,
    pub comparisons: u64,
    pub swaps: u64,
}

impl<T> Step<T> {
    pub fn is_complete(&self) -> bool {
        self.kind == StepKind::Complete
    }
}

/// Mutable state shared by the algorithm state machines.
#[derive(Debug, Clone)]
pub(crate) struct Tracker<T> {
    pub(crate) array: Vec<T>,
    highlighted: Vec<usize>,
    sorted: BTreeSet<usize>,
    comparisons: u64,
    swaps: u64,
}

impl<T: Clone> Tracker<T> {
    fn new(array: Vec<T>) -> Self {
        Self {
            array,
            highlighted: Vec::new(),
            sorted: BTreeSet::new(),
            comparisons: 0,
            swaps: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.array.len()
    }

    pub(crate) fn compare(&mut self, a: usize, b: usize) {
        self.highlighted = vec![a, b];
        self.comparisons += 1;
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.array.swap(a, b);
        self.highlighted = vec![a, b];
        self.swaps += 1;
    }

    pub(crate) fn write(&mut self, index: usize, value: T) {
        self.array[index] = value;
        self.highlighted = vec![index];
        self.swaps += 1;
    }

    pub(crate) fn mark(&mut self, index: usize) {
        self.highlighted.clear();
        self.sorted.insert(index);
    }

    pub(crate) fn mark_all(&mut self) {
        self.highlighted.clear();
        self.sorted.extend(0..self.array.len());
    }

    pub(crate) fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    fn snapshot(&self, kind: StepKind) -> Step<T> {
        Step {
            kind,
            array: self.array.clone(),
            highlighted: self.highlighted.clone(),
            sorted: self.sorted.clone(),
            comparisons: self.comparisons,
            swaps: self.swaps,
        }
    }
}

/// Per-algorithm state machine: perform work up to the next observable
/// mutation and report its kind, or None once the run has completed.
trait Stepper<T> {
    fn advance(&mut self, tracker: &mut Tracker<T>) -> Option<StepKind>;
}

#[derive(Debug)]
enum Machine<T> {
    Bubble(Bubble),
    Quick(Quick),
    Merge(Merge<T>),
}

/// One animated sort over a private copy of the input.
///
/// Not restartable: a fresh run must be built from the original array.
#[derive(Debug)]
pub struct SortRun<T> {
    algorithm: Algorithm,
    tracker: Tracker<T>,
    machine: Machine<T>,
    emitted: usize,
    finished: bool,
}

impl<T: PartialOrd + Clone> SortRun<T> {
    pub fn new(algorithm: Algorithm, values: &[T]) -> Self {
        let tracker = Tracker::new(values.to_vec());
        let n = tracker.len();
        let machine = match algorithm {
            Algorithm::Bubble => Machine::Bubble(Bubble::new()),
            Algorithm::Quick => Machine::Quick(Quick::new(n)),
            Algorithm::Merge => Machine::Merge(Merge::new(n)),
        };
        Self {
            algorithm,
            tracker,
            machine,
            emitted: 0,
            finished: false,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Current array, as shown by the last emitted step.
    pub fn array(&self) -> &[T] {
        &self.tracker.array
    }

    pub fn comparisons(&self) -> u64 {
        self.tracker.comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.tracker.swaps
    }

    pub fn sorted(&self) -> &BTreeSet<usize> {
        &self.tracker.sorted
    }

    pub fn steps_emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Snapshot of the current state without advancing.
    pub fn current(&self) -> Step<T> {
        let kind = if self.finished {
            StepKind::Complete
        } else {
            StepKind::MarkSorted
        };
        self.tracker.snapshot(kind)
    }
}

impl<T: PartialOrd + Clone> Iterator for SortRun<T> {
    type Item = Step<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let kind = match &mut self.machine {
            Machine::Bubble(m) => m.advance(&mut self.tracker),
            Machine::Quick(m) => m.advance(&mut self.tracker),
            Machine::Merge(m) => m.advance(&mut self.tracker),
        }?;
        if kind == StepKind::Complete {
            self.finished = true;
        }
        self.emitted += 1;
        Some(self.tracker.snapshot(kind))
    }
}

impl<T: PartialOrd + Clone> std::iter::FusedIterator for SortRun<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_algorithm_names_when_parsing_then_roundtrip_display() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!("heap".parse::<Algorithm>().is_err());
    }

    #[test]
    fn given_finished_run_when_next_then_none() {
        let mut run = SortRun::new(Algorithm::Bubble, &[2, 1]);
        let last = run.by_ref().last().unwrap();
        assert!(last.is_complete());
        assert!(run.is_finished());
        assert!(run.next().is_none());
        assert_eq!(run.current().array, vec![1, 2]);
    }
}
