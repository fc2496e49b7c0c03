use crate::domain::sort::{StepKind, Stepper, Tracker};

/// Lomuto partition state over the inclusive range `low..=high`.
#[derive(Debug)]
struct Partition {
    low: usize,
    high: usize,
    /// Next slot for an element smaller than the pivot
    store: usize,
    j: usize,
    pending_swap: bool,
}

/// Quick sort with the last element of each range as pivot.
///
/// The recursion is replaced by an explicit range stack. The right range is
/// pushed before the left one so the left partition is always finished first.
#[derive(Debug)]
pub(super) struct Quick {
    ranges: Vec<(usize, usize)>,
    partition: Option<Partition>,
    pending_mark: Option<usize>,
    done: bool,
}

impl Quick {
    pub(super) fn new(len: usize) -> Self {
        let ranges = if len > 0 { vec![(0, len - 1)] } else { Vec::new() };
        Self {
            ranges,
            partition: None,
            pending_mark: None,
            done: false,
        }
    }
}

impl<T: PartialOrd + Clone> Stepper<T> for Quick {
    fn advance(&mut self, t: &mut Tracker<T>) -> Option<StepKind> {
        if self.done {
            return None;
        }
        loop {
            // partition index is marked on its own step, right after the pivot swap
            if let Some(index) = self.pending_mark.take() {
                t.mark(index);
                return Some(StepKind::MarkSorted);
            }

            if let Some(p) = &mut self.partition {
                if p.pending_swap {
                    p.pending_swap = false;
                    t.swap(p.store, p.j);
                    p.store += 1;
                    p.j += 1;
                    return Some(StepKind::Swap);
                }
                if p.j < p.high {
                    t.compare(p.high, p.j);
                    if t.array[p.j] < t.array[p.high] {
                        p.pending_swap = true;
                    } else {
                        p.j += 1;
                    }
                    return Some(StepKind::Compare);
                }

                let (low, high, pivot_index) = (p.low, p.high, p.store);
                t.swap(pivot_index, high);
                self.partition = None;
                self.pending_mark = Some(pivot_index);
                if pivot_index < high {
                    self.ranges.push((pivot_index + 1, high));
                }
                if pivot_index > low {
                    self.ranges.push((low, pivot_index - 1));
                }
                return Some(StepKind::Swap);
            }

            match self.ranges.pop() {
                Some((low, high)) if low == high => {
                    t.mark(low);
                    return Some(StepKind::MarkSorted);
                }
                Some((low, high)) => {
                    self.partition = Some(Partition {
                        low,
                        high,
                        store: low,
                        j: low,
                        pending_swap: false,
                    });
                }
                None => {
                    t.clear_highlight();
                    self.done = true;
                    return Some(StepKind::Complete);
                }
            }
        }
    }
}
