use crate::domain::sort::{StepKind, Stepper, Tracker};

/// Adjacent-comparison passes.
///
/// Every examined pair counts as a comparison; a swap step follows only when
/// the left element is strictly greater. Each pass ends by marking its
/// boundary index sorted; index 0 is marked by the terminal step.
#[derive(Debug, Default)]
pub(super) struct Bubble {
    pass: usize,
    j: usize,
    pending_swap: bool,
    done: bool,
}

impl Bubble {
    pub(super) fn new() -> Self {
        Self::default()
    }
}

impl<T: PartialOrd + Clone> Stepper<T> for Bubble {
    fn advance(&mut self, t: &mut Tracker<T>) -> Option<StepKind> {
        if self.done {
            return None;
        }
        let n = t.len();

        if self.pending_swap {
            self.pending_swap = false;
            t.swap(self.j, self.j + 1);
            self.j += 1;
            return Some(StepKind::Swap);
        }

        if n >= 2 && self.pass < n - 1 {
            let boundary = n - self.pass - 1;
            if self.j < boundary {
                t.compare(self.j, self.j + 1);
                if t.array[self.j] > t.array[self.j + 1] {
                    self.pending_swap = true;
                } else {
                    self.j += 1;
                }
                return Some(StepKind::Compare);
            }
            t.mark(boundary);
            self.pass += 1;
            self.j = 0;
            return Some(StepKind::MarkSorted);
        }

        if n > 0 {
            t.mark(0);
        }
        t.clear_highlight();
        self.done = true;
        Some(StepKind::Complete)
    }
}
