use crate::domain::sort::{StepKind, Stepper, Tracker};

#[derive(Debug, Clone, Copy)]
enum Frame {
    Split { start: usize, end: usize },
    Merge { start: usize, mid: usize, end: usize },
}

#[derive(Debug, Clone, Copy)]
enum Pick {
    Left,
    Right,
}

/// One in-progress merge of `start..=mid` and `mid+1..=end`.
#[derive(Debug)]
struct MergePass<T> {
    start: usize,
    mid: usize,
    left: Vec<T>,
    right: Vec<T>,
    i: usize,
    j: usize,
    k: usize,
    pending: Option<Pick>,
}

/// Top-down merge sort driven by an explicit frame stack.
///
/// Every write into the destination range counts as a swap and is its own
/// step, including the leftover drains. Sortedness is only known once the
/// outermost merge returns, so all indices are marked by the terminal step.
#[derive(Debug)]
pub(super) struct Merge<T> {
    frames: Vec<Frame>,
    active: Option<MergePass<T>>,
    done: bool,
}

impl<T> Merge<T> {
    pub(super) fn new(len: usize) -> Self {
        let frames = if len > 0 {
            vec![Frame::Split {
                start: 0,
                end: len - 1,
            }]
        } else {
            Vec::new()
        };
        Self {
            frames,
            active: None,
            done: false,
        }
    }
}

impl<T: PartialOrd + Clone> Stepper<T> for Merge<T> {
    fn advance(&mut self, t: &mut Tracker<T>) -> Option<StepKind> {
        if self.done {
            return None;
        }
        loop {
            if let Some(pass) = &mut self.active {
                if let Some(pick) = pass.pending.take() {
                    let value = match pick {
                        Pick::Left => {
                            pass.i += 1;
                            pass.left[pass.i - 1].clone()
                        }
                        Pick::Right => {
                            pass.j += 1;
                            pass.right[pass.j - 1].clone()
                        }
                    };
                    t.write(pass.k, value);
                    pass.k += 1;
                    return Some(StepKind::Write);
                }
                if pass.i < pass.left.len() && pass.j < pass.right.len() {
                    t.compare(pass.start + pass.i, pass.mid + 1 + pass.j);
                    // <= keeps equal elements in left-first order
                    pass.pending = Some(if pass.left[pass.i] <= pass.right[pass.j] {
                        Pick::Left
                    } else {
                        Pick::Right
                    });
                    return Some(StepKind::Compare);
                }
                if pass.i < pass.left.len() {
                    let value = pass.left[pass.i].clone();
                    pass.i += 1;
                    t.write(pass.k, value);
                    pass.k += 1;
                    return Some(StepKind::Write);
                }
                if pass.j < pass.right.len() {
                    let value = pass.right[pass.j].clone();
                    pass.j += 1;
                    t.write(pass.k, value);
                    pass.k += 1;
                    return Some(StepKind::Write);
                }
                self.active = None;
                continue;
            }

            match self.frames.pop() {
                Some(Frame::Split { start, end }) => {
                    if start < end {
                        let mid = (start + end) / 2;
                        self.frames.push(Frame::Merge { start, mid, end });
                        self.frames.push(Frame::Split { start: mid + 1, end });
                        self.frames.push(Frame::Split { start, end: mid });
                    }
                }
                Some(Frame::Merge { start, mid, end }) => {
                    self.active = Some(MergePass {
                        start,
                        mid,
                        left: t.array[start..=mid].to_vec(),
                        right: t.array[mid + 1..=end].to_vec(),
                        i: 0,
                        j: 0,
                        k: start,
                        pending: None,
                    });
                }
                None => {
                    t.mark_all();
                    self.done = true;
                    return Some(StepKind::Complete);
                }
            }
        }
    }
}
