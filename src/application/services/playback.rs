//! Speed-throttled sort playback with cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Algorithm, DomainError, SortRun, Step};

pub const MIN_ARRAY_SIZE: usize = 10;
pub const MAX_ARRAY_SIZE: usize = 50;
/// Inclusive range of generated values.
pub const VALUE_RANGE: std::ops::RangeInclusive<u32> = 10..=109;

/// Playback speed in percent; higher is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Clamp `percent` into `1..=100`.
    pub fn new(percent: u32) -> Self {
        Self(percent.clamp(u32::from(Self::MIN), u32::from(Self::MAX)) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Delay between two steps: `101 - speed` milliseconds.
    pub fn delay(self) -> Duration {
        Duration::from_millis(101 - u64::from(self.0))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

/// Shared flag to stop a run between steps.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a playback ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome<T> {
    /// The terminal step was observed.
    Completed { last: Step<T>, steps: usize },
    /// Stopped early; `last` is the final state shown, None if nothing was shown.
    Cancelled { last: Option<Step<T>>, steps: usize },
}

impl<T> PlaybackOutcome<T> {
    pub fn last(&self) -> Option<&Step<T>> {
        match self {
            PlaybackOutcome::Completed { last, .. } => Some(last),
            PlaybackOutcome::Cancelled { last, .. } => last.as_ref(),
        }
    }

    pub fn steps(&self) -> usize {
        match self {
            PlaybackOutcome::Completed { steps, .. } | PlaybackOutcome::Cancelled { steps, .. } => {
                *steps
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlaybackOutcome::Cancelled { .. })
    }
}

/// Drives a [`SortRun`], handing each step to an observer before sleeping.
#[derive(Debug, Clone, Default)]
pub struct PlaybackService {
    speed: Speed,
}

impl PlaybackService {
    pub fn new(speed: Speed) -> Self {
        Self { speed }
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Play `run` to completion or until `cancel` fires.
    ///
    /// The flag is checked before each next step is computed, so a
    /// cancelled run never advances past the step the observer last saw.
    /// Every step reaches `on_step`; none are skipped at any speed.
    #[instrument(level = "debug", skip_all, fields(algorithm = %run.algorithm(), speed = self.speed.percent()))]
    pub async fn play<T, F>(
        &self,
        mut run: SortRun<T>,
        cancel: &CancelHandle,
        mut on_step: F,
    ) -> PlaybackOutcome<T>
    where
        T: PartialOrd + Clone,
        F: FnMut(&Step<T>),
    {
        let delay = self.speed.delay();
        let mut last: Option<Step<T>> = None;
        let mut steps = 0;

        loop {
            if cancel.is_cancelled() {
                debug!("play: cancelled after {} steps", steps);
                return PlaybackOutcome::Cancelled { last, steps };
            }
            let Some(step) = run.next() else { break };
            steps += 1;
            on_step(&step);
            let complete = step.is_complete();
            last = Some(step);
            if complete {
                break;
            }
            tokio::time::sleep(delay).await;
        }

        debug!("play: completed in {} steps", steps);
        PlaybackOutcome::Completed {
            last: last.unwrap_or_else(|| run.current()),
            steps,
        }
    }
}

/// Random values for a fresh visualization.
pub fn random_array<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec<u32> {
    (0..size).map(|_| rng.gen_range(VALUE_RANGE)).collect()
}

/// One visualization instance: the array on display plus the result of the
/// last run. At most one run may be active at a time.
#[derive(Debug)]
pub struct Visualizer {
    array: Vec<u32>,
    last: Option<Step<u32>>,
    running: Arc<AtomicBool>,
}

/// A started run. Dropping it releases the visualizer for the next start.
#[derive(Debug)]
pub struct ActiveRun {
    pub run: SortRun<u32>,
    pub cancel: CancelHandle,
    _guard: RunGuard,
}

#[derive(Debug)]
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Visualizer {
    /// Start with a random array of `size` values.
    pub fn random(size: usize) -> ApplicationResult<Self> {
        let size = check_size(size)?;
        Ok(Self::with_values(random_array(&mut rand::thread_rng(), size)))
    }

    pub fn with_values(values: Vec<u32>) -> Self {
        Self {
            array: values,
            last: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn array(&self) -> &[u32] {
        &self.array
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Counters of the last finished run, zero after (re)generation.
    pub fn comparisons(&self) -> u64 {
        self.last.as_ref().map_or(0, |s| s.comparisons)
    }

    pub fn swaps(&self) -> u64 {
        self.last.as_ref().map_or(0, |s| s.swaps)
    }

    pub fn last_step(&self) -> Option<&Step<u32>> {
        self.last.as_ref()
    }

    /// Replace the array with fresh random values and reset counters.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, size: usize) -> ApplicationResult<()> {
        if self.is_running() {
            return Err(ApplicationError::SortInProgress);
        }
        let size = check_size(size)?;
        self.array = random_array(rng, size);
        self.last = None;
        Ok(())
    }

    /// Begin a run over the current array.
    #[instrument(level = "debug", skip(self))]
    pub fn start(&self, algorithm: Algorithm) -> ApplicationResult<ActiveRun> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ApplicationError::SortInProgress);
        }
        info!("start: {} sort over {} values", algorithm, self.array.len());
        Ok(ActiveRun {
            run: SortRun::new(algorithm, &self.array),
            cancel: CancelHandle::new(),
            _guard: RunGuard(Arc::clone(&self.running)),
        })
    }

    /// Adopt the state the last observed step showed, sorted or not.
    pub fn finish(&mut self, outcome: &PlaybackOutcome<u32>) {
        if let Some(last) = outcome.last() {
            self.array = last.array.clone();
            self.last = Some(last.clone());
        }
    }
}

fn check_size(size: usize) -> ApplicationResult<usize> {
    if !(MIN_ARRAY_SIZE..=MAX_ARRAY_SIZE).contains(&size) {
        return Err(DomainError::InvalidInput(format!(
            "array size must be between {MIN_ARRAY_SIZE} and {MAX_ARRAY_SIZE}, got {size}"
        ))
        .into());
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn given_out_of_range_percent_when_creating_speed_then_clamped() {
        assert_eq!(Speed::new(0).percent(), 1);
        assert_eq!(Speed::new(250).percent(), 100);
        assert_eq!(Speed::new(100).delay(), Duration::from_millis(1));
        assert_eq!(Speed::new(1).delay(), Duration::from_millis(100));
    }

    #[test]
    fn given_seeded_rng_when_generating_then_values_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = random_array(&mut rng, 30);
        assert_eq!(values.len(), 30);
        assert!(values.iter().all(|v| VALUE_RANGE.contains(v)));
    }

    #[test]
    fn given_active_run_when_starting_again_then_sort_in_progress() {
        let viz = Visualizer::with_values(vec![3, 2, 1]);
        let active = viz.start(Algorithm::Bubble).unwrap();

        assert!(matches!(
            viz.start(Algorithm::Quick),
            Err(ApplicationError::SortInProgress)
        ));

        drop(active);
        assert!(!viz.is_running());
        assert!(viz.start(Algorithm::Quick).is_ok());
    }

    #[test]
    fn given_size_outside_bounds_when_regenerating_then_invalid_input() {
        let mut viz = Visualizer::with_values(vec![1]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(viz.regenerate(&mut rng, 9).is_err());
        assert!(viz.regenerate(&mut rng, 51).is_err());
        assert!(viz.regenerate(&mut rng, 10).is_ok());
        assert_eq!(viz.array().len(), 10);
    }
}
