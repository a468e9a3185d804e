//! Simulated progress for the loading screen.
//!
//! Progress starts at 0 and grows by a random amount on every tick until it
//! reaches 100, then the task waits a short settle delay before finishing.
//! Dropping a [`LoadingTask`] aborts the ticker, so a visitor who leaves the
//! screen early never leaves a timer running.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Status lines shown under the progress bar.
pub const STATUS_LINES: [&str; 3] = [
    "Analisando sua área de atuação...",
    "Calculando potencial de leads...",
    "Gerando seu diagnóstico personalizado...",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingConfig {
    pub tick: Duration,
    /// Pause between reaching 100% and leaving the screen.
    pub settle: Duration,
    /// Smallest increment per tick, in percentage points.
    pub min_step: f64,
    /// Largest increment per tick (exclusive).
    pub max_step: f64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(150),
            settle: Duration::from_millis(500),
            min_step: 5.0,
            max_step: 20.0,
        }
    }
}

impl LoadingConfig {
    /// Upper bound on ticks needed to reach 100.
    pub fn max_ticks(&self) -> usize {
        (PROGRESS_COMPLETE / self.min_step).ceil() as usize
    }
}

/// Monotonic progress value in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    value: f64,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_complete(&self) -> bool {
        self.value >= PROGRESS_COMPLETE
    }

    /// Whole percentage for display.
    pub fn percent(&self) -> u8 {
        self.value.min(PROGRESS_COMPLETE).round() as u8
    }

    /// Add one random increment, clamping at 100. Returns the new value.
    pub fn advance<R: Rng>(&mut self, rng: &mut R, config: &LoadingConfig) -> f64 {
        if !self.is_complete() {
            let step = rng.gen_range(config.min_step..config.max_step);
            self.value = (self.value + step).min(PROGRESS_COMPLETE);
        }
        self.value
    }
}

/// Background ticker driving [`Progress`]; finishes after the settle delay.
pub struct LoadingTask {
    handle: Option<JoinHandle<()>>,
    progress: watch::Receiver<Progress>,
}

impl LoadingTask {
    /// Spawn the ticker on the current runtime.
    pub fn start(config: LoadingConfig) -> Self {
        let (tx, rx) = watch::channel(Progress::new());
        let handle = tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut progress = Progress::new();
            let mut interval = tokio::time::interval(config.tick);
            // The first tick fires immediately; progress starts at 0.
            interval.tick().await;
            while !progress.is_complete() {
                interval.tick().await;
                progress.advance(&mut rng, &config);
                // A dropped receiver is fine; keep going so the timing is unchanged.
                let _ = tx.send(progress);
            }
            drop(interval);
            debug!("loading progress complete");
            tokio::time::sleep(config.settle).await;
        });
        Self {
            handle: Some(handle),
            progress: rx,
        }
    }

    /// Subscribe to progress updates.
    pub fn progress(&self) -> watch::Receiver<Progress> {
        self.progress.clone()
    }

    /// Wait for progress to reach 100 and the settle delay to pass.
    pub async fn finished(mut self) -> Result<(), JoinError> {
        match self.handle.take() {
            Some(handle) => handle.await,
            None => Ok(()),
        }
    }
}

impl Drop for LoadingTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast() -> LoadingConfig {
        LoadingConfig {
            tick: Duration::from_millis(1),
            settle: Duration::from_millis(1),
            ..LoadingConfig::default()
        }
    }

    #[test]
    fn percent_rounds_and_caps() {
        assert_eq!(Progress { value: 42.5 }.percent(), 43);
        assert_eq!(Progress { value: 100.0 }.percent(), 100);
        assert_eq!(Progress::new().percent(), 0);
    }

    #[test]
    fn default_timing() {
        let config = LoadingConfig::default();
        assert_eq!(config.tick, Duration::from_millis(150));
        assert_eq!(config.settle, Duration::from_millis(500));
        assert_eq!(config.max_ticks(), 20);
    }

    proptest! {
        #[test]
        fn progress_is_monotonic_and_ends_at_exactly_100(seed in any::<u64>()) {
            let config = LoadingConfig::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut progress = Progress::new();
            let mut ticks = 0;
            let mut last = progress.value();
            while !progress.is_complete() {
                let next = progress.advance(&mut rng, &config);
                prop_assert!(next >= last);
                last = next;
                ticks += 1;
            }
            prop_assert_eq!(progress.value(), PROGRESS_COMPLETE);
            prop_assert!(ticks <= config.max_ticks());
            // At most 20 points per tick, so at least 5 ticks.
            prop_assert!(ticks >= 5);
        }
    }

    #[test]
    fn advance_after_completion_is_noop() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut progress = Progress { value: 100.0 };
        assert_eq!(progress.advance(&mut rng, &LoadingConfig::default()), 100.0);
    }

    #[tokio::test]
    async fn task_reaches_100_before_finishing() {
        let task = LoadingTask::start(fast());
        let rx = task.progress();
        task.finished().await.expect("loading task panicked");
        assert!(rx.borrow().is_complete());
        assert_eq!(rx.borrow().value(), PROGRESS_COMPLETE);
    }

    #[tokio::test]
    async fn observed_progress_never_decreases() {
        let task = LoadingTask::start(fast());
        let mut rx = task.progress();
        let mut last = 0.0;
        while rx.changed().await.is_ok() {
            let value = rx.borrow_and_update().value();
            assert!(value >= last);
            last = value;
        }
        assert_eq!(rx.borrow().value(), PROGRESS_COMPLETE);
        drop(task);
    }

    #[tokio::test]
    async fn dropping_task_cancels_ticker() {
        let task = LoadingTask::start(LoadingConfig {
            tick: Duration::from_secs(60),
            ..LoadingConfig::default()
        });
        let mut rx = task.progress();
        drop(task);
        // The sender lives in the aborted task; once it is gone, `changed` errors.
        assert!(rx.changed().await.is_err());
        assert_eq!(rx.borrow().value(), 0.0);
    }
}
