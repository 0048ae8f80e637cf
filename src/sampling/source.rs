use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::watch;

use super::window::{FocusSample, BASELINE_FOCUS};

/// Largest per-pull move of the synthetic walk.
const SYNTHETIC_MAX_STEP: i64 = 8;

/// Pull boundary to whatever produces focus readings.
pub trait SignalSource: Send {
    fn pull(&mut self) -> FocusSample;
}

/// Bounded random walk over the focus range.
pub struct SyntheticSource {
    rng: StdRng,
    current: i64,
}

impl SyntheticSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            current: BASELINE_FOCUS as i64,
        }
    }
}

impl SignalSource for SyntheticSource {
    fn pull(&mut self) -> FocusSample {
        let step = self.rng.gen_range(-SYNTHETIC_MAX_STEP..=SYNTHETIC_MAX_STEP);
        let sample = FocusSample::clamped(self.current + step);
        self.current = sample.value() as i64;
        sample
    }
}

/// Latest reading published by a push-style collaborator.
pub struct WatchSource {
    rx: watch::Receiver<FocusSample>,
}

impl WatchSource {
    /// Returns the source together with the sender the collaborator publishes on.
    pub fn channel() -> (watch::Sender<FocusSample>, Self) {
        let (tx, rx) = watch::channel(FocusSample::clamped(BASELINE_FOCUS as i64));
        (tx, Self { rx })
    }
}

impl SignalSource for WatchSource {
    fn pull(&mut self) -> FocusSample {
        *self.rx.borrow_and_update()
    }
}
