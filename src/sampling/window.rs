use std::collections::VecDeque;

use crate::settings::MAX_WINDOW_CAPACITY;

/// Reading the window holds before any real sample arrives.
pub const BASELINE_FOCUS: u8 = 50;

/// One instantaneous focus reading in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FocusSample(u8);

impl FocusSample {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Pin an arbitrary reading into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// FIFO of the most recent readings. Never empty.
#[derive(Debug, Clone)]
pub struct FocusWindow {
    samples: VecDeque<FocusSample>,
    capacity: usize,
}

impl FocusWindow {
    /// Capacity is pinned to `1..=MAX_WINDOW_CAPACITY`; the window starts with one baseline reading.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_WINDOW_CAPACITY);
        let mut samples = VecDeque::with_capacity(capacity + 1);
        samples.push_back(FocusSample(BASELINE_FOCUS));
        Self { samples, capacity }
    }

    pub fn push(&mut self, sample: FocusSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn average(&self) -> f64 {
        let total: u32 = self.samples.iter().map(|s| s.value() as u32).sum();
        total as f64 / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> FocusSample {
        // Seeded at construction and never drained below one entry.
        *self.samples.back().unwrap_or(&FocusSample(BASELINE_FOCUS))
    }
}

impl Default for FocusWindow {
    fn default() -> Self {
        Self::new(MAX_WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(value: u8) -> FocusSample {
        FocusSample::new(value).unwrap()
    }

    #[test]
    fn seeded_with_baseline() {
        let window = FocusWindow::default();
        assert_eq!(window.len(), 1);
        assert_eq!(window.average(), 50.0);
    }

    #[test]
    fn averages_seed_and_samples() {
        let mut window = FocusWindow::default();
        window.push(s(10));
        window.push(s(90));
        assert_eq!(window.len(), 3);
        assert_eq!(window.average(), 50.0);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut window = FocusWindow::new(10);
        let mut pushed = vec![BASELINE_FOCUS];
        for i in 0..37u8 {
            let value = (i * 7) % 100 + 1;
            window.push(s(value));
            pushed.push(value);

            assert!(window.len() <= 10);
            let tail = &pushed[pushed.len().saturating_sub(10)..];
            let expected = tail.iter().map(|&v| v as f64).sum::<f64>() / tail.len() as f64;
            assert!((window.average() - expected).abs() < 1e-9);
        }
        assert_eq!(window.len(), 10);
        assert_eq!(window.latest().value(), (36 * 7) % 100 + 1);
    }

    #[test]
    fn capacity_is_pinned_to_supported_range() {
        assert_eq!(FocusWindow::new(0).capacity(), 1);
        assert_eq!(FocusWindow::new(64).capacity(), 10);

        let mut single = FocusWindow::new(1);
        single.push(s(80));
        assert_eq!(single.len(), 1);
        assert_eq!(single.average(), 80.0);
    }

    #[test]
    fn sample_range_is_enforced() {
        assert!(FocusSample::new(0).is_none());
        assert!(FocusSample::new(101).is_none());
        assert_eq!(FocusSample::clamped(-5).value(), 1);
        assert_eq!(FocusSample::clamped(250).value(), 100);
        assert_eq!(FocusSample::clamped(42).value(), 42);
    }

    proptest! {
        #[test]
        fn window_holds_mean_of_most_recent_readings(
            capacity in 1usize..=MAX_WINDOW_CAPACITY,
            readings in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut window = FocusWindow::new(capacity);
            let mut history = vec![BASELINE_FOCUS];
            for raw in readings {
                let sample = FocusSample::clamped(raw as i64);
                window.push(sample);
                history.push(sample.value());

                prop_assert!(window.len() >= 1 && window.len() <= capacity);
                let tail = &history[history.len().saturating_sub(capacity)..];
                let mean = tail.iter().map(|&v| v as f64).sum::<f64>() / tail.len() as f64;
                prop_assert!((window.average() - mean).abs() < 1e-9);
                prop_assert_eq!(window.latest(), sample);
            }
        }
    }
}
