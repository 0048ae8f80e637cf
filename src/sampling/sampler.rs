use super::source::SignalSource;
use super::window::{FocusSample, FocusWindow};

/// Owns the focus window and the source feeding it. Single writer: the
/// coordinator loop is the only caller of [`FocusSampler::sample`].
pub struct FocusSampler {
    window: FocusWindow,
    source: Box<dyn SignalSource>,
}

impl FocusSampler {
    pub fn new(capacity: usize, source: Box<dyn SignalSource>) -> Self {
        Self {
            window: FocusWindow::new(capacity),
            source,
        }
    }

    /// Pull one reading and append it to the window.
    pub fn sample(&mut self) -> FocusSample {
        let reading = self.source.pull();
        self.window.push(reading);
        reading
    }

    /// Mean of the current window.
    pub fn current_average(&self) -> f64 {
        self.window.average()
    }

    pub fn window(&self) -> &FocusWindow {
        &self.window
    }
}
