pub mod listener;
pub mod sampler;
pub mod source;
pub mod window;

pub use listener::focus_listener;
pub use sampler::FocusSampler;
pub use source::{SignalSource, SyntheticSource, WatchSource};
pub use window::{FocusSample, FocusWindow, BASELINE_FOCUS};
