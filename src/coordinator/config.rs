use std::time::Duration;

use crate::settings::Settings;

/// Cadences and limits for the coordinator loop.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub sampling_interval: Duration,
    pub generation_interval: Duration,

    /// Generation ticks are skipped while this many calls are outstanding
    pub max_in_flight: usize,

    /// How long shutdown waits for in-flight generations before aborting them
    pub shutdown_grace: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            sampling_interval: Duration::from_millis(200),
            generation_interval: Duration::from_millis(2_500),
            max_in_flight: 4,
            shutdown_grace: Duration::from_secs(2),
        }
    }
}

impl From<&Settings> for CoordinatorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            sampling_interval: settings.sampling_interval(),
            generation_interval: settings.generation_interval(),
            max_in_flight: settings.max_in_flight,
            shutdown_grace: settings.shutdown_grace(),
        }
    }
}
