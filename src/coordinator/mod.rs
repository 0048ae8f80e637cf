mod config;
mod controller;
mod loop_worker;
mod state;

pub use config::CoordinatorConfig;
pub use controller::CoordinatorController;
pub use loop_worker::coordinator_loop;
pub use state::{CoordinatorEvent, CoordinatorState, CoordinatorStatus, Effect};
