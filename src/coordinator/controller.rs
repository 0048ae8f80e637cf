use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::generation::GenerationService;
use crate::sampling::FocusSampler;

use super::config::CoordinatorConfig;
use super::loop_worker::coordinator_loop;
use super::state::CoordinatorState;

/// Owns the running coordinator task and its cancellation token.
pub struct CoordinatorController {
    handle: Option<JoinHandle<CoordinatorState>>,
    cancel_token: Option<CancellationToken>,
}

impl CoordinatorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        sampler: FocusSampler,
        service: Arc<GenerationService>,
        config: CoordinatorConfig,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("coordinator already active");
        }
        if config.sampling_interval.is_zero() || config.generation_interval.is_zero() {
            bail!(
                "coordinator intervals must be positive (sampling {:?}, generation {:?})",
                config.sampling_interval,
                config.generation_interval
            );
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        info!("Starting coordinator (max {} generations in flight)", config.max_in_flight);
        let handle = tokio::spawn(coordinator_loop(sampler, service, config, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Token cancelled when the coordinator stops; helper tasks can hang off it.
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.cancel_token.clone()
    }

    /// Request shutdown and wait for the loop to drain.
    pub async fn stop(&mut self) -> Result<CoordinatorState> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => handle.await.context("coordinator task failed to join"),
            None => bail!("coordinator is not running"),
        }
    }
}

impl Default for CoordinatorController {
    fn default() -> Self {
        Self::new()
    }
}
