use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::{timeout, Instant};
use uuid::Uuid;

use crate::composer::{build_prompt, Composer};
use crate::player::Player;
use crate::score::{ambient_key, parse, playback_secs, Segment};
use crate::wire::encode;

use super::context::{CompletedGeneration, GenerationContext};
use super::error::GenerationError;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Turns a focus estimate into a transmitted segment.
///
/// Calls may overlap. The context lock is the only shared state between
/// them: each call reads it once to build its prompt and, on success, holds
/// it for writing while it replaces the context and transmits. Whichever
/// call transmits last therefore owns the final context. A failed call
/// never touches it.
pub struct GenerationService {
    composer: Arc<dyn Composer>,
    player: Arc<dyn Player>,
    system_prompt: String,
    composer_timeout: Duration,
    context: RwLock<GenerationContext>,
}

impl GenerationService {
    pub fn new(
        composer: Arc<dyn Composer>,
        player: Arc<dyn Player>,
        system_prompt: String,
        composer_timeout: Duration,
    ) -> Self {
        Self {
            composer,
            player,
            system_prompt,
            composer_timeout,
            context: RwLock::new(GenerationContext::default()),
        }
    }

    /// Snapshot of the last successful generation.
    pub async fn context(&self) -> GenerationContext {
        self.context.read().await.clone()
    }

    pub async fn generate(&self, focus: f64) -> Result<Segment, GenerationError> {
        let id = Uuid::new_v4();
        let started = Instant::now();

        let result = self.run(id, focus).await;
        match &result {
            Ok(segment) => log_info!(
                "generation {} (focus {:.1}) sent {} events, {:.2}s of playback, in {}ms",
                id,
                focus,
                segment.len(),
                playback_secs(segment),
                started.elapsed().as_millis()
            ),
            Err(err) => log_warn!(
                "generation {} (focus {:.1}) failed at {} stage after {}ms: {}",
                id,
                focus,
                err.stage(),
                started.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    async fn run(&self, id: Uuid, focus: f64) -> Result<Segment, GenerationError> {
        let prompt = {
            let context = self.context.read().await;
            build_prompt(&self.system_prompt, focus, context.continuation())
        };

        let reply = match timeout(self.composer_timeout, self.composer.compose(&prompt)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => return Err(GenerationError::Composer(err)),
            Err(_) => return Err(GenerationError::ComposerTimeout(self.composer_timeout)),
        };

        let segment = parse(&reply);
        if segment.is_empty() {
            return Err(GenerationError::MalformedResponse);
        }

        // The write guard spans the transmit, so the player's most recent
        // segment and the stored context always come from the same call.
        let mut context = self.context.write().await;
        *context = GenerationContext::completed(CompletedGeneration {
            id,
            segment: segment.clone(),
            focus,
            completed_at: Utc::now(),
        });

        self.player
            .send_segment(&encode(&segment))
            .await
            .map_err(GenerationError::Transmit)?;
        if let Some(key) = ambient_key(&segment) {
            self.player
                .send_ambient(key)
                .await
                .map_err(GenerationError::Transmit)?;
        }
        drop(context);

        Ok(segment)
    }
}
