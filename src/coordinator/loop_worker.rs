use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};
use tokio::time::{interval, interval_at, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::generation::{GenerationError, GenerationService};
use crate::sampling::FocusSampler;
use crate::score::Segment;

use super::config::CoordinatorConfig;
use super::state::{CoordinatorEvent, CoordinatorState, CoordinatorStatus, Effect};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_debug, log_error, log_info, log_warn};

type GenerationOutcome = Result<Segment, GenerationError>;

/// Drive sampling and generation until cancelled, then drain. Returns the final state.
pub async fn coordinator_loop(
    mut sampler: FocusSampler,
    service: Arc<GenerationService>,
    config: CoordinatorConfig,
    cancel_token: CancellationToken,
) -> CoordinatorState {
    let mut sample_ticker = interval(config.sampling_interval);
    sample_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // First generation waits one full interval so the window has real samples.
    let mut generation_ticker = interval_at(
        Instant::now() + config.generation_interval,
        config.generation_interval,
    );
    generation_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut in_flight: JoinSet<GenerationOutcome> = JoinSet::new();
    let mut grace_deadline: Option<Instant> = None;

    let (mut state, _) = CoordinatorState::new(config.max_in_flight).apply(CoordinatorEvent::Started);
    log_info!(
        "coordinator running: sampling every {:?}, generating every {:?}",
        config.sampling_interval,
        config.generation_interval
    );

    while !state.is_stopped() {
        let running = state.status == CoordinatorStatus::Running;

        let event = tokio::select! {
            _ = cancel_token.cancelled(), if running => CoordinatorEvent::ShutdownRequested,
            _ = sample_ticker.tick(), if running => CoordinatorEvent::SampleTick,
            _ = generation_ticker.tick(), if running => CoordinatorEvent::GenerationTick,
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                CoordinatorEvent::GenerationFinished { succeeded: succeeded(joined) }
            }
            _ = sleep_until(grace_deadline.unwrap_or_else(Instant::now)), if grace_deadline.is_some() => {
                CoordinatorEvent::GraceExpired
            }
            else => break,
        };

        let (next, effects) = state.apply(event);
        state = next;

        for effect in effects {
            match effect {
                Effect::TakeSample => {
                    let reading = sampler.sample();
                    log_debug!(
                        "focus sample {} (window average {:.1})",
                        reading.value(),
                        sampler.current_average()
                    );
                }
                Effect::StartGeneration => {
                    let focus = sampler.current_average();
                    let service = Arc::clone(&service);
                    in_flight.spawn(async move { service.generate(focus).await });
                }
                Effect::SkipGeneration => {
                    log_warn!(
                        "skipping generation tick: {} generations still in flight",
                        state.in_flight
                    );
                }
                Effect::StartGraceTimer => {
                    log_info!(
                        "coordinator draining {} in-flight generations (grace {:?})",
                        in_flight.len(),
                        config.shutdown_grace
                    );
                    grace_deadline = Some(Instant::now() + config.shutdown_grace);
                }
                Effect::AbortInFlight => {
                    log_warn!("abandoning {} unfinished generations", in_flight.len());
                    in_flight.shutdown().await;
                }
            }
        }
    }

    log_info!(
        "coordinator stopped: {} samples, {} generations started ({} ok, {} failed, {} skipped, {} abandoned)",
        state.samples_taken,
        state.generations_started,
        state.generations_succeeded,
        state.generations_failed,
        state.generations_skipped,
        state.generations_abandoned
    );
    state
}

fn succeeded(joined: Result<GenerationOutcome, JoinError>) -> bool {
    match joined {
        Ok(Ok(_)) => true,
        // Already reported by the service with its stage.
        Ok(Err(_)) => false,
        Err(err) => {
            log_error!("generation task ended abnormally: {err}");
            false
        }
    }
}
