#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorStatus {
    Idle,
    Running,
    /// Shutdown requested; no new ticks, waiting on in-flight generations.
    Draining,
    Stopped,
}

impl Default for CoordinatorStatus {
    fn default() -> Self {
        CoordinatorStatus::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorEvent {
    Started,
    SampleTick,
    GenerationTick,
    GenerationFinished { succeeded: bool },
    ShutdownRequested,
    GraceExpired,
}

/// Work the loop must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    TakeSample,
    StartGeneration,
    SkipGeneration,
    StartGraceTimer,
    AbortInFlight,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorState {
    pub status: CoordinatorStatus,
    pub max_in_flight: usize,
    pub in_flight: usize,
    pub samples_taken: u64,
    pub generations_started: u64,
    pub generations_succeeded: u64,
    pub generations_failed: u64,
    pub generations_skipped: u64,
    /// Generations still running when the shutdown grace period ran out.
    pub generations_abandoned: u64,
}

impl CoordinatorState {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
            ..Self::default()
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.status == CoordinatorStatus::Stopped
    }

    /// Pure transition: the next state plus the effects to run.
    pub fn apply(&self, event: CoordinatorEvent) -> (Self, Vec<Effect>) {
        use CoordinatorEvent as E;
        use CoordinatorStatus as S;

        let mut next = self.clone();
        let mut effects = Vec::new();

        match (self.status, event) {
            (S::Idle, E::Started) => next.status = S::Running,
            (S::Idle, E::ShutdownRequested) => next.status = S::Stopped,

            (S::Running, E::SampleTick) => {
                next.samples_taken += 1;
                effects.push(Effect::TakeSample);
            }
            (S::Running, E::GenerationTick) => {
                if self.in_flight < self.max_in_flight {
                    next.in_flight += 1;
                    next.generations_started += 1;
                    effects.push(Effect::StartGeneration);
                } else {
                    next.generations_skipped += 1;
                    effects.push(Effect::SkipGeneration);
                }
            }
            (S::Running, E::ShutdownRequested) => {
                if self.in_flight == 0 {
                    next.status = S::Stopped;
                } else {
                    next.status = S::Draining;
                    effects.push(Effect::StartGraceTimer);
                }
            }

            (S::Running | S::Draining, E::GenerationFinished { succeeded }) => {
                next.in_flight = self.in_flight.saturating_sub(1);
                if succeeded {
                    next.generations_succeeded += 1;
                } else {
                    next.generations_failed += 1;
                }
                if self.status == S::Draining && next.in_flight == 0 {
                    next.status = S::Stopped;
                }
            }
            (S::Draining, E::GraceExpired) => {
                next.generations_abandoned += self.in_flight as u64;
                next.in_flight = 0;
                next.status = S::Stopped;
                effects.push(Effect::AbortInFlight);
            }

            // Ticks after shutdown, repeated starts and stray timers change nothing.
            _ => {}
        }

        (next, effects)
    }
}
