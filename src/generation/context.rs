use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::score::{MusicEvent, Segment};

/// A generation that produced a playable segment.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedGeneration {
    pub id: Uuid,
    pub segment: Segment,
    pub focus: f64,
    pub completed_at: DateTime<Utc>,
}

/// The last successful generation, if any. Replaced whole; clones share the
/// same completed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationContext {
    last: Option<Arc<CompletedGeneration>>,
}

impl GenerationContext {
    pub fn completed(generation: CompletedGeneration) -> Self {
        Self {
            last: Some(Arc::new(generation)),
        }
    }

    pub fn last(&self) -> Option<&CompletedGeneration> {
        self.last.as_deref()
    }

    pub fn segment(&self) -> Option<&[MusicEvent]> {
        self.last().map(|last| last.segment.as_slice())
    }

    pub fn focus(&self) -> Option<f64> {
        self.last().map(|last| last.focus)
    }

    /// Prior segment and its focus value, for the next prompt.
    pub fn continuation(&self) -> Option<(&[MusicEvent], f64)> {
        self.last()
            .map(|last| (last.segment.as_slice(), last.focus))
    }
}
