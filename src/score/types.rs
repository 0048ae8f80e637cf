/// One timed performance instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum MusicEvent {
    Note {
        instrument: String,
        note: String,
        release: f64,
        amplitude: f64,
    },
    Rest {
        duration: f64,
    },
}

impl MusicEvent {
    pub fn note(instrument: &str, note: &str, release: f64, amplitude: f64) -> Self {
        MusicEvent::Note {
            instrument: instrument.to_string(),
            note: note.to_string(),
            release,
            amplitude,
        }
    }

    pub fn rest(duration: f64) -> Self {
        MusicEvent::Rest { duration }
    }

    /// Symbolic pitch name, if this event plays one.
    pub fn pitch(&self) -> Option<&str> {
        match self {
            MusicEvent::Note { note, .. } => Some(note.as_str()),
            MusicEvent::Rest { .. } => None,
        }
    }
}

/// A generated musical passage, in playback order.
pub type Segment = Vec<MusicEvent>;

/// Pitch carried on the player's ambient channel: the first note played.
pub fn ambient_key(segment: &[MusicEvent]) -> Option<&str> {
    segment.iter().find_map(MusicEvent::pitch)
}

/// Total rest time in the segment, i.e. how long the player needs to perform it.
pub fn playback_secs(segment: &[MusicEvent]) -> f64 {
    segment
        .iter()
        .map(|event| match event {
            MusicEvent::Rest { duration } => *duration,
            MusicEvent::Note { .. } => 0.0,
        })
        .sum()
}
