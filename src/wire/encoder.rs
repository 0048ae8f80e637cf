//! Flat wire layout for segments.
//!
//! The player transport carries a single untyped argument list, so each event
//! is flattened to a marker followed by exactly five fields:
//!
//! ```text
//! "START", "synth", instrument, note, release, amplitude
//! "START", "sleep", "",         "",   duration, ""
//! ```
//!
//! A receiver re-segments the list by skipping marker + 5 fields per event.

use serde::Serialize;
use thiserror::Error;

use crate::score::{MusicEvent, Segment};

pub const EVENT_MARKER: &str = "START";
pub const FIELDS_PER_EVENT: usize = 6;

const KIND_NOTE: &str = "synth";
const KIND_REST: &str = "sleep";

/// One scalar on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireField {
    Text(String),
    Number(f64),
}

impl WireField {
    fn text(value: &str) -> Self {
        WireField::Text(value.to_string())
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            WireField::Text(value) => Some(value),
            WireField::Number(_) => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            WireField::Number(value) => Some(*value),
            WireField::Text(_) => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    #[error("payload length {0} is not a multiple of {per_event}", per_event = FIELDS_PER_EVENT)]
    Truncated(usize),
    #[error("event {index}: expected marker {marker:?}", marker = EVENT_MARKER)]
    MissingMarker { index: usize },
    #[error("event {index}: unknown event kind {kind:?}")]
    UnknownKind { index: usize, kind: String },
    #[error("event {index}: field {field} has the wrong type")]
    FieldType { index: usize, field: &'static str },
}

/// Flatten a segment into wire fields, preserving event order.
pub fn encode(segment: &[MusicEvent]) -> Vec<WireField> {
    let mut fields = Vec::with_capacity(segment.len() * FIELDS_PER_EVENT);
    for event in segment {
        fields.push(WireField::text(EVENT_MARKER));
        match event {
            MusicEvent::Note {
                instrument,
                note,
                release,
                amplitude,
            } => {
                fields.push(WireField::text(KIND_NOTE));
                fields.push(WireField::text(instrument));
                fields.push(WireField::text(note));
                fields.push(WireField::Number(*release));
                fields.push(WireField::Number(*amplitude));
            }
            MusicEvent::Rest { duration } => {
                fields.push(WireField::text(KIND_REST));
                fields.push(WireField::text(""));
                fields.push(WireField::text(""));
                fields.push(WireField::Number(*duration));
                fields.push(WireField::text(""));
            }
        }
    }
    fields
}

/// Regroup a flat payload into events.
pub fn decode(fields: &[WireField]) -> Result<Segment, WireError> {
    if fields.len() % FIELDS_PER_EVENT != 0 {
        return Err(WireError::Truncated(fields.len()));
    }

    fields
        .chunks_exact(FIELDS_PER_EVENT)
        .enumerate()
        .map(|(index, group)| decode_event(index, group))
        .collect()
}

fn decode_event(index: usize, group: &[WireField]) -> Result<MusicEvent, WireError> {
    if group[0].as_text() != Some(EVENT_MARKER) {
        return Err(WireError::MissingMarker { index });
    }

    let text = |pos: usize, field: &'static str| {
        group[pos]
            .as_text()
            .ok_or(WireError::FieldType { index, field })
    };
    let number = |pos: usize, field: &'static str| {
        group[pos]
            .as_number()
            .ok_or(WireError::FieldType { index, field })
    };

    match text(1, "kind")? {
        KIND_NOTE => Ok(MusicEvent::Note {
            instrument: text(2, "instrument")?.to_string(),
            note: text(3, "note")?.to_string(),
            release: number(4, "release")?,
            amplitude: number(5, "amplitude")?,
        }),
        KIND_REST => Ok(MusicEvent::Rest {
            duration: number(4, "duration")?,
        }),
        other => Err(WireError::UnknownKind {
            index,
            kind: other.to_string(),
        }),
    }
}
