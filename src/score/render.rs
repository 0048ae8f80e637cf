use super::types::MusicEvent;

/// Render events back into the composer line grammar, one line per event.
///
/// Numbers use `f64`'s shortest round-trip formatting, so feeding the output
/// back through [`super::parse`] reproduces the same events.
pub fn render(segment: &[MusicEvent]) -> String {
    segment
        .iter()
        .map(render_event)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_event(event: &MusicEvent) -> String {
    match event {
        MusicEvent::Note {
            instrument,
            note,
            release,
            amplitude,
        } => format!("synth :{instrument}, note: :{note}, release: {release}, amp: {amplitude}"),
        MusicEvent::Rest { duration } => format!("sleep {duration}"),
    }
}
