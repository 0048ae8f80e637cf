use crate::score::{render, MusicEvent};

/// Plain-text request handed to the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerPrompt {
    pub system: String,
    pub user: String,
}

/// Build the request for one generation.
///
/// The focus-to-density mapping is phrased as an instruction; the composer
/// is free to interpret it.
pub fn build_prompt(
    system: &str,
    focus: f64,
    previous: Option<(&[MusicEvent], f64)>,
) -> ComposerPrompt {
    let mut user = format!(
        "The listener's current focus level is {focus:.1} on a scale from 1 to 100.\n\
         Compose about eight seconds of music for this focus level. Higher focus calls for \
         denser rhythmic subdivision (shorter sleeps) and more varied instrumentation; \
         lower focus calls for slower, sparser note values and fewer voices.\n\
         Answer only with lines of these two forms, one instruction per line:\n\
         synth :<instrument>, note: :<note>, release: <seconds>, amp: <0 to 1>\n\
         sleep <seconds>"
    );

    if let Some((segment, previous_focus)) = previous {
        if !segment.is_empty() {
            user.push_str(&format!(
                "\n\nThe previous passage was written for focus level {previous_focus:.1}:\n\
                 {}\n\
                 Transition smoothly from it: stay in its key, carry its instruments over \
                 and move the density gradually toward the new focus level.",
                render(segment)
            ));
        }
    }

    ComposerPrompt {
        system: system.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_prompt_has_no_continuation() {
        let prompt = build_prompt("You write Sonic Pi.", 72.26, None);
        assert_eq!(prompt.system, "You write Sonic Pi.");
        assert!(prompt.user.contains("focus level is 72.3"));
        assert!(!prompt.user.contains("previous passage"));
    }

    #[test]
    fn timing_is_expressed_in_seconds() {
        let prompt = build_prompt("sys", 50.0, None);
        assert!(prompt.user.contains("release: <seconds>"));
        assert!(prompt.user.contains("sleep <seconds>"));
        assert!(!prompt.user.contains("beats"));

        let system = include_str!("../../prompts/system.txt");
        assert!(system.contains("sleep SECONDS"));
        assert!(!system.contains("beats"));
    }

    #[test]
    fn continuation_renders_previous_segment() {
        let previous = vec![
            MusicEvent::note("piano", "C5", 0.4, 0.3),
            MusicEvent::rest(0.5),
        ];
        let prompt = build_prompt("sys", 30.0, Some((previous.as_slice(), 64.0)));

        assert!(prompt.user.contains("focus level is 30.0"));
        assert!(prompt.user.contains("written for focus level 64.0"));
        assert!(prompt
            .user
            .contains("synth :piano, note: :C5, release: 0.4, amp: 0.3\nsleep 0.5"));
        assert!(prompt.user.contains("Transition smoothly"));
    }

    #[test]
    fn empty_previous_segment_is_ignored() {
        let prompt = build_prompt("sys", 50.0, Some((&[][..], 50.0)));
        assert!(!prompt.user.contains("previous passage"));
    }
}
