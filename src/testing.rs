//! Composer and player doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::composer::{Composer, ComposerPrompt};
use crate::player::Player;
use crate::wire::WireField;

pub enum Reply {
    Text(&'static str),
    Delayed(Duration, &'static str),
    Fail(&'static str),
}

/// Answers calls in order from a script, recording every prompt it saw.
/// Once the script runs out it keeps answering with `fallback`, if set.
#[derive(Default)]
pub struct ScriptedComposer {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<&'static str>,
    prompts: Mutex<Vec<ComposerPrompt>>,
}

impl ScriptedComposer {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn repeating(text: &'static str) -> Self {
        Self {
            fallback: Some(text),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<ComposerPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Composer for ScriptedComposer {
    async fn compose(&self, prompt: &ComposerPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(text.to_string()),
            Some(Reply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text.to_string())
            }
            Some(Reply::Fail(message)) => Err(anyhow!(message)),
            None => match self.fallback {
                Some(text) => Ok(text.to_string()),
                None => bail!("script exhausted"),
            },
        }
    }
}

/// Keeps everything it is asked to send. Segment sends can be slowed down,
/// one queued delay per call, before they are recorded.
#[derive(Default)]
pub struct RecordingPlayer {
    pub segments: Mutex<Vec<Vec<WireField>>>,
    pub ambient: Mutex<Vec<String>>,
    pub fail: bool,
    send_delays: Mutex<VecDeque<Duration>>,
}

impl RecordingPlayer {
    pub fn with_send_delays(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            send_delays: Mutex::new(delays.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.lock().unwrap().len()
    }
}

#[async_trait]
impl Player for RecordingPlayer {
    async fn send_segment(&self, fields: &[WireField]) -> Result<()> {
        let delay = self.send_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            bail!("player unreachable");
        }
        self.segments.lock().unwrap().push(fields.to_vec());
        Ok(())
    }

    async fn send_ambient(&self, key: &str) -> Result<()> {
        if self.fail {
            bail!("player unreachable");
        }
        self.ambient.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

pub mod strategies {
    use proptest::prelude::*;

    use crate::score::{MusicEvent, Segment};

    fn note() -> impl Strategy<Value = MusicEvent> {
        (
            "[a-z][a-z0-9_]{0,12}",
            "[A-G][bs]?[0-8]",
            0.0f64..64.0,
            0.0f64..=1.0,
        )
            .prop_map(|(instrument, pitch, release, amplitude)| {
                MusicEvent::note(&instrument, &pitch, release, amplitude)
            })
    }

    fn rest() -> impl Strategy<Value = MusicEvent> {
        (0.0f64..32.0).prop_map(MusicEvent::rest)
    }

    /// Events with grammar-valid names and finite, non-negative numbers.
    pub fn event() -> impl Strategy<Value = MusicEvent> {
        prop_oneof![note(), rest()]
    }

    pub fn segment() -> impl Strategy<Value = Segment> {
        prop::collection::vec(event(), 0..24)
    }
}
