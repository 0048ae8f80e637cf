use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Largest focus window the sampler supports.
pub const MAX_WINDOW_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("system prompt {path} could not be read")]
    MissingPrompt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("system prompt {path} is empty")]
    EmptyPrompt { path: PathBuf },
    #[error("environment variable {0} holding the composer API key is not set")]
    MissingApiKey(String),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Seeded random walk, for running without a device bridge.
    Synthetic,
    /// Plain-text readings pushed over UDP by a device bridge.
    Udp,
}

impl Default for SourceKind {
    fn default() -> Self {
        SourceKind::Synthetic
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub listen_address: String,
    pub seed: Option<u64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            listen_address: "127.0.0.1:9001".into(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposerSettings {
    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
    pub system_prompt_path: PathBuf,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o-mini".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            system_prompt_path: PathBuf::from("prompts/system.txt"),
            timeout_secs: 30,
            temperature: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerSettings {
    /// UDP `host:port` of the OSC listener (Sonic Pi listens on 4560).
    pub address: String,
    pub segment_address: String,
    pub ambient_address: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:4560".into(),
            segment_address: "/focus/segment".into(),
            ambient_address: "/focus/ambient".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub sampling_interval_ms: u64,
    pub generation_interval_ms: u64,
    pub window_capacity: usize,
    /// Generation ticks are skipped while this many calls are outstanding.
    pub max_in_flight: usize,
    /// How long in-flight generations may keep running after shutdown starts.
    pub shutdown_grace_ms: u64,
    pub source: SourceSettings,
    pub composer: ComposerSettings,
    pub player: PlayerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sampling_interval_ms: 200,
            generation_interval_ms: 2_500,
            window_capacity: MAX_WINDOW_CAPACITY,
            max_in_flight: 4,
            shutdown_grace_ms: 2_000,
            source: SourceSettings::default(),
            composer: ComposerSettings::default(),
            player: PlayerSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Settings::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_interval_ms == 0 {
            return Err(ConfigError::Invalid("samplingIntervalMs must be positive".into()));
        }
        if self.generation_interval_ms == 0 {
            return Err(ConfigError::Invalid("generationIntervalMs must be positive".into()));
        }
        if !(1..=MAX_WINDOW_CAPACITY).contains(&self.window_capacity) {
            return Err(ConfigError::Invalid(format!(
                "windowCapacity must be between 1 and {MAX_WINDOW_CAPACITY}, got {}",
                self.window_capacity
            )));
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid("maxInFlight must be at least 1".into()));
        }
        if self.composer.model.trim().is_empty() {
            return Err(ConfigError::Invalid("composer.model must not be empty".into()));
        }
        if self.composer.timeout_secs == 0 {
            return Err(ConfigError::Invalid("composer.timeoutSecs must be positive".into()));
        }
        Ok(())
    }

    /// Read the composer's system instruction. Relative paths resolve against `base_dir`.
    pub fn load_system_prompt(&self, base_dir: &Path) -> Result<String, ConfigError> {
        let path = if self.composer.system_prompt_path.is_absolute() {
            self.composer.system_prompt_path.clone()
        } else {
            base_dir.join(&self.composer.system_prompt_path)
        };

        let prompt = fs::read_to_string(&path)
            .map_err(|source| ConfigError::MissingPrompt { path: path.clone(), source })?;
        if prompt.trim().is_empty() {
            return Err(ConfigError::EmptyPrompt { path });
        }
        Ok(prompt.trim().to_string())
    }

    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.composer.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.composer.api_key_env.clone()))
    }

    pub fn sampling_interval(&self) -> Duration {
        Duration::from_millis(self.sampling_interval_ms)
    }

    pub fn generation_interval(&self) -> Duration {
        Duration::from_millis(self.generation_interval_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn composer_timeout(&self) -> Duration {
        Duration::from_secs(self.composer.timeout_secs)
    }
}
