pub mod osc;

use anyhow::Result;
use async_trait::async_trait;

use crate::wire::WireField;

pub use osc::OscPlayer;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// One-way sink for generated segments. Sends are fire-and-forget: an `Ok`
/// only means the message left this process.
#[async_trait]
pub trait Player: Send + Sync {
    /// Primary channel: a flattened, wire-encoded segment.
    async fn send_segment(&self, fields: &[WireField]) -> Result<()>;

    /// Secondary channel: a single pitch name the player may use as a drone key.
    async fn send_ambient(&self, key: &str) -> Result<()>;
}

/// Dry-run player that logs payloads instead of sending them.
#[derive(Debug, Default)]
pub struct LogPlayer;

#[async_trait]
impl Player for LogPlayer {
    async fn send_segment(&self, fields: &[WireField]) -> Result<()> {
        let payload = serde_json::to_string(fields)?;
        log_info!("[dry-run] segment ({} fields): {}", fields.len(), payload);
        Ok(())
    }

    async fn send_ambient(&self, key: &str) -> Result<()> {
        log_info!("[dry-run] ambient key: {}", key);
        Ok(())
    }
}
