use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rosc::{OscMessage, OscPacket, OscType};
use tokio::net::{lookup_host, UdpSocket};

use crate::settings::PlayerSettings;
use crate::wire::WireField;

use super::Player;

/// Sends segments as OSC messages over UDP.
pub struct OscPlayer {
    socket: UdpSocket,
    target: SocketAddr,
    segment_address: String,
    ambient_address: String,
}

impl OscPlayer {
    pub async fn connect(settings: &PlayerSettings) -> Result<Self> {
        let target = lookup_host(settings.address.as_str())
            .await
            .with_context(|| format!("failed to resolve player address {}", settings.address))?
            .next()
            .ok_or_else(|| anyhow!("player address {} resolved to nothing", settings.address))?;

        let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .context("failed to bind player socket")?;

        Ok(Self {
            socket,
            target,
            segment_address: settings.segment_address.clone(),
            ambient_address: settings.ambient_address.clone(),
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    async fn send_message(&self, addr: &str, args: Vec<OscType>) -> Result<()> {
        let packet = OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args,
        });
        let bytes = rosc::encoder::encode(&packet)
            .map_err(|err| anyhow!("osc encoding for {addr} failed: {err:?}"))?;

        self.socket
            .send_to(&bytes, self.target)
            .await
            .with_context(|| format!("failed to send {addr} to {}", self.target))?;
        Ok(())
    }
}

#[async_trait]
impl Player for OscPlayer {
    async fn send_segment(&self, fields: &[WireField]) -> Result<()> {
        let args = fields.iter().map(to_osc).collect();
        self.send_message(&self.segment_address, args).await
    }

    async fn send_ambient(&self, key: &str) -> Result<()> {
        self.send_message(&self.ambient_address, vec![OscType::String(key.to_string())])
            .await
    }
}

fn to_osc(field: &WireField) -> OscType {
    match field {
        WireField::Text(value) => OscType::String(value.clone()),
        WireField::Number(value) => OscType::Float(*value as f32),
    }
}
