use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::window::FocusSample;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const RECV_BACKOFF_BASE: Duration = Duration::from_millis(50);
const RECV_BACKOFF_MAX: Duration = Duration::from_secs(2);

/// Receive plain-text focus readings (`"63"`, `"71.5\n"`) and publish the
/// latest one. Runs until the token is cancelled.
pub async fn focus_listener(
    socket: UdpSocket,
    tx: watch::Sender<FocusSample>,
    cancel_token: CancellationToken,
) {
    let mut buf = [0u8; 128];
    let mut consecutive_errors: u32 = 0;
    if let Ok(addr) = socket.local_addr() {
        log_info!("focus listener receiving on {}", addr);
    }

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, peer)) => {
                    consecutive_errors = 0;
                    match parse_reading(&buf[..len]) {
                        Some(sample) => {
                            tx.send_replace(sample);
                        }
                        None => log_warn!("dropping unparseable focus datagram from {} ({} bytes)", peer, len),
                    }
                }
                Err(err) => {
                    consecutive_errors = consecutive_errors.saturating_add(1);
                    let pause = recv_backoff(consecutive_errors);
                    log_error!(
                        "focus listener receive failed ({} in a row), retrying in {:?}: {err}",
                        consecutive_errors,
                        pause
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(pause) => {}
                        _ = cancel_token.cancelled() => {
                            log_info!("focus listener shutting down");
                            break;
                        }
                    }
                }
            },
            _ = cancel_token.cancelled() => {
                log_info!("focus listener shutting down");
                break;
            }
        }
    }
}

/// Pause after the `consecutive`-th receive error in a row: doubles from
/// 50ms up to a 2s ceiling.
fn recv_backoff(consecutive: u32) -> Duration {
    let doublings = consecutive.saturating_sub(1).min(16);
    RECV_BACKOFF_BASE
        .saturating_mul(1 << doublings)
        .min(RECV_BACKOFF_MAX)
}

/// Parse one datagram; out-of-range values are clamped into `1..=100`.
pub fn parse_reading(bytes: &[u8]) -> Option<FocusSample> {
    let text = std::str::from_utf8(bytes).ok()?.trim();
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(FocusSample::clamped(value.round() as i64))
}
