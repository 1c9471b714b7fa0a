//! Live emotion display.
//!
//! A [`Controller`] polls a [`Detector`] once per second while detecting,
//! falls back to a [`FallbackRotation`] of canned readings when the service is
//! unavailable, and projects every reading onto a [`DisplaySurface`].

pub mod capture;
pub mod controller;
pub mod detector;
pub mod display;
pub mod emotion;
pub mod fallback;
pub mod logging;
pub mod projection;
#[cfg(test)]
pub mod test_helpers;

pub use capture::{Capture, CaptureError, DeviceCapture};
pub use controller::{Controller, POLL_PERIOD};
pub use detector::{DetectError, Detector, HttpDetector};
pub use display::{DisplaySurface, StatusKind, TerminalDisplay};
pub use emotion::{Color, Emotion, EmotionReading, Probabilities};
pub use fallback::FallbackRotation;
pub use logging::LogLevel;
pub use projection::{Frame, project};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Commands accepted on the control input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(other.to_string()),
        }
    }
}

/// Feeds start/stop commands from `input` to `controller` until `quit` or end
/// of input.
pub async fn drive<D, S, R>(controller: &mut Controller<D, S>, input: R) -> anyhow::Result<()>
where
    D: Detector + 'static,
    S: DisplaySurface + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Start) => controller.start().await,
            Ok(Command::Stop) => controller.stop().await,
            Ok(Command::Quit) => break,
            Err(other) => warn!(command = %other, "unknown command"),
        }
    }
    if controller.is_active() {
        controller.stop().await;
    }
    info!("control input closed");
    Ok(())
}
