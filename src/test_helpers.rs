#![cfg(test)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::capture::{Capture, CaptureError};
use crate::detector::{DetectError, Detector};
use crate::display::{DisplaySurface, StatusKind};
use crate::emotion::{Color, Emotion, EmotionReading};

/// [`Detector`] that returns a fixed reading, or fails when it has none.
#[derive(Default)]
pub struct ScriptedDetector {
    reading: Option<EmotionReading>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedDetector {
    /// Detector whose service is always unavailable.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn answering(reading: EmotionReading) -> Self {
        Self {
            reading: Some(reading),
            ..Self::default()
        }
    }

    /// Delays every answer by `delay`.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn detect(&self) -> Result<EmotionReading, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reading
            .clone()
            .ok_or(DetectError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

/// [`Capture`] with a fixed outcome.
pub struct StubCapture {
    pub available: bool,
}

#[async_trait]
impl Capture for StubCapture {
    async fn open(&self, _width: u32, _height: u32) -> Result<(), CaptureError> {
        if self.available {
            Ok(())
        } else {
            Err(CaptureError::Denied(std::io::Error::from(
                std::io::ErrorKind::PermissionDenied,
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarState {
    pub height_pct: u8,
    pub color: Color,
    pub label: String,
    pub active: bool,
}

/// [`DisplaySurface`] remembering everything set on it.
#[derive(Default)]
pub struct RecordingDisplay {
    pub status: Option<(String, StatusKind)>,
    pub controls: Option<(bool, bool)>,
    pub dominant: Option<(String, Color, bool)>,
    pub bars: BTreeMap<Emotion, BarState>,
    pub frames: Vec<String>,
}

impl DisplaySurface for RecordingDisplay {
    fn set_status(&mut self, text: &str, kind: StatusKind) {
        self.status = Some((text.to_string(), kind));
    }

    fn set_controls(&mut self, start_enabled: bool, stop_enabled: bool) {
        self.controls = Some((start_enabled, stop_enabled));
    }

    fn set_dominant(&mut self, text: &str, color: Color, high_confidence: bool) {
        self.dominant = Some((text.to_string(), color, high_confidence));
    }

    fn set_bar(
        &mut self,
        emotion: Emotion,
        height_pct: u8,
        color: Color,
        label: &str,
        active: bool,
    ) {
        self.bars.insert(
            emotion,
            BarState {
                height_pct,
                color,
                label: label.to_string(),
                active,
            },
        );
    }

    fn flush(&mut self) {
        if let Some((text, _, _)) = &self.dominant {
            self.frames.push(text.clone());
        }
    }
}
