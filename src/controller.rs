use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::capture::{CAPTURE_HEIGHT, CAPTURE_WIDTH, Capture};
use crate::detector::Detector;
use crate::display::{DisplaySurface, StatusKind};
use crate::fallback::FallbackRotation;
use crate::projection::project;

/// Default time between two fetch-and-display cycles.
pub const POLL_PERIOD: Duration = Duration::from_millis(1000);

struct Shared<D, S> {
    detector: D,
    display: Arc<Mutex<S>>,
    rotation: Mutex<FallbackRotation>,
}

impl<D: Detector, S: DisplaySurface> Shared<D, S> {
    /// One cycle: ask the detector, fall back to the rotation on any failure,
    /// then project the reading. Readings arriving after `run` was cancelled
    /// are dropped.
    async fn cycle(&self, run: &CancellationToken) {
        let result = self.detector.detect().await;
        if run.is_cancelled() {
            debug!("dropping reading from a stopped run");
            return;
        }
        let reading = match result {
            Ok(reading) => reading,
            Err(e) => {
                debug!(error = %e, "using fallback reading");
                self.rotation.lock().await.next_reading()
            }
        };
        trace!(dominant = %reading.dominant_emotion, "projecting reading");
        let frame = project(&reading);
        let mut display = self.display.lock().await;
        // stop() may have taken the display between the checks
        if run.is_cancelled() {
            debug!("dropping reading from a stopped run");
            return;
        }
        frame.apply(&mut *display);
    }
}

struct Timer {
    task: JoinHandle<()>,
    run: CancellationToken,
}

impl Timer {
    fn cancel(self) {
        self.run.cancel();
        self.task.abort();
    }
}

#[derive(Default)]
struct DetectionState {
    active: bool,
    timer: Option<Timer>,
}

/// Drives the emotion display: owns detection state, the poll timer and the
/// fallback rotation.
pub struct Controller<D, S> {
    shared: Arc<Shared<D, S>>,
    period: Duration,
    state: DetectionState,
}

impl<D, S> Controller<D, S>
where
    D: Detector + 'static,
    S: DisplaySurface + 'static,
{
    pub fn new(detector: D, display: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                detector,
                display: Arc::new(Mutex::new(display)),
                rotation: Mutex::new(FallbackRotation::canned()),
            }),
            period: POLL_PERIOD,
            state: DetectionState::default(),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Replaces the canned fallback readings. Only takes effect before the
    /// first [`start`](Self::start); later calls are logged and ignored.
    pub fn with_rotation(mut self, rotation: FallbackRotation) -> Self {
        match Arc::get_mut(&mut self.shared) {
            Some(shared) => shared.rotation = Mutex::new(rotation),
            None => warn!("fallback rotation not replaced: detection already started"),
        }
        self
    }

    pub fn detector(&self) -> &D {
        &self.shared.detector
    }

    pub fn display(&self) -> Arc<Mutex<S>> {
        self.shared.display.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Requests the video stream and reports the outcome on the status
    /// indicator. Capture failure is shown but never blocks detection.
    pub async fn init(&self, capture: &dyn Capture) {
        let outcome = capture.open(CAPTURE_WIDTH, CAPTURE_HEIGHT).await;
        let mut display = self.shared.display.lock().await;
        match outcome {
            Ok(()) => display.set_status("Webcam ready", StatusKind::Success),
            Err(e) => {
                error!(error = %e, "error accessing webcam");
                display.set_status("Webcam access denied", StatusKind::Error);
            }
        }
        display.set_controls(true, false);
    }

    /// Starts detecting: one cycle right away, then one per period until
    /// [`stop`](Self::stop). Calling it again replaces the running timer.
    pub async fn start(&mut self) {
        if let Some(timer) = self.state.timer.take() {
            debug!("replacing running detection timer");
            timer.cancel();
        }
        self.state.active = true;
        {
            let mut display = self.shared.display.lock().await;
            display.set_controls(false, true);
            display.set_status("Detecting emotions...", StatusKind::Detecting);
        }

        let run = CancellationToken::new();
        let shared = self.shared.clone();
        let token = run.clone();
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let shared = shared.clone();
                        let token = token.clone();
                        tokio::spawn(async move { shared.cycle(&token).await });
                    }
                }
            }
        });
        self.state.timer = Some(Timer { task, run });
        info!(?period, "detection started");
    }

    /// Stops detecting. Safe to call when never started.
    pub async fn stop(&mut self) {
        self.state.active = false;
        if let Some(timer) = self.state.timer.take() {
            timer.cancel();
            info!("detection stopped");
        }
        let mut display = self.shared.display.lock().await;
        display.set_controls(true, false);
        display.set_status("Detection stopped", StatusKind::Stopped);
    }

    /// Runs a single fetch-and-display cycle outside the timer.
    pub async fn cycle(&self) {
        self.shared.cycle(&CancellationToken::new()).await;
    }
}

impl<D, S> Drop for Controller<D, S> {
    fn drop(&mut self) {
        if let Some(timer) = self.state.timer.take() {
            timer.cancel();
        }
    }
}
