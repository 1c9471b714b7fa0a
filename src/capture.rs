use std::path::PathBuf;

use async_trait::async_trait;

/// Resolution requested from the video device.
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no video device at {0}")]
    NoDevice(PathBuf),
    #[error("video device unavailable: {0}")]
    Denied(#[from] std::io::Error),
}

/// Host capability that provides the webcam stream.
#[async_trait]
pub trait Capture: Send + Sync {
    async fn open(&self, width: u32, height: u32) -> Result<(), CaptureError>;
}

/// [`Capture`] backed by a V4L device node.
#[derive(Debug, Clone)]
pub struct DeviceCapture {
    device: PathBuf,
}

impl DeviceCapture {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl Default for DeviceCapture {
    fn default() -> Self {
        Self::new("/dev/video0")
    }
}

#[async_trait]
impl Capture for DeviceCapture {
    async fn open(&self, width: u32, height: u32) -> Result<(), CaptureError> {
        match tokio::fs::OpenOptions::new()
            .read(true)
            .open(&self.device)
            .await
        {
            Ok(_) => {
                tracing::info!(device = ?self.device, width, height, "video device opened");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CaptureError::NoDevice(self.device.clone()))
            }
            Err(e) => Err(CaptureError::Denied(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_device_is_reported() {
        let capture = DeviceCapture::new("/nonexistent/video9");
        let err = capture
            .open(CAPTURE_WIDTH, CAPTURE_HEIGHT)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::NoDevice(_)));
    }

    #[tokio::test]
    async fn readable_node_opens() {
        let dir = tempfile::tempdir().unwrap();
        let node = dir.path().join("video0");
        std::fs::write(&node, b"").unwrap();
        assert!(DeviceCapture::new(&node).open(640, 480).await.is_ok());
    }
}
