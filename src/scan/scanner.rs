use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// One decoded symbol from the detector
#[derive(Debug, Clone)]
pub struct DetectedCode {
    pub raw_value: String,
    pub format: Option<String>,
}

/// Failure reported by the underlying detector device
#[derive(Debug, Error)]
#[error("{description}")]
pub struct DeviceError {
    description: String,
}

impl DeviceError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Operator-facing message, selected by the failure's own description
    pub fn user_message(&self) -> String {
        if self.description.contains("Permission denied") {
            "Camera access denied. Please grant camera permissions and try again.".to_string()
        } else if self.description.contains("No device found") {
            "No camera found. Please ensure a camera is available.".to_string()
        } else if !self.description.is_empty() {
            self.description.clone()
        } else {
            "An unexpected error occurred while scanning.".to_string()
        }
    }
}

/// Bridge over a concrete decoder device (camera QR reader, keyboard-wedge
/// scanner). Detection events may carry zero codes; that is a valid event,
/// not an error.
#[async_trait]
pub trait DetectorSource: Send {
    /// Next detection event; `Ok(None)` when the device stream ends for good
    async fn next_detection(&mut self) -> Result<Option<Vec<DetectedCode>>, DeviceError>;

    /// Reacquire the device from a clean state after a failure
    async fn restart(&mut self) -> Result<(), DeviceError>;
}

/// One continuous period with the detector active
pub struct ScanSession<S: DetectorSource> {
    session_id: Uuid,
    source: S,
}

impl<S: DetectorSource> ScanSession<S> {
    fn start(source: S) -> Self {
        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, "Scan session started");
        Self { session_id, source }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Wait for the next non-empty payload. Events with no codes, or whose
    /// first code has an empty raw value, keep the session running.
    pub async fn next_payload(&mut self) -> Result<Option<String>, DeviceError> {
        loop {
            let codes = match self.source.next_detection().await? {
                Some(codes) => codes,
                None => return Ok(None),
            };

            let first = match codes.into_iter().next() {
                Some(code) => code,
                None => continue,
            };

            if first.raw_value.is_empty() {
                continue;
            }

            debug!(
                session_id = %self.session_id,
                format = first.format.as_deref().unwrap_or("unknown"),
                "Code detected"
            );
            return Ok(Some(first.raw_value));
        }
    }

    /// Restart scanning after a device failure
    pub async fn retry(&mut self) -> Result<(), DeviceError> {
        info!(session_id = %self.session_id, "Retrying scan after device failure");
        self.source.restart().await
    }

    pub fn close(self) {
        info!(session_id = %self.session_id, "Scan session closed");
    }
}

/// One scan session per surface: opening a new session closes the previous
/// one first, so two sessions never hold the device at once.
pub struct ScanSurface<S: DetectorSource> {
    active: Option<ScanSession<S>>,
}

impl<S: DetectorSource> ScanSurface<S> {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn open(&mut self, source: S) -> &mut ScanSession<S> {
        if let Some(previous) = self.active.take() {
            previous.close();
        }

        self.active = Some(ScanSession::start(source));
        self.active.as_mut().expect("session just opened")
    }

    pub fn close(&mut self) {
        if let Some(session) = self.active.take() {
            session.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }
}
