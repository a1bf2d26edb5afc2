// src/scanner.rs

use std::fmt;

use crate::error::AppError;

/// How a decoded QR payload is interpreted.
/// Fixed when the surface is opened, not read back from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Proctor badge, routed to login.
    Login,
    /// Student (or proctor self-) attendance scan.
    MarkAttendance,
    /// Shown to the user, no state change.
    Informational,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Login => write!(f, "login"),
            ScanMode::MarkAttendance => write!(f, "attendance"),
            ScanMode::Informational => write!(f, "informational"),
        }
    }
}

/// The exclusive-access hardware (or stand-in) behind a scan surface.
pub trait CaptureDevice: Send {
    fn start(&mut self) -> Result<(), AppError>;

    /// Releases the device. Called exactly once per successful `start`.
    fn stop(&mut self);
}

/// One decoded payload together with the mode it was captured under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub mode: ScanMode,
    pub payload: String,
}

/// A one-shot scan capture session.
///
/// The device is started on `open` and stopped on the first decode, on
/// `cancel`, or when the surface is dropped, whichever comes first.
pub struct ScanSurface {
    mode: ScanMode,
    device: Option<Box<dyn CaptureDevice>>,
}

impl ScanSurface {
    pub fn open(mut device: Box<dyn CaptureDevice>, mode: ScanMode) -> Result<Self, AppError> {
        device.start()?;
        tracing::debug!("Scan surface opened ({})", mode);
        Ok(Self {
            mode,
            device: Some(device),
        })
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        self.device.is_some()
    }

    /// Accepts a decoded payload.
    ///
    /// Only the first call yields an event; the device is released before it
    /// is returned. Reopen a new surface for another scan.
    pub fn decode(&mut self, payload: &str) -> Option<ScanEvent> {
        if !self.release() {
            return None;
        }
        Some(ScanEvent {
            mode: self.mode,
            payload: payload.to_string(),
        })
    }

    /// Closes the surface without a decode.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) -> bool {
        match self.device.take() {
            Some(mut device) => {
                device.stop();
                tracing::debug!("Scan surface released ({})", self.mode);
                true
            }
            None => false,
        }
    }
}

impl Drop for ScanSurface {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScanSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSurface")
            .field("mode", &self.mode)
            .field("live", &self.is_live())
            .finish()
    }
}

/// A keyboard-wedge reader: the scanner types the payload followed by Enter.
/// There is nothing to acquire, so start/stop only log.
#[derive(Debug, Default)]
pub struct KeyboardWedge;

impl CaptureDevice for KeyboardWedge {
    fn start(&mut self) -> Result<(), AppError> {
        tracing::debug!("Keyboard wedge armed");
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!("Keyboard wedge disarmed");
    }
}
