//! Data models shared between the scheduler, the persistence layer and
//! the webview.

use serde::{Deserialize, Serialize};

/// One completed capture. The provider fills in every field; the record
/// never changes after insertion into the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotLog {
    /// Location of the saved image, opaque to the scheduler.
    pub path: String,
    /// Classification label assigned by the provider.
    pub category: String,
    /// Capture time as reported by the provider (RFC 3339).
    pub timestamp: String,
}

/// Persisted capture schedule. Serialized form is the webview's contract:
/// `{"enabled": false, "intervalMinutes": 10}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSettings {
    pub enabled: bool,
    pub interval_minutes: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: 10,
        }
    }
}
