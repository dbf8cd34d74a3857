//! Screenshot capture seam.
//!
//! The scheduler treats the actual capture as an opaque asynchronous call
//! that either yields a finished [`ScreenshotLog`] or fails with a
//! human-readable cause. No cancellation or timeout is exposed here.

mod native;

pub use native::ScreencaptureProvider;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ScreenshotLog;

#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Capture a screenshot now.
    async fn capture(&self) -> Result<ScreenshotLog>;
}
