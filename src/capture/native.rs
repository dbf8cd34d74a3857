use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, Timelike, Utc};
use log::info;
use uuid::Uuid;

use crate::models::ScreenshotLog;

use super::CaptureProvider;

// Anything below this is a blank or failed grab (hidden screen, denied
// permission) rather than a real screenshot.
const MIN_CAPTURE_BYTES: u64 = 1000;

/// Captures the main display through the macOS `screencapture` utility
/// and files the image under a per-app captures directory.
pub struct ScreencaptureProvider {
    output_dir: PathBuf,
}

impl ScreencaptureProvider {
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create captures directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }

    fn output_path(&self, timestamp: DateTime<Utc>) -> PathBuf {
        let file_name = format!(
            "capture-{}-{}.png",
            timestamp.format("%Y%m%d-%H%M%S"),
            Uuid::new_v4().simple()
        );
        self.output_dir.join(file_name)
    }
}

#[async_trait]
impl CaptureProvider for ScreencaptureProvider {
    async fn capture(&self) -> Result<ScreenshotLog> {
        let timestamp = Utc::now();
        let path = self.output_path(timestamp);

        let capture_path = path.clone();
        tokio::task::spawn_blocking(move || run_screencapture(&capture_path))
            .await
            .context("screenshot capture worker join failed")??;

        let size = fs::metadata(&path)
            .with_context(|| format!("capture output missing at {}", path.display()))?
            .len();
        if size < MIN_CAPTURE_BYTES {
            let _ = fs::remove_file(&path);
            bail!("screenshot too small ({size} bytes), screen likely hidden or permission denied");
        }

        info!("Screenshot saved: {} ({} bytes)", path.display(), size);

        Ok(ScreenshotLog {
            path: path.display().to_string(),
            category: categorize(Local::now().hour()).to_string(),
            timestamp: timestamp.to_rfc3339(),
        })
    }
}

#[cfg(target_os = "macos")]
fn run_screencapture(path: &Path) -> Result<()> {
    use anyhow::anyhow;
    use std::process::Command;

    let status = Command::new("screencapture")
        .args(["-x", "-t", "png"])
        .arg(path)
        .status()
        .context("failed to spawn screencapture")?;

    if !status.success() {
        return Err(anyhow!("screencapture exited with {status}"));
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run_screencapture(_path: &Path) -> Result<()> {
    bail!("screen capture is only supported on macOS")
}

/// Bucket a capture by local hour so the Reports view can group a day at
/// a glance.
fn categorize(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=21 => "evening",
        _ => "night",
    }
}
