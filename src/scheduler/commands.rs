use tauri::State;

use crate::{
    models::{CaptureSettings, ScreenshotLog},
    AppState,
};

#[tauri::command]
pub async fn get_capture_settings(state: State<'_, AppState>) -> Result<CaptureSettings, String> {
    Ok(state.scheduler.settings().await)
}

#[tauri::command]
pub async fn set_capture_settings(
    enabled: bool,
    interval_minutes: u32,
    state: State<'_, AppState>,
) -> Result<CaptureSettings, String> {
    state
        .scheduler
        .set_configuration(enabled, interval_minutes)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn capture_screenshot(state: State<'_, AppState>) -> Result<ScreenshotLog, String> {
    state.scheduler.capture_now().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_capture_history(state: State<'_, AppState>) -> Result<Vec<ScreenshotLog>, String> {
    Ok(state.scheduler.history().await)
}
