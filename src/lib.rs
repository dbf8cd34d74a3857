mod capture;
mod models;
mod scheduler;
mod store;
mod worktimer;

use std::sync::Arc;

use capture::ScreencaptureProvider;
use log::warn;
use scheduler::{
    commands::{
        capture_screenshot, get_capture_history, get_capture_settings, set_capture_settings,
    },
    CaptureScheduler, SchedulerEvent,
};
use store::FileKvStore;
use tauri::{AppHandle, Emitter, Manager};
use tokio::sync::broadcast;
use worktimer::{
    commands::{get_timer_time, pause_timer, start_timer, stop_timer},
    WorkTimer,
};

pub(crate) struct AppState {
    pub(crate) scheduler: CaptureScheduler,
    pub(crate) timer: WorkTimer,
}

/// Relay scheduler mutations to the webview so Settings and Reports stay
/// in sync without polling.
async fn forward_scheduler_events(
    app_handle: AppHandle,
    mut events: broadcast::Receiver<SchedulerEvent>,
) {
    loop {
        match events.recv().await {
            Ok(SchedulerEvent::SettingsChanged(settings)) => {
                let _ = app_handle.emit("capture-settings-changed", settings);
            }
            Ok(SchedulerEvent::HistoryUpdated(entry)) => {
                let _ = app_handle.emit("capture-history-updated", entry);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Dropped {skipped} scheduler events for the webview");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Shutterlog starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let store = FileKvStore::new(app_data_dir.join("storage"))?;
                let provider = ScreencaptureProvider::new(app_data_dir.join("captures"))?;
                let scheduler = CaptureScheduler::new(Arc::new(store), Arc::new(provider));

                // Restore persisted settings and arm the capture timer
                // before the webview comes up.
                tauri::async_runtime::block_on(scheduler.initialize());

                tauri::async_runtime::spawn(forward_scheduler_events(
                    app.handle().clone(),
                    scheduler.subscribe(),
                ));

                app.manage(AppState {
                    scheduler,
                    timer: WorkTimer::new(),
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_capture_settings,
            set_capture_settings,
            capture_screenshot,
            get_capture_history,
            start_timer,
            pause_timer,
            stop_timer,
            get_timer_time,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
