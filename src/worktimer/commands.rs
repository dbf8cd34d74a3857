use tauri::State;

use crate::AppState;

use super::TimeInfo;

#[tauri::command]
pub fn start_timer(state: State<AppState>) -> TimeInfo {
    state.timer.start()
}

#[tauri::command]
pub fn pause_timer(state: State<AppState>) -> TimeInfo {
    state.timer.pause()
}

#[tauri::command]
pub fn stop_timer(state: State<AppState>) -> TimeInfo {
    state.timer.stop()
}

#[tauri::command]
pub fn get_timer_time(state: State<AppState>) -> TimeInfo {
    state.timer.reading()
}
