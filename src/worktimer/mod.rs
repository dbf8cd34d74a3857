//! Dashboard stopwatch: accumulated work time with start/pause/stop.

pub mod commands;

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use serde::Serialize;

/// Reading sent to the webview after every timer operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    pub formatted_time: String,
    pub seconds: u64,
    pub is_running: bool,
}

#[derive(Default)]
struct WorkTimerState {
    running_anchor: Option<Instant>,
    accumulated: Duration,
}

impl WorkTimerState {
    fn is_running(&self) -> bool {
        self.running_anchor.is_some()
    }

    fn total(&self) -> Duration {
        match self.running_anchor {
            Some(anchor) => self.accumulated + anchor.elapsed(),
            None => self.accumulated,
        }
    }

    fn reading(&self) -> TimeInfo {
        let secs = self.total().as_secs();
        TimeInfo {
            formatted_time: format_hms(secs),
            seconds: secs,
            is_running: self.is_running(),
        }
    }
}

/// Process-wide work stopwatch. Pausing folds the anchored elapsed time
/// into the accumulator; stopping returns the final reading and resets.
pub struct WorkTimer {
    state: Mutex<WorkTimerState>,
}

impl WorkTimer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(WorkTimerState::default()),
        }
    }

    pub fn start(&self) -> TimeInfo {
        let mut state = self.state.lock().unwrap();
        if !state.is_running() {
            state.running_anchor = Some(Instant::now());
        }
        state.reading()
    }

    pub fn pause(&self) -> TimeInfo {
        let mut state = self.state.lock().unwrap();
        if let Some(anchor) = state.running_anchor.take() {
            state.accumulated += anchor.elapsed();
        }
        state.reading()
    }

    pub fn stop(&self) -> TimeInfo {
        let mut state = self.state.lock().unwrap();
        // Capture the final reading before resetting so the caller can log it.
        let final_reading = state.reading();
        *state = WorkTimerState::default();
        final_reading
    }

    pub fn reading(&self) -> TimeInfo {
        self.state.lock().unwrap().reading()
    }
}

fn format_hms(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
