use std::sync::Arc;

use log::{error, info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    capture::CaptureProvider,
    models::{CaptureSettings, ScreenshotLog},
    store::KvStore,
};

pub const SETTINGS_KEY: &str = "screenshotSettings";
pub const HISTORY_KEY: &str = "screenshotHistory";

const HISTORY_LIMIT: usize = 50;
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("screenshot capture failed: {0}")]
    Capture(anyhow::Error),
    #[error("failed to persist {key}: {source}")]
    Persistence {
        key: &'static str,
        source: anyhow::Error,
    },
    #[error("capture interval must be a positive number of minutes")]
    InvalidInterval,
}

/// Pushed to subscribers (the webview bridge) after every state mutation.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    SettingsChanged(CaptureSettings),
    HistoryUpdated(ScreenshotLog),
}

#[derive(Default)]
struct SchedulerState {
    settings: CaptureSettings,
    history: Vec<ScreenshotLog>,
}

struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the capture schedule: persisted settings, the bounded capture
/// history and the single repeating timer that drives captures while
/// enabled. One instance lives for the whole app and is handed to the
/// command layer through managed state.
#[derive(Clone)]
pub struct CaptureScheduler {
    state: Arc<Mutex<SchedulerState>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    store: Arc<dyn KvStore>,
    provider: Arc<dyn CaptureProvider>,
    events: broadcast::Sender<SchedulerEvent>,
}

impl CaptureScheduler {
    pub fn new(store: Arc<dyn KvStore>, provider: Arc<dyn CaptureProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(SchedulerState::default())),
            ticker: Arc::new(Mutex::new(None)),
            store,
            provider,
            events,
        }
    }

    /// Load persisted settings and history, then arm the timer if capture
    /// is enabled. Safe to call repeatedly; an already armed timer is left
    /// alone, never duplicated.
    pub async fn initialize(&self) {
        let settings = {
            let mut state = self.state.lock().await;
            state.settings = self.load_or_default(SETTINGS_KEY);
            state.history = self.load_or_default(HISTORY_KEY);
            state.settings
        };

        if settings.enabled && !self.timer_active().await {
            self.start_ticker(settings.interval_minutes).await;
        }
    }

    pub async fn settings(&self) -> CaptureSettings {
        self.state.lock().await.settings
    }

    pub async fn history(&self) -> Vec<ScreenshotLog> {
        self.state.lock().await.history.clone()
    }

    pub async fn timer_active(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.events.subscribe()
    }

    /// Replace the schedule: persist the new settings, then tear down the
    /// running timer and arm a fresh one when enabled, so the live period
    /// always matches what was stored. Persisting first means a crash in
    /// between can never leave a running timer whose settings were lost.
    /// A failed write propagates and leaves the previous timer untouched.
    pub async fn set_configuration(
        &self,
        enabled: bool,
        interval_minutes: u32,
    ) -> Result<CaptureSettings, SchedulerError> {
        if interval_minutes == 0 {
            return Err(SchedulerError::InvalidInterval);
        }

        let settings = CaptureSettings {
            enabled,
            interval_minutes,
        };

        {
            let mut state = self.state.lock().await;
            let serialized =
                serde_json::to_string(&settings).map_err(|err| SchedulerError::Persistence {
                    key: SETTINGS_KEY,
                    source: err.into(),
                })?;
            self.store
                .set(SETTINGS_KEY, &serialized)
                .map_err(|source| SchedulerError::Persistence {
                    key: SETTINGS_KEY,
                    source,
                })?;
            state.settings = settings;
        }

        self.stop_ticker().await;
        if enabled {
            self.start_ticker(interval_minutes).await;
        }

        let _ = self.events.send(SchedulerEvent::SettingsChanged(settings));
        Ok(settings)
    }

    /// Capture a screenshot now, record it at the head of the history and
    /// persist the truncated list. Provider failures propagate unchanged
    /// and never touch the history.
    pub async fn capture_now(&self) -> Result<ScreenshotLog, SchedulerError> {
        let record = self
            .provider
            .capture()
            .await
            .map_err(SchedulerError::Capture)?;

        let mut state = self.state.lock().await;
        state.history.insert(0, record.clone());
        state.history.truncate(HISTORY_LIMIT);

        let serialized =
            serde_json::to_string(&state.history).map_err(|err| SchedulerError::Persistence {
                key: HISTORY_KEY,
                source: err.into(),
            })?;
        self.store
            .set(HISTORY_KEY, &serialized)
            .map_err(|source| SchedulerError::Persistence {
                key: HISTORY_KEY,
                source,
            })?;

        let _ = self.events.send(SchedulerEvent::HistoryUpdated(record.clone()));
        Ok(record)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("Ignoring unparseable {key}: {err}");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(err) => {
                warn!("Failed to read {key}, using defaults: {err:#}");
                T::default()
            }
        }
    }

    async fn start_ticker(&self, interval_minutes: u32) {
        let mut guard = self.ticker.lock().await;
        if let Some(ticker) = guard.take() {
            ticker.cancel.cancel();
            let _ = ticker.handle.await;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let scheduler = self.clone();
        let period = Duration::from_millis(u64::from(interval_minutes) * 60 * 1000);

        let handle = tokio::spawn(async move {
            // First tick fires one full period after arming, matching the
            // repeating timer this replaces.
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                "Capture timer started: every {interval_minutes} min ({} ms)",
                period.as_millis()
            );

            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        // Each tick is fire-and-forget: a slow capture must
                        // not hold up the next tick, and stopping the timer
                        // must not cancel a capture already in flight.
                        let scheduler = scheduler.clone();
                        tokio::spawn(async move {
                            if let Err(err) = scheduler.capture_now().await {
                                error!("Scheduled capture failed: {err}");
                            }
                        });
                    }
                    _ = token.cancelled() => {
                        info!("Capture timer stopped");
                        break;
                    }
                }
            }
        });

        *guard = Some(Ticker { cancel, handle });
    }

    async fn stop_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            let _ = ticker.handle.await;
        }
    }
}
