use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local, Timelike};
use log::{debug, info, warn};
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::{
    audio::AlertPlayer,
    notify::{Notifier, NotifyError, StatusUpdate, TimeAnnouncement},
    prefs::{Preferences, PreferencesView},
};

use super::state::{SessionKind, SessionMode, SessionState};

/// What the ticking task should do after a tick has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickFlow {
    Continue,
    Halt,
}

/// Owns the session state machine. All mutation of session state and
/// preferences goes through here (single writer); the ticker task and the
/// auto-start scheduler hold clones.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<SessionState>>,
    prefs: Arc<Mutex<Preferences>>,
    notifier: Arc<dyn Notifier>,
    fallback_alerts: AlertPlayer,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            prefs: Arc::new(Mutex::new(Preferences::default())),
            notifier,
            fallback_alerts: AlertPlayer::new(),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn snapshot(&self) -> StatusUpdate {
        self.state.lock().await.status()
    }

    pub async fn preferences(&self) -> PreferencesView {
        self.prefs.lock().await.view()
    }

    /// Starts a session of the given kind. A positive `minutes` is
    /// remembered as the new preference for that kind; anything else falls
    /// back to the remembered value. Any running ticker is fully stopped
    /// before the state is touched, so a stale tick can never land on the
    /// new session.
    pub async fn start_session(&self, kind: SessionKind, minutes: Option<i64>) -> StatusUpdate {
        let minutes = self.resolve_minutes(kind, minutes).await;

        self.cancel_ticker().await;

        let update = {
            let mut state = self.state.lock().await;
            state.begin_session(kind, minutes * 60);
            state.status()
        };
        info!("starting {kind:?} session ({minutes} min)");

        self.spawn_ticker().await;

        // Preview cue only, no completion notice: the user just asked for this.
        if let Err(err) = self.notifier.play_sound_cue(kind) {
            warn!("start cue via display surface failed, using direct playback: {err}");
            if let Err(err) = self.fallback_alerts.play_cue(kind) {
                warn!("direct start cue failed: {err}");
            }
        }
        self.push_status(&update);

        update
    }

    /// Sets the pause flag to the carried value. Idempotent; the change
    /// shows up on the next snapshot rather than being broadcast here.
    pub async fn set_paused(&self, paused: bool) {
        let mut state = self.state.lock().await;
        if state.paused != paused {
            debug!("session {}", if paused { "paused" } else { "resumed" });
        }
        state.paused = paused;
    }

    pub async fn set_speak_time(&self, enabled: bool) {
        self.prefs.lock().await.speak_time_enabled = enabled;
    }

    pub async fn set_intrusive_completion(&self, enabled: bool) {
        self.prefs.lock().await.intrusive_completion_enabled = enabled;
    }

    pub async fn set_auto_start(&self, enabled: bool) {
        self.prefs.lock().await.auto_start_enabled = enabled;
    }

    /// Out-of-range hours are ignored rather than clamped; the previous
    /// value stays in effect.
    pub async fn set_auto_start_hour(&self, hour: u32) {
        if hour > 23 {
            warn!("auto-start hour {hour} out of range, keeping current setting");
            return;
        }
        self.prefs.lock().await.auto_start_hour = hour;
    }

    /// One auto-start check against the given wall clock. Fires at most once
    /// per calendar day, only during minute 0 of the configured hour, and
    /// only while idle. Returns whether a session was started. A busy or
    /// disabled check does not consume the day.
    pub async fn try_auto_start(&self, now: DateTime<Local>) -> bool {
        {
            let prefs = self.prefs.lock().await;
            if !prefs.auto_start_enabled
                || now.hour() != prefs.auto_start_hour
                || now.minute() != 0
                || prefs.last_auto_start_date == Some(now.date_naive())
            {
                return false;
            }
        }
        if self.state.lock().await.mode != SessionMode::Idle {
            return false;
        }

        self.prefs.lock().await.last_auto_start_date = Some(now.date_naive());
        info!("auto-starting focus session ({})", now.format("%Y-%m-%d %H:%M"));
        self.start_session(SessionKind::Focus, None).await;
        true
    }

    /// Cancels the ticker. Terminal: nothing restarts it except a new
    /// `start_session`.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
        info!("timer controller shut down");
    }

    async fn resolve_minutes(&self, kind: SessionKind, minutes: Option<i64>) -> u64 {
        let mut prefs = self.prefs.lock().await;
        match minutes {
            Some(m) if m > 0 => {
                let m = m as u64;
                prefs.remember_minutes(kind, m);
                m
            }
            Some(invalid) => {
                warn!(
                    "ignoring non-positive session length {invalid}m, using {}m",
                    prefs.minutes_for(kind)
                );
                prefs.minutes_for(kind)
            }
            None => prefs.minutes_for(kind),
        }
    }

    /// Advances the active session by one second and runs the side effects
    /// for any completion boundary crossed. No-op while paused; halts the
    /// ticker once the surface is gone or no session is active.
    pub(crate) async fn tick_once(&self) -> TickFlow {
        let (tick_update, completion) = {
            let mut state = self.state.lock().await;
            let Some(kind) = state.active_kind() else {
                return TickFlow::Halt;
            };
            if state.paused {
                return TickFlow::Continue;
            }
            state.elapsed_seconds += 1;
            let tick_update = state.status();
            if state.at_completion_boundary() {
                state.record_completion(kind);
                let final_update = state.status();
                (tick_update, Some((kind, final_update)))
            } else {
                (tick_update, None)
            }
        };

        if self.push_status(&tick_update) == TickFlow::Halt {
            return TickFlow::Halt;
        }

        if let Some((kind, final_update)) = completion {
            self.emit_completion(kind).await;
            if self.push_status(&final_update) == TickFlow::Halt {
                return TickFlow::Halt;
            }
        }

        TickFlow::Continue
    }

    async fn emit_completion(&self, kind: SessionKind) {
        info!("{kind:?} session boundary reached");

        if let Err(err) = self.notifier.play_sound_cue(kind) {
            warn!("completion cue via display surface failed, using direct playback: {err}");
            if let Err(err) = self.fallback_alerts.play_cue(kind) {
                warn!("direct completion cue failed: {err}");
            }
        }

        // The notice goes out no matter how sound routing went.
        if let Err(err) = self.notifier.session_completed(kind) {
            warn!("completion notice dropped: {err}");
        }

        let (speak, intrusive) = {
            let prefs = self.prefs.lock().await;
            (prefs.speak_time_enabled, prefs.intrusive_completion_enabled)
        };

        if speak {
            let announcement = TimeAnnouncement {
                timestamp: Local::now(),
                mode: kind,
            };
            if let Err(err) = self.notifier.speak_time(&announcement) {
                debug!("time announcement dropped: {err}");
            }
        }

        if intrusive {
            if let Err(err) = self.notifier.bring_to_front() {
                debug!("bring-to-front failed: {err}");
            }
        }
    }

    fn push_status(&self, update: &StatusUpdate) -> TickFlow {
        match self.notifier.status_update(update) {
            Ok(()) => TickFlow::Continue,
            Err(NotifyError::SurfaceClosed) => {
                warn!("display surface is gone, stopping status updates");
                TickFlow::Halt
            }
            Err(err) => {
                debug!("status update dropped: {err}");
                TickFlow::Continue
            }
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let controller = self.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let start = time::Instant::now() + tick_interval;
            let mut interval = time::interval_at(start, tick_interval);
            loop {
                interval.tick().await;
                if controller.tick_once().await == TickFlow::Halt {
                    break;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
            // Wait the abort out so no tick from the old session can run
            // concurrently with whatever comes next.
            let _ = handle.await;
        }
    }
}
