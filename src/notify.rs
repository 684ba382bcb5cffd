use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

use crate::timer::state::{SessionKind, SessionMode};

#[derive(Debug, Error)]
pub enum NotifyError {
    /// The display surface has been destroyed and will not come back.
    /// The timer stops emitting to it instead of failing every second.
    #[error("display surface closed")]
    SurfaceClosed,
    /// A single delivery went wrong; the next one may well succeed.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Snapshot broadcast on every tick and on every command that changes
/// visible state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub elapsed_seconds: u64,
    pub mode: SessionMode,
    pub focus_count: u32,
    pub break_count: u32,
    pub target_seconds: u64,
}

/// Payload for the optional spoken time announcement on completion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAnnouncement {
    pub timestamp: DateTime<Local>,
    pub mode: SessionKind,
}

/// The display/output collaborator. Implementations render snapshots and
/// completion events however they like (tray tooltip, window DOM, toast,
/// speech); the timer only ever calls in, fire-and-forget, and treats every
/// error as non-fatal.
pub trait Notifier: Send + Sync {
    fn status_update(&self, update: &StatusUpdate) -> Result<(), NotifyError>;

    /// The completion notice (toast). Attempted on every boundary,
    /// independent of how sound routing went.
    fn session_completed(&self, kind: SessionKind) -> Result<(), NotifyError>;

    /// Play the mode-specific alert cue through the surface's own audio
    /// path. On failure the timer falls back to direct playback.
    fn play_sound_cue(&self, kind: SessionKind) -> Result<(), NotifyError>;

    fn speak_time(&self, announcement: &TimeAnnouncement) -> Result<(), NotifyError>;

    /// Force the surface to the foreground (intrusive completion).
    fn bring_to_front(&self) -> Result<(), NotifyError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::{Notifier, NotifyError, StatusUpdate, TimeAnnouncement};
    use crate::timer::state::SessionKind;

    /// Records everything the controller emits. Can simulate a destroyed
    /// surface or broken sound routing.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub updates: Mutex<Vec<StatusUpdate>>,
        pub completions: Mutex<Vec<SessionKind>>,
        pub cues: Mutex<Vec<SessionKind>>,
        pub announcements: Mutex<Vec<SessionKind>>,
        pub raises: Mutex<u32>,
        surface_closed: AtomicBool,
        sound_broken: AtomicBool,
    }

    impl RecordingNotifier {
        pub fn close_surface(&self) {
            self.surface_closed.store(true, Ordering::SeqCst);
        }

        pub fn break_sound(&self) {
            self.sound_broken.store(true, Ordering::SeqCst);
        }

        pub fn last_update(&self) -> Option<StatusUpdate> {
            self.updates.lock().unwrap().last().cloned()
        }

        pub fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }

        pub fn completion_count(&self) -> usize {
            self.completions.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn status_update(&self, update: &StatusUpdate) -> Result<(), NotifyError> {
            if self.surface_closed.load(Ordering::SeqCst) {
                return Err(NotifyError::SurfaceClosed);
            }
            self.updates.lock().unwrap().push(update.clone());
            Ok(())
        }

        fn session_completed(&self, kind: SessionKind) -> Result<(), NotifyError> {
            self.completions.lock().unwrap().push(kind);
            Ok(())
        }

        fn play_sound_cue(&self, kind: SessionKind) -> Result<(), NotifyError> {
            if self.sound_broken.load(Ordering::SeqCst) {
                return Err(NotifyError::Delivery("no audio route".into()));
            }
            self.cues.lock().unwrap().push(kind);
            Ok(())
        }

        fn speak_time(&self, announcement: &TimeAnnouncement) -> Result<(), NotifyError> {
            self.announcements.lock().unwrap().push(announcement.mode);
            Ok(())
        }

        fn bring_to_front(&self) -> Result<(), NotifyError> {
            *self.raises.lock().unwrap() += 1;
            Ok(())
        }
    }
}
