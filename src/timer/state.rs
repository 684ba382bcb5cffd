use serde::{Deserialize, Serialize};

use crate::notify::StatusUpdate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Focus,
    Break,
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Idle
    }
}

/// A session kind the user can actually start. `SessionMode::Idle` is the
/// absence of one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionKind {
    Focus,
    Break,
}

impl From<SessionKind> for SessionMode {
    fn from(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Focus => SessionMode::Focus,
            SessionKind::Break => SessionMode::Break,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: SessionMode,
    pub elapsed_seconds: u64,
    pub target_seconds: u64,
    pub paused: bool,
    pub focus_completed_count: u32,
    pub break_completed_count: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: SessionMode::Idle,
            elapsed_seconds: 0,
            target_seconds: 0,
            paused: false,
            focus_completed_count: 0,
            break_completed_count: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the running fields for a fresh session. Completion counters
    /// survive for the lifetime of the process.
    pub fn begin_session(&mut self, kind: SessionKind, target_seconds: u64) {
        self.mode = kind.into();
        self.elapsed_seconds = 0;
        self.target_seconds = target_seconds;
        self.paused = false;
    }

    pub fn active_kind(&self) -> Option<SessionKind> {
        match self.mode {
            SessionMode::Idle => None,
            SessionMode::Focus => Some(SessionKind::Focus),
            SessionMode::Break => Some(SessionKind::Break),
        }
    }

    /// Completion is periodic rather than single-shot: every positive
    /// multiple of the target is a boundary, so a session keeps signalling
    /// every `target_seconds` until replaced.
    pub fn at_completion_boundary(&self) -> bool {
        self.target_seconds > 0
            && self.elapsed_seconds > 0
            && self.elapsed_seconds % self.target_seconds == 0
    }

    pub fn record_completion(&mut self, kind: SessionKind) {
        match kind {
            SessionKind::Focus => self.focus_completed_count += 1,
            SessionKind::Break => self.break_completed_count += 1,
        }
    }

    pub fn status(&self) -> StatusUpdate {
        StatusUpdate {
            elapsed_seconds: self.elapsed_seconds,
            mode: self.mode,
            focus_count: self.focus_completed_count,
            break_count: self.break_completed_count,
            target_seconds: self.target_seconds,
        }
    }
}
