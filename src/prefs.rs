use chrono::NaiveDate;
use serde::Serialize;

use crate::timer::state::SessionKind;

pub const DEFAULT_FOCUS_MINUTES: u64 = 10;
pub const DEFAULT_BREAK_MINUTES: u64 = 5;
pub const DEFAULT_AUTO_START_HOUR: u32 = 8;

/// Process-lifetime user preferences. Mutated only through controller
/// commands; nothing here is persisted across restarts.
#[derive(Debug, Clone)]
pub struct Preferences {
    pub focus_minutes: u64,
    pub break_minutes: u64,
    pub speak_time_enabled: bool,
    pub intrusive_completion_enabled: bool,
    pub auto_start_enabled: bool,
    pub auto_start_hour: u32,
    /// Calendar day of the last automatic start, guarding the
    /// at-most-once-per-day trigger.
    pub last_auto_start_date: Option<NaiveDate>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            speak_time_enabled: true,
            intrusive_completion_enabled: false,
            auto_start_enabled: false,
            auto_start_hour: DEFAULT_AUTO_START_HOUR,
            last_auto_start_date: None,
        }
    }
}

impl Preferences {
    pub fn minutes_for(&self, kind: SessionKind) -> u64 {
        match kind {
            SessionKind::Focus => self.focus_minutes,
            SessionKind::Break => self.break_minutes,
        }
    }

    pub fn remember_minutes(&mut self, kind: SessionKind, minutes: u64) {
        match kind {
            SessionKind::Focus => self.focus_minutes = minutes,
            SessionKind::Break => self.break_minutes = minutes,
        }
    }

    pub fn view(&self) -> PreferencesView {
        PreferencesView {
            speak_time_enabled: self.speak_time_enabled,
            auto_start_hour: self.auto_start_hour,
            auto_start_enabled: self.auto_start_enabled,
        }
    }
}

/// The slice of preferences the display surface asks for.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesView {
    pub speak_time_enabled: bool,
    pub auto_start_hour: u32,
    pub auto_start_enabled: bool,
}
