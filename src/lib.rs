pub mod audio;
pub mod notify;
pub mod prefs;
pub mod scheduler;
pub mod timer;

pub use notify::{Notifier, NotifyError, StatusUpdate, TimeAnnouncement};
pub use prefs::{Preferences, PreferencesView};
pub use scheduler::AutoStartScheduler;
pub use timer::{
    commands::{Command, CommandReply},
    SessionKind, SessionMode, TimerController,
};
