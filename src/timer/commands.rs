use serde::{Deserialize, Serialize};

use crate::{notify::StatusUpdate, prefs::PreferencesView};

use super::{state::SessionKind, TimerController};

/// User intents arriving from the tray/window surface. Minutes come in
/// signed so a bogus non-positive value is recoverable input rather than a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    StartTimer {
        mode: SessionKind,
        minutes: Option<i64>,
    },
    TogglePause {
        paused: bool,
    },
    ToggleSpeakTime {
        enabled: bool,
    },
    ToggleAutoStart {
        enabled: bool,
    },
    UpdateAutoStartHour {
        hour: u32,
    },
    RequestPreferences,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum CommandReply {
    Status(StatusUpdate),
    Preferences(PreferencesView),
    Ack,
}

impl TimerController {
    pub async fn handle_command(&self, command: Command) -> CommandReply {
        match command {
            Command::StartTimer { mode, minutes } => {
                CommandReply::Status(self.start_session(mode, minutes).await)
            }
            Command::TogglePause { paused } => {
                self.set_paused(paused).await;
                CommandReply::Ack
            }
            Command::ToggleSpeakTime { enabled } => {
                self.set_speak_time(enabled).await;
                CommandReply::Ack
            }
            Command::ToggleAutoStart { enabled } => {
                self.set_auto_start(enabled).await;
                CommandReply::Ack
            }
            Command::UpdateAutoStartHour { hour } => {
                self.set_auto_start_hour(hour).await;
                CommandReply::Ack
            }
            Command::RequestPreferences => CommandReply::Preferences(self.preferences().await),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Command, CommandReply};
    use crate::notify::testing::RecordingNotifier;
    use crate::timer::state::{SessionKind, SessionMode};
    use crate::timer::TimerController;

    fn recording_controller() -> (TimerController, Arc<RecordingNotifier>) {
        let recorder = Arc::new(RecordingNotifier::default());
        let controller = TimerController::new(recorder.clone());
        (controller, recorder)
    }

    #[test]
    fn commands_parse_from_kebab_case_json() {
        let cmd: Command =
            serde_json::from_str(r#"{"command":"start-timer","mode":"Focus","minutes":25}"#)
                .expect("parse start-timer");
        assert_eq!(
            cmd,
            Command::StartTimer {
                mode: SessionKind::Focus,
                minutes: Some(25),
            }
        );

        let cmd: Command = serde_json::from_str(r#"{"command":"toggle-pause","paused":true}"#)
            .expect("parse toggle-pause");
        assert_eq!(cmd, Command::TogglePause { paused: true });

        let cmd: Command =
            serde_json::from_str(r#"{"command":"update-auto-start-hour","hour":6}"#)
                .expect("parse update-auto-start-hour");
        assert_eq!(cmd, Command::UpdateAutoStartHour { hour: 6 });

        let cmd: Command = serde_json::from_str(r#"{"command":"request-preferences"}"#)
            .expect("parse request-preferences");
        assert_eq!(cmd, Command::RequestPreferences);
    }

    #[tokio::test(start_paused = true)]
    async fn start_timer_replies_with_a_snapshot() {
        let (controller, _recorder) = recording_controller();

        let reply = controller
            .handle_command(Command::StartTimer {
                mode: SessionKind::Break,
                minutes: Some(4),
            })
            .await;

        match reply {
            CommandReply::Status(update) => {
                assert_eq!(update.mode, SessionMode::Break);
                assert_eq!(update.target_seconds, 4 * 60);
            }
            other => panic!("expected status reply, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn preference_commands_round_trip_through_request_preferences() {
        let (controller, _recorder) = recording_controller();

        controller
            .handle_command(Command::ToggleSpeakTime { enabled: false })
            .await;
        controller
            .handle_command(Command::ToggleAutoStart { enabled: true })
            .await;
        controller
            .handle_command(Command::UpdateAutoStartHour { hour: 7 })
            .await;
        // Out of range: ignored.
        controller
            .handle_command(Command::UpdateAutoStartHour { hour: 99 })
            .await;

        let reply = controller.handle_command(Command::RequestPreferences).await;
        match reply {
            CommandReply::Preferences(view) => {
                assert!(!view.speak_time_enabled);
                assert!(view.auto_start_enabled);
                assert_eq!(view.auto_start_hour, 7);
            }
            other => panic!("expected preferences reply, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pause_carries_the_desired_value() {
        let (controller, _recorder) = recording_controller();

        controller
            .handle_command(Command::StartTimer {
                mode: SessionKind::Focus,
                minutes: Some(1),
            })
            .await;
        controller
            .handle_command(Command::TogglePause { paused: true })
            .await;

        assert!(controller.snapshot().await.elapsed_seconds == 0);
        controller.tick_once().await;
        assert_eq!(controller.snapshot().await.elapsed_seconds, 0);

        controller
            .handle_command(Command::TogglePause { paused: false })
            .await;
        controller.tick_once().await;
        assert_eq!(controller.snapshot().await.elapsed_seconds, 1);
    }
}
