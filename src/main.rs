use std::sync::Arc;

use anyhow::Result;
use log::info;

use focustray::{
    AutoStartScheduler, Notifier, NotifyError, SessionKind, StatusUpdate, TimeAnnouncement,
    TimerController,
};

/// Stand-in display surface that renders to the terminal. The real tray and
/// window surfaces implement the same trait.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn status_update(&self, update: &StatusUpdate) -> Result<(), NotifyError> {
        let minutes = update.elapsed_seconds / 60;
        let seconds = update.elapsed_seconds % 60;
        info!(
            "{:?} {minutes}m {seconds}s | Focus: {} | Breaks: {}",
            update.mode, update.focus_count, update.break_count
        );
        Ok(())
    }

    fn session_completed(&self, kind: SessionKind) -> Result<(), NotifyError> {
        info!("{kind:?} done!");
        Ok(())
    }

    fn play_sound_cue(&self, _kind: SessionKind) -> Result<(), NotifyError> {
        // No audio path of its own; the controller falls back to direct playback.
        Err(NotifyError::Delivery("console has no sound output".into()))
    }

    fn speak_time(&self, announcement: &TimeAnnouncement) -> Result<(), NotifyError> {
        info!("it is {}", announcement.timestamp.format("%H:%M"));
        Ok(())
    }

    fn bring_to_front(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("focustray starting up...");

    let controller = TimerController::new(Arc::new(ConsoleNotifier));

    let mut scheduler = AutoStartScheduler::new();
    scheduler.start(controller.clone())?;

    controller.start_session(SessionKind::Focus, None).await;

    tokio::signal::ctrl_c().await?;

    scheduler.stop().await?;
    controller.shutdown().await;
    Ok(())
}
