use anyhow::{bail, Context, Result};
use chrono::Local;
use log::info;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::timer::TimerController;

const CHECK_INTERVAL_SECS: u64 = 15;

/// Coarse polling loop behind the scheduled daily focus session. Every 15
/// seconds it asks the controller to run its auto-start check; the
/// once-per-day and minute-0 gating lives in the controller so preferences
/// keep a single writer. If the machine sleeps through the whole minute-0
/// window, that day is skipped.
pub struct AutoStartScheduler {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl AutoStartScheduler {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(&mut self, controller: TimerController) -> Result<()> {
        if self.handle.is_some() {
            bail!("auto-start scheduler already running");
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(Duration::from_secs(CHECK_INTERVAL_SECS));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        controller.try_auto_start(Local::now()).await;
                    }
                    _ = token.cancelled() => {
                        info!("auto-start scheduler shutting down");
                        break;
                    }
                }
            }
        });

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("auto-start scheduler task failed to join")?;
        }
        Ok(())
    }
}

impl Default for AutoStartScheduler {
    fn default() -> Self {
        Self::new()
    }
}
