pub mod chime;

use chime::Chime;

use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use anyhow::{anyhow, Result};
use log::warn;

use crate::timer::state::SessionKind;

enum AlertCommand {
    PlayCue(SessionKind),
}

/// Direct system-level alert playback, used when the display surface cannot
/// route sound itself. The thread is spawned lazily on first use and holds
/// the non-Send rodio output objects.
#[derive(Clone)]
pub struct AlertPlayer {
    tx: Arc<Mutex<Option<Sender<AlertCommand>>>>,
}

impl AlertPlayer {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AlertCommand>> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|e| anyhow!("alert channel poisoned: {e}"))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AlertCommand>();

        thread::Builder::new()
            .name("alert-player".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<()> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| anyhow!("failed to open audio output: {e}"))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| anyhow!("failed to create audio sink: {e}"))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AlertCommand::PlayCue(kind) => {
                            if let Err(err) = ensure_sink(&mut _stream, &mut sink) {
                                warn!("alert playback unavailable: {err}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(Chime::for_session(kind));
                            }
                        }
                    }
                }
            })
            .map_err(|e| anyhow!("failed to spawn alert thread: {e}"))?;

        let tx_clone = tx.clone();
        *guard = Some(tx);
        Ok(tx_clone)
    }

    pub fn play_cue(&self, kind: SessionKind) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(AlertCommand::PlayCue(kind))
            .map_err(|e| anyhow!("alert thread gone: {e}"))
    }
}

impl Default for AlertPlayer {
    fn default() -> Self {
        Self::new()
    }
}
