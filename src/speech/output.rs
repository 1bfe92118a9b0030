use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Fire-and-forget narration.
pub trait SpeechOutput {
    fn announce(&self, text: &str);
}

/// A blocking speech backend, driven from the announcer's worker thread.
pub trait Voice: Send + 'static {
    fn say(&mut self, text: &str) -> Result<()>;
}

/// Only logs what would have been spoken.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogVoice;

impl Voice for LogVoice {
    fn say(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Speaks through an external program, text passed as the last argument.
#[derive(Debug, Clone)]
pub struct CommandVoice {
    program: String,
    args: Vec<String>,
    rate: u32,
}

impl CommandVoice {
    pub fn new(command: &str, rate: u32) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
            rate,
        }
    }
}

impl Voice for CommandVoice {
    fn say(&mut self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .env("VOXPLAY_TTS_RATE", self.rate.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::Speech(format!("failed to start {}: {}", self.program, e)))?;
        if !status.success() {
            return Err(Error::Speech(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Queues announcements to a single worker so callers never wait on audio.
pub struct Announcer {
    tx: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl Announcer {
    pub fn spawn(mut voice: Box<dyn Voice>) -> Self {
        let (tx, rx) = mpsc::channel::<String>();
        let worker = thread::spawn(move || {
            for text in rx {
                info!(target: "voxplay::speech", "SYSTEM: {}", text);
                if let Err(e) = voice.say(&text) {
                    warn!(error = %e, "speech output failed");
                }
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Lets queued announcements finish, then stops the worker.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl SpeechOutput for Announcer {
    fn announce(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(tx) = &self.tx {
            let _ = tx.send(text.to_string());
        }
    }
}

impl Drop for Announcer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
