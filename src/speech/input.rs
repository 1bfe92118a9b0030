use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::commands::{MazeCommand, MenuChoice};
use crate::error::{Error, Result};

const CHILD_POLL: Duration = Duration::from_millis(20);

/// How long to wait for speech to start and how long a phrase may run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenProfile {
    pub timeout: Duration,
    pub phrase_limit: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenMode {
    Menu,
    Maze,
    Quiz,
}

impl ListenMode {
    pub fn profile(self) -> ListenProfile {
        match self {
            ListenMode::Menu | ListenMode::Quiz => ListenProfile {
                timeout: Duration::from_secs(5),
                phrase_limit: Duration::from_secs(3),
            },
            ListenMode::Maze => ListenProfile {
                timeout: Duration::from_secs(2),
                phrase_limit: Duration::from_millis(1200),
            },
        }
    }

    /// Reduces a transcript to what this mode cares about. Empty means
    /// nothing usable was said.
    pub fn extract(self, heard: &str) -> String {
        match self {
            ListenMode::Menu => MenuChoice::from_speech(heard)
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            ListenMode::Maze => MazeCommand::parse(heard)
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            ListenMode::Quiz => heard.to_string(),
        }
    }
}

pub trait SpeechInput: Send + Sync {
    /// Blocks for at most the profile's timeout plus phrase limit.
    fn recognize(&self, profile: &ListenProfile) -> Result<String>;

    /// Same as `recognize`, but returns `Error::Cancelled` soon after
    /// `cancel` goes up. Backends that can't be interrupted keep the default.
    fn recognize_until(&self, profile: &ListenProfile, _cancel: &AtomicBool) -> Result<String> {
        self.recognize(profile)
    }
}

/// One attempt; failures of any kind collapse to an empty string.
pub fn hear(input: &dyn SpeechInput, mode: ListenMode) -> String {
    hear_until(input, mode, &AtomicBool::new(false))
}

/// `hear` that gives up once `cancel` is raised.
pub fn hear_until(input: &dyn SpeechInput, mode: ListenMode, cancel: &AtomicBool) -> String {
    let heard = match input.recognize_until(&mode.profile(), cancel) {
        Ok(text) => text.to_lowercase().trim().to_string(),
        Err(e) => {
            debug!(error = %e, ?mode, "recognition miss");
            return String::new();
        }
    };
    if heard.is_empty() {
        return heard;
    }
    debug!(%heard, ?mode, "heard");
    mode.extract(&heard)
}

/// Hears nothing. Waits out the timeout so callers polling in a loop don't
/// spin.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentRecognizer;

impl SpeechInput for SilentRecognizer {
    fn recognize(&self, profile: &ListenProfile) -> Result<String> {
        thread::sleep(profile.timeout);
        Err(Error::ListenTimeout(profile.timeout))
    }

    fn recognize_until(&self, profile: &ListenProfile, cancel: &AtomicBool) -> Result<String> {
        let deadline = Instant::now() + profile.timeout;
        while Instant::now() < deadline {
            if cancel.load(Ordering::SeqCst) {
                return Err(Error::Cancelled);
            }
            thread::sleep(CHILD_POLL);
        }
        Err(Error::ListenTimeout(profile.timeout))
    }
}

/// Runs an external recognizer per attempt and takes its stdout as the
/// transcript. The program gets `VOXPLAY_LISTEN_TIMEOUT` and
/// `VOXPLAY_PHRASE_LIMIT` (seconds) and is killed when both have elapsed,
/// or as soon as the attempt is cancelled.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// `command` is split on whitespace into program and arguments.
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
        }
    }
}

impl SpeechInput for CommandRecognizer {
    fn recognize(&self, profile: &ListenProfile) -> Result<String> {
        self.recognize_until(profile, &AtomicBool::new(false))
    }

    fn recognize_until(&self, profile: &ListenProfile, cancel: &AtomicBool) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(
                "VOXPLAY_LISTEN_TIMEOUT",
                profile.timeout.as_secs_f32().to_string(),
            )
            .env(
                "VOXPLAY_PHRASE_LIMIT",
                profile.phrase_limit.as_secs_f32().to_string(),
            )
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Speech(format!("failed to start {}: {}", self.program, e)))?;

        let budget = profile.timeout + profile.phrase_limit;
        let deadline = Instant::now() + budget;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if cancel.load(Ordering::SeqCst) {
                let _ = child.kill();
                let _ = child.wait();
                debug!(program = %self.program, "recognizer killed on cancel");
                return Err(Error::Cancelled);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ListenTimeout(budget));
            }
            thread::sleep(CHILD_POLL);
        };

        if !status.success() {
            return Err(Error::Speech(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        let mut transcript = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_string(&mut transcript)?;
        }
        Ok(transcript.trim().to_string())
    }
}
