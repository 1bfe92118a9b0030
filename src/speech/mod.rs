//! Speech plumbing shared by every game: recognizer and voice adapters, the
//! queued announcer, the background listener and command extraction.

pub mod commands;
pub mod input;
pub mod listener;
pub mod output;

use std::sync::Arc;

pub use commands::{MazeCommand, MenuChoice};
pub use input::{CommandRecognizer, ListenMode, ListenProfile, SilentRecognizer, SpeechInput};
pub use listener::Listener;
pub use output::{Announcer, CommandVoice, LogVoice, SpeechOutput, Voice};

use crate::config::Settings;

/// Speech handles for one session, built once and passed by reference.
pub struct Services {
    pub output: Box<dyn SpeechOutput>,
    pub input: Arc<dyn SpeechInput>,
}

impl Services {
    pub fn new(output: Box<dyn SpeechOutput>, input: Arc<dyn SpeechInput>) -> Self {
        Self { output, input }
    }

    /// Wires the configured external programs, falling back to a logging
    /// voice and a silent recognizer.
    pub fn from_settings(settings: &Settings) -> Self {
        let voice: Box<dyn Voice> = match &settings.tts_command {
            Some(cmd) => Box::new(CommandVoice::new(cmd, settings.speech_rate)),
            None => Box::new(LogVoice),
        };
        let input: Arc<dyn SpeechInput> = match &settings.stt_command {
            Some(cmd) => Arc::new(CommandRecognizer::new(cmd)),
            None => Arc::new(SilentRecognizer),
        };
        Self::new(Box::new(Announcer::spawn(voice)), input)
    }

    pub fn say(&self, text: &str) {
        self.output.announce(text);
    }

    /// One blocking recognition attempt; misses come back empty.
    pub fn hear(&self, mode: ListenMode) -> String {
        input::hear(self.input.as_ref(), mode)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::{Error, Result};

    /// Records announcements instead of speaking them.
    #[derive(Clone, Default)]
    pub struct Transcript(pub Arc<Mutex<Vec<String>>>);

    impl Transcript {
        pub fn lines(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl SpeechOutput for Transcript {
        fn announce(&self, text: &str) {
            if !text.is_empty() {
                self.0.lock().unwrap().push(text.to_string());
            }
        }
    }

    /// Replays canned recognitions; `None` entries become failures.
    pub struct Script(pub Mutex<VecDeque<Option<String>>>);

    impl Script {
        pub fn new(lines: &[Option<&str>]) -> Self {
            Self(Mutex::new(
                lines.iter().map(|l| l.map(str::to_string)).collect(),
            ))
        }
    }

    impl SpeechInput for Script {
        fn recognize(&self, profile: &ListenProfile) -> Result<String> {
            match self.0.lock().unwrap().pop_front() {
                Some(Some(text)) => Ok(text),
                Some(None) => Err(Error::Speech("recognizer unavailable".into())),
                None => {
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    Err(Error::ListenTimeout(profile.timeout))
                }
            }
        }
    }

    pub fn services(lines: &[Option<&str>]) -> (Services, Transcript) {
        let transcript = Transcript::default();
        let services = Services::new(Box::new(transcript.clone()), Arc::new(Script::new(lines)));
        (services, transcript)
    }
}
