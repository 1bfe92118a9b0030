use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::input::{hear_until, ListenMode, SpeechInput};
use crate::mailbox::Poster;

/// Background thread that keeps recognizing and posts what it hears.
///
/// The stop flag doubles as the cancel signal for the attempt in flight, so
/// an external recognizer is killed rather than left running.
pub struct Listener {
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Listener {
    pub fn spawn(input: Arc<dyn SpeechInput>, mode: ListenMode, poster: Poster) -> Self {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();
        let handle = thread::spawn(move || {
            info!(?mode, "listener started");
            while !flag.load(Ordering::SeqCst) {
                let command = hear_until(input.as_ref(), mode, &flag);
                if command.is_empty() {
                    continue;
                }
                if !poster.post(command) {
                    debug!("previous command still unread");
                }
            }
            info!(?mode, "listener stopped");
        });
        Self {
            stopped,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }

    /// Raises the stop flag, cancels the attempt in flight and joins the
    /// thread.
    pub fn stop(mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("listener thread panicked");
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}
