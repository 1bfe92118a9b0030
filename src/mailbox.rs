use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use tracing::debug;

/// Producer half. Cheap to clone; every clone feeds the same slot.
#[derive(Debug, Clone)]
pub struct Poster {
    tx: SyncSender<String>,
}

impl Poster {
    /// Stores `text` if the slot is empty. Returns `false` when it was
    /// dropped because an unread command is still pending, or the reader is
    /// gone.
    pub fn post(&self, text: impl Into<String>) -> bool {
        match self.tx.try_send(text.into()) {
            Ok(()) => true,
            Err(TrySendError::Full(text)) => {
                debug!(%text, "mailbox full, dropping");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Single-slot mailbox between the listener and the game loop.
#[derive(Debug)]
pub struct Mailbox {
    tx: SyncSender<String>,
    rx: Receiver<String>,
}

impl Mailbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::sync_channel(1);
        Self { tx, rx }
    }

    pub fn poster(&self) -> Poster {
        Poster {
            tx: self.tx.clone(),
        }
    }

    pub fn post(&self, text: impl Into<String>) -> bool {
        self.poster().post(text)
    }

    /// Non-blocking read-and-clear.
    pub fn take(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(text) => Some(text),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_take() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn second_post_is_dropped() {
        let mailbox = Mailbox::new();
        assert!(mailbox.post("up"));
        assert!(!mailbox.post("down"));
        assert_eq!(mailbox.take().as_deref(), Some("up"));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn slot_reopens_after_take() {
        let mailbox = Mailbox::new();
        mailbox.post("left");
        mailbox.take();
        assert!(mailbox.post("right"));
        assert_eq!(mailbox.take().as_deref(), Some("right"));
    }

    #[test]
    fn posters_share_one_slot() {
        let mailbox = Mailbox::new();
        let a = mailbox.poster();
        let b = a.clone();
        let handle = thread::spawn(move || a.post("from thread"));
        assert!(handle.join().unwrap());
        assert!(!b.post("from keyboard"));
        assert_eq!(mailbox.take().as_deref(), Some("from thread"));
    }
}
