//! Correlation table for in-flight uploads.

use std::collections::HashMap;

use futures::channel::oneshot;

/// In-flight upload requests keyed by correlation id.
///
/// Each entry is a single-use completion. Completing or cancelling removes
/// it, so an id can never be resolved twice. Dropping the table drops every
/// sender and the corresponding waiters observe cancellation.
#[derive(Debug, Default)]
pub struct PendingUploads {
    next_id: u64,
    waiters: HashMap<String, oneshot::Sender<Option<String>>>,
}

impl PendingUploads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id and register a waiter for it.
    pub fn register(&mut self) -> (String, oneshot::Receiver<Option<String>>) {
        self.next_id += 1;
        let id = format!("upload-{}", self.next_id);
        let (tx, rx) = oneshot::channel();
        self.waiters.insert(id.clone(), tx);
        (id, rx)
    }

    /// Complete the waiter for `id`. Returns `false` for unknown ids.
    pub fn complete(&mut self, id: &str, filename: Option<String>) -> bool {
        match self.waiters.remove(id) {
            // The waiter may have been abandoned; the entry is gone either way.
            Some(tx) => {
                let _ = tx.send(filename);
                true
            }
            None => false,
        }
    }

    /// Drop the waiter for `id` without a result.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.waiters.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.waiters.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}
