//! Coalescing write-behind buffer.
//!
//! Only the latest staged payload is kept: staging again before a flush
//! replaces the older snapshot, since each payload is a whole-state image.

#[derive(Debug, Default)]
pub struct WriteBehind {
    pending: Option<String>,
    coalesced: u64,
}

impl WriteBehind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `payload`, replacing any snapshot not yet flushed.
    pub fn stage(&mut self, payload: String) {
        if self.pending.replace(payload).is_some() {
            self.coalesced += 1;
        }
    }

    /// Takes the pending snapshot for writing.
    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }

    /// Puts back a snapshot whose write failed, unless a newer one was staged
    /// in the meantime.
    pub fn restore(&mut self, payload: String) {
        if self.pending.is_none() {
            self.pending = Some(payload);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of snapshots superseded before reaching storage.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
