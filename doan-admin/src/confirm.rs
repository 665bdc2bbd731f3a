//! Delete confirmation slot

/// Holds at most one pending delete; a new request replaces the old one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation<K> {
    pending: Option<K>,
}

impl<K> Default for DeleteConfirmation<K> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<K> DeleteConfirmation<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, key: K) {
        self.pending = Some(key);
    }

    pub fn pending(&self) -> Option<&K> {
        self.pending.as_ref()
    }

    /// Take the pending key; `None` when nothing was requested
    pub fn confirm(&mut self) -> Option<K> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
