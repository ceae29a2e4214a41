//! Bounded conversation memory.
//!
//! An ordered message log capped at `max_size` entries. Inserts past the cap
//! evict from the head, oldest first; entries are never reordered.

use toolweave_core::types::Message;
use tracing::trace;

/// Default capacity when none is configured.
pub const DEFAULT_MEMORY_CAPACITY: usize = 20;

#[derive(Clone, Debug)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    max_size: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl ConversationMemory {
    /// Create an empty memory. `max_size` is clamped to at least 1.
    pub fn new(max_size: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.evict();
    }

    /// Append a batch in order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
        self.evict();
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn evict(&mut self) {
        if self.messages.len() > self.max_size {
            let overflow = self.messages.len() - self.max_size;
            self.messages.drain(..overflow);
            trace!(evicted = overflow, "memory evicted oldest messages");
        }
    }
}
