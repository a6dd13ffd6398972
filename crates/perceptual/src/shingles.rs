//! Step-1 sliding-window shingling over a token stream.
//!
//! [`ShingleWindow`] is a fixed-capacity ring of the most recent tokens. Once
//! it has seen `capacity` tokens, every further push emits the concatenation
//! of the window in chronological order, so `n` tokens yield
//! `max(0, n - capacity + 1)` shingles.

use crate::config::PerceptualError;

/// Fixed-capacity ring buffer of recent tokens.
#[derive(Debug, Clone)]
pub struct ShingleWindow {
    slots: Vec<String>,
    // Next slot to overwrite, which is also the oldest token once full.
    head: usize,
    seen: usize,
    shingle: String,
}

impl ShingleWindow {
    /// Create a window holding `capacity` tokens.
    pub fn new(capacity: usize) -> Result<Self, PerceptualError> {
        if capacity == 0 {
            return Err(PerceptualError::InvalidShingleLength {
                shingle_length: capacity,
            });
        }
        Ok(Self {
            slots: vec![String::new(); capacity],
            head: 0,
            seen: 0,
            shingle: String::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of tokens pushed since creation or the last [`reset`](Self::reset).
    pub fn tokens_seen(&self) -> usize {
        self.seen
    }

    /// Push a token; returns the shingle ending at it once the window is warm.
    ///
    /// The returned slice borrows an internal buffer that is overwritten by
    /// the next push.
    pub fn push(&mut self, token: &str) -> Option<&str> {
        let capacity = self.slots.len();
        let slot = &mut self.slots[self.head];
        slot.clear();
        slot.push_str(token);
        self.head = (self.head + 1) % capacity;
        self.seen += 1;

        if self.seen < capacity {
            return None;
        }

        self.shingle.clear();
        for offset in 0..capacity {
            self.shingle
                .push_str(&self.slots[(self.head + offset) % capacity]);
        }
        Some(self.shingle.as_str())
    }

    /// Forget all buffered tokens so the window can start a new document.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.head = 0;
        self.seen = 0;
        self.shingle.clear();
    }
}

/// Collect every shingle of `tokens` for window size `k`.
///
/// Returns an empty vector when `k == 0` or there are fewer than `k` tokens.
pub fn make_shingles<S: AsRef<str>>(tokens: &[S], k: usize) -> Vec<String> {
    let Ok(mut window) = ShingleWindow::new(k) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(tokens.len().saturating_sub(k - 1));
    for token in tokens {
        if let Some(shingle) = window.push(token.as_ref()) {
            out.push(shingle.to_owned());
        }
    }
    out
}
