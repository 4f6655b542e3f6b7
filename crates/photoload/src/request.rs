//! Request identity for superseded-result discard
//!
//! Every fetch carries the token that was current when it was issued.
//! Issuing a new token makes all earlier ones stale; results arriving with a
//! stale token are dropped without touching controller state.

/// Identity of one issued load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Generation number carried by this token
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Per-controller generation counter
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
    retired: bool,
}

impl RequestTracker {
    /// Create a tracker with no outstanding request
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every token issued before it
    pub fn issue(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    /// Whether `token` is the latest one and the tracker is still live
    pub fn is_current(&self, token: RequestToken) -> bool {
        !self.retired && token.0 == self.generation
    }

    /// Make every token stale permanently
    pub fn retire(&mut self) {
        self.retired = true;
        self.generation += 1;
    }

    /// Whether [`retire`](Self::retire) has been called
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}
