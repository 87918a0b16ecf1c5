//! Switch-request correlation.
//!
//! Every switch request carries a monotonically increasing token so that
//! the eventual asynchronous confirmation can be matched back against the
//! request that caused it. Only a single request may be pending at a time;
//! issuing a new one implicitly invalidates the previous token, and any
//! confirmation whose token does not equal the pending one is discarded.

use tracing::debug;

use crate::profile::{SubId, SwitchRequest};

/// First token handed out by a freshly constructed coordinator.
pub const START_TOKEN: u32 = 1;

/// Tracks the token counter and the single pending switch request.
///
/// The coordinator only manages correlation state; the actual switch call
/// to the subscription registry is made by the caller after releasing the
/// session lock.
#[derive(Debug)]
pub struct SwitchCoordinator {
    next_token: u32,
    pending: Option<SwitchRequest>,
}

impl SwitchCoordinator {
    pub fn new(start_token: u32) -> Self {
        SwitchCoordinator {
            next_token: start_token.max(START_TOKEN),
            pending: None,
        }
    }

    /// Mints the next token and records it as the only valid pending
    /// request, superseding any previous one.
    pub fn request_switch(&mut self, target: SubId) -> u32 {
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(SwitchRequest { token, target });
        token
    }

    /// Handles an asynchronous confirmation. Returns `true` when the token
    /// matches the pending request, which is then retired; stale or
    /// duplicate confirmations are logged and discarded.
    pub fn confirm(&mut self, token: u32, sub_id: SubId) -> bool {
        match self.pending {
            Some(request) if request.token == token => {
                self.pending = None;
                true
            }
            _ => {
                debug!(token, sub_id, "discarding stale switch confirmation");
                false
            }
        }
    }

    pub fn pending(&self) -> Option<SwitchRequest> {
        self.pending
    }
}

impl Default for SwitchCoordinator {
    fn default() -> Self {
        Self::new(START_TOKEN)
    }
}
