//! Timer registry bounded by `al_core::MAX_TIMER_TOKEN` (top-level spec
//! §5). Every outbound CMDU expecting a response allocates a token here;
//! a `Timeout` event carrying that token drives the retry/backoff policy
//! in the owning handler.

use std::collections::HashMap;

use al_core::{MacAddr, MessageId, TimerToken, MAX_TIMER_TOKEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    /// Waiting on a response CMDU carrying this message id.
    CmduResponse { message_id: MessageId },
    /// An enrollee radio's AwaitingM2 timeout.
    WscAwaitM2,
    /// A jittered TopologyQuery owed to `target` after a TopologyNotification
    /// (top-level spec §4.4).
    DeferredTopologyQuery { target: MacAddr },
}

#[derive(Debug, Clone, Copy)]
pub struct PendingTimer {
    pub kind: PendingKind,
    pub attempt: u8,
}

/// Allocates and tracks timer tokens. `al_messages::TimerRequest` carries
/// the token back out to the adapter thread that actually schedules the
/// wakeup; this registry only remembers what each token means.
pub struct TimerRegistry {
    next_token: TimerToken,
    pending: HashMap<TimerToken, PendingTimer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self { next_token: 0, pending: HashMap::new() }
    }

    /// Allocates a fresh token, wrapping modulo `MAX_TIMER_TOKEN`. Returns
    /// `None` if every token is currently in use (top-level spec §7:
    /// `ResourceExhausted`).
    pub fn allocate(&mut self, kind: PendingKind) -> Option<TimerToken> {
        if self.pending.len() >= MAX_TIMER_TOKEN {
            return None;
        }
        let start = self.next_token;
        loop {
            let token = self.next_token;
            self.next_token = (self.next_token + 1) % MAX_TIMER_TOKEN as u32;
            if !self.pending.contains_key(&token) {
                self.pending.insert(token, PendingTimer { kind, attempt: 0 });
                return Some(token);
            }
            if self.next_token == start {
                return None;
            }
        }
    }

    pub fn fire(&mut self, token: TimerToken) -> Option<PendingTimer> {
        self.pending.remove(&token)
    }

    pub fn bump_attempt(&mut self, token: TimerToken) -> Option<u8> {
        self.pending.get_mut(&token).map(|t| {
            t.attempt += 1;
            t.attempt
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_fire_round_trips() {
        let mut reg = TimerRegistry::new();
        let token = reg.allocate(PendingKind::CmduResponse { message_id: 7 }).unwrap();
        assert_eq!(reg.len(), 1);
        let fired = reg.fire(token).unwrap();
        assert_eq!(fired.kind, PendingKind::CmduResponse { message_id: 7 });
        assert!(reg.is_empty());
    }

    #[test]
    fn bump_attempt_increments() {
        let mut reg = TimerRegistry::new();
        let token = reg.allocate(PendingKind::WscAwaitM2).unwrap();
        assert_eq!(reg.bump_attempt(token), Some(1));
        assert_eq!(reg.bump_attempt(token), Some(2));
    }
}
