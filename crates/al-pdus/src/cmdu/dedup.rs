use std::collections::VecDeque;
use std::time::{Duration, Instant};

use al_core::MacAddr;

/// The tuple (source AL MAC, message id, message type) used to suppress
/// duplicate CMDU deliveries (top-level spec §3: "CMDU fingerprint").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CmduFingerprint {
    pub source_al_mac: MacAddr,
    pub message_id: u16,
    pub message_type: u16,
}

/// Bounded-LRU duplicate-suppression window (top-level spec §4.3: "Size
/// bound: bounded LRU"). Default sizing (256 entries, 5-second window) is
/// the Open Question resolution for duplicate-window sizing, following the
/// original's 5-duplicates-per-~10-seconds behavior in spirit.
pub struct DuplicateWindow {
    entries: VecDeque<(CmduFingerprint, Instant)>,
    max_entries: usize,
    window: Duration,
}

impl DuplicateWindow {
    pub fn new(max_entries: usize, window: Duration) -> Self {
        Self { entries: VecDeque::with_capacity(max_entries), max_entries, window }
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some(&(_, seen_at)) = self.entries.front() {
            if now.duration_since(seen_at) > self.window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Returns `true` if `fp` was already seen within the window (the
    /// caller must drop the CMDU without invoking a handler); otherwise
    /// records it and returns `false`.
    pub fn insert_and_check(&mut self, fp: CmduFingerprint, now: Instant) -> bool {
        self.evict_expired(now);
        if self.entries.iter().any(|(seen, _)| *seen == fp) {
            return true;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back((fp, now));
        false
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
