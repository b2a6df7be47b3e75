//! The single AL thread (top-level spec §5): one `Context` owning all
//! mutable state, one blocking `read_next_event` loop over one channel.
//! One mutable owner, one queue, state mutated only through dispatch —
//! CMDU/ALME handlers in place of protocol entities, a timer registry
//! below in place of a periodic tick.

pub mod timers;

use std::sync::Arc;

use al_config::SharedConfig;
use al_messages::AlEvent;
use al_pdus::cmdu::{CmduFingerprint, DuplicateWindow, MidAllocator, ReassemblyTable};
use crossbeam_channel::Receiver;

use crate::model::Network;
use crate::platform::InterfaceBackend;

pub use timers::TimerRegistry;

/// Everything a handler needs, in one place, so nothing is reached through
/// a process-wide global (top-level spec §9).
pub struct Context {
    pub network: Network,
    pub config: SharedConfig,
    pub backend: Arc<dyn InterfaceBackend>,
    pub dedup: DuplicateWindow,
    pub reassembly: ReassemblyTable,
    pub mid_allocator: MidAllocator,
    pub timers: TimerRegistry,
}

impl Context {
    pub fn new(network: Network, config: SharedConfig, backend: Arc<dyn InterfaceBackend>, mid_seed: u16) -> Self {
        let dedup = DuplicateWindow::new(
            config.config().duplicate_window.max_entries,
            std::time::Duration::from_secs(config.config().duplicate_window.window_secs),
        );
        let reassembly = ReassemblyTable::new(std::time::Duration::from_secs(30));
        Self {
            network,
            config,
            backend,
            dedup,
            reassembly,
            mid_allocator: MidAllocator::seeded(mid_seed),
            timers: TimerRegistry::new(),
        }
    }

    /// Suppresses an already-seen CMDU fingerprint (top-level spec §4.3).
    /// Returns `true` if the caller must drop the CMDU without invoking a
    /// handler.
    pub fn is_duplicate(&mut self, fp: CmduFingerprint) -> bool {
        let now = self.backend.monotonic_now();
        self.dedup.insert_and_check(fp, now)
    }
}

/// Runs the event loop for exactly `max_events` iterations (or forever
/// when `None`), dispatching each `AlEvent` to `on_event`. Kept generic
/// over the handler closure so `bins/al-entityd` and tests share one loop
/// shape (top-level spec §5: "blocking read_next_event() loop").
pub fn run_event_loop<F: FnMut(&mut Context, AlEvent)>(
    ctx: &mut Context,
    events: &Receiver<AlEvent>,
    max_events: Option<usize>,
    mut on_event: F,
) {
    let mut handled = 0usize;
    loop {
        let Ok(event) = events.recv() else { break };
        on_event(ctx, event);
        handled += 1;
        if let Some(max) = max_events {
            if handled >= max {
                break;
            }
        }
    }
}
