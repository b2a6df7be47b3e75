//! The event envelope crossing the AL thread's single event queue.
//!
//! Plays the role the reference workspace's SAP-message crate plays: a
//! small, dependency-light set of plain enums that flow between adapters
//! (packet receivers, the timer source, the ALME TCP server, push-button
//! and topology-change sources) and the single-consumer dispatcher
//! (top-level spec §5). Unlike the reference workspace's per-SAP message
//! types, routing here is content-addressed — the dispatcher inspects a
//! parsed CMDU's message type to decide which handler module owns it —
//! so there is no explicit `src`/`dest` entity pair on every envelope.

use al_core::{MacAddr, TimerToken};
use uuid::Uuid;

/// One event pulled off the dispatcher's queue.
#[derive(Debug)]
pub enum AlEvent {
    /// A raw Ethernet frame filtered to EtherType 0x893a, 0x88cc, or the
    /// 1905/LLDP multicast groups plus unicast to a managed interface or
    /// the AL MAC (top-level spec §5).
    NewPacket { interface: MacAddr, payload: Vec<u8> },
    /// A one-shot timer registered by a handler has expired.
    Timeout { token: TimerToken },
    /// A recurring timer has fired again (e.g. the topology-discovery period).
    PeriodicTimeout { token: TimerToken },
    /// The push-button source observed a physical/simulated button press
    /// on the given interface.
    PushButton { interface: MacAddr },
    /// A complete ALME request was read off a TCP connection.
    AlmeRequest { client_id: Uuid, payload: Vec<u8> },
    /// The topology-change source observed a local change worth announcing
    /// (see SPEC_FULL.md §E.2 for exactly which local events raise this).
    TopologyChangeNotification,
}

impl AlEvent {
    /// Short, stable name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            AlEvent::NewPacket { .. } => "NewPacket",
            AlEvent::Timeout { .. } => "Timeout",
            AlEvent::PeriodicTimeout { .. } => "PeriodicTimeout",
            AlEvent::PushButton { .. } => "PushButton",
            AlEvent::AlmeRequest { .. } => "AlmeRequest",
            AlEvent::TopologyChangeNotification => "TopologyChangeNotification",
        }
    }
}

/// A timer request submitted by a handler when it sends a CMDU that
/// expects a response (top-level spec §5: "Cancellation/timeouts").
#[derive(Debug, Clone, Copy)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay_ms: u64,
    pub periodic: bool,
}
