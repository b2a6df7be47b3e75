//! Per-CMDU-type / per-ALME-primitive handlers (top-level spec §4.4, §6).
//! Each submodule owns one CMDU type family or the ALME-SAP request
//! dispatcher; none of them own a socket or a thread, they only turn a
//! parsed message plus a `Context` into bytes to send or state to mutate.

pub mod alme;
pub mod autoconfig;
pub mod higher_layer;
pub mod link_metric;
pub mod push_button;
pub mod router;
pub mod topology;
pub mod vendor;

pub use router::{route_cmdu, RouteInput};
