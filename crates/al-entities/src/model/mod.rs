//! In-memory data model (top-level spec §3). Generalizes the reference
//! TETRA stack's per-entity owned-state pattern (one struct per SAP-facing
//! component, mutated only by its own entity) to a single `Network`
//! aggregate owned by the AL event loop: there is exactly one mutable
//! owner, so the "explicit Context instead of globals" design note falls
//! out naturally rather than needing enforcement.

pub mod bss;
pub mod device;
pub mod interface;
pub mod network;
pub mod radio;
pub mod registrar;

pub use bss::BssInfo;
pub use device::AlDevice;
pub use interface::{
    Interface, InterfaceKind, IpAssignment, IpOrigin, Ipv6Origin, PowerState, WifiInterface,
    WifiRole,
};
pub use network::Network;
pub use radio::{EnrolleeState, Radio, RadioWscState};
pub use registrar::RegistrarConfig;
