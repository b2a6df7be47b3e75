//! Core utilities for the 1905.1/1a Abstraction Layer with Multi-AP extensions.
//!
//! This crate provides the byte-codec primitives, MAC address type, closed
//! error taxonomy and logging setup shared by every other crate in the
//! workspace.

/// Git version string, set at compile time.
pub const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");
/// Stack version followed by git version string, e.g., "0.1.0-aabbccdd".
pub const STACK_VERSION: &str = const_format::formatcp!("{}-{}", env!("CARGO_PKG_VERSION"), GIT_VERSION);

pub mod bytecursor;
pub mod debug;
pub mod error;
pub mod mac;
pub mod module_id;

pub use bytecursor::{ByteReader, ByteWriter};
pub use error::{AlError, PduParseErr};
pub use mac::MacAddr;
pub use module_id::ModuleId;

/// EtherType used to carry CMDUs directly over Ethernet (top-level spec §4.3, §6).
pub const ETHERTYPE_1905: u16 = 0x893a;
/// EtherType used for LLDP neighbor-discovery frames (top-level spec §6).
pub const ETHERTYPE_LLDP: u16 = 0x88cc;

/// Monotonic, process-wide u16 message id. The dispatcher seeds the
/// allocator from a cryptographically random value at startup (§4.3) to
/// avoid replay ambiguity across restarts.
pub type MessageId = u16;

/// Numeric timer token handed out by the timer registry (§5). At most
/// `MAX_TIMER_TOKEN` tokens may be outstanding at once.
pub type TimerToken = u32;

/// Upper bound on concurrently outstanding timer tokens (top-level spec §5).
pub const MAX_TIMER_TOKEN: usize = 1000;
