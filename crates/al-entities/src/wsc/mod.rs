//! WSC cryptographic core (top-level spec §4.5): Diffie-Hellman over the
//! fixed MODP group, the WSC key schedule, AES-128-CBC transport, and the
//! enrollee-side M1/M2 exchange built on top of `al_pdus::wsc`'s codec.
//! This is the only module in the workspace that links the `sha2`/`hmac`/
//! `aes`/`cbc`/`num-bigint` crates.

pub mod crypto;
pub mod dh;
pub mod enrollee;
pub mod kdf;
pub mod registrar;

pub use enrollee::{build_m1, validate_and_apply_m2, M2Decision, WscIdentity};
pub use registrar::{build_m2, build_teardown_m2};
