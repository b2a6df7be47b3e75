//! Protocol codec crate: TLV codec, CMDU framing, WSC attribute codec, and
//! the ALME wire format (top-level spec §4.2, §4.3, §4.5, §6).
//!
//! Nothing in this crate touches cryptographic primitives or mutable
//! network state — it only converts between wire bytes and strongly typed
//! Rust values. The WSC M1/M2 key-derivation core and the data model that
//! consumes these types live in `al-entities`.

pub mod alme;
pub mod cmdu;
pub mod tlv;
pub mod wsc;
