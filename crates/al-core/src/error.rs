use std::fmt;

/// Parse-time failures for TLVs, CMDUs, WSC attributes and ALME primitives.
///
/// Closed set, mirroring the reference implementation's `PduParseErr`:
/// every wire-format decoder returns one of these rather than a generic
/// string, so callers can match on failure kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PduParseErr {
    BufferEnded { field: Option<&'static str> },
    InvalidTlvType { found: u8 },
    InvalidLength { expected: usize, found: usize },
    InvalidValue { field: &'static str, value: u64 },
    InvalidElemId { found: u16 },
    TrailingBytes { count: usize },
    NotImplemented { field: Option<&'static str> },
}

impl fmt::Display for PduParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PduParseErr::BufferEnded { field } => {
                write!(f, "buffer ended while reading {}", field.unwrap_or("<unknown>"))
            }
            PduParseErr::InvalidTlvType { found } => write!(f, "unexpected TLV type 0x{found:02x}"),
            PduParseErr::InvalidLength { expected, found } => {
                write!(f, "invalid length: expected {expected}, found {found}")
            }
            PduParseErr::InvalidValue { field, value } => {
                write!(f, "invalid value {value} for field {field}")
            }
            PduParseErr::InvalidElemId { found } => write!(f, "unrecognized element id 0x{found:04x}"),
            PduParseErr::TrailingBytes { count } => write!(f, "{count} unexpected trailing bytes"),
            PduParseErr::NotImplemented { field } => {
                write!(f, "not implemented: {}", field.unwrap_or("<unknown>"))
            }
        }
    }
}

impl std::error::Error for PduParseErr {}

/// Closed error taxonomy for the AL core (top-level spec §7).
///
/// Every handler, codec entrypoint and platform call site returns one of
/// these. Propagation policy lives with the call sites (parse errors log
/// and drop the packet; WSC auth failures clear radio state and log; send
/// failures mark the interface `power_state = off`), not in this type.
#[derive(Debug)]
pub enum AlError {
    /// Parse failed: truncation, unknown length, attribute out of range.
    Malformed(PduParseErr),
    /// HMAC/authenticator mismatch in a WSC exchange.
    Unauthenticated(&'static str),
    /// Duplicate registrar, unsupported auth/encryption combination, etc.
    Policy(&'static str),
    /// An outbound request's response timer expired.
    Timeout,
    /// A bounded resource (event queue, timer table, reassembly table) is full.
    ResourceExhausted(&'static str),
    /// A platform trait call (send, crypto) failed.
    PlatformError(String),
    /// Known but inapplicable: an unknown TLV tag, an out-of-scope ALME type.
    Ignored(&'static str),
}

impl fmt::Display for AlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlError::Malformed(e) => write!(f, "malformed: {e}"),
            AlError::Unauthenticated(why) => write!(f, "unauthenticated: {why}"),
            AlError::Policy(why) => write!(f, "policy violation: {why}"),
            AlError::Timeout => write!(f, "timed out"),
            AlError::ResourceExhausted(what) => write!(f, "resource exhausted: {what}"),
            AlError::PlatformError(why) => write!(f, "platform error: {why}"),
            AlError::Ignored(why) => write!(f, "ignored: {why}"),
        }
    }
}

impl std::error::Error for AlError {}

impl From<PduParseErr> for AlError {
    fn from(e: PduParseErr) -> Self {
        AlError::Malformed(e)
    }
}

/// Checks whether a decoded tag matches the expected TLV/attribute type.
#[macro_export]
macro_rules! expect_tlv_type {
    ($value:expr, $expected:expr) => {{
        let found = $value;
        let expected = $expected;
        if found == expected {
            Ok(())
        } else {
            Err($crate::error::PduParseErr::InvalidTlvType { found: found as u8 })
        }
    }};
}
