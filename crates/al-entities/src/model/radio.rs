use std::collections::HashMap;

use al_config::Band;
use al_core::MacAddr;

/// Enrollee-side WSC state machine (top-level spec §4.5).
///
/// A timeout at any non-`Idle` stage returns to `Idle` after the radio's
/// backoff has been bumped; `Configured` is terminal until a teardown
/// M2 or an administrative renew CMDU resets the radio back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrolleeState {
    Idle,
    Searching,
    AwaitingM2,
    Configured,
}

/// In-flight WSC enrollee state for one radio (top-level spec §9: keyed by
/// radio UID, not a "last built M1" global). `dh_private_key`/`public_key`
/// and `m1` must be regenerated for every fresh M1, so they live here and
/// not on the message itself.
#[derive(Debug, Clone)]
pub struct RadioWscState {
    pub state: EnrolleeState,
    pub dh_private_key: Vec<u8>,
    pub dh_public_key: Vec<u8>,
    pub enrollee_nonce: [u8; 16],
    pub m1_bytes: Vec<u8>,
    pub retries: u8,
    pub backoff_ms: u64,
}

impl RadioWscState {
    pub fn idle() -> Self {
        Self {
            state: EnrolleeState::Idle,
            dh_private_key: Vec::new(),
            dh_public_key: Vec::new(),
            enrollee_nonce: [0; 16],
            m1_bytes: Vec::new(),
            retries: 0,
            backoff_ms: 0,
        }
    }
}

/// One radio owned by a device (top-level spec §3). `bsses` is the set of
/// BSSIDs this radio currently operates; the owning `WifiInterface`s carry
/// the full `BssInfo`, this is only the index.
#[derive(Debug, Clone)]
pub struct Radio {
    pub uid: MacAddr,
    pub supported_bands: Vec<Band>,
    pub channels: HashMap<Band, Vec<u8>>,
    pub bsses: Vec<MacAddr>,
    pub wsc: Option<RadioWscState>,
}

impl Radio {
    pub fn new(uid: MacAddr, supported_bands: Vec<Band>) -> Self {
        Self { uid, supported_bands, channels: HashMap::new(), bsses: Vec::new(), wsc: None }
    }

    pub fn supports(&self, band: Band) -> bool {
        self.supported_bands.contains(&band)
    }
}
