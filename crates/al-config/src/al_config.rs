use std::sync::{Arc, RwLock};

use al_core::MacAddr;

/// Operating band a radio (and a registrar BSS entry) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    TwoPointFourGhz,
    FiveGhz,
    SixtyGhz,
}

/// WSC authentication-type flags this implementation hands out (§4.5: Open|WPA2PSK).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Open,
    Wpa2Psk,
}

/// WSC encryption-type flags (§4.5: None|AES).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncrMode {
    None,
    Aes,
}

/// Multi-AP role tags carried on a BSS (top-level spec §3, "BSS info").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MultiApRoles {
    pub fronthaul: bool,
    pub backhaul_bss: bool,
    pub backhaul_sta: bool,
    pub backhaul_only: bool,
}

/// One entry of the registrar configuration set (top-level spec §3:
/// "Registrar configuration"). Presence of an entry for a band makes this
/// node the registrar for that band.
#[derive(Debug, Clone)]
pub struct RegistrarBssConfig {
    pub band: Band,
    pub ssid: String,
    pub auth_mode: AuthMode,
    pub encr_mode: EncrMode,
    pub network_key: String,
    pub multi_ap: MultiApRoles,
}

/// Push-button and enrollee-backoff timing knobs (top-level spec §4.4, §5).
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// How long a pressed button stays "pending" waiting for a peer press.
    pub push_button_window_ms: u64,
    /// Cap of the enrollee's exponential retry backoff.
    pub enrollee_backoff_cap_ms: u64,
    /// Retry cap for an outbound CMDU expecting a response (§5 default: 3).
    pub retry_cap: u8,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            push_button_window_ms: 120_000,
            enrollee_backoff_cap_ms: 30_000,
            retry_cap: 3,
        }
    }
}

/// Duplicate-suppression window sizing (top-level spec §4.3; size left
/// unspecified there beyond "bounded LRU" — resolved in SPEC_FULL.md §C).
#[derive(Debug, Clone, Copy)]
pub struct DuplicateWindowConfig {
    pub max_entries: usize,
    pub window_secs: u64,
}

impl Default for DuplicateWindowConfig {
    fn default() -> Self {
        Self { max_entries: 256, window_secs: 5 }
    }
}

/// The daemon's fully-resolved configuration: CLI-required fields plus an
/// optional TOML file's registrar/timing knobs (SPEC_FULL.md §B.4).
#[derive(Debug, Clone)]
pub struct AlConfig {
    /// `-m`: this node's AL MAC address. Required, no TOML equivalent.
    pub al_mac: MacAddr,
    /// `-i`: managed interface names. Required, no TOML equivalent.
    pub interfaces: Vec<String>,
    /// `-w`: map the whole network at startup.
    pub map_whole_network: bool,
    /// `-r`: the interface this node acts as registrar on, if any.
    pub registrar_interface: Option<String>,
    /// `-v` (repeatable).
    pub verbosity: u8,
    /// `-p`, default 8888.
    pub alme_port: u16,
    /// Optional verbose log file path.
    pub logfile: Option<String>,

    pub registrar_bsses: Vec<RegistrarBssConfig>,
    pub timings: Timings,
    pub duplicate_window: DuplicateWindowConfig,
    /// Topology discovery period (top-level spec §4.4: "every ~60 s").
    pub discovery_period_secs: u64,
    /// Device timeout (top-level spec §4.6: "default ≈ 3x discovery period").
    pub device_timeout_secs: u64,
}

impl AlConfig {
    pub fn new(al_mac: MacAddr, interfaces: Vec<String>) -> Self {
        Self {
            al_mac,
            interfaces,
            map_whole_network: false,
            registrar_interface: None,
            verbosity: 0,
            alme_port: 8888,
            logfile: None,
            registrar_bsses: Vec::new(),
            timings: Timings::default(),
            duplicate_window: DuplicateWindowConfig::default(),
            discovery_period_secs: 60,
            device_timeout_secs: 180,
        }
    }

    /// Validate cross-field invariants not expressible in the type alone.
    pub fn validate(&self) -> Result<(), String> {
        if self.interfaces.is_empty() {
            return Err("at least one managed interface is required".into());
        }
        let mut seen_bands = std::collections::HashSet::new();
        for entry in &self.registrar_bsses {
            if !seen_bands.insert(entry.band) {
                return Err(format!(
                    "registrar configuration set has more than one entry for band {:?}",
                    entry.band
                ));
            }
        }
        Ok(())
    }
}

/// Mutable, process-wide runtime state. Currently empty: the registrar set
/// and interface list are fixed at startup (top-level spec §3's "Registrar
/// configuration... immutable thereafter"). Kept as an `RwLock` rather than
/// folded away, for parity with the reference pattern and so a future
/// ALME-driven reconfiguration primitive has somewhere to land.
#[derive(Debug, Clone, Default)]
pub struct AlRuntimeState {
    _reserved: (),
}

/// Immutable config + mutable runtime state, cheaply cloneable and shared
/// across the AL thread and its adapters.
#[derive(Clone)]
pub struct SharedConfig {
    cfg: Arc<AlConfig>,
    state: Arc<RwLock<AlRuntimeState>>,
}

impl SharedConfig {
    pub fn from_config(cfg: AlConfig) -> Result<Self, String> {
        cfg.validate()?;
        Ok(Self {
            cfg: Arc::new(cfg),
            state: Arc::new(RwLock::new(AlRuntimeState::default())),
        })
    }

    pub fn config(&self) -> Arc<AlConfig> {
        Arc::clone(&self.cfg)
    }

    pub fn state_read(&self) -> std::sync::RwLockReadGuard<'_, AlRuntimeState> {
        self.state.read().expect("AlRuntimeState RwLock poisoned")
    }

    pub fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, AlRuntimeState> {
        self.state.write().expect("AlRuntimeState RwLock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_registrar_band() {
        let mut cfg = AlConfig::new(MacAddr::ZERO, vec!["eth0".into()]);
        let entry = RegistrarBssConfig {
            band: Band::FiveGhz,
            ssid: "net".into(),
            auth_mode: AuthMode::Wpa2Psk,
            encr_mode: EncrMode::Aes,
            network_key: "supersecret".into(),
            multi_ap: MultiApRoles::default(),
        };
        cfg.registrar_bsses.push(entry.clone());
        cfg.registrar_bsses.push(entry);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_interface_list() {
        let cfg = AlConfig::new(MacAddr::ZERO, vec![]);
        assert!(cfg.validate().is_err());
    }
}
