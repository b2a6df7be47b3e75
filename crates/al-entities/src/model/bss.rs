use al_config::{AuthMode, EncrMode, MultiApRoles};

/// A BSS's operating parameters (top-level spec §3: "BSS info — value
/// typed, embedded in Registrar config, copied into Wi-Fi interface when
/// applied"). Distinct from `RegistrarBssConfig` only in carrying the
/// concrete `bssid` a radio settled on once a WSC exchange applied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BssInfo {
    pub bssid: al_core::MacAddr,
    pub ssid: String,
    pub auth_mode: AuthMode,
    pub encr_mode: EncrMode,
    pub network_key: String,
    pub multi_ap: MultiApRoles,
}
