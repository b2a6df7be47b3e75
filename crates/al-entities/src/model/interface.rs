use al_config::{AuthMode, EncrMode};
use al_core::MacAddr;

/// Interface power state (top-level spec §3; wire values shared with
/// `al_pdus::alme::vendor::PowerState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    PowerSave,
    Off,
}

/// The 1905 media-type family an interface belongs to (top-level spec §3).
/// `Wifi(_)` interfaces additionally carry a `WifiInterface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Ethernet,
    Wifi,
    Moca,
    PowerLine,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpOrigin {
    Unknown,
    Dhcp,
    Static,
    AutoIp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv6Origin {
    Unknown,
    Dhcp,
    Static,
    Slaac,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAssignment {
    pub address: Vec<u8>,
    pub origin_v4: Option<IpOrigin>,
    pub origin_v6: Option<Ipv6Origin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiRole {
    Ap,
    NonApSta,
    P2pClient,
    P2pGo,
    AdPcp,
}

/// Wi-Fi specialization of `Interface` (top-level spec §3). `radio` is a
/// non-owning pointer (by UID) into the owning `AlDevice::radios` map.
#[derive(Debug, Clone)]
pub struct WifiInterface {
    pub bssid: MacAddr,
    pub ssid: String,
    pub role: WifiRole,
    pub channel: u8,
    pub band: al_config::Band,
    pub auth_mode: AuthMode,
    pub encr_mode: EncrMode,
    pub network_key: String,
    pub radio: MacAddr,
}

/// A 1905 interface owned by an `AlDevice` (top-level spec §3). Deleting
/// the owning device cascades to drop this, and any symmetric neighbor
/// relations referencing it are garbage-collected by `Network`.
#[derive(Debug, Clone)]
pub struct Interface {
    pub mac: MacAddr,
    pub kind: InterfaceKind,
    pub power_state: PowerState,
    pub bridging_flag: bool,
    pub neighbors: Vec<MacAddr>,
    pub ipv4: Vec<IpAssignment>,
    pub ipv6: Vec<IpAssignment>,
    pub vendor_blobs: Vec<([u8; 3], Vec<u8>)>,
    pub wifi: Option<WifiInterface>,
}

impl Interface {
    pub fn new(mac: MacAddr, kind: InterfaceKind) -> Self {
        Self {
            mac,
            kind,
            power_state: PowerState::On,
            bridging_flag: false,
            neighbors: Vec::new(),
            ipv4: Vec::new(),
            ipv6: Vec::new(),
            vendor_blobs: Vec::new(),
            wifi: None,
        }
    }

    pub fn add_neighbor(&mut self, neighbor: MacAddr) {
        if !self.neighbors.contains(&neighbor) {
            self.neighbors.push(neighbor);
        }
    }

    pub fn remove_neighbor(&mut self, neighbor: MacAddr) {
        self.neighbors.retain(|n| *n != neighbor);
    }
}
