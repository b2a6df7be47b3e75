//! The `InterfaceBackend` trait (top-level spec §6, §9): the one seam
//! between the AL core and the host OS/radio driver. Generalizes the
//! reference stack's SDR `soapysdr` hardware trait to the narrower
//! 1905/Wi-Fi surface this rewrite needs: interface enumeration, raw
//! frame I/O, 802.11 AP configuration, and the crypto primitives the WSC
//! exchange needs from a hardware RNG.

use al_core::{AlError, MacAddr};

pub mod simulated;

#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    pub name: String,
    pub mac: MacAddr,
    pub is_wifi: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkMetricSample {
    pub packet_errors: u32,
    pub transmitted_packets: u32,
    pub received_packets: u32,
    pub mac_throughput_capacity_mbps: u16,
    pub link_availability_pct: u16,
    pub phy_rate_mbps: u16,
    pub rssi_dbm: i8,
}

/// AP configuration applied once an M2 exchange completes
/// (top-level spec §4.5, step 6: "create/update AP BSS").
#[derive(Debug, Clone)]
pub struct Apply80211ApConfig {
    pub interface: String,
    pub bss: crate::model::BssInfo,
}

/// The platform surface table (top-level spec §6). Every method that can
/// fail against the host OS returns `AlError::PlatformError`; everything
/// else (crypto, clock) is infallible by construction since it never
/// leaves process memory.
pub trait InterfaceBackend: Send {
    fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>, AlError>;
    fn interface_info(&self, name: &str) -> Result<InterfaceInfo, AlError>;
    fn link_metrics(&self, local: MacAddr, neighbor: MacAddr) -> Result<LinkMetricSample, AlError>;
    fn send_frame(&self, interface: &str, dest: MacAddr, ethertype: u16, payload: &[u8]) -> Result<(), AlError>;
    fn start_push_button_config(&self, interface: &str) -> Result<(), AlError>;
    fn apply_80211_ap_config(&self, config: &Apply80211ApConfig) -> Result<(), AlError>;

    fn secure_random(&self, len: usize) -> Vec<u8>;
    fn sha256(&self, data: &[u8]) -> [u8; 32];
    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> [u8; 32];

    fn monotonic_now(&self) -> std::time::Instant;
}
