//! A loopback `InterfaceBackend` used by tests and by `tlv-tool`/
//! `alme-client`-style offline tooling: no real sockets or radios, just
//! enough behavior to drive the dispatcher end to end.

use std::collections::HashMap;
use std::sync::Mutex;

use al_core::{AlError, MacAddr};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::{Apply80211ApConfig, InterfaceBackend, InterfaceInfo, LinkMetricSample};

pub struct SimulatedBackend {
    interfaces: Vec<InterfaceInfo>,
    sent_frames: Mutex<Vec<(String, MacAddr, u16, Vec<u8>)>>,
    applied_ap_configs: Mutex<Vec<Apply80211ApConfig>>,
    metrics: HashMap<(MacAddr, MacAddr), LinkMetricSample>,
}

impl SimulatedBackend {
    pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
        Self {
            interfaces,
            sent_frames: Mutex::new(Vec::new()),
            applied_ap_configs: Mutex::new(Vec::new()),
            metrics: HashMap::new(),
        }
    }

    pub fn sent_frames(&self) -> Vec<(String, MacAddr, u16, Vec<u8>)> {
        self.sent_frames.lock().expect("sent_frames mutex is never poisoned").clone()
    }

    pub fn applied_ap_configs(&self) -> Vec<Apply80211ApConfig> {
        self.applied_ap_configs.lock().expect("applied_ap_configs mutex is never poisoned").clone()
    }

    pub fn with_metric(mut self, local: MacAddr, neighbor: MacAddr, sample: LinkMetricSample) -> Self {
        self.metrics.insert((local, neighbor), sample);
        self
    }
}

impl InterfaceBackend for SimulatedBackend {
    fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>, AlError> {
        Ok(self.interfaces.clone())
    }

    fn interface_info(&self, name: &str) -> Result<InterfaceInfo, AlError> {
        self.interfaces
            .iter()
            .find(|i| i.name == name)
            .cloned()
            .ok_or_else(|| AlError::PlatformError(format!("no such interface: {name}")))
    }

    fn link_metrics(&self, local: MacAddr, neighbor: MacAddr) -> Result<LinkMetricSample, AlError> {
        Ok(self.metrics.get(&(local, neighbor)).copied().unwrap_or_default())
    }

    fn send_frame(&self, interface: &str, dest: MacAddr, ethertype: u16, payload: &[u8]) -> Result<(), AlError> {
        self.sent_frames.lock().expect("sent_frames mutex is never poisoned").push((
            interface.to_string(),
            dest,
            ethertype,
            payload.to_vec(),
        ));
        Ok(())
    }

    fn start_push_button_config(&self, _interface: &str) -> Result<(), AlError> {
        Ok(())
    }

    fn apply_80211_ap_config(&self, config: &Apply80211ApConfig) -> Result<(), AlError> {
        self.applied_ap_configs
            .lock()
            .expect("applied_ap_configs mutex is never poisoned")
            .push(config.clone());
        Ok(())
    }

    fn secure_random(&self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        rand::rng().fill_bytes(&mut buf);
        buf
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> [u8; 32] {
        let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    fn monotonic_now(&self) -> std::time::Instant {
        std::time::Instant::now()
    }
}
