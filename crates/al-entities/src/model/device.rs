use std::collections::HashMap;
use std::time::Instant;

use al_core::MacAddr;

use super::interface::Interface;
use super::radio::Radio;

/// One AL device (top-level spec §3). `local_device` is the singleton
/// created at startup and never destroyed; remote devices are inserted on
/// first sighting and evicted after `device_timeout_secs` of silence.
#[derive(Debug, Clone)]
pub struct AlDevice {
    pub al_mac: MacAddr,
    pub interfaces: HashMap<MacAddr, Interface>,
    pub radios: HashMap<MacAddr, Radio>,
    pub friendly_name: String,
    pub manufacturer_name: String,
    pub model_name: String,
    pub profile_version: u8,
    pub control_url: Option<String>,
    /// `None` for the local device; set on every parsed topology response
    /// for remote devices and used to drive timeout eviction.
    pub last_seen: Option<Instant>,
}

impl AlDevice {
    pub fn local(al_mac: MacAddr) -> Self {
        Self {
            al_mac,
            interfaces: HashMap::new(),
            radios: HashMap::new(),
            friendly_name: String::new(),
            manufacturer_name: String::new(),
            model_name: String::new(),
            profile_version: 0,
            control_url: None,
            last_seen: None,
        }
    }

    pub fn remote(al_mac: MacAddr, seen_at: Instant) -> Self {
        Self { last_seen: Some(seen_at), ..Self::local(al_mac) }
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_seen = Some(now);
    }

    pub fn is_stale(&self, now: Instant, timeout: std::time::Duration) -> bool {
        match self.last_seen {
            Some(seen) => now.duration_since(seen) > timeout,
            None => false,
        }
    }

    /// Removes `interface_mac` (and, if it owned one, the matching radio)
    /// from this device. Returns the neighbor list the interface carried
    /// so the caller (`Network`) can garbage-collect the symmetric side.
    pub fn remove_interface(&mut self, interface_mac: MacAddr) -> Vec<MacAddr> {
        let Some(iface) = self.interfaces.remove(&interface_mac) else {
            return Vec::new();
        };
        if let Some(wifi) = &iface.wifi {
            self.radios.remove(&wifi.radio);
        }
        iface.neighbors
    }
}
