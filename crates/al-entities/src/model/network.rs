use std::collections::HashMap;
use std::time::{Duration, Instant};

use al_core::MacAddr;
use al_pdus::alme::forwarding::ClassificationSet;

use super::device::AlDevice;
use super::registrar::RegistrarConfig;

/// Pure bookkeeping entry for an ALME forwarding rule (SPEC_FULL.md §C:
/// no packet-forwarding plane in this rewrite, the table only answers
/// ALME-GET-FWD-RULES queries). `last_matched` always reports "no
/// information available" since nothing here actually classifies frames.
#[derive(Debug, Clone)]
pub struct ForwardingRule {
    pub rule_id: u16,
    pub classification_set: ClassificationSet,
    pub addresses: Vec<MacAddr>,
}

impl ForwardingRule {
    /// Top-level spec §6: zero means "no information available".
    pub const NO_MATCH_INFO: u16 = 0;
}

/// The whole mutable state of this node (top-level spec §9: replaces the
/// reference implementation's three process-wide singletons — local
/// device pointer, registrar config set, interface list — with one
/// aggregate an explicit `Context` hands to every handler).
pub struct Network {
    pub local_device: AlDevice,
    pub remote_devices: HashMap<MacAddr, AlDevice>,
    pub registrar: RegistrarConfig,
    pub forwarding_rules: Vec<ForwardingRule>,
    next_rule_id: u16,
}

impl Network {
    pub fn new(local_mac: MacAddr, registrar: RegistrarConfig) -> Self {
        Self {
            local_device: AlDevice::local(local_mac),
            remote_devices: HashMap::new(),
            registrar,
            forwarding_rules: Vec::new(),
            next_rule_id: 1,
        }
    }

    /// Inserts a remote device on first sighting, or refreshes its
    /// `last_seen` and hands the caller a mutable ref to overwrite its
    /// topology-response-carried fields (top-level spec §4.6).
    pub fn upsert_remote_device(&mut self, al_mac: MacAddr, now: Instant) -> &mut AlDevice {
        let entry = self
            .remote_devices
            .entry(al_mac)
            .or_insert_with(|| AlDevice::remote(al_mac, now));
        entry.touch(now);
        entry
    }

    pub fn device(&self, al_mac: MacAddr) -> Option<&AlDevice> {
        if al_mac == self.local_device.al_mac {
            Some(&self.local_device)
        } else {
            self.remote_devices.get(&al_mac)
        }
    }

    pub fn device_mut(&mut self, al_mac: MacAddr) -> Option<&mut AlDevice> {
        if al_mac == self.local_device.al_mac {
            Some(&mut self.local_device)
        } else {
            self.remote_devices.get_mut(&al_mac)
        }
    }

    pub fn all_devices(&self) -> impl Iterator<Item = &AlDevice> {
        std::iter::once(&self.local_device).chain(self.remote_devices.values())
    }

    /// Evicts remote devices silent for longer than `timeout`
    /// (top-level spec §4.6: "default ≈3x discovery period"), cascading
    /// to garbage-collect any neighbor relation pointing at them.
    pub fn evict_stale_devices(&mut self, now: Instant, timeout: Duration) {
        let stale: Vec<MacAddr> = self
            .remote_devices
            .values()
            .filter(|d| d.is_stale(now, timeout))
            .map(|d| d.al_mac)
            .collect();
        for mac in stale {
            if let Some(mut device) = self.remote_devices.remove(&mac) {
                let iface_macs: Vec<MacAddr> = device.interfaces.keys().copied().collect();
                for iface_mac in iface_macs {
                    let neighbors = device.remove_interface(iface_mac);
                    for neighbor_mac in neighbors {
                        self.remove_neighbor_half(neighbor_mac, iface_mac);
                    }
                }
            }
        }
    }

    fn find_interface_owner_mut(&mut self, iface_mac: MacAddr) -> Option<&mut AlDevice> {
        if self.local_device.interfaces.contains_key(&iface_mac) {
            return Some(&mut self.local_device);
        }
        self.remote_devices.values_mut().find(|d| d.interfaces.contains_key(&iface_mac))
    }

    fn remove_neighbor_half(&mut self, owner_iface: MacAddr, neighbor_iface: MacAddr) {
        if let Some(device) = self.find_interface_owner_mut(owner_iface) {
            if let Some(iface) = device.interfaces.get_mut(&owner_iface) {
                iface.remove_neighbor(neighbor_iface);
            }
        }
    }

    /// Symmetric neighbor insertion (top-level spec §4.6:
    /// "interfaceAddNeighbor inserts both sides").
    pub fn interface_add_neighbor(&mut self, a: MacAddr, b: MacAddr) {
        if let Some(device) = self.find_interface_owner_mut(a) {
            if let Some(iface) = device.interfaces.get_mut(&a) {
                iface.add_neighbor(b);
            }
        }
        if let Some(device) = self.find_interface_owner_mut(b) {
            if let Some(iface) = device.interfaces.get_mut(&b) {
                iface.add_neighbor(a);
            }
        }
    }

    /// Symmetric neighbor removal, garbage-collecting both halves
    /// (top-level spec §4.6: "removes both + garbage-collects dangling
    /// peer record").
    pub fn interface_remove_neighbor(&mut self, a: MacAddr, b: MacAddr) {
        self.remove_neighbor_half(a, b);
        self.remove_neighbor_half(b, a);
    }

    pub fn allocate_rule_id(&mut self) -> u16 {
        let id = self.next_rule_id;
        self.next_rule_id = self.next_rule_id.wrapping_add(1);
        id
    }

    pub fn find_rule(&self, rule_id: u16) -> Option<&ForwardingRule> {
        self.forwarding_rules.iter().find(|r| r.rule_id == rule_id)
    }

    pub fn remove_rule(&mut self, rule_id: u16) -> bool {
        let before = self.forwarding_rules.len();
        self.forwarding_rules.retain(|r| r.rule_id != rule_id);
        self.forwarding_rules.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interface, InterfaceKind};

    fn mac(b: u8) -> MacAddr {
        MacAddr::new([b; 6])
    }

    fn registrar() -> RegistrarConfig {
        RegistrarConfig::new(vec![])
    }

    #[test]
    fn remote_device_upsert_is_idempotent_on_mac() {
        let mut net = Network::new(mac(1), registrar());
        let now = Instant::now();
        net.upsert_remote_device(mac(2), now);
        net.upsert_remote_device(mac(2), now);
        assert_eq!(net.remote_devices.len(), 1);
    }

    #[test]
    fn neighbor_add_is_symmetric_and_removable() {
        let mut net = Network::new(mac(1), registrar());
        net.local_device.interfaces.insert(mac(10), Interface::new(mac(10), InterfaceKind::Ethernet));
        net.upsert_remote_device(mac(2), Instant::now());
        net.remote_devices.get_mut(&mac(2)).unwrap().interfaces.insert(mac(20), Interface::new(mac(20), InterfaceKind::Ethernet));

        net.interface_add_neighbor(mac(10), mac(20));
        assert_eq!(net.local_device.interfaces[&mac(10)].neighbors, vec![mac(20)]);
        assert_eq!(net.remote_devices[&mac(2)].interfaces[&mac(20)].neighbors, vec![mac(10)]);

        net.interface_remove_neighbor(mac(10), mac(20));
        assert!(net.local_device.interfaces[&mac(10)].neighbors.is_empty());
        assert!(net.remote_devices[&mac(2)].interfaces[&mac(20)].neighbors.is_empty());
    }

    #[test]
    fn stale_remote_device_is_evicted_and_neighbor_gced() {
        let mut net = Network::new(mac(1), registrar());
        net.local_device.interfaces.insert(mac(10), Interface::new(mac(10), InterfaceKind::Ethernet));
        let old = Instant::now() - Duration::from_secs(1000);
        net.remote_devices.insert(mac(2), AlDevice::remote(mac(2), old));
        net.remote_devices.get_mut(&mac(2)).unwrap().interfaces.insert(mac(20), Interface::new(mac(20), InterfaceKind::Ethernet));
        net.interface_add_neighbor(mac(10), mac(20));

        net.evict_stale_devices(Instant::now(), Duration::from_secs(180));
        assert!(!net.remote_devices.contains_key(&mac(2)));
        assert!(net.local_device.interfaces[&mac(10)].neighbors.is_empty());
    }
}
