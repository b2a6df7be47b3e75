//! TopologyDiscovery / TopologyNotification / TopologyQuery / TopologyResponse
//! (top-level spec §4.4).

use al_core::{AlError, ByteWriter, MacAddr};
use al_pdus::cmdu::{CmduHeader, CmduType};
use al_pdus::tlv::device_info::MediaType;
use al_pdus::tlv::neighbors::NeighborEntry;
use al_pdus::tlv::{
    AlMacAddress, DeviceBridgingCapability, DeviceInformation, LocalInterface, MacAddress,
    NeighborDeviceList, Tlv,
};

use crate::dispatch::timers::PendingKind;
use crate::dispatch::Context;
use crate::model::{Interface, InterfaceKind};

fn media_type_for(kind: InterfaceKind) -> MediaType {
    match kind {
        InterfaceKind::Wifi => MediaType::Wifi80211n5Ghz,
        _ => MediaType::EthernetGigabit,
    }
}

/// Forges a TopologyDiscovery CMDU: AL-MAC-address TLV + MAC-address TLV
/// for `local_iface`, terminated by End-of-message (top-level spec §4.4).
pub fn forge_topology_discovery(al_mac: MacAddr, local_iface: MacAddr, message_id: u16) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::TopologyDiscovery.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::AlMacAddress(AlMacAddress { mac: al_mac }).forge(&mut w).expect("AlMacAddress always forges");
    Tlv::MacAddress(MacAddress { mac: local_iface }).forge(&mut w).expect("MacAddress always forges");
    Tlv::EndOfMessage.forge(&mut w).expect("EndOfMessage always forges");
    w.as_slice().to_vec()
}

/// Upserts the sending device and records a symmetric neighbor relation
/// between `local_iface` and the sender's interface (top-level spec §4.4).
pub fn handle_topology_discovery(ctx: &mut Context, local_iface: MacAddr, tlvs: &[Tlv]) -> Result<(), AlError> {
    let al_mac = tlvs
        .iter()
        .find_map(|t| match t {
            Tlv::AlMacAddress(v) => Some(v.mac),
            _ => None,
        })
        .ok_or(AlError::Malformed(al_core::PduParseErr::NotImplemented { field: Some("al_mac_address") }))?;
    let sender_iface = tlvs
        .iter()
        .find_map(|t| match t {
            Tlv::MacAddress(v) => Some(v.mac),
            _ => None,
        })
        .ok_or(AlError::Malformed(al_core::PduParseErr::NotImplemented { field: Some("mac_address") }))?;

    let now = ctx.backend.monotonic_now();
    let device = ctx.network.upsert_remote_device(al_mac, now);
    device.interfaces.entry(sender_iface).or_insert_with(|| Interface::new(sender_iface, InterfaceKind::Ethernet));

    ctx.network.interface_add_neighbor(local_iface, sender_iface);
    Ok(())
}

/// A TopologyNotification carries no payload of interest beyond "topology
/// changed somewhere"; the handler owes the sender a jittered
/// TopologyQuery rather than answering inline (top-level spec §4.4).
pub fn handle_topology_notification(ctx: &mut Context, sender_al_mac: MacAddr) {
    ctx.timers.allocate(PendingKind::DeferredTopologyQuery { target: sender_al_mac });
}

pub fn forge_topology_query(message_id: u16) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::TopologyQuery.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::EndOfMessage.forge(&mut w).expect("EndOfMessage always forges");
    w.as_slice().to_vec()
}

/// Builds the full TopologyResponse TLV set for the local device
/// (top-level spec §4.4: device info, bridging capability, neighbor
/// lists).
pub fn forge_topology_response(ctx: &Context, message_id: u16) -> Vec<u8> {
    let local = &ctx.network.local_device;
    let header = CmduHeader::new(CmduType::TopologyResponse.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);

    let local_interfaces: Vec<LocalInterface> = local
        .interfaces
        .values()
        .map(|iface| LocalInterface { mac: iface.mac, media_type: media_type_for(iface.kind), media_info: Vec::new() })
        .collect();
    Tlv::DeviceInformation(DeviceInformation { al_mac: local.al_mac, local_interfaces })
        .forge(&mut w)
        .expect("DeviceInformation always forges");

    for iface in local.interfaces.values() {
        if iface.neighbors.is_empty() {
            continue;
        }
        let neighbors = iface.neighbors.iter().map(|mac| NeighborEntry { mac: *mac, bridges_1905: false }).collect();
        Tlv::NeighborDeviceList(NeighborDeviceList { local_mac: iface.mac, neighbors })
            .forge(&mut w)
            .expect("NeighborDeviceList always forges");
    }

    Tlv::DeviceBridgingCapability(DeviceBridgingCapability { bridging_tuples: Vec::new() })
        .forge(&mut w)
        .expect("DeviceBridgingCapability always forges");
    Tlv::EndOfMessage.forge(&mut w).expect("EndOfMessage always forges");
    w.as_slice().to_vec()
}

/// Atomically replaces the sender's interface/neighbor set with what this
/// TopologyResponse carries (top-level spec §4.4: "receive atomically
/// replaces device's TLV contents").
pub fn handle_topology_response(ctx: &mut Context, sender_al_mac: MacAddr, tlvs: &[Tlv]) -> Result<(), AlError> {
    let now = ctx.backend.monotonic_now();
    let device = ctx.network.upsert_remote_device(sender_al_mac, now);

    let mut new_interfaces = std::collections::HashMap::new();
    for t in tlvs {
        if let Tlv::DeviceInformation(info) = t {
            for li in &info.local_interfaces {
                new_interfaces.insert(li.mac, Interface::new(li.mac, InterfaceKind::Ethernet));
            }
        }
    }
    for t in tlvs {
        if let Tlv::NeighborDeviceList(list) = t {
            if let Some(iface) = new_interfaces.get_mut(&list.local_mac) {
                iface.neighbors = list.neighbors.iter().map(|n| n.mac).collect();
            }
        }
    }
    device.interfaces = new_interfaces;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_discovery_round_trips_through_cmdu_framing() {
        let al_mac = MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0c]);
        let iface = MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0d]);
        let bytes = forge_topology_discovery(al_mac, iface, 42);

        let mut r = al_core::ByteReader::new(&bytes);
        let header = CmduHeader::parse(&mut r).unwrap();
        assert_eq!(header.message_type, CmduType::TopologyDiscovery.as_u16());
        assert_eq!(header.message_id, 42);

        let tlvs = al_pdus::tlv::parse_tlv_sequence(&mut r).unwrap();
        assert!(tlvs.iter().any(|t| matches!(t, Tlv::AlMacAddress(v) if v.mac == al_mac)));
        assert!(tlvs.iter().any(|t| matches!(t, Tlv::MacAddress(v) if v.mac == iface)));
    }
}
