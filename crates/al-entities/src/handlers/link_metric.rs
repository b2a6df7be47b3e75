//! LinkMetricQuery / LinkMetricResponse (top-level spec §4.4).

use al_core::{AlError, ByteWriter, MacAddr};
use al_pdus::cmdu::{CmduHeader, CmduType};
use al_pdus::tlv::link_metrics::{
    LinkMetricNeighbor, LinkMetricQuery, LinkMetricResultCode, LinkMetricType, RxLinkEntry, TxLinkEntry,
};
use al_pdus::tlv::{ReceiverLinkMetric, Tlv, TransmitterLinkMetric};

use crate::dispatch::Context;
use crate::platform::LinkMetricSample;

pub fn forge_link_metric_query(neighbor: LinkMetricNeighbor, metric_type: LinkMetricType, message_id: u16) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::LinkMetricQuery.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::LinkMetricQuery(LinkMetricQuery { neighbor, metric_type }).forge(&mut w).expect("LinkMetricQuery always forges");
    Tlv::EndOfMessage.forge(&mut w).expect("EndOfMessage always forges");
    w.as_slice().to_vec()
}

fn neighbors_for(ctx: &Context, local_mac: MacAddr, wanted: LinkMetricNeighbor) -> Vec<MacAddr> {
    match wanted {
        LinkMetricNeighbor::AllNeighbors => ctx
            .network
            .local_device
            .interfaces
            .values()
            .flat_map(|i| i.neighbors.iter().copied())
            .collect(),
        LinkMetricNeighbor::SpecificNeighbor(mac) => {
            let is_neighbor = ctx.network.local_device.interfaces.values().any(|i| i.neighbors.contains(&mac));
            if is_neighbor {
                vec![mac]
            } else {
                let _ = local_mac;
                Vec::new()
            }
        }
    }
}

/// Builds the LinkMetricResponse for `query`, querying the platform for
/// live samples per neighbor interface (top-level spec §4.4, §6).
pub fn handle_link_metric_query(ctx: &Context, query: &LinkMetricQuery, message_id: u16) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::LinkMetricResponse.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);

    let local = &ctx.network.local_device;
    let targets = neighbors_for(ctx, local.al_mac, query.neighbor);

    if let LinkMetricNeighbor::SpecificNeighbor(_) = query.neighbor {
        if targets.is_empty() {
            Tlv::LinkMetricResultCode(LinkMetricResultCode::InvalidNeighbor)
                .forge(&mut w)
                .expect("LinkMetricResultCode always forges");
            Tlv::EndOfMessage.forge(&mut w).expect("EndOfMessage always forges");
            return w.as_slice().to_vec();
        }
    }

    let mut tx_entries = Vec::new();
    let mut rx_entries = Vec::new();
    for (local_if, iface) in &local.interfaces {
        for neighbor_if in &iface.neighbors {
            if !targets.contains(neighbor_if) {
                continue;
            }
            let sample: LinkMetricSample = ctx.backend.link_metrics(*local_if, *neighbor_if).unwrap_or_default();
            if matches!(query.metric_type, LinkMetricType::TxOnly | LinkMetricType::Both) {
                tx_entries.push(TxLinkEntry {
                    local_if: *local_if,
                    neighbor_if: *neighbor_if,
                    media_type: 0x0000,
                    bridge_present: false,
                    packet_errors: sample.packet_errors,
                    transmitted_packets: sample.transmitted_packets,
                    mac_throughput_capacity_mbps: sample.mac_throughput_capacity_mbps,
                    link_availability_pct: sample.link_availability_pct,
                    phy_rate_mbps: sample.phy_rate_mbps,
                });
            }
            if matches!(query.metric_type, LinkMetricType::RxOnly | LinkMetricType::Both) {
                rx_entries.push(RxLinkEntry {
                    local_if: *local_if,
                    neighbor_if: *neighbor_if,
                    media_type: 0x0000,
                    packet_errors: sample.packet_errors,
                    received_packets: sample.received_packets,
                    rssi_dbm: sample.rssi_dbm,
                });
            }
        }
    }

    if !tx_entries.is_empty() {
        Tlv::TransmitterLinkMetric(TransmitterLinkMetric {
            al_mac: local.al_mac,
            neighbor_al_mac: MacAddr::ZERO,
            link_entries: tx_entries,
        })
        .forge(&mut w)
        .expect("TransmitterLinkMetric always forges");
    }
    if !rx_entries.is_empty() {
        Tlv::ReceiverLinkMetric(ReceiverLinkMetric {
            al_mac: local.al_mac,
            neighbor_al_mac: MacAddr::ZERO,
            link_entries: rx_entries,
        })
        .forge(&mut w)
        .expect("ReceiverLinkMetric always forges");
    }
    Tlv::EndOfMessage.forge(&mut w).expect("EndOfMessage always forges");
    w.as_slice().to_vec()
}

/// Merges a received LinkMetricResponse's samples into nothing persistent
/// yet: per top-level spec §4.4 these are request/response only, not
/// stored in the topology tree.
pub fn handle_link_metric_response(tlvs: &[Tlv]) -> Result<(), AlError> {
    if tlvs.iter().any(|t| matches!(t, Tlv::LinkMetricResultCode(_))) {
        return Err(AlError::Ignored("neighbor not found for link metric query"));
    }
    Ok(())
}
