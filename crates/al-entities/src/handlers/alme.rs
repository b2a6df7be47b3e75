//! ALME-SAP request handling (top-level spec §6): turns one `AlmeMessage`
//! request arriving over the ALME TCP port into the matching
//! confirm/response, reading and mutating `Network` directly since an ALME
//! session runs on the same thread as the event loop it calls into.

use al_core::MacAddr;
use al_pdus::alme::forwarding::{FwdRuleEntry, GetFwdRulesResponse};
use al_pdus::alme::interface::{GetIntfListResponse, GetIntfPwrStateResponse, IntfDescriptorEntry, SetIntfPwrStateConfirm};
use al_pdus::alme::metric::{GetMetricResponse, MetricDescriptorEntry};
use al_pdus::alme::vendor::{CustomCommand, CustomCommandResponse, PowerState as WirePowerState, ReasonCode};
use al_pdus::alme::{AlmeMessage, ModifyFwdRuleConfirm, RemoveFwdRuleConfirm, SetFwdRuleConfirm};
use al_pdus::tlv::link_metrics::{RxLinkEntry, TxLinkEntry};
use al_pdus::tlv::{ReceiverLinkMetric, TransmitterLinkMetric};

use crate::dispatch::Context;
use crate::model::network::ForwardingRule;
use crate::model::PowerState;

fn to_wire_power_state(state: PowerState) -> WirePowerState {
    match state {
        PowerState::On => WirePowerState::On,
        PowerState::PowerSave => WirePowerState::PowerSave,
        PowerState::Off => WirePowerState::Off,
    }
}

fn from_wire_power_state(state: WirePowerState) -> PowerState {
    match state {
        WirePowerState::On => PowerState::On,
        WirePowerState::PowerSave => PowerState::PowerSave,
        WirePowerState::Off => PowerState::Off,
    }
}

/// Owning device's AL MAC for a neighbor interface, used to resolve
/// `GetMetricRequest::neighbor_dev_address` (top-level spec §6: the
/// request names a *device*, link metrics are tracked per *interface*).
fn owning_al_mac(ctx: &Context, iface_mac: MacAddr) -> Option<MacAddr> {
    ctx.network.all_devices().find(|d| d.interfaces.contains_key(&iface_mac)).map(|d| d.al_mac)
}

fn build_metric_entries(ctx: &Context, neighbor_al_mac: Option<MacAddr>) -> Vec<MetricDescriptorEntry> {
    let local = &ctx.network.local_device;
    let mut entries = Vec::new();
    for (local_if, iface) in &local.interfaces {
        for neighbor_if in &iface.neighbors {
            if let Some(wanted) = neighbor_al_mac {
                if owning_al_mac(ctx, *neighbor_if) != Some(wanted) {
                    continue;
                }
            }
            let sample = ctx.backend.link_metrics(*local_if, *neighbor_if).unwrap_or_default();
            let tx = TransmitterLinkMetric {
                al_mac: local.al_mac,
                neighbor_al_mac: owning_al_mac(ctx, *neighbor_if).unwrap_or(MacAddr::ZERO),
                link_entries: vec![TxLinkEntry {
                    local_if: *local_if,
                    neighbor_if: *neighbor_if,
                    media_type: 0x0000,
                    bridge_present: iface.bridging_flag,
                    packet_errors: sample.packet_errors,
                    transmitted_packets: sample.transmitted_packets,
                    mac_throughput_capacity_mbps: sample.mac_throughput_capacity_mbps,
                    link_availability_pct: sample.link_availability_pct,
                    phy_rate_mbps: sample.phy_rate_mbps,
                }],
            };
            let rx = ReceiverLinkMetric {
                al_mac: local.al_mac,
                neighbor_al_mac: owning_al_mac(ctx, *neighbor_if).unwrap_or(MacAddr::ZERO),
                link_entries: vec![RxLinkEntry {
                    local_if: *local_if,
                    neighbor_if: *neighbor_if,
                    media_type: 0x0000,
                    packet_errors: sample.packet_errors,
                    received_packets: sample.received_packets,
                    rssi_dbm: sample.rssi_dbm,
                }],
            };
            entries.push(MetricDescriptorEntry {
                neighbor_dev_address: owning_al_mac(ctx, *neighbor_if).unwrap_or(MacAddr::ZERO),
                local_intf_address: *local_if,
                bridge_flag: iface.bridging_flag,
                tx_metric: Some(tx),
                rx_metric: Some(rx),
            });
        }
    }
    entries
}

/// Dispatches one ALME-SAP request to its confirm/response (top-level
/// spec §6). Requests with no defined reply here (already a confirm or
/// response type) are rejected defensively; the ALME session layer never
/// constructs those.
pub fn handle_request(ctx: &mut Context, request: &AlmeMessage) -> AlmeMessage {
    match request {
        AlmeMessage::GetIntfListRequest => {
            let interface_descriptors = ctx
                .network
                .local_device
                .interfaces
                .values()
                .map(|iface| IntfDescriptorEntry {
                    interface_address: iface.mac,
                    interface_type: 0x0000,
                    bridge_flag: iface.bridging_flag,
                    vendor_specific_info: Vec::new(),
                })
                .collect();
            AlmeMessage::GetIntfListResponse(GetIntfListResponse { interface_descriptors })
        }
        AlmeMessage::SetIntfPwrStateRequest(req) => {
            let reason_code = match ctx.network.local_device.interfaces.get_mut(&req.interface_address) {
                Some(iface) => {
                    iface.power_state = from_wire_power_state(req.power_state);
                    ReasonCode::Success
                }
                None => ReasonCode::UnmatchedMacAddress,
            };
            AlmeMessage::SetIntfPwrStateConfirm(SetIntfPwrStateConfirm {
                interface_address: req.interface_address,
                reason_code,
            })
        }
        AlmeMessage::GetIntfPwrStateRequest(req) => {
            let power_state = ctx
                .network
                .local_device
                .interfaces
                .get(&req.interface_address)
                .map(|iface| to_wire_power_state(iface.power_state))
                .unwrap_or(WirePowerState::Off);
            AlmeMessage::GetIntfPwrStateResponse(GetIntfPwrStateResponse {
                interface_address: req.interface_address,
                power_state,
            })
        }
        AlmeMessage::SetFwdRuleRequest(req) => {
            let duplicate = ctx
                .network
                .forwarding_rules
                .iter()
                .any(|r| r.classification_set == req.classification_set);
            if duplicate {
                return AlmeMessage::SetFwdRuleConfirm(SetFwdRuleConfirm {
                    rule_id: 0,
                    reason_code: ReasonCode::DuplicateClassificationSet,
                });
            }
            let rule_id = ctx.network.allocate_rule_id();
            ctx.network.forwarding_rules.push(ForwardingRule {
                rule_id,
                classification_set: req.classification_set,
                addresses: req.addresses.clone(),
            });
            AlmeMessage::SetFwdRuleConfirm(SetFwdRuleConfirm { rule_id, reason_code: ReasonCode::Success })
        }
        AlmeMessage::GetFwdRulesRequest => {
            let rules = ctx
                .network
                .forwarding_rules
                .iter()
                .map(|r| FwdRuleEntry {
                    classification_set: r.classification_set,
                    addresses: r.addresses.clone(),
                    last_matched: ForwardingRule::NO_MATCH_INFO,
                })
                .collect();
            AlmeMessage::GetFwdRulesResponse(GetFwdRulesResponse { rules })
        }
        AlmeMessage::ModifyFwdRuleRequest(req) => {
            let reason_code = match ctx.network.forwarding_rules.iter_mut().find(|r| r.rule_id == req.rule_id) {
                Some(rule) => {
                    rule.addresses = req.addresses.clone();
                    ReasonCode::Success
                }
                None => ReasonCode::InvalidRuleId,
            };
            AlmeMessage::ModifyFwdRuleConfirm(ModifyFwdRuleConfirm { rule_id: req.rule_id, reason_code })
        }
        AlmeMessage::RemoveFwdRuleRequest(req) => {
            let reason_code =
                if ctx.network.remove_rule(req.rule_id) { ReasonCode::Success } else { ReasonCode::InvalidRuleId };
            AlmeMessage::RemoveFwdRuleConfirm(RemoveFwdRuleConfirm { rule_id: req.rule_id, reason_code })
        }
        AlmeMessage::GetMetricRequest(req) => {
            let wanted = (!req.neighbor_dev_address.is_zero()).then_some(req.neighbor_dev_address);
            let metrics = build_metric_entries(ctx, wanted);
            let reason_code = if wanted.is_some() && metrics.is_empty() {
                ReasonCode::UnmatchedNeighborMacAddress
            } else {
                ReasonCode::Success
            };
            AlmeMessage::GetMetricResponse(GetMetricResponse { metrics, reason_code })
        }
        AlmeMessage::CustomCommandRequest(req) => {
            let bytes = match req.command {
                CustomCommand::DumpNetworkDevices => ctx
                    .network
                    .all_devices()
                    .map(|d| format!("{}\n", d.al_mac))
                    .collect::<String>()
                    .into_bytes(),
            };
            AlmeMessage::CustomCommandResponse(CustomCommandResponse { bytes })
        }
        already_a_reply => already_a_reply.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interface, InterfaceKind, Network, RegistrarConfig};
    use crate::platform::simulated::SimulatedBackend;
    use al_config::{AlConfig, SharedConfig};
    use al_pdus::alme::forwarding::ClassificationSet;
    use al_pdus::alme::SetFwdRuleRequest;
    use std::sync::Arc;

    fn test_ctx() -> Context {
        let al_mac = MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let mut network = Network::new(al_mac, RegistrarConfig::new(vec![]));
        let iface_mac = MacAddr::new([0xaa; 6]);
        network.local_device.interfaces.insert(iface_mac, Interface::new(iface_mac, InterfaceKind::Ethernet));
        let config = SharedConfig::from_config(AlConfig::new(al_mac, vec!["eth0".into()])).unwrap();
        Context::new(network, config, Arc::new(SimulatedBackend::new(vec![])), 1)
    }

    #[test]
    fn get_intf_list_reports_local_interfaces() {
        let mut ctx = test_ctx();
        match handle_request(&mut ctx, &AlmeMessage::GetIntfListRequest) {
            AlmeMessage::GetIntfListResponse(resp) => assert_eq!(resp.interface_descriptors.len(), 1),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn set_fwd_rule_then_get_fwd_rules_round_trips() {
        let mut ctx = test_ctx();
        let req = AlmeMessage::SetFwdRuleRequest(SetFwdRuleRequest {
            classification_set: ClassificationSet { ether_type: Some(0x893a), ..Default::default() },
            addresses: vec![MacAddr::new([7; 6])],
        });
        let rule_id = match handle_request(&mut ctx, &req) {
            AlmeMessage::SetFwdRuleConfirm(c) => {
                assert_eq!(c.reason_code, ReasonCode::Success);
                c.rule_id
            }
            other => panic!("unexpected reply: {other:?}"),
        };
        match handle_request(&mut ctx, &AlmeMessage::GetFwdRulesRequest) {
            AlmeMessage::GetFwdRulesResponse(resp) => {
                assert_eq!(resp.rules.len(), 1);
                assert_eq!(resp.rules[0].addresses, vec![MacAddr::new([7; 6])]);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        match handle_request(&mut ctx, &AlmeMessage::RemoveFwdRuleRequest(al_pdus::alme::RemoveFwdRuleRequest { rule_id })) {
            AlmeMessage::RemoveFwdRuleConfirm(c) => assert_eq!(c.reason_code, ReasonCode::Success),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn get_metric_for_unknown_neighbor_is_rejected() {
        let mut ctx = test_ctx();
        let req = AlmeMessage::GetMetricRequest(al_pdus::alme::GetMetricRequest {
            neighbor_dev_address: MacAddr::new([0x99; 6]),
        });
        match handle_request(&mut ctx, &req) {
            AlmeMessage::GetMetricResponse(resp) => assert_eq!(resp.reason_code, ReasonCode::UnmatchedNeighborMacAddress),
            other => panic!("unexpected reply: {other:?}"),
        }
    }
}
