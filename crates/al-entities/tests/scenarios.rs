//! End-to-end scenarios exercising `route_cmdu`/`handle_request` against a
//! full `Context`, built the way `handlers::router`'s own `#[cfg(test)]`
//! module builds one. Literal MAC/interface values below are lifted from
//! the existing test vector conventions used throughout `al-entities`'s
//! own unit tests (top-level spec §8).

use std::sync::Arc;

use al_config::{AlConfig, AuthMode, Band, EncrMode, MultiApRoles, RegistrarBssConfig, SharedConfig};
use al_core::{ByteReader, MacAddr};
use al_entities::dispatch::Context;
use al_entities::handlers::{alme, autoconfig, link_metric, push_button, route_cmdu, topology, vendor, RouteInput};
use al_entities::model::{Interface, InterfaceKind, Network, RegistrarConfig};
use al_entities::platform::simulated::SimulatedBackend;
use al_entities::wsc::{M2Decision, WscIdentity};
use al_pdus::alme::interface::GetIntfPwrStateRequest;
use al_pdus::alme::AlmeMessage;
use al_pdus::cmdu::header::{CmduHeader, CmduType};
use al_pdus::cmdu::mid_allocator::MidAllocator;
use al_pdus::tlv::link_metrics::{LinkMetricNeighbor, LinkMetricType};
use al_pdus::tlv::Tlv;

fn identity() -> WscIdentity {
    WscIdentity {
        uuid: [0x07; 16],
        manufacturer: "Acme".into(),
        model_name: "Router".into(),
        model_number: "1".into(),
        serial_number: "SN-007".into(),
        primary_device_type: [0; 8],
        device_name: "Gateway".into(),
        os_version: 0x8000_0007,
    }
}

fn ctx_with(al_mac: MacAddr, registrar: RegistrarConfig, managed: Vec<&str>) -> Context {
    let network = Network::new(al_mac, registrar);
    let managed: Vec<String> = managed.into_iter().map(String::from).collect();
    let config = SharedConfig::from_config(AlConfig::new(al_mac, managed)).unwrap();
    Context::new(network, config, Arc::new(SimulatedBackend::new(vec![])), 1)
}

fn tlvs_of(frame: &[u8]) -> Vec<Tlv> {
    let mut r = ByteReader::new(frame);
    CmduHeader::parse(&mut r).unwrap();
    al_pdus::tlv::parse_tlv_sequence(&mut r).unwrap()
}

// Scenario A — Topology discovery of one neighbor.
#[test]
fn scenario_a_topology_discovery_of_one_neighbor() {
    let local_al_mac = MacAddr::new([0xaa; 6]);
    let local_iface = MacAddr::new([0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0x01]);
    let mut ctx = ctx_with(local_al_mac, RegistrarConfig::new(vec![]), vec!["eth0"]);
    ctx.network.local_device.interfaces.insert(local_iface, Interface::new(local_iface, InterfaceKind::Ethernet));

    let sender_al_mac = MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0c]);
    let sender_iface = MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0d]);
    let frame = topology::forge_topology_discovery(sender_al_mac, sender_iface, 1);

    let registry = vendor::VendorRegistry::new();
    let input = RouteInput {
        source_al_mac: sender_al_mac,
        local_iface,
        local_iface_name: "eth0",
        identity: &identity(),
        radio_uid: None,
        vendor_registry: &registry,
    };
    let replies = route_cmdu(&mut ctx, &frame, &input).unwrap();
    assert!(replies.is_empty());

    let device = ctx.network.device(sender_al_mac).expect("neighbor device recorded");
    assert!(device.interfaces.contains_key(&sender_iface));
    let local = ctx.network.local_device.interfaces.get(&local_iface).unwrap();
    assert!(local.neighbors.contains(&sender_iface));
}

// Scenario B — ALME round-trip: ALME-GET-INTF-LIST.request over a known
// managed-interface set returns one descriptor per managed interface.
#[test]
fn scenario_b_alme_get_intf_list_round_trip() {
    let al_mac = MacAddr::new([0x10; 6]);
    let mut ctx = ctx_with(al_mac, RegistrarConfig::new(vec![]), vec!["eth0", "wlan0"]);
    let eth0 = MacAddr::new([0x01; 6]);
    let wlan0 = MacAddr::new([0x02; 6]);
    ctx.network.local_device.interfaces.insert(eth0, Interface::new(eth0, InterfaceKind::Ethernet));
    ctx.network.local_device.interfaces.insert(wlan0, Interface::new(wlan0, InterfaceKind::Wifi));

    let request_bytes = AlmeMessage::GetIntfListRequest.forge();
    let request = AlmeMessage::parse(&request_bytes).unwrap();
    let reply = alme::handle_request(&mut ctx, &request);

    let AlmeMessage::GetIntfListResponse(ref resp) = reply else { panic!("expected GetIntfListResponse") };
    let mut addrs: Vec<MacAddr> = resp.interface_descriptors.iter().map(|d| d.interface_address).collect();
    addrs.sort();
    let mut expected = vec![eth0, wlan0];
    expected.sort();
    assert_eq!(addrs, expected);

    // And it round-trips back through the wire format unchanged.
    let reply_bytes = reply.forge();
    assert_eq!(AlmeMessage::parse(&reply_bytes).unwrap(), reply);
}

#[test]
fn scenario_b_alme_get_intf_power_state_for_unknown_interface() {
    let al_mac = MacAddr::new([0x11; 6]);
    let mut ctx = ctx_with(al_mac, RegistrarConfig::new(vec![]), vec!["eth0"]);
    let request = AlmeMessage::GetIntfPwrStateRequest(GetIntfPwrStateRequest { interface_address: MacAddr::new([0xee; 6]) });
    let reply = alme::handle_request(&mut ctx, &request);
    let AlmeMessage::GetIntfPwrStateResponse(resp) = reply else { panic!("expected GetIntfPwrStateResponse") };
    assert_eq!(resp.power_state, al_pdus::alme::vendor::PowerState::Off);
}

// Scenario C — WSC enrollee happy path: push the button, run the
// Search/Response/M1/M2 exchange to completion, and confirm the applied
// BSS carries the registrar's SSID/key pair with WPA2-PSK/AES.
#[test]
fn scenario_c_wsc_enrollee_happy_path() {
    let registrar_al = MacAddr::new([0x01; 6]);
    let registrar_bss = RegistrarBssConfig {
        band: Band::FiveGhz,
        ssid: "Mesh-5G".into(),
        auth_mode: AuthMode::Wpa2Psk,
        encr_mode: EncrMode::Aes,
        network_key: "supersecretkey".into(),
        multi_ap: MultiApRoles { fronthaul: true, backhaul_bss: false, backhaul_sta: false, backhaul_only: false },
    };
    let registrar_ctx = ctx_with(registrar_al, RegistrarConfig::new(vec![registrar_bss.clone()]), vec!["wlan0"]);

    let enrollee_al = MacAddr::new([0x02; 6]);
    let radio_uid = MacAddr::new([0x20; 6]);
    let mut enrollee_ctx = ctx_with(enrollee_al, RegistrarConfig::new(vec![]), vec!["wlan0"]);
    enrollee_ctx.network.local_device.radios.insert(radio_uid, al_entities::model::Radio::new(radio_uid, vec![Band::FiveGhz]));

    // Push the button on the enrollee: broadcasts a notification, opens the
    // platform's pairing window.
    let notification = push_button::press_button(&enrollee_ctx, "wlan0", radio_uid, 1).unwrap();
    assert!(tlvs_of(&notification).iter().any(|t| matches!(t, Tlv::PushButtonEventNotification(_))));

    // Search -> Response.
    let search = autoconfig::forge_search(radio_uid, Band::FiveGhz, 2);
    let search_tlvs = tlvs_of(&search);
    let response = autoconfig::handle_search(&registrar_ctx, &search_tlvs, 3).expect("registrar serves this band");

    // Response -> M1.
    let m1_cmdu = autoconfig::handle_response(&mut enrollee_ctx, radio_uid, &identity(), 4).unwrap();
    let _ = response;
    let m1_bytes = tlvs_of(&m1_cmdu)
        .into_iter()
        .find_map(|t| if let Tlv::Wsc(w) = t { Some(w.message) } else { None })
        .unwrap();

    // M1 -> M2 (one per matching registrar BSS entry).
    let m2_cmdus = autoconfig::handle_wsc_m1(&registrar_ctx, &identity(), &m1_bytes, 5).unwrap();
    assert_eq!(m2_cmdus.len(), 1);
    let m2_bytes = tlvs_of(&m2_cmdus[0])
        .into_iter()
        .find_map(|t| if let Tlv::Wsc(w) = t { Some(w.message) } else { None })
        .unwrap();

    // M2 applied on the enrollee.
    let decision = autoconfig::handle_wsc_m2(&mut enrollee_ctx, radio_uid, "wlan0", &m2_bytes).unwrap();
    let M2Decision::ApplyBss(bss) = decision else { panic!("expected ApplyBss, got a teardown or backhaul decision") };
    assert_eq!(bss.ssid, registrar_bss.ssid);
    assert_eq!(bss.network_key, registrar_bss.network_key);
    assert_eq!(bss.auth_mode, AuthMode::Wpa2Psk);
    assert_eq!(bss.encr_mode, EncrMode::Aes);

    let applied_iface = enrollee_ctx.network.local_device.interfaces.get(&bss.bssid).expect("PLATFORM_CONFIGURE_80211_AP target");
    let wifi = applied_iface.wifi.as_ref().unwrap();
    assert_eq!(wifi.ssid, "Mesh-5G");
    assert_eq!(wifi.auth_mode, AuthMode::Wpa2Psk);
    assert_eq!(wifi.encr_mode, EncrMode::Aes);
}

// Scenario D — Link metric query (all neighbors).
#[test]
fn scenario_d_link_metric_query_all_neighbors() {
    let al_mac = MacAddr::new([0x30; 6]);
    let mut ctx = ctx_with(al_mac, RegistrarConfig::new(vec![]), vec!["eth0"]);
    let local_if = MacAddr::new([0x31; 6]);
    let mut iface = Interface::new(local_if, InterfaceKind::Ethernet);
    iface.add_neighbor(MacAddr::new([0x32; 6]));
    iface.add_neighbor(MacAddr::new([0x33; 6]));
    ctx.network.local_device.interfaces.insert(local_if, iface);

    let query_frame = link_metric::forge_link_metric_query(LinkMetricNeighbor::AllNeighbors, LinkMetricType::Both, 9);
    let query = tlvs_of(&query_frame)
        .into_iter()
        .find_map(|t| if let Tlv::LinkMetricQuery(q) = t { Some(q) } else { None })
        .unwrap();
    let response_frame = link_metric::handle_link_metric_query(&ctx, &query, 10);
    let response_tlvs = tlvs_of(&response_frame);

    let tx_count = response_tlvs.iter().filter(|t| matches!(t, Tlv::TransmitterLinkMetric(_))).count();
    let rx_count = response_tlvs.iter().filter(|t| matches!(t, Tlv::ReceiverLinkMetric(_))).count();
    assert_eq!(tx_count, 1);
    assert_eq!(rx_count, 1);
    let Tlv::TransmitterLinkMetric(tx) = response_tlvs.iter().find(|t| matches!(t, Tlv::TransmitterLinkMetric(_))).unwrap() else {
        unreachable!()
    };
    assert_eq!(tx.link_entries.len(), 2);
}

// Scenario E — Fragmentation: a TopologyResponse with enough neighbor TLVs
// to exceed one max-fragment-size frame splits into exactly two fragments
// sharing one message id, with fragment ids 0/1 and flags 0x00 then 0x80.
#[test]
fn scenario_e_fragmentation_splits_into_two_frames() {
    let al_mac = MacAddr::new([0x40; 6]);
    let mut ctx = ctx_with(al_mac, RegistrarConfig::new(vec![]), vec!["eth0"]);
    // Two interfaces, each carrying its own NeighborDeviceList TLV (9 + 7
    // bytes per entry), push the TopologyResponse body past 1500 bytes
    // while keeping every individual TLV well under that limit so none of
    // them alone is too big for a single fragment.
    let mut iface1 = Interface::new(MacAddr::new([0x41; 6]), InterfaceKind::Ethernet);
    let mut iface2 = Interface::new(MacAddr::new([0x42; 6]), InterfaceKind::Ethernet);
    for i in 0..110u8 {
        iface1.add_neighbor(MacAddr::new([0x50, 0x00, 0x00, 0x00, 0x00, i]));
        iface2.add_neighbor(MacAddr::new([0x51, 0x00, 0x00, 0x00, 0x00, i]));
    }
    ctx.network.local_device.interfaces.insert(iface1.mac, iface1);
    ctx.network.local_device.interfaces.insert(iface2.mac, iface2);

    let message_id = 77u16;
    let body = topology::forge_topology_response(&ctx, message_id);
    assert!(body.len() > 1500, "fixture must exceed one fragment to exercise fragmentation, got {} bytes", body.len());

    let tlvs = tlvs_of(&body);
    // `fragment_cmdu` appends its own per-fragment End-of-message, so the
    // TLVs fed into it must exclude the one `forge_topology_response`
    // already terminated the whole sequence with.
    let tlvs_without_eom: Vec<Tlv> = tlvs.iter().filter(|t| !matches!(t, Tlv::EndOfMessage)).cloned().collect();
    let fragments =
        al_pdus::cmdu::fragment_cmdu(CmduType::TopologyResponse.as_u16(), message_id, false, &tlvs_without_eom, 1500).unwrap();
    assert_eq!(fragments.len(), 2, "expected exactly two fragments for this fixture");

    let header0 = CmduHeader::parse(&mut ByteReader::new(&fragments[0])).unwrap();
    let header1 = CmduHeader::parse(&mut ByteReader::new(&fragments[1])).unwrap();
    assert_eq!(header0.message_id, message_id);
    assert_eq!(header1.message_id, message_id);
    assert_eq!(header0.fragment_id, 0);
    assert_eq!(header1.fragment_id, 1);
    assert_eq!(header0.flags, 0x00);
    assert_eq!(header1.flags, 0x80);

    // And the two fragments reassemble back to the original TLV sequence.
    let mut reassembly = al_pdus::cmdu::ReassemblyTable::new(std::time::Duration::from_secs(30));
    let now = std::time::Instant::now();
    let mut r0 = ByteReader::new(&fragments[0]);
    let h0 = CmduHeader::parse(&mut r0).unwrap();
    let first = reassembly.insert_fragment(al_mac, &h0, r0.peek_remaining(), now).unwrap();
    assert!(first.is_none());
    let mut r1 = ByteReader::new(&fragments[1]);
    let h1 = CmduHeader::parse(&mut r1).unwrap();
    let second = reassembly.insert_fragment(al_mac, &h1, r1.peek_remaining(), now).unwrap();
    let reassembled = second.expect("second fragment completes reassembly");
    let reassembled_tlvs = al_pdus::tlv::parse_tlv_sequence(&mut ByteReader::new(&reassembled)).unwrap();
    assert_eq!(reassembled_tlvs.len(), tlvs.len());
}

// Scenario F — Duplicate CMDU: the same TopologyNotification delivered
// twice produces exactly one TopologyQuery reply.
#[test]
fn scenario_f_duplicate_topology_notification_produces_one_query() {
    let al_mac = MacAddr::new([0x60; 6]);
    let mut ctx = ctx_with(al_mac, RegistrarConfig::new(vec![]), vec!["eth0"]);
    let sender = MacAddr::new([0x61; 6]);
    let local_iface = MacAddr::new([0x62; 6]);
    ctx.network.local_device.interfaces.insert(local_iface, Interface::new(local_iface, InterfaceKind::Ethernet));

    let header = CmduHeader::new(CmduType::TopologyNotification.as_u16(), 99);
    let mut w = al_core::ByteWriter::new();
    header.forge(&mut w);
    Tlv::EndOfMessage.forge(&mut w).unwrap();
    let frame = w.as_slice().to_vec();

    let registry = vendor::VendorRegistry::new();
    let input = RouteInput {
        source_al_mac: sender,
        local_iface,
        local_iface_name: "eth0",
        identity: &identity(),
        radio_uid: None,
        vendor_registry: &registry,
    };

    let first = route_cmdu(&mut ctx, &frame, &input).unwrap();
    assert_eq!(first.len(), 1);
    assert!(!tlvs_of(&first[0]).is_empty(), "a TopologyQuery reply still carries an End-of-message TLV");
    let header0 = CmduHeader::parse(&mut ByteReader::new(&first[0])).unwrap();
    assert_eq!(header0.message_type, CmduType::TopologyQuery.as_u16());

    let second = route_cmdu(&mut ctx, &frame, &input).unwrap();
    assert!(second.is_empty(), "duplicate delivery within the window must not produce a second reply");
}

// Testable property 3 — duplicate suppression holds across CMDU types,
// not just TopologyNotification, since the fingerprint is (source, mid,
// type) regardless of what the type does.
#[test]
fn duplicate_suppression_keys_on_source_mid_and_type() {
    let al_mac = MacAddr::new([0x70; 6]);
    let mut ctx = ctx_with(al_mac, RegistrarConfig::new(vec![]), vec!["eth0"]);
    let sender = MacAddr::new([0x71; 6]);
    let local_iface = MacAddr::new([0x72; 6]);
    ctx.network.local_device.interfaces.insert(local_iface, Interface::new(local_iface, InterfaceKind::Ethernet));
    let registry = vendor::VendorRegistry::new();
    let input = RouteInput {
        source_al_mac: sender,
        local_iface,
        local_iface_name: "eth0",
        identity: &identity(),
        radio_uid: None,
        vendor_registry: &registry,
    };

    let mut allocator = MidAllocator::seeded(42);
    let mid = allocator.alloc();
    let query_frame = topology::forge_topology_query(mid);

    let first = route_cmdu(&mut ctx, &query_frame, &input).unwrap();
    assert_eq!(first.len(), 1, "a fresh TopologyQuery always gets a TopologyResponse");
    let second = route_cmdu(&mut ctx, &query_frame, &input).unwrap();
    assert!(second.is_empty(), "the same (source, mid, type) triple must be suppressed");
}

// Testable property 6 — registrar uniqueness rejects a second registrar
// entry on an already-claimed band at config-build time, and the first
// entry's state is untouched (`al-config`'s own validation, exercised end
// to end through `SharedConfig::from_config`).
#[test]
fn registrar_uniqueness_rejects_a_second_entry_on_the_same_band() {
    let al_mac = MacAddr::new([0x80; 6]);
    let mut cfg = AlConfig::new(al_mac, vec!["wlan0".into()]);
    let first = RegistrarBssConfig {
        band: Band::FiveGhz,
        ssid: "Primary".into(),
        auth_mode: AuthMode::Wpa2Psk,
        encr_mode: EncrMode::Aes,
        network_key: "primarykey123".into(),
        multi_ap: MultiApRoles { fronthaul: true, backhaul_bss: false, backhaul_sta: false, backhaul_only: false },
    };
    let second = RegistrarBssConfig { ssid: "Shadow".into(), network_key: "shadowkey456".into(), ..first.clone() };
    cfg.registrar_bsses.push(first.clone());
    cfg.registrar_bsses.push(second);

    let result = SharedConfig::from_config(cfg);
    assert!(result.is_err(), "a second registrar entry on the same band must be rejected");
}
