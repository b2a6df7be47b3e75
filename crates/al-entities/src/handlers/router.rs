//! Single entry point a CMDU arriving on any interface goes through:
//! reassembly, duplicate suppression, then per-`CmduType` routing to the
//! handler modules (top-level spec §4.3, §4.4).
//!
//! `radio_uid` identifies the one local radio currently running a WSC
//! enrollment, if any; ApAutoconfigurationResponse/Wsc frames are routed
//! to it since nothing on the wire otherwise correlates a reply with the
//! radio that sent the original Search (top-level spec §4.4: "one Search
//! per radio, first matching Response wins").

use al_core::{AlError, ByteReader, MacAddr};
use al_pdus::cmdu::dedup::CmduFingerprint;
use al_pdus::cmdu::header::{CmduHeader, CmduType};
use al_pdus::tlv::link_metrics::LinkMetricQuery;
use al_pdus::tlv::Tlv;
use al_pdus::wsc::{M1Message, M2Message};

use crate::dispatch::Context;
use crate::wsc::WscIdentity;

use super::{autoconfig, higher_layer, link_metric, push_button, topology, vendor};

pub struct RouteInput<'a> {
    pub source_al_mac: MacAddr,
    pub local_iface: MacAddr,
    pub local_iface_name: &'a str,
    pub identity: &'a WscIdentity,
    pub radio_uid: Option<MacAddr>,
    pub vendor_registry: &'a vendor::VendorRegistry,
}

/// Reassembles, deduplicates, parses, and routes one raw CMDU frame.
/// Returns the reply frames (already CMDU-header-framed) to send back to
/// `source_al_mac`, empty when the frame warranted no reply or was
/// dropped (duplicate, still-fragmenting, or an unrecognized type).
pub fn route_cmdu(ctx: &mut Context, frame: &[u8], input: &RouteInput) -> Result<Vec<Vec<u8>>, AlError> {
    let mut r = ByteReader::new(frame);
    let header = CmduHeader::parse(&mut r).map_err(AlError::Malformed)?;
    let tlv_section = r.peek_remaining();

    let complete_tlv_section = if header.is_last_fragment() && header.fragment_id == 0 {
        tlv_section.to_vec()
    } else {
        let now = ctx.backend.monotonic_now();
        match ctx
            .reassembly
            .insert_fragment(input.source_al_mac, &header, tlv_section, now)
            .map_err(AlError::Malformed)?
        {
            Some(reassembled) => reassembled,
            None => return Ok(Vec::new()),
        }
    };

    let fingerprint =
        CmduFingerprint { source_al_mac: input.source_al_mac, message_id: header.message_id, message_type: header.message_type };
    if ctx.is_duplicate(fingerprint) {
        return Ok(Vec::new());
    }

    let mut tlv_reader = ByteReader::new(&complete_tlv_section);
    let tlvs = al_pdus::tlv::parse_tlv_sequence(&mut tlv_reader).map_err(AlError::Malformed)?;

    let Some(cmdu_type) = CmduType::from_u16(header.message_type) else {
        return Ok(Vec::new());
    };

    match cmdu_type {
        CmduType::TopologyDiscovery => {
            topology::handle_topology_discovery(ctx, input.local_iface, &tlvs)?;
            Ok(Vec::new())
        }
        CmduType::TopologyNotification => {
            topology::handle_topology_notification(ctx, input.source_al_mac);
            Ok(vec![topology::forge_topology_query(ctx.mid_allocator.alloc())])
        }
        CmduType::TopologyQuery => Ok(vec![topology::forge_topology_response(ctx, header.message_id)]),
        CmduType::TopologyResponse => {
            topology::handle_topology_response(ctx, input.source_al_mac, &tlvs)?;
            Ok(Vec::new())
        }
        CmduType::VendorSpecific => {
            Ok(input.vendor_registry.handle(input.source_al_mac, &tlvs, ctx.mid_allocator.alloc()).into_iter().collect())
        }
        CmduType::LinkMetricQuery => {
            let query = tlvs
                .iter()
                .find_map(|t| match t {
                    Tlv::LinkMetricQuery(q) => Some(*q),
                    _ => None,
                })
                .ok_or(AlError::Ignored("LinkMetricQuery carried no LinkMetricQuery TLV"))?;
            Ok(vec![link_metric::handle_link_metric_query(ctx, &query, header.message_id)])
        }
        CmduType::LinkMetricResponse => {
            link_metric::handle_link_metric_response(&tlvs)?;
            Ok(Vec::new())
        }
        CmduType::ApAutoconfigurationSearch => Ok(autoconfig::handle_search(ctx, &tlvs, header.message_id).into_iter().collect()),
        CmduType::ApAutoconfigurationResponse => {
            let radio_uid = input.radio_uid.ok_or(AlError::Ignored("no radio awaiting an autoconfig response"))?;
            let mid = ctx.mid_allocator.alloc();
            Ok(vec![autoconfig::handle_response(ctx, radio_uid, input.identity, mid)?])
        }
        CmduType::ApAutoconfigurationWsc => {
            let wsc_bytes = tlvs
                .iter()
                .find_map(|t| match t {
                    Tlv::Wsc(w) => Some(w.message.clone()),
                    _ => None,
                })
                .ok_or(AlError::Ignored("ApAutoconfigurationWsc carried no Wsc TLV"))?;

            if M1Message::parse(&wsc_bytes).is_ok() {
                let mid = ctx.mid_allocator.alloc();
                Ok(autoconfig::handle_wsc_m1(ctx, input.identity, &wsc_bytes, mid)?)
            } else if M2Message::parse(&wsc_bytes).is_ok() {
                let radio_uid = input.radio_uid.ok_or(AlError::Ignored("no radio awaiting an M2"))?;
                autoconfig::handle_wsc_m2(ctx, radio_uid, input.local_iface_name, &wsc_bytes)?;
                Ok(Vec::new())
            } else {
                Err(AlError::Ignored("ApAutoconfigurationWsc payload was neither M1 nor M2"))
            }
        }
        CmduType::ApAutoconfigurationRenew => Ok(Vec::new()),
        CmduType::PushButtonEventNotification => {
            push_button::handle_push_button_event_notification(ctx, input.local_iface_name, &tlvs)?;
            Ok(Vec::new())
        }
        CmduType::PushButtonJoinNotification => Ok(Vec::new()),
        CmduType::HigherLayerQuery => Ok(vec![higher_layer::handle_higher_layer_query(ctx, header.message_id)]),
        CmduType::HigherLayerResponse => {
            higher_layer::handle_higher_layer_response(ctx, input.source_al_mac, &tlvs)?;
            Ok(Vec::new())
        }
    }
}
