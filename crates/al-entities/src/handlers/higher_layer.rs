//! HigherLayerQuery / HigherLayerResponse (top-level spec §4.4): profile
//! version, identification, control URL, and IP address lists for
//! management tooling.

use al_core::{AlError, ByteWriter, MacAddr};
use al_pdus::cmdu::{CmduHeader, CmduType};
use al_pdus::tlv::misc::{ControlUrl, DeviceIdentification, ProfileVersion};
use al_pdus::tlv::Tlv;

use crate::dispatch::Context;

pub fn forge_higher_layer_query(message_id: u16) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::HigherLayerQuery.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::EndOfMessage.forge(&mut w).expect("always forges");
    w.as_slice().to_vec()
}

/// Builds the local device's HigherLayerResponse (top-level spec §4.4).
pub fn handle_higher_layer_query(ctx: &Context, message_id: u16) -> Vec<u8> {
    let local = &ctx.network.local_device;
    let header = CmduHeader::new(CmduType::HigherLayerResponse.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);

    if let Ok(version) = ProfileVersion::from_u8(local.profile_version) {
        Tlv::ProfileVersion(version).forge(&mut w).expect("always forges");
    }
    Tlv::DeviceIdentification(DeviceIdentification {
        friendly_name: local.friendly_name.clone(),
        manufacturer_name: local.manufacturer_name.clone(),
        model_name: local.model_name.clone(),
    })
    .forge(&mut w)
    .expect("always forges");
    if let Some(url) = &local.control_url {
        Tlv::ControlUrl(ControlUrl { url: url.clone() }).forge(&mut w).expect("always forges");
    }
    Tlv::EndOfMessage.forge(&mut w).expect("always forges");
    w.as_slice().to_vec()
}

/// Records the identification fields a remote device's HigherLayerResponse
/// carries (top-level spec §4.4, §4.6).
pub fn handle_higher_layer_response(ctx: &mut Context, sender_al_mac: MacAddr, tlvs: &[Tlv]) -> Result<(), AlError> {
    let now = ctx.backend.monotonic_now();
    let device = ctx.network.upsert_remote_device(sender_al_mac, now);
    for t in tlvs {
        match t {
            Tlv::ProfileVersion(v) => device.profile_version = v.raw(),
            Tlv::DeviceIdentification(id) => {
                device.friendly_name = id.friendly_name.clone();
                device.manufacturer_name = id.manufacturer_name.clone();
                device.model_name = id.model_name.clone();
            }
            Tlv::ControlUrl(url) => device.control_url = Some(url.url.clone()),
            _ => {}
        }
    }
    Ok(())
}
