//! VendorSpecific CMDU dispatch (top-level spec §4.4: "passed unchanged to
//! a vendor handler registered for the OUI; otherwise silently dropped").
//! Handlers are plain closures so the daemon binary can register its own
//! without this crate knowing about any concrete vendor extension.

use al_core::{ByteWriter, MacAddr};
use al_pdus::cmdu::{CmduHeader, CmduType};
use al_pdus::tlv::{Tlv, VendorSpecific};
use std::collections::HashMap;

/// A registered vendor handler: given the sender and the opaque payload,
/// may return a VendorSpecific reply CMDU's payload bytes to send back.
pub type VendorHandler = Box<dyn Fn(MacAddr, &[u8]) -> Option<Vec<u8>> + Send + Sync>;

#[derive(Default)]
pub struct VendorRegistry {
    handlers: HashMap<[u8; 3], VendorHandler>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, oui: [u8; 3], handler: VendorHandler) {
        self.handlers.insert(oui, handler);
    }

    pub fn is_registered(&self, oui: [u8; 3]) -> bool {
        self.handlers.contains_key(&oui)
    }

    /// Dispatches a VendorSpecific CMDU's TLVs to the matching OUI handler,
    /// dropping the frame silently if none is registered.
    pub fn handle(&self, sender: MacAddr, tlvs: &[Tlv], reply_message_id: u16) -> Option<Vec<u8>> {
        let vendor = tlvs.iter().find_map(|t| match t {
            Tlv::VendorSpecific(v) => Some(v),
            _ => None,
        })?;
        let handler = self.handlers.get(&vendor.oui)?;
        let reply_payload = handler(sender, &vendor.payload)?;

        let header = CmduHeader::new(CmduType::VendorSpecific.as_u16(), reply_message_id);
        let mut w = ByteWriter::new();
        header.forge(&mut w);
        Tlv::VendorSpecific(VendorSpecific { oui: vendor.oui, payload: reply_payload })
            .forge(&mut w)
            .expect("always forges");
        Tlv::EndOfMessage.forge(&mut w).expect("always forges");
        Some(w.as_slice().to_vec())
    }
}

pub fn forge_vendor_specific(oui: [u8; 3], payload: Vec<u8>, message_id: u16) -> Vec<u8> {
    let header = CmduHeader::new(CmduType::VendorSpecific.as_u16(), message_id);
    let mut w = ByteWriter::new();
    header.forge(&mut w);
    Tlv::VendorSpecific(VendorSpecific { oui, payload }).forge(&mut w).expect("always forges");
    Tlv::EndOfMessage.forge(&mut w).expect("always forges");
    w.as_slice().to_vec()
}
