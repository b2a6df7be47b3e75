use al_core::{ByteWriter, PduParseErr};

use crate::tlv::Tlv;

use super::header::CmduHeader;

/// Split a CMDU's TLV sequence into wire-ready fragments on TLV boundaries
/// (top-level spec §4.3). Each returned buffer is a complete Ethernet
/// payload: 8-byte header, the TLVs assigned to that fragment, and that
/// fragment's own End-of-message. The last fragment has
/// `CmduHeader::LAST_FRAGMENT` set; `relay` is copied onto every fragment.
pub fn fragment_cmdu(
    message_type: u16,
    message_id: u16,
    relay: bool,
    tlvs: &[Tlv],
    max_fragment_payload: usize,
) -> Result<Vec<Vec<u8>>, PduParseErr> {
    let overhead = CmduHeader::WIRE_LEN + 3; // header + this fragment's End-of-message
    let mut fragments: Vec<Vec<&Tlv>> = Vec::new();
    let mut current: Vec<&Tlv> = Vec::new();
    let mut current_len = overhead;

    for tlv in tlvs {
        let tlv_len = tlv.total_len() as usize;
        if overhead + tlv_len > max_fragment_payload {
            return Err(PduParseErr::InvalidLength {
                expected: max_fragment_payload,
                found: overhead + tlv_len,
            });
        }
        if !current.is_empty() && current_len + tlv_len > max_fragment_payload {
            fragments.push(std::mem::take(&mut current));
            current_len = overhead;
        }
        current.push(tlv);
        current_len += tlv_len;
    }
    fragments.push(current);

    if fragments.len() > 255 {
        return Err(PduParseErr::InvalidLength { expected: 255, found: fragments.len() });
    }

    let last_idx = fragments.len() - 1;
    let mut out = Vec::with_capacity(fragments.len());
    for (i, group) in fragments.into_iter().enumerate() {
        let mut flags = 0u8;
        if i == last_idx {
            flags |= CmduHeader::LAST_FRAGMENT;
        }
        if relay {
            flags |= CmduHeader::RELAY_INDICATOR;
        }
        let header = CmduHeader { message_type, message_id, fragment_id: i as u8, flags };
        let mut w = ByteWriter::new();
        header.forge(&mut w);
        for tlv in group {
            tlv.forge(&mut w)?;
        }
        Tlv::EndOfMessage.forge(&mut w)?;
        out.push(w.into_vec());
    }
    Ok(out)
}
