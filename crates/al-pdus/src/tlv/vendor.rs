use al_core::{ByteReader, ByteWriter, PduParseErr};

/// VendorSpecific TLV: an OUI-scoped opaque payload (top-level spec §4.2).
/// This rewrite does not interpret vendor payloads beyond the Multi-AP
/// sub-elements carried inside WSC attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSpecific {
    pub oui: [u8; 3],
    pub payload: Vec<u8>,
}

impl VendorSpecific {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let oui = [r.read_u8("oui_0")?, r.read_u8("oui_1")?, r.read_u8("oui_2")?];
        let payload = r.peek_remaining().to_vec();
        r.skip(payload.len(), "vendor_payload")?;
        Ok(Self { oui, payload })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_bytes(&self.oui);
        w.write_bytes(&self.payload);
    }

    pub fn wire_len(&self) -> u32 {
        3 + self.payload.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_specific_round_trips() {
        let v = VendorSpecific { oui: [0x00, 0x37, 0x2a], payload: vec![1, 2, 3, 4] };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(VendorSpecific::parse(&mut r).unwrap(), v);
    }
}
