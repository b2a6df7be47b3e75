use al_core::{ByteReader, ByteWriter, PduParseErr};

/// Wsc TLV: carries one complete WSC M1 or M2 message as an opaque
/// attribute blob (top-level spec §4.5). The attribute codec itself
/// (version, nonces, DH public key, Multi-AP sub-element, authenticator...)
/// lives in `crate::wsc`; this TLV is just the outer envelope, since a
/// relay that does not participate in autoconfiguration still needs to
/// forward it unexamined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wsc {
    pub message: Vec<u8>,
}

impl Wsc {
    pub fn parse(r: &mut ByteReader, len: usize) -> Result<Self, PduParseErr> {
        let message = r.read_bytes(len, "wsc_message")?.to_vec();
        Ok(Self { message })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_bytes(&self.message);
    }

    pub fn wire_len(&self) -> u32 {
        self.message.len() as u32
    }
}
