use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

use super::device_info::MediaType;

/// One media type entry of a PushButtonEventNotification TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushButtonMediaEntry {
    pub media_type: MediaType,
    pub media_info: Vec<u8>,
}

/// PushButtonEventNotification TLV: broadcast when the push-button is
/// pressed, naming the media types the sender is now listening on
/// (top-level spec §4.4, push-button enrollment flow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushButtonEventNotification {
    pub media_types: Vec<PushButtonMediaEntry>,
}

impl PushButtonEventNotification {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("media_type_count")? as usize;
        let mut media_types = Vec::with_capacity(count);
        for _ in 0..count {
            let media_type = MediaType::from_u16(r.read_u16("media_type")?)?;
            let info_len = r.read_u8("media_info_len")? as usize;
            let media_info = r.read_bytes(info_len, "media_info")?.to_vec();
            media_types.push(PushButtonMediaEntry { media_type, media_info });
        }
        Ok(Self { media_types })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.media_types.len() as u8);
        for entry in &self.media_types {
            w.write_u16(entry.media_type.as_u16());
            w.write_u8(entry.media_info.len() as u8);
            w.write_bytes(&entry.media_info);
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + self.media_types.iter().map(|e| 2 + 1 + e.media_info.len() as u32).sum::<u32>()
    }
}

/// PushButtonJoinNotification TLV: announces that a neighboring AL entity
/// just completed push-button enrollment, for duplicate-window suppression
/// across the mesh (top-level spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushButtonJoinNotification {
    pub al_mac: MacAddr,
    pub message_id: u16,
    pub local_mac: MacAddr,
    pub new_mac: MacAddr,
}

impl PushButtonJoinNotification {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let al_mac = r.read_mac("al_mac")?;
        let message_id = r.read_u16("message_id")?;
        let local_mac = r.read_mac("local_mac")?;
        let new_mac = r.read_mac("new_mac")?;
        Ok(Self { al_mac, message_id, local_mac, new_mac })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.al_mac);
        w.write_u16(self.message_id);
        w.write_mac(&self.local_mac);
        w.write_mac(&self.new_mac);
    }

    pub fn wire_len(&self) -> u32 {
        6 + 2 + 6 + 6
    }
}
