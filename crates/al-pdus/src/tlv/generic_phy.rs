use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// One interface entry of a GenericPhyDeviceInformation TLV: describes a
/// non-standard PHY that has no `MediaType` tag of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPhyInterface {
    pub mac: MacAddr,
    pub oui: [u8; 3],
    pub variant_index: u8,
    pub variant_name: String,
    pub url_media_spec: Vec<u8>,
    pub media_spec: Vec<u8>,
}

impl GenericPhyInterface {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let mac = r.read_mac("generic_phy_mac")?;
        let oui = [r.read_u8("oui_0")?, r.read_u8("oui_1")?, r.read_u8("oui_2")?];
        let variant_index = r.read_u8("variant_index")?;
        let name_len = r.read_u8("variant_name_len")? as usize;
        let variant_name = String::from_utf8(r.read_bytes(name_len, "variant_name")?.to_vec())
            .map_err(|_| PduParseErr::InvalidValue { field: "variant_name", value: 0 })?;
        let url_len = r.read_u8("url_media_spec_len")? as usize;
        let url_media_spec = r.read_bytes(url_len, "url_media_spec")?.to_vec();
        let spec_len = r.read_u8("media_spec_len")? as usize;
        let media_spec = r.read_bytes(spec_len, "media_spec")?.to_vec();
        Ok(Self { mac, oui, variant_index, variant_name, url_media_spec, media_spec })
    }

    fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.mac);
        w.write_bytes(&self.oui);
        w.write_u8(self.variant_index);
        w.write_u8(self.variant_name.len() as u8);
        w.write_bytes(self.variant_name.as_bytes());
        w.write_u8(self.url_media_spec.len() as u8);
        w.write_bytes(&self.url_media_spec);
        w.write_u8(self.media_spec.len() as u8);
        w.write_bytes(&self.media_spec);
    }

    fn wire_len(&self) -> u32 {
        6 + 3
            + 1
            + 1
            + self.variant_name.len() as u32
            + 1
            + self.url_media_spec.len() as u32
            + 1
            + self.media_spec.len() as u32
    }
}

/// GenericPhyDeviceInformation TLV (top-level spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPhyDeviceInformation {
    pub al_mac: MacAddr,
    pub local_interfaces: Vec<GenericPhyInterface>,
}

impl GenericPhyDeviceInformation {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let al_mac = r.read_mac("al_mac")?;
        let count = r.read_u8("generic_phy_interface_count")? as usize;
        let mut local_interfaces = Vec::with_capacity(count);
        for _ in 0..count {
            local_interfaces.push(GenericPhyInterface::parse(r)?);
        }
        Ok(Self { al_mac, local_interfaces })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.al_mac);
        w.write_u8(self.local_interfaces.len() as u8);
        for iface in &self.local_interfaces {
            iface.forge(w);
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 1 + self.local_interfaces.iter().map(GenericPhyInterface::wire_len).sum::<u32>()
    }
}

/// GenericPhyEvent TLV: an asynchronous PHY-layer event notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPhyEvent {
    pub mac: MacAddr,
    pub oui: [u8; 3],
    pub variant_index: u8,
    pub event_data: Vec<u8>,
}

impl GenericPhyEvent {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let mac = r.read_mac("generic_phy_event_mac")?;
        let oui = [r.read_u8("oui_0")?, r.read_u8("oui_1")?, r.read_u8("oui_2")?];
        let variant_index = r.read_u8("variant_index")?;
        let len = r.read_u16("event_data_len")? as usize;
        let event_data = r.read_bytes(len, "event_data")?.to_vec();
        Ok(Self { mac, oui, variant_index, event_data })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.mac);
        w.write_bytes(&self.oui);
        w.write_u8(self.variant_index);
        w.write_u16(self.event_data.len() as u16);
        w.write_bytes(&self.event_data);
    }

    pub fn wire_len(&self) -> u32 {
        6 + 3 + 1 + 2 + self.event_data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_phy_device_information_round_trips() {
        let v = GenericPhyDeviceInformation {
            al_mac: MacAddr::new([1; 6]),
            local_interfaces: vec![GenericPhyInterface {
                mac: MacAddr::new([2; 6]),
                oui: [0x00, 0x1b, 0x19],
                variant_index: 1,
                variant_name: "hpav".into(),
                url_media_spec: vec![1, 2],
                media_spec: vec![3, 4, 5],
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(GenericPhyDeviceInformation::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn generic_phy_event_round_trips() {
        let v = GenericPhyEvent {
            mac: MacAddr::new([1; 6]),
            oui: [0x00, 0x1b, 0x19],
            variant_index: 2,
            event_data: vec![9, 9, 9],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(GenericPhyEvent::parse(&mut r).unwrap(), v);
    }
}
