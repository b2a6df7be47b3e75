use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// Closed enumeration of interface media types (top-level spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    EthernetFast,
    EthernetGigabit,
    Wifi80211b24Ghz,
    Wifi80211g24Ghz,
    Wifi80211a5Ghz,
    Wifi80211n24Ghz,
    Wifi80211n5Ghz,
    Wifi80211ac5Ghz,
    Hpav1901Wavelet,
    Hpav1901Fft,
    Moca11,
    GenericPhy,
}

impl MediaType {
    pub fn from_u16(v: u16) -> Result<MediaType, PduParseErr> {
        use MediaType::*;
        Ok(match v {
            0x0000 => EthernetFast,
            0x0001 => EthernetGigabit,
            0x0100 => Wifi80211b24Ghz,
            0x0101 => Wifi80211g24Ghz,
            0x0102 => Wifi80211a5Ghz,
            0x0103 => Wifi80211n24Ghz,
            0x0104 => Wifi80211n5Ghz,
            0x0105 => Wifi80211ac5Ghz,
            0x0200 => Hpav1901Wavelet,
            0x0201 => Hpav1901Fft,
            0x0300 => Moca11,
            0xffff => GenericPhy,
            other => return Err(PduParseErr::InvalidValue { field: "media_type", value: other as u64 }),
        })
    }

    pub fn as_u16(self) -> u16 {
        use MediaType::*;
        match self {
            EthernetFast => 0x0000,
            EthernetGigabit => 0x0001,
            Wifi80211b24Ghz => 0x0100,
            Wifi80211g24Ghz => 0x0101,
            Wifi80211a5Ghz => 0x0102,
            Wifi80211n24Ghz => 0x0103,
            Wifi80211n5Ghz => 0x0104,
            Wifi80211ac5Ghz => 0x0105,
            Hpav1901Wavelet => 0x0200,
            Hpav1901Fft => 0x0201,
            Moca11 => 0x0300,
            GenericPhy => 0xffff,
        }
    }

    pub fn is_wifi(self) -> bool {
        matches!(
            self,
            MediaType::Wifi80211b24Ghz
                | MediaType::Wifi80211g24Ghz
                | MediaType::Wifi80211a5Ghz
                | MediaType::Wifi80211n24Ghz
                | MediaType::Wifi80211n5Ghz
                | MediaType::Wifi80211ac5Ghz
        )
    }
}

/// One entry of a `DeviceInformation` TLV's local interface list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterface {
    pub mac: MacAddr,
    pub media_type: MediaType,
    pub media_info: Vec<u8>,
}

impl LocalInterface {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let mac = r.read_mac("local_interface_mac")?;
        let media_type = MediaType::from_u16(r.read_u16("media_type")?)?;
        let info_len = r.read_u8("media_info_len")? as usize;
        let media_info = r.read_bytes(info_len, "media_info")?.to_vec();
        Ok(Self { mac, media_type, media_info })
    }

    fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.mac);
        w.write_u16(self.media_type.as_u16());
        w.write_u8(self.media_info.len() as u8);
        w.write_bytes(&self.media_info);
    }

    fn wire_len(&self) -> u32 {
        6 + 2 + 1 + self.media_info.len() as u32
    }
}

/// DeviceInformation TLV (top-level spec §4.4: TopologyResponse content).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInformation {
    pub al_mac: MacAddr,
    pub local_interfaces: Vec<LocalInterface>,
}

impl DeviceInformation {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let al_mac = r.read_mac("al_mac")?;
        let count = r.read_u8("local_interface_count")? as usize;
        let mut local_interfaces = Vec::with_capacity(count);
        for _ in 0..count {
            local_interfaces.push(LocalInterface::parse(r)?);
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
        6 + 1 + self.local_interfaces.iter().map(LocalInterface::wire_len).sum::<u32>()
    }
}

/// DeviceBridgingCapability TLV: each inner vector is one bridging tuple
/// (the set of local interfaces bridged together).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBridgingCapability {
    pub bridging_tuples: Vec<Vec<MacAddr>>,
}

impl DeviceBridgingCapability {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let tuple_count = r.read_u8("bridging_tuple_count")? as usize;
        let mut bridging_tuples = Vec::with_capacity(tuple_count);
        for _ in 0..tuple_count {
            let mac_count = r.read_u8("bridging_tuple_mac_count")? as usize;
            let mut macs = Vec::with_capacity(mac_count);
            for _ in 0..mac_count {
                macs.push(r.read_mac("bridging_tuple_mac")?);
            }
            bridging_tuples.push(macs);
        }
        Ok(Self { bridging_tuples })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.bridging_tuples.len() as u8);
        for tuple in &self.bridging_tuples {
            w.write_u8(tuple.len() as u8);
            for mac in tuple {
                w.write_mac(mac);
            }
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + self.bridging_tuples.iter().map(|t| 1 + 6 * t.len() as u32).sum::<u32>()
    }
}
