use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// Multi-AP service roles advertised by SupportedService/SearchedService
/// TLVs (top-level spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiApServiceType {
    MultiApController,
    MultiApAgent,
}

impl MultiApServiceType {
    fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(MultiApServiceType::MultiApController),
            0x01 => Ok(MultiApServiceType::MultiApAgent),
            other => Err(PduParseErr::InvalidValue { field: "multiap_service", value: other as u64 }),
        }
    }
    fn as_u8(self) -> u8 {
        match self {
            MultiApServiceType::MultiApController => 0x00,
            MultiApServiceType::MultiApAgent => 0x01,
        }
    }
}

fn parse_service_list(r: &mut ByteReader) -> Result<Vec<MultiApServiceType>, PduParseErr> {
    let count = r.read_u8("service_count")? as usize;
    let mut services = Vec::with_capacity(count);
    for _ in 0..count {
        services.push(MultiApServiceType::from_u8(r.read_u8("service")?)?);
    }
    Ok(services)
}

fn forge_service_list(w: &mut ByteWriter, services: &[MultiApServiceType]) {
    w.write_u8(services.len() as u8);
    for s in services {
        w.write_u8(s.as_u8());
    }
}

/// SupportedService TLV: the Multi-AP roles this device implements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedService {
    pub services: Vec<MultiApServiceType>,
}

impl SupportedService {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { services: parse_service_list(r)? })
    }
    pub fn forge(&self, w: &mut ByteWriter) {
        forge_service_list(w, &self.services);
    }
    pub fn wire_len(&self) -> u32 {
        1 + self.services.len() as u32
    }
}

/// SearchedService TLV: the Multi-AP roles this device is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchedService {
    pub services: Vec<MultiApServiceType>,
}

impl SearchedService {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { services: parse_service_list(r)? })
    }
    pub fn forge(&self, w: &mut ByteWriter) {
        forge_service_list(w, &self.services);
    }
    pub fn wire_len(&self) -> u32 {
        1 + self.services.len() as u32
    }
}

/// ApRadioIdentifier TLV: names a radio by its unique identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApRadioIdentifier {
    pub radio_unique_id: MacAddr,
}

impl ApRadioIdentifier {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { radio_unique_id: r.read_mac("radio_unique_id")? })
    }
    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.radio_unique_id);
    }
    pub fn wire_len(&self) -> u32 {
        6
    }
}

/// One operational BSS entry: BSSID plus SSID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalBssEntry {
    pub bssid: MacAddr,
    pub ssid: String,
}

/// One radio's set of currently operating BSSes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalRadioEntry {
    pub radio_unique_id: MacAddr,
    pub bsses: Vec<OperationalBssEntry>,
}

/// ApOperationalBss TLV (top-level spec §4.6: AP Autoconfiguration WSC
/// replies carry the operating BSS set back to the controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApOperationalBss {
    pub radios: Vec<OperationalRadioEntry>,
}

impl ApOperationalBss {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let radio_count = r.read_u8("radio_count")? as usize;
        let mut radios = Vec::with_capacity(radio_count);
        for _ in 0..radio_count {
            let radio_unique_id = r.read_mac("radio_unique_id")?;
            let bss_count = r.read_u8("bss_count")? as usize;
            let mut bsses = Vec::with_capacity(bss_count);
            for _ in 0..bss_count {
                let bssid = r.read_mac("bssid")?;
                let ssid_len = r.read_u8("ssid_len")? as usize;
                let ssid = String::from_utf8(r.read_bytes(ssid_len, "ssid")?.to_vec())
                    .map_err(|_| PduParseErr::InvalidValue { field: "ssid", value: 0 })?;
                bsses.push(OperationalBssEntry { bssid, ssid });
            }
            radios.push(OperationalRadioEntry { radio_unique_id, bsses });
        }
        Ok(Self { radios })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.radios.len() as u8);
        for radio in &self.radios {
            w.write_mac(&radio.radio_unique_id);
            w.write_u8(radio.bsses.len() as u8);
            for bss in &radio.bsses {
                w.write_mac(&bss.bssid);
                w.write_u8(bss.ssid.len() as u8);
                w.write_bytes(bss.ssid.as_bytes());
            }
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + self
            .radios
            .iter()
            .map(|radio| {
                6 + 1 + radio.bsses.iter().map(|b| 6 + 1 + b.ssid.len() as u32).sum::<u32>()
            })
            .sum::<u32>()
    }
}

/// One supported operating class and the channels disallowed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingClassEntry {
    pub class_num: u8,
    pub max_tx_power_dbm: i8,
    pub non_operable_channels: Vec<u8>,
}

/// ApRadioBasicCapabilities TLV: a radio's BSS limit and operating classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApRadioBasicCapabilities {
    pub radio_unique_id: MacAddr,
    pub max_bsses: u8,
    pub operating_classes: Vec<OperatingClassEntry>,
}

impl ApRadioBasicCapabilities {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let radio_unique_id = r.read_mac("radio_unique_id")?;
        let max_bsses = r.read_u8("max_bsses")?;
        let class_count = r.read_u8("operating_class_count")? as usize;
        let mut operating_classes = Vec::with_capacity(class_count);
        for _ in 0..class_count {
            let class_num = r.read_u8("operating_class_num")?;
            let max_tx_power_dbm = r.read_u8("max_tx_power")? as i8;
            let channel_count = r.read_u8("non_operable_channel_count")? as usize;
            let non_operable_channels = r.read_bytes(channel_count, "non_operable_channels")?.to_vec();
            operating_classes.push(OperatingClassEntry { class_num, max_tx_power_dbm, non_operable_channels });
        }
        Ok(Self { radio_unique_id, max_bsses, operating_classes })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.radio_unique_id);
        w.write_u8(self.max_bsses);
        w.write_u8(self.operating_classes.len() as u8);
        for class in &self.operating_classes {
            w.write_u8(class.class_num);
            w.write_u8(class.max_tx_power_dbm as u8);
            w.write_u8(class.non_operable_channels.len() as u8);
            w.write_bytes(&class.non_operable_channels);
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 1
            + 1
            + self
                .operating_classes
                .iter()
                .map(|c| 1 + 1 + 1 + c.non_operable_channels.len() as u32)
                .sum::<u32>()
    }
}

/// BackhaulStaRadioCapabilities TLV: whether a radio can also act as a
/// backhaul STA, and the MAC it would use if so (top-level spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackhaulStaRadioCapabilities {
    pub radio_unique_id: MacAddr,
    pub backhaul_sta_mac: Option<MacAddr>,
}

impl BackhaulStaRadioCapabilities {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let radio_unique_id = r.read_mac("radio_unique_id")?;
        let present = r.read_u8("backhaul_sta_mac_present")? != 0;
        let backhaul_sta_mac =
            if present { Some(r.read_mac("backhaul_sta_mac")?) } else { r.skip(6, "unused_mac")?; None };
        Ok(Self { radio_unique_id, backhaul_sta_mac })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.radio_unique_id);
        w.write_u8(if self.backhaul_sta_mac.is_some() { 1 } else { 0 });
        w.write_mac(&self.backhaul_sta_mac.unwrap_or(MacAddr::ZERO));
    }

    pub fn wire_len(&self) -> u32 {
        6 + 1 + 6
    }
}

/// MultiApProfile TLV: the highest profile level a device supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiApProfile {
    Profile1,
    Profile2,
    Profile3,
}

impl MultiApProfile {
    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x01 => Ok(MultiApProfile::Profile1),
            0x02 => Ok(MultiApProfile::Profile2),
            0x03 => Ok(MultiApProfile::Profile3),
            other => Err(PduParseErr::InvalidValue { field: "multiap_profile", value: other as u64 }),
        }
    }
    pub fn raw(self) -> u8 {
        match self {
            MultiApProfile::Profile1 => 0x01,
            MultiApProfile::Profile2 => 0x02,
            MultiApProfile::Profile3 => 0x03,
        }
    }
}

/// MultiApExtension TLV: a single bitmask byte (top-level spec §4.6:
/// fronthaul/backhaul-BSS/backhaul-STA/teardown bits, reused from the WSC
/// M2 vendor sub-element encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiApExtension {
    bits: u8,
}

impl MultiApExtension {
    pub const FRONTHAUL_BSS: u8 = 0x80;
    pub const BACKHAUL_BSS: u8 = 0x40;
    pub const BACKHAUL_STA: u8 = 0x20;
    pub const TEARDOWN: u8 = 0x10;

    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        Ok(Self { bits: v })
    }
    pub fn raw(self) -> u8 {
        self.bits
    }
    pub fn new(bits: u8) -> Self {
        Self { bits }
    }
    pub fn has(self, flag: u8) -> bool {
        self.bits & flag != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_service_round_trips() {
        let v = SupportedService { services: vec![MultiApServiceType::MultiApAgent] };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(SupportedService::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn ap_operational_bss_round_trips() {
        let v = ApOperationalBss {
            radios: vec![OperationalRadioEntry {
                radio_unique_id: MacAddr::new([1; 6]),
                bsses: vec![OperationalBssEntry { bssid: MacAddr::new([2; 6]), ssid: "Mesh-5G".into() }],
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(ApOperationalBss::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn backhaul_sta_radio_capabilities_round_trips_absent() {
        let v = BackhaulStaRadioCapabilities {
            radio_unique_id: MacAddr::new([1; 6]),
            backhaul_sta_mac: None,
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(BackhaulStaRadioCapabilities::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn multiap_extension_bits() {
        let ext = MultiApExtension::new(MultiApExtension::FRONTHAUL_BSS | MultiApExtension::TEARDOWN);
        assert!(ext.has(MultiApExtension::FRONTHAUL_BSS));
        assert!(!ext.has(MultiApExtension::BACKHAUL_STA));
    }
}
