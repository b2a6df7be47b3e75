use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

use super::vendor::{PowerState, ReasonCode};

/// One vendor-specific information element attached to an interface
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSpecificInfo {
    pub oui: [u8; 3],
    pub data: Vec<u8>,
}

impl VendorSpecificInfo {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let len = r.read_u16("ie_length")? as usize;
        if len < 3 {
            return Err(PduParseErr::InvalidLength { expected: 3, found: len });
        }
        let oui = <[u8; 3]>::try_from(r.read_bytes(3, "oui")?).unwrap();
        let data = r.read_bytes(len - 3, "vendor_si")?.to_vec();
        Ok(Self { oui, data })
    }

    fn forge(&self, w: &mut ByteWriter) {
        w.write_u16((3 + self.data.len()) as u16);
        w.write_bytes(&self.oui);
        w.write_bytes(&self.data);
    }

    fn wire_len(&self) -> usize {
        2 + 3 + self.data.len()
    }
}

/// ALME-GET-INTF-LIST.response interface descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntfDescriptorEntry {
    pub interface_address: MacAddr,
    pub interface_type: u16,
    pub bridge_flag: bool,
    pub vendor_specific_info: Vec<VendorSpecificInfo>,
}

impl IntfDescriptorEntry {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let interface_address = r.read_mac("interface_address")?;
        let interface_type = r.read_u16("interface_type")?;
        let bridge_flag = r.read_u8("bridge_flag")? != 0;
        let count = r.read_u8("vendor_specific_info_nr")? as usize;
        let mut vendor_specific_info = Vec::with_capacity(count);
        for _ in 0..count {
            vendor_specific_info.push(VendorSpecificInfo::parse(r)?);
        }
        Ok(Self { interface_address, interface_type, bridge_flag, vendor_specific_info })
    }

    fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.interface_address);
        w.write_u16(self.interface_type);
        w.write_u8(self.bridge_flag as u8);
        w.write_u8(self.vendor_specific_info.len() as u8);
        for ie in &self.vendor_specific_info {
            ie.forge(w);
        }
    }

    fn wire_len(&self) -> usize {
        6 + 2 + 1 + 1 + self.vendor_specific_info.iter().map(VendorSpecificInfo::wire_len).sum::<usize>()
    }
}

/// ALME-GET-INTF-LIST.response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetIntfListResponse {
    pub interface_descriptors: Vec<IntfDescriptorEntry>,
}

impl GetIntfListResponse {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("interface_descriptors_nr")? as usize;
        let mut interface_descriptors = Vec::with_capacity(count);
        for _ in 0..count {
            interface_descriptors.push(IntfDescriptorEntry::parse(r)?);
        }
        Ok(Self { interface_descriptors })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.interface_descriptors.len() as u8);
        for entry in &self.interface_descriptors {
            entry.forge(w);
        }
    }

    pub fn wire_len(&self) -> usize {
        1 + self.interface_descriptors.iter().map(IntfDescriptorEntry::wire_len).sum::<usize>()
    }
}

/// ALME-SET-INTF-PWR-STATE.request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetIntfPwrStateRequest {
    pub interface_address: MacAddr,
    pub power_state: PowerState,
}

impl SetIntfPwrStateRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let interface_address = r.read_mac("interface_address")?;
        let power_state = PowerState::from_u8(r.read_u8("power_state")?)?;
        Ok(Self { interface_address, power_state })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.interface_address);
        w.write_u8(self.power_state.as_u8());
    }
}

/// ALME-SET-INTF-PWR-STATE.confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetIntfPwrStateConfirm {
    pub interface_address: MacAddr,
    pub reason_code: ReasonCode,
}

impl SetIntfPwrStateConfirm {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let interface_address = r.read_mac("interface_address")?;
        let reason_code = ReasonCode::from_u8(r.read_u8("reason_code")?)?;
        Ok(Self { interface_address, reason_code })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.interface_address);
        w.write_u8(self.reason_code.as_u8());
    }
}

/// ALME-GET-INTF-PWR-STATE.request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetIntfPwrStateRequest {
    pub interface_address: MacAddr,
}

impl GetIntfPwrStateRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { interface_address: r.read_mac("interface_address")? })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.interface_address);
    }
}

/// ALME-GET-INTF-PWR-STATE.response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetIntfPwrStateResponse {
    pub interface_address: MacAddr,
    pub power_state: PowerState,
}

impl GetIntfPwrStateResponse {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let interface_address = r.read_mac("interface_address")?;
        let power_state = PowerState::from_u8(r.read_u8("power_state")?)?;
        Ok(Self { interface_address, power_state })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.interface_address);
        w.write_u8(self.power_state.as_u8());
    }
}
