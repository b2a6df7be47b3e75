use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// PowerOffInterface TLV: local interfaces to power down (top-level spec
/// §4.4, vendor-optional power management extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerOffInterface {
    pub interfaces: Vec<MacAddr>,
}

impl PowerOffInterface {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("power_off_interface_count")? as usize;
        let mut interfaces = Vec::with_capacity(count);
        for _ in 0..count {
            interfaces.push(r.read_mac("power_off_interface_mac")?);
        }
        Ok(Self { interfaces })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.interfaces.len() as u8);
        for mac in &self.interfaces {
            w.write_mac(mac);
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + 6 * self.interfaces.len() as u32
    }
}

/// Requested power state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedPowerState {
    On,
    Off,
    PowerSave,
}

impl RequestedPowerState {
    fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(RequestedPowerState::Off),
            0x01 => Ok(RequestedPowerState::On),
            0x02 => Ok(RequestedPowerState::PowerSave),
            other => Err(PduParseErr::InvalidValue { field: "requested_power_state", value: other as u64 }),
        }
    }
    fn as_u8(self) -> u8 {
        match self {
            RequestedPowerState::Off => 0x00,
            RequestedPowerState::On => 0x01,
            RequestedPowerState::PowerSave => 0x02,
        }
    }
}

/// InterfacePowerChangeInformation TLV: requests a power-state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfacePowerChangeInformation {
    pub entries: Vec<(MacAddr, RequestedPowerState)>,
}

impl InterfacePowerChangeInformation {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("power_change_count")? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let mac = r.read_mac("power_change_mac")?;
            let state = RequestedPowerState::from_u8(r.read_u8("power_change_state")?)?;
            entries.push((mac, state));
        }
        Ok(Self { entries })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.entries.len() as u8);
        for (mac, state) in &self.entries {
            w.write_mac(mac);
            w.write_u8(state.as_u8());
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + 7 * self.entries.len() as u32
    }
}

/// Result of applying a requested power-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerChangeResult {
    Completed,
    NoChange,
    Error,
}

impl PowerChangeResult {
    fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(PowerChangeResult::Completed),
            0x01 => Ok(PowerChangeResult::NoChange),
            0x02 => Ok(PowerChangeResult::Error),
            other => Err(PduParseErr::InvalidValue { field: "power_change_result", value: other as u64 }),
        }
    }
    fn as_u8(self) -> u8 {
        match self {
            PowerChangeResult::Completed => 0x00,
            PowerChangeResult::NoChange => 0x01,
            PowerChangeResult::Error => 0x02,
        }
    }
}

/// InterfacePowerChangeStatus TLV: reply to InterfacePowerChangeInformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfacePowerChangeStatus {
    pub entries: Vec<(MacAddr, PowerChangeResult)>,
}

impl InterfacePowerChangeStatus {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("power_status_count")? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let mac = r.read_mac("power_status_mac")?;
            let result = PowerChangeResult::from_u8(r.read_u8("power_status_result")?)?;
            entries.push((mac, result));
        }
        Ok(Self { entries })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.entries.len() as u8);
        for (mac, result) in &self.entries {
            w.write_mac(mac);
            w.write_u8(result.as_u8());
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + 7 * self.entries.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_off_interface_round_trips() {
        let v = PowerOffInterface { interfaces: vec![MacAddr::new([1; 6]), MacAddr::new([2; 6])] };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(PowerOffInterface::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn interface_power_change_round_trips() {
        let info = InterfacePowerChangeInformation {
            entries: vec![(MacAddr::new([1; 6]), RequestedPowerState::PowerSave)],
        };
        let mut w = ByteWriter::new();
        info.forge(&mut w);
        assert_eq!(w.len() as u32, info.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(InterfacePowerChangeInformation::parse(&mut r).unwrap(), info);

        let status = InterfacePowerChangeStatus {
            entries: vec![(MacAddr::new([1; 6]), PowerChangeResult::Completed)],
        };
        let mut w = ByteWriter::new();
        status.forge(&mut w);
        assert_eq!(w.len() as u32, status.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(InterfacePowerChangeStatus::parse(&mut r).unwrap(), status);
    }
}
