use al_core::{ByteReader, ByteWriter, PduParseErr};

/// Interface power states (top-level spec §6, "Table 5.4").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    PowerSave,
    Off,
}

impl PowerState {
    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(PowerState::On),
            0x01 => Ok(PowerState::PowerSave),
            0x02 => Ok(PowerState::Off),
            other => Err(PduParseErr::InvalidValue { field: "power_state", value: other as u64 }),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            PowerState::On => 0x00,
            PowerState::PowerSave => 0x01,
            PowerState::Off => 0x02,
        }
    }
}

/// ALME confirm/response reason codes (top-level spec §6, "Table 5.19").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    Success,
    UnmatchedMacAddress,
    UnsupportedPwrState,
    UnavailablePwrState,
    NbrOfFwdRuleExceeded,
    InvalidRuleId,
    DuplicateClassificationSet,
    UnmatchedNeighborMacAddress,
    Failure,
}

impl ReasonCode {
    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(ReasonCode::Success),
            0x01 => Ok(ReasonCode::UnmatchedMacAddress),
            0x02 => Ok(ReasonCode::UnsupportedPwrState),
            0x03 => Ok(ReasonCode::UnavailablePwrState),
            0x04 => Ok(ReasonCode::NbrOfFwdRuleExceeded),
            0x05 => Ok(ReasonCode::InvalidRuleId),
            0x06 => Ok(ReasonCode::DuplicateClassificationSet),
            0x07 => Ok(ReasonCode::UnmatchedNeighborMacAddress),
            0x10 => Ok(ReasonCode::Failure),
            other => Err(PduParseErr::InvalidValue { field: "reason_code", value: other as u64 }),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ReasonCode::Success => 0x00,
            ReasonCode::UnmatchedMacAddress => 0x01,
            ReasonCode::UnsupportedPwrState => 0x02,
            ReasonCode::UnavailablePwrState => 0x03,
            ReasonCode::NbrOfFwdRuleExceeded => 0x04,
            ReasonCode::InvalidRuleId => 0x05,
            ReasonCode::DuplicateClassificationSet => 0x06,
            ReasonCode::UnmatchedNeighborMacAddress => 0x07,
            ReasonCode::Failure => 0x10,
        }
    }
}

/// Vendor convenience command ids. Not part of the standard; kept for
/// operational tooling (top-level spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomCommand {
    DumpNetworkDevices,
}

impl CustomCommand {
    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x01 => Ok(CustomCommand::DumpNetworkDevices),
            other => Err(PduParseErr::InvalidValue { field: "custom_command", value: other as u64 }),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            CustomCommand::DumpNetworkDevices => 0x01,
        }
    }
}

/// ALME-CUSTOM-COMMAND.request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomCommandRequest {
    pub command: CustomCommand,
}

impl CustomCommandRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { command: CustomCommand::from_u8(r.read_u8("command")?)? })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.command.as_u8());
    }
}

/// ALME-CUSTOM-COMMAND.response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommandResponse {
    pub bytes: Vec<u8>,
}

impl CustomCommandResponse {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let len = r.read_u16("bytes_nr")? as usize;
        Ok(Self { bytes: r.read_bytes(len, "bytes")?.to_vec() })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u16(self.bytes.len() as u16);
        w.write_bytes(&self.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_command_response_round_trips() {
        let v = CustomCommandResponse { bytes: b"AL_MAC 00:4f:21:03:ab:0c\n".to_vec() };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(CustomCommandResponse::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn power_state_rejects_unknown() {
        assert!(PowerState::from_u8(0x09).is_err());
    }
}
