use al_core::{ByteReader, ByteWriter, PduParseErr};

fn read_short_string(r: &mut ByteReader, field: &'static str) -> Result<String, PduParseErr> {
    let len = r.read_u8(field)? as usize;
    let bytes = r.read_bytes(len, field)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| PduParseErr::InvalidValue { field, value: 0 })
}

fn write_short_string(w: &mut ByteWriter, s: &str) {
    w.write_u8(s.len() as u8);
    w.write_bytes(s.as_bytes());
}

/// DeviceIdentification TLV: human-readable device identity (top-level
/// spec §4.4, carried in TopologyResponse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentification {
    pub friendly_name: String,
    pub manufacturer_name: String,
    pub model_name: String,
}

impl DeviceIdentification {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let friendly_name = read_short_string(r, "friendly_name")?;
        let manufacturer_name = read_short_string(r, "manufacturer_name")?;
        let model_name = read_short_string(r, "model_name")?;
        Ok(Self { friendly_name, manufacturer_name, model_name })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        write_short_string(w, &self.friendly_name);
        write_short_string(w, &self.manufacturer_name);
        write_short_string(w, &self.model_name);
    }

    pub fn wire_len(&self) -> u32 {
        (3 + self.friendly_name.len() + self.manufacturer_name.len() + self.model_name.len()) as u32
    }
}

/// ControlUrl TLV: WFA vendor extension pointing at a device's management
/// UI. Runs to the end of the TLV, so `parse` takes the declared length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlUrl {
    pub url: String,
}

impl ControlUrl {
    pub fn parse(r: &mut ByteReader, len: usize) -> Result<Self, PduParseErr> {
        let bytes = r.read_bytes(len, "control_url")?;
        let url = String::from_utf8(bytes.to_vec())
            .map_err(|_| PduParseErr::InvalidValue { field: "control_url", value: 0 })?;
        Ok(Self { url })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_bytes(self.url.as_bytes());
    }

    pub fn wire_len(&self) -> u32 {
        self.url.len() as u32
    }
}

/// ProfileVersion TLV: the highest Multi-AP profile a device supports
/// (top-level spec §4.6: Multi-AP profile gating).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVersion {
    Profile1,
    Profile2,
    Profile3,
}

impl ProfileVersion {
    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x01 => Ok(ProfileVersion::Profile1),
            0x02 => Ok(ProfileVersion::Profile2),
            0x03 => Ok(ProfileVersion::Profile3),
            other => Err(PduParseErr::InvalidValue { field: "profile_version", value: other as u64 }),
        }
    }
    pub fn raw(self) -> u8 {
        match self {
            ProfileVersion::Profile1 => 0x01,
            ProfileVersion::Profile2 => 0x02,
            ProfileVersion::Profile3 => 0x03,
        }
    }
}
