//! WSC attribute codec: 16-bit type + 16-bit length framing, concatenated
//! with no terminator (top-level spec §4.5). `al-pdus` only encodes and
//! decodes the attribute list; the DH/HMAC/AES key-derivation core that
//! interprets Encrypted Settings and validates the Authenticator lives in
//! `al-entities::wsc`, which is the only place cryptographic primitives are
//! linked in.

pub mod m1;
pub mod m2;

pub use m1::M1Message;
pub use m2::M2Message;

use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// WSC attribute type tags used by M1/M2 (top-level spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AttrType {
    AssociationState = 0x1002,
    AuthType = 0x1003,
    AuthTypeFlags = 0x1004,
    Authenticator = 0x1005,
    ConfigError = 0x1009,
    ConfigMethods = 0x1008,
    ConnectionTypeFlags = 0x100d,
    EncrType = 0x100f,
    EncrTypeFlags = 0x1010,
    DeviceName = 0x1011,
    DevicePasswordId = 0x1012,
    EncryptedSettings = 0x1018,
    EnrolleeNonce = 0x101a,
    KeyWrapAuthenticator = 0x101e,
    MacAddress = 0x1020,
    Manufacturer = 0x1021,
    MessageType = 0x1022,
    ModelName = 0x1023,
    ModelNumber = 0x1024,
    NetworkKey = 0x1027,
    OsVersion = 0x102d,
    PublicKey = 0x1032,
    RegistrarNonce = 0x1039,
    RfBands = 0x103c,
    Ssid = 0x1045,
    UuidE = 0x1047,
    UuidR = 0x1048,
    VendorExtension = 0x1049,
    Version = 0x104a,
    SerialNumber = 0x1042,
    WscState = 0x1044,
    PrimaryDeviceType = 0x1054,
}

impl AttrType {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// A WSC message's attribute list, preserving wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WscAttributes {
    entries: Vec<(u16, Vec<u8>)>,
}

impl WscAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let mut entries = Vec::new();
        while !r.is_empty() {
            let attr_type = r.read_u16("wsc_attr_type")?;
            let len = r.read_u16("wsc_attr_len")? as usize;
            let value = r.read_bytes(len, "wsc_attr_value")?.to_vec();
            entries.push((attr_type, value));
        }
        Ok(Self { entries })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        for (attr_type, value) in &self.entries {
            w.write_u16(*attr_type);
            w.write_u16(value.len() as u16);
            w.write_bytes(value);
        }
    }

    pub fn wire_len(&self) -> usize {
        self.entries.iter().map(|(_, v)| 4 + v.len()).sum()
    }

    pub fn push(&mut self, attr: AttrType, value: Vec<u8>) {
        self.entries.push((attr.as_u16(), value));
    }

    pub fn push_u8(&mut self, attr: AttrType, value: u8) {
        self.push(attr, vec![value]);
    }

    pub fn push_u16(&mut self, attr: AttrType, value: u16) {
        self.push(attr, value.to_be_bytes().to_vec());
    }

    pub fn push_mac(&mut self, attr: AttrType, mac: &MacAddr) {
        self.push(attr, mac.as_bytes().to_vec());
    }

    /// First occurrence wins (top-level spec §4.4: "Duplicate TLVs in one
    /// CMDU: the first wins" — the same policy is applied here to WSC
    /// attribute duplicates for consistency).
    pub fn get(&self, attr: AttrType) -> Option<&[u8]> {
        self.entries.iter().find(|(t, _)| *t == attr.as_u16()).map(|(_, v)| v.as_slice())
    }

    pub fn get_u8(&self, attr: AttrType) -> Option<u8> {
        self.get(attr).and_then(|v| v.first().copied())
    }

    pub fn get_u16(&self, attr: AttrType) -> Option<u16> {
        self.get(attr).filter(|v| v.len() == 2).map(|v| u16::from_be_bytes([v[0], v[1]]))
    }

    pub fn get_mac(&self, attr: AttrType) -> Option<MacAddr> {
        self.get(attr).and_then(MacAddr::from_slice)
    }

    pub fn get_string(&self, attr: AttrType) -> Option<String> {
        self.get(attr).and_then(|v| String::from_utf8(v.to_vec()).ok())
    }

    pub fn require(&self, attr: AttrType, field: &'static str) -> Result<&[u8], PduParseErr> {
        self.get(attr).ok_or(PduParseErr::BufferEnded { field: Some(field) })
    }
}
