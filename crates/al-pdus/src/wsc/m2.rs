use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

use super::m1::{read_version2, wfa_vendor_extension};
use super::{AttrType, WscAttributes};

pub const MESSAGE_TYPE_M2: u8 = 0x05;

/// WFA vendor extension sub-element carrying the Multi-AP extension byte
/// (top-level spec §4.5, §9 Open Questions: the Multi-AP-aware variant).
const VENDOR_SUBELEM_MULTIAP: u8 = 0x06;

fn read_multiap_subelement(blob: &[u8]) -> Option<u8> {
    let mut i = 3;
    while i + 2 <= blob.len() {
        let id = blob[i];
        let len = blob[i + 1] as usize;
        if i + 2 + len > blob.len() {
            return None;
        }
        if id == VENDOR_SUBELEM_MULTIAP && len == 1 {
            return Some(blob[i + 2]);
        }
        i += 2 + len;
    }
    None
}

/// The WSC M2 message built by a registrar (top-level spec §4.5). As with
/// `M1Message`, enumerated wire fields are kept as raw bitmaps/discriminants;
/// typed interpretation and all cryptographic validation (Authenticator,
/// Encrypted Settings) live in `al-entities::wsc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M2Message {
    pub version: u8,
    pub enrollee_nonce: [u8; 16],
    pub registrar_nonce: [u8; 16],
    pub uuid_r: [u8; 16],
    pub public_key: Vec<u8>,
    pub auth_type_flags: u16,
    pub encr_type_flags: u16,
    pub connection_type_flags: u8,
    pub config_methods: u16,
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub primary_device_type: [u8; 8],
    pub device_name: String,
    pub rf_bands: u8,
    pub association_state: u16,
    pub config_error: u16,
    pub device_password_id: u16,
    pub os_version: u32,
    pub version2: u8,
    /// Multi-AP extension byte: fronthaul/backhaul-BSS/backhaul-STA/teardown
    /// bits (`al_pdus::tlv::multiap::MultiApExtension`). `None` when the
    /// registrar did not attach the sub-element.
    pub multiap_extension: Option<u8>,
    /// Opaque IV + AES-128-CBC ciphertext; decrypted by `al-entities::wsc`.
    pub encrypted_settings: Vec<u8>,
    pub authenticator: [u8; 8],
}

impl M2Message {
    /// Parse everything up to (but not including) the Authenticator
    /// attribute is what gets HMAC'd during validation, so callers that
    /// need the exact M2 bytes for Authenticator verification should keep
    /// the original buffer around rather than re-forging it.
    pub fn parse(bytes: &[u8]) -> Result<Self, PduParseErr> {
        let mut r = ByteReader::new(bytes);
        let attrs = WscAttributes::parse(&mut r)?;

        if attrs.get_u8(AttrType::MessageType) != Some(MESSAGE_TYPE_M2) {
            return Err(PduParseErr::InvalidValue { field: "wsc_message_type", value: 0 });
        }
        let version = attrs.get_u8(AttrType::Version).ok_or(PduParseErr::BufferEnded { field: Some("version") })?;
        let enrollee_nonce = array16(attrs.require(AttrType::EnrolleeNonce, "enrollee_nonce")?)?;
        let registrar_nonce = array16(attrs.require(AttrType::RegistrarNonce, "registrar_nonce")?)?;
        let uuid_r = array16(attrs.require(AttrType::UuidR, "uuid_r")?)?;
        let public_key = attrs.require(AttrType::PublicKey, "public_key")?.to_vec();
        let auth_type_flags = attrs.get_u16(AttrType::AuthTypeFlags).unwrap_or(0);
        let encr_type_flags = attrs.get_u16(AttrType::EncrTypeFlags).unwrap_or(0);
        let connection_type_flags = attrs.get_u8(AttrType::ConnectionTypeFlags).unwrap_or(0);
        let config_methods = attrs.get_u16(AttrType::ConfigMethods).unwrap_or(0);
        let manufacturer = attrs.get_string(AttrType::Manufacturer).unwrap_or_default();
        let model_name = attrs.get_string(AttrType::ModelName).unwrap_or_default();
        let model_number = attrs.get_string(AttrType::ModelNumber).unwrap_or_default();
        let serial_number = attrs.get_string(AttrType::SerialNumber).unwrap_or_default();
        let primary_device_type = attrs
            .get(AttrType::PrimaryDeviceType)
            .and_then(|v| <[u8; 8]>::try_from(v).ok())
            .unwrap_or([0; 8]);
        let device_name = attrs.get_string(AttrType::DeviceName).unwrap_or_default();
        let rf_bands = attrs.get_u8(AttrType::RfBands).unwrap_or(0);
        let association_state = attrs.get_u16(AttrType::AssociationState).unwrap_or(0);
        let config_error = attrs.get_u16(AttrType::ConfigError).unwrap_or(0);
        let device_password_id = attrs.get_u16(AttrType::DevicePasswordId).unwrap_or(0);
        let os_version = attrs
            .get(AttrType::OsVersion)
            .and_then(|v| <[u8; 4]>::try_from(v).ok())
            .map(u32::from_be_bytes)
            .unwrap_or(0);
        let vendor_ext = attrs.require(AttrType::VendorExtension, "vendor_extension")?;
        let version2 = read_version2(vendor_ext).ok_or(PduParseErr::BufferEnded { field: Some("vendor_extension_version2") })?;
        let multiap_extension = read_multiap_subelement(vendor_ext);
        let encrypted_settings = attrs.require(AttrType::EncryptedSettings, "encrypted_settings")?.to_vec();
        let authenticator = {
            let v = attrs.require(AttrType::Authenticator, "authenticator")?;
            <[u8; 8]>::try_from(v).map_err(|_| PduParseErr::InvalidLength { expected: 8, found: v.len() })?
        };

        Ok(Self {
            version,
            enrollee_nonce,
            registrar_nonce,
            uuid_r,
            public_key,
            auth_type_flags,
            encr_type_flags,
            connection_type_flags,
            config_methods,
            manufacturer,
            model_name,
            model_number,
            serial_number,
            primary_device_type,
            device_name,
            rf_bands,
            association_state,
            config_error,
            device_password_id,
            os_version,
            version2,
            multiap_extension,
            encrypted_settings,
            authenticator,
        })
    }

    /// Forge every attribute except the trailing Authenticator. Used to
    /// build the `M1 || M2-without-authenticator` buffer that gets HMAC'd.
    pub fn forge_without_authenticator(&self) -> Vec<u8> {
        let mut attrs = WscAttributes::new();
        attrs.push_u8(AttrType::Version, self.version);
        attrs.push_u8(AttrType::MessageType, MESSAGE_TYPE_M2);
        attrs.push(AttrType::EnrolleeNonce, self.enrollee_nonce.to_vec());
        attrs.push(AttrType::RegistrarNonce, self.registrar_nonce.to_vec());
        attrs.push(AttrType::UuidR, self.uuid_r.to_vec());
        attrs.push(AttrType::PublicKey, self.public_key.clone());
        attrs.push_u16(AttrType::AuthTypeFlags, self.auth_type_flags);
        attrs.push_u16(AttrType::EncrTypeFlags, self.encr_type_flags);
        attrs.push_u8(AttrType::ConnectionTypeFlags, self.connection_type_flags);
        attrs.push_u16(AttrType::ConfigMethods, self.config_methods);
        attrs.push(AttrType::Manufacturer, self.manufacturer.clone().into_bytes());
        attrs.push(AttrType::ModelName, self.model_name.clone().into_bytes());
        attrs.push(AttrType::ModelNumber, self.model_number.clone().into_bytes());
        attrs.push(AttrType::SerialNumber, self.serial_number.clone().into_bytes());
        attrs.push(AttrType::PrimaryDeviceType, self.primary_device_type.to_vec());
        attrs.push(AttrType::DeviceName, self.device_name.clone().into_bytes());
        attrs.push_u8(AttrType::RfBands, self.rf_bands);
        attrs.push_u16(AttrType::AssociationState, self.association_state);
        attrs.push_u16(AttrType::ConfigError, self.config_error);
        attrs.push_u16(AttrType::DevicePasswordId, self.device_password_id);
        attrs.push(AttrType::OsVersion, self.os_version.to_be_bytes().to_vec());
        let multiap_subelem: Vec<u8> = match self.multiap_extension {
            Some(bits) => vec![VENDOR_SUBELEM_MULTIAP, 1, bits],
            None => Vec::new(),
        };
        attrs.push(AttrType::VendorExtension, wfa_vendor_extension(self.version2, &multiap_subelem));
        attrs.push(AttrType::EncryptedSettings, self.encrypted_settings.clone());

        let mut w = ByteWriter::new();
        attrs.forge(&mut w);
        w.into_vec()
    }

    pub fn forge(&self) -> Vec<u8> {
        let mut out = self.forge_without_authenticator();
        let mut attrs = WscAttributes::new();
        attrs.push(AttrType::Authenticator, self.authenticator.to_vec());
        let mut w = ByteWriter::new();
        attrs.forge(&mut w);
        out.extend_from_slice(w.as_slice());
        out
    }
}

fn array16(v: &[u8]) -> Result<[u8; 16], PduParseErr> {
    <[u8; 16]>::try_from(v).map_err(|_| PduParseErr::InvalidLength { expected: 16, found: v.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> M2Message {
        M2Message {
            version: 0x10,
            enrollee_nonce: [0x22; 16],
            registrar_nonce: [0x44; 16],
            uuid_r: [0x55; 16],
            public_key: vec![0x66; 192],
            auth_type_flags: 0x0020,
            encr_type_flags: 0x0008,
            connection_type_flags: 0x01,
            config_methods: 0x0080,
            manufacturer: "Acme".into(),
            model_name: "Controller".into(),
            model_number: "2".into(),
            serial_number: "SN002".into(),
            primary_device_type: [0; 8],
            device_name: "Gateway".into(),
            rf_bands: 0x03,
            association_state: 0x0001,
            config_error: 0x0000,
            device_password_id: 0x0004,
            os_version: 0x8000_0002,
            version2: 0x20,
            multiap_extension: Some(0x80),
            encrypted_settings: vec![0xee; 48],
            authenticator: [0x99; 8],
        }
    }

    #[test]
    fn m2_round_trips() {
        let v = sample();
        let bytes = v.forge();
        assert_eq!(M2Message::parse(&bytes).unwrap(), v);
    }

    #[test]
    fn forge_without_authenticator_omits_attribute() {
        let v = sample();
        let partial = v.forge_without_authenticator();
        let full = v.forge();
        assert_eq!(full.len() - partial.len(), 4 + 8); // attr header + 8-byte authenticator
        assert!(full.ends_with(&v.authenticator));
    }

    #[test]
    fn missing_multiap_subelement_parses_as_none() {
        let mut v = sample();
        v.multiap_extension = None;
        let bytes = v.forge();
        let parsed = M2Message::parse(&bytes).unwrap();
        assert_eq!(parsed.multiap_extension, None);
    }
}
