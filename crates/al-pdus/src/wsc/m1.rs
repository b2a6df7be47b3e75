use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

use super::{AttrType, WscAttributes};

pub const MESSAGE_TYPE_M1: u8 = 0x04;

/// The WFA vendor extension OUI carried in every WSC message
/// (top-level spec §4.5).
pub const WFA_VENDOR_EXT_OUI: [u8; 3] = [0x00, 0x37, 0x2a];
const VENDOR_SUBELEM_VERSION2: u8 = 0x00;

/// Build the WFA vendor extension attribute value: OUI + Version2
/// sub-element. The Multi-AP sub-element (M2 only) is appended separately
/// by the caller before this is wrapped in a `VendorExtension` attribute.
pub fn wfa_vendor_extension(version2: u8, extra_subelements: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(3 + 3 + extra_subelements.len());
    v.extend_from_slice(&WFA_VENDOR_EXT_OUI);
    v.push(VENDOR_SUBELEM_VERSION2);
    v.push(1);
    v.push(version2);
    v.extend_from_slice(extra_subelements);
    v
}

/// Read the Version2 sub-element out of a WFA vendor extension blob.
pub fn read_version2(blob: &[u8]) -> Option<u8> {
    let mut i = 3; // past the 3-byte OUI
    while i + 2 <= blob.len() {
        let id = blob[i];
        let len = blob[i + 1] as usize;
        if i + 2 + len > blob.len() {
            return None;
        }
        if id == VENDOR_SUBELEM_VERSION2 && len == 1 {
            return Some(blob[i + 2]);
        }
        i += 2 + len;
    }
    None
}

/// The WSC M1 message built by an enrollee (top-level spec §4.5). Fields
/// that are closed enumerations on the wire (auth/encryption type flags,
/// config methods, WSC state, association state, device-password-id,
/// config error) are kept as the raw numeric bitmap/discriminant here;
/// `al-entities::wsc` owns the typed interpretation alongside the rest of
/// the cryptographic core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M1Message {
    pub version: u8,
    pub uuid_e: [u8; 16],
    /// Per the Multi-AP-aware variant this rewrite implements: the AL MAC,
    /// not the radio MAC (top-level spec §4.5, §9 Open Questions).
    pub mac_address: MacAddr,
    pub enrollee_nonce: [u8; 16],
    pub public_key: Vec<u8>,
    pub auth_type_flags: u16,
    pub encr_type_flags: u16,
    pub connection_type_flags: u8,
    pub config_methods: u16,
    pub wsc_state: u8,
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub primary_device_type: [u8; 8],
    pub device_name: String,
    pub rf_bands: u8,
    pub association_state: u16,
    pub device_password_id: u16,
    pub config_error: u16,
    pub os_version: u32,
    pub version2: u8,
}

impl M1Message {
    pub fn parse(bytes: &[u8]) -> Result<Self, PduParseErr> {
        let mut r = ByteReader::new(bytes);
        let attrs = WscAttributes::parse(&mut r)?;

        if attrs.get_u8(AttrType::MessageType) != Some(MESSAGE_TYPE_M1) {
            return Err(PduParseErr::InvalidValue { field: "wsc_message_type", value: 0 });
        }
        let version = attrs.get_u8(AttrType::Version).ok_or(PduParseErr::BufferEnded { field: Some("version") })?;
        let uuid_e = array16(attrs.require(AttrType::UuidE, "uuid_e")?)?;
        let mac_address = attrs.get_mac(AttrType::MacAddress).ok_or(PduParseErr::BufferEnded { field: Some("mac_address") })?;
        let enrollee_nonce = array16(attrs.require(AttrType::EnrolleeNonce, "enrollee_nonce")?)?;
        let public_key = attrs.require(AttrType::PublicKey, "public_key")?.to_vec();
        let auth_type_flags = attrs.get_u16(AttrType::AuthTypeFlags).unwrap_or(0);
        let encr_type_flags = attrs.get_u16(AttrType::EncrTypeFlags).unwrap_or(0);
        let connection_type_flags = attrs.get_u8(AttrType::ConnectionTypeFlags).unwrap_or(0);
        let config_methods = attrs.get_u16(AttrType::ConfigMethods).unwrap_or(0);
        let wsc_state = attrs.get_u8(AttrType::WscState).unwrap_or(0);
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
        let device_password_id = attrs.get_u16(AttrType::DevicePasswordId).unwrap_or(0);
        let config_error = attrs.get_u16(AttrType::ConfigError).unwrap_or(0);
        let os_version = attrs
            .get(AttrType::OsVersion)
            .and_then(|v| <[u8; 4]>::try_from(v).ok())
            .map(u32::from_be_bytes)
            .unwrap_or(0);
        let version2 = attrs
            .get(AttrType::VendorExtension)
            .and_then(read_version2)
            .ok_or(PduParseErr::BufferEnded { field: Some("vendor_extension_version2") })?;

        Ok(Self {
            version,
            uuid_e,
            mac_address,
            enrollee_nonce,
            public_key,
            auth_type_flags,
            encr_type_flags,
            connection_type_flags,
            config_methods,
            wsc_state,
            manufacturer,
            model_name,
            model_number,
            serial_number,
            primary_device_type,
            device_name,
            rf_bands,
            association_state,
            device_password_id,
            config_error,
            os_version,
            version2,
        })
    }

    pub fn forge(&self) -> Vec<u8> {
        let mut attrs = WscAttributes::new();
        attrs.push_u8(AttrType::Version, self.version);
        attrs.push_u8(AttrType::MessageType, MESSAGE_TYPE_M1);
        attrs.push(AttrType::UuidE, self.uuid_e.to_vec());
        attrs.push_mac(AttrType::MacAddress, &self.mac_address);
        attrs.push(AttrType::EnrolleeNonce, self.enrollee_nonce.to_vec());
        attrs.push(AttrType::PublicKey, self.public_key.clone());
        attrs.push_u16(AttrType::AuthTypeFlags, self.auth_type_flags);
        attrs.push_u16(AttrType::EncrTypeFlags, self.encr_type_flags);
        attrs.push_u8(AttrType::ConnectionTypeFlags, self.connection_type_flags);
        attrs.push_u16(AttrType::ConfigMethods, self.config_methods);
        attrs.push_u8(AttrType::WscState, self.wsc_state);
        attrs.push(AttrType::Manufacturer, self.manufacturer.clone().into_bytes());
        attrs.push(AttrType::ModelName, self.model_name.clone().into_bytes());
        attrs.push(AttrType::ModelNumber, self.model_number.clone().into_bytes());
        attrs.push(AttrType::SerialNumber, self.serial_number.clone().into_bytes());
        attrs.push(AttrType::PrimaryDeviceType, self.primary_device_type.to_vec());
        attrs.push(AttrType::DeviceName, self.device_name.clone().into_bytes());
        attrs.push_u8(AttrType::RfBands, self.rf_bands);
        attrs.push_u16(AttrType::AssociationState, self.association_state);
        attrs.push_u16(AttrType::DevicePasswordId, self.device_password_id);
        attrs.push_u16(AttrType::ConfigError, self.config_error);
        attrs.push(AttrType::OsVersion, self.os_version.to_be_bytes().to_vec());
        attrs.push(AttrType::VendorExtension, wfa_vendor_extension(self.version2, &[]));

        let mut w = ByteWriter::new();
        attrs.forge(&mut w);
        w.into_vec()
    }
}

fn array16(v: &[u8]) -> Result<[u8; 16], PduParseErr> {
    <[u8; 16]>::try_from(v).map_err(|_| PduParseErr::InvalidLength { expected: 16, found: v.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> M1Message {
        M1Message {
            version: 0x10,
            uuid_e: [0x11; 16],
            mac_address: MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0c]),
            enrollee_nonce: [0x22; 16],
            public_key: vec![0x33; 192],
            auth_type_flags: 0x0020,
            encr_type_flags: 0x0008,
            connection_type_flags: 0x01,
            config_methods: 0x0280,
            wsc_state: 0x01,
            manufacturer: "Acme".into(),
            model_name: "AX3000".into(),
            model_number: "1".into(),
            serial_number: "SN001".into(),
            primary_device_type: [0; 8],
            device_name: "Living Room AP".into(),
            rf_bands: 0x02,
            association_state: 0x0000,
            device_password_id: 0x0004,
            config_error: 0x0000,
            os_version: 0x8000_0001,
            version2: 0x20,
        }
    }

    #[test]
    fn m1_round_trips() {
        let v = sample();
        let bytes = v.forge();
        assert_eq!(M1Message::parse(&bytes).unwrap(), v);
    }

    #[test]
    fn wrong_message_type_is_rejected() {
        let mut attrs = WscAttributes::new();
        attrs.push_u8(AttrType::MessageType, 0x05); // M2, not M1
        let mut w = ByteWriter::new();
        attrs.forge(&mut w);
        assert!(M1Message::parse(w.as_slice()).is_err());
    }
}
