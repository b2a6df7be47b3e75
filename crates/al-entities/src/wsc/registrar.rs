//! Registrar-side WSC exchange: building one M2 per BSS to be configured
//! on an enrollee's radio (top-level spec §4.5). The registrar is
//! stateless per request (top-level spec §4.4: "only the registrar's WSC
//! configuration database is consulted") so nothing here is kept past the
//! single `build_m2` call.

use al_config::RegistrarBssConfig;
use al_core::MacAddr;
use al_pdus::wsc::{M1Message, M2Message};

use super::enrollee::WscIdentity;
use super::{crypto, dh, kdf};

const AUTH_OPEN: u16 = 0x0001;
const AUTH_WPA2PSK: u16 = 0x0020;
const ENCR_NONE: u16 = 0x0001;
const ENCR_AES: u16 = 0x0008;
const CONNECTION_TYPE_ESS: u8 = 0x01;
const CONFIG_METHODS_PUSH_BUTTON: u16 = 0x0080;
const ASSOCIATION_STATE_NOT_ASSOCIATED: u16 = 0x00;
const DEVICE_PASSWORD_ID_PUSH_BUTTON: u16 = 0x0004;
const CONFIG_ERROR_NO_ERROR: u16 = 0x00;

fn auth_flags(mode: al_config::AuthMode) -> u16 {
    match mode {
        al_config::AuthMode::Open => AUTH_OPEN,
        al_config::AuthMode::Wpa2Psk => AUTH_WPA2PSK,
    }
}

fn encr_flags(mode: al_config::EncrMode) -> u16 {
    match mode {
        al_config::EncrMode::None => ENCR_NONE,
        al_config::EncrMode::Aes => ENCR_AES,
    }
}

fn multiap_bits(roles: al_config::MultiApRoles) -> u8 {
    let mut bits = 0u8;
    if roles.fronthaul {
        bits |= al_pdus::tlv::MultiApExtension::FRONTHAUL_BSS;
    }
    if roles.backhaul_bss {
        bits |= al_pdus::tlv::MultiApExtension::BACKHAUL_BSS;
    }
    if roles.backhaul_sta {
        bits |= al_pdus::tlv::MultiApExtension::BACKHAUL_STA;
    }
    bits
}

/// Builds one M2 configuring `bss` on the enrollee that sent `m1`
/// (top-level spec §4.5, §4.4 step 4: "one [WSC] per BSS to be
/// configured"). `multiap_override` lets `build_teardown_m2` substitute
/// the teardown bit for `bss`'s own Multi-AP roles before the
/// Authenticator is computed, since that computation covers the vendor
/// extension attribute the bit lives in.
fn build_m2_with_multiap(
    identity: &WscIdentity,
    m1_bytes: &[u8],
    bssid: MacAddr,
    bss: &RegistrarBssConfig,
    dh_random: &[u8],
    registrar_nonce: [u8; 16],
    iv: &[u8; crypto::IV_LEN],
    multiap_override: u8,
) -> M2Message {
    let m1 = M1Message::parse(m1_bytes).expect("caller only forges valid M1 bytes");
    let keypair = dh::generate_keypair(dh_random);

    let z = dh::shared_secret(&keypair.private_key, &m1.public_key);
    let dh_key = kdf::dh_key(&z);
    let kdk = kdf::derivation_key(&dh_key, &m1.enrollee_nonce, m1.mac_address.as_bytes(), &registrar_nonce);
    let keys = kdf::derive_keys(&kdk);

    let mut settings = al_pdus::wsc::WscAttributes::new();
    settings.push(al_pdus::wsc::AttrType::Ssid, bss.ssid.clone().into_bytes());
    settings.push_u16(al_pdus::wsc::AttrType::AuthType, auth_flags(bss.auth_mode));
    settings.push_u16(al_pdus::wsc::AttrType::EncrType, encr_flags(bss.encr_mode));
    settings.push(al_pdus::wsc::AttrType::NetworkKey, bss.network_key.clone().into_bytes());
    settings.push_mac(al_pdus::wsc::AttrType::MacAddress, &bssid);
    let mut w = al_core::ByteWriter::new();
    settings.forge(&mut w);
    let plaintext_before_kwa = w.into_vec();
    let kwa = kdf::compute_key_wrap_authenticator(&keys.auth_key, &plaintext_before_kwa);
    settings.push(al_pdus::wsc::AttrType::KeyWrapAuthenticator, kwa.to_vec());
    let mut full = al_core::ByteWriter::new();
    settings.forge(&mut full);
    let encrypted_settings = crypto::encrypt(&keys.key_wrap_key, iv, full.as_slice());

    let mut m2 = M2Message {
        version: 0x10,
        enrollee_nonce: m1.enrollee_nonce,
        registrar_nonce,
        uuid_r: identity.uuid,
        public_key: keypair.public_key_bytes,
        auth_type_flags: AUTH_OPEN | AUTH_WPA2PSK,
        encr_type_flags: ENCR_NONE | ENCR_AES,
        connection_type_flags: CONNECTION_TYPE_ESS,
        config_methods: CONFIG_METHODS_PUSH_BUTTON,
        manufacturer: identity.manufacturer.clone(),
        model_name: identity.model_name.clone(),
        model_number: identity.model_number.clone(),
        serial_number: identity.serial_number.clone(),
        primary_device_type: identity.primary_device_type,
        device_name: identity.device_name.clone(),
        rf_bands: m1.rf_bands,
        association_state: ASSOCIATION_STATE_NOT_ASSOCIATED,
        config_error: CONFIG_ERROR_NO_ERROR,
        device_password_id: DEVICE_PASSWORD_ID_PUSH_BUTTON,
        os_version: identity.os_version,
        version2: 0x20,
        multiap_extension: Some(multiap_override),
        encrypted_settings,
        authenticator: [0; 8],
    };
    let m2_without_auth = m2.forge_without_authenticator();
    m2.authenticator = kdf::compute_authenticator(&keys.auth_key, m1_bytes, &m2_without_auth);
    m2
}

/// Builds one M2 configuring `bss` on the enrollee that sent `m1`
/// (top-level spec §4.5, §4.4 step 4: "one [WSC] per BSS to be
/// configured").
#[allow(clippy::too_many_arguments)]
pub fn build_m2(
    identity: &WscIdentity,
    m1_bytes: &[u8],
    bssid: MacAddr,
    bss: &RegistrarBssConfig,
    dh_random: &[u8],
    registrar_nonce: [u8; 16],
    iv: &[u8; crypto::IV_LEN],
) -> M2Message {
    build_m2_with_multiap(identity, m1_bytes, bssid, bss, dh_random, registrar_nonce, iv, multiap_bits(bss.multi_ap))
}

/// Builds the teardown M2: same Authenticator machinery, but Encrypted
/// Settings carries an empty BSS (top-level spec §4.4: "first M2 whose
/// teardown bit is set terminates processing").
pub fn build_teardown_m2(
    identity: &WscIdentity,
    m1_bytes: &[u8],
    dh_random: &[u8],
    registrar_nonce: [u8; 16],
    iv: &[u8; crypto::IV_LEN],
) -> M2Message {
    let teardown_bss = RegistrarBssConfig {
        band: al_config::Band::TwoPointFourGhz,
        ssid: String::new(),
        auth_mode: al_config::AuthMode::Open,
        encr_mode: al_config::EncrMode::None,
        network_key: String::new(),
        multi_ap: al_config::MultiApRoles { fronthaul: false, backhaul_bss: false, backhaul_sta: false, backhaul_only: false },
    };
    build_m2_with_multiap(
        identity,
        m1_bytes,
        MacAddr::ZERO,
        &teardown_bss,
        dh_random,
        registrar_nonce,
        iv,
        al_pdus::tlv::MultiApExtension::TEARDOWN,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wsc::enrollee::build_m1;

    fn identity() -> WscIdentity {
        WscIdentity {
            uuid: [0x01; 16],
            manufacturer: "Acme".into(),
            model_name: "Controller".into(),
            model_number: "2".into(),
            serial_number: "SN002".into(),
            primary_device_type: [0; 8],
            device_name: "Gateway".into(),
            os_version: 0x8000_0002,
        }
    }

    #[test]
    fn build_m2_produces_valid_authenticator_and_decryptable_settings() {
        let al_mac = MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0c]);
        let (_, wsc_state) = build_m1(al_mac, &identity(), 0x02, &[0x11; 192], [0x22; 16]);

        let bss = RegistrarBssConfig {
            band: al_config::Band::FiveGhz,
            ssid: "Mesh-5G".into(),
            auth_mode: al_config::AuthMode::Wpa2Psk,
            encr_mode: al_config::EncrMode::Aes,
            network_key: "supersecretkey".into(),
            multi_ap: al_config::MultiApRoles { fronthaul: true, backhaul_bss: false, backhaul_sta: false, backhaul_only: false },
        };
        let bssid = MacAddr::new([0x10; 6]);
        let iv = [0x33u8; crypto::IV_LEN];
        let m2 = build_m2(&identity(), &wsc_state.m1_bytes, bssid, &bss, &[0x44; 192], [0x55; 16], &iv);

        let decision = crate::wsc::validate_and_apply_m2(&wsc_state, &m2.forge()).unwrap();
        match decision {
            crate::wsc::M2Decision::ApplyBss(applied) => {
                assert_eq!(applied.bssid, bssid);
                assert_eq!(applied.ssid, "Mesh-5G");
                assert_eq!(applied.network_key, "supersecretkey");
                assert!(applied.multi_ap.fronthaul);
            }
            other => panic!("expected ApplyBss, got {other:?}"),
        }
    }

    #[test]
    fn teardown_m2_is_recognized_by_the_enrollee() {
        let al_mac = MacAddr::new([0x00, 0x4f, 0x21, 0x03, 0xab, 0x0c]);
        let (_, wsc_state) = build_m1(al_mac, &identity(), 0x02, &[0x11; 192], [0x22; 16]);
        let iv = [0x66u8; crypto::IV_LEN];
        let m2 = build_teardown_m2(&identity(), &wsc_state.m1_bytes, &[0x44; 192], [0x55; 16], &iv);
        let decision = crate::wsc::validate_and_apply_m2(&wsc_state, &m2.forge()).unwrap();
        assert_eq!(decision, crate::wsc::M2Decision::Teardown);
    }
}
