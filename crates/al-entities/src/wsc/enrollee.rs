//! Enrollee-side WSC exchange: building M1, validating and applying M2
//! (top-level spec §4.5). The Multi-AP-aware variant is the only one this
//! rewrite implements (SPEC_FULL.md §E, Open Question 1): M1's MAC
//! address attribute carries the AL MAC, and M2 carries a Multi-AP vendor
//! sub-element instead of relying on a plain radio MAC to disambiguate
//! fronthaul/backhaul roles.

use al_config::{AuthMode, EncrMode, MultiApRoles};
use al_core::{AlError, MacAddr};
use al_pdus::wsc::{M1Message, M2Message, WscAttributes};

use crate::model::bss::BssInfo;
use crate::model::radio::RadioWscState;

use super::{crypto, dh, kdf};

const AUTH_OPEN: u16 = 0x0001;
const AUTH_WPA2PSK: u16 = 0x0020;
const ENCR_NONE: u16 = 0x0001;
const ENCR_AES: u16 = 0x0008;
const CONNECTION_TYPE_ESS: u8 = 0x01;
const CONFIG_METHODS_PUSH_BUTTON: u16 = 0x0080;
const WSC_STATE_NOT_CONFIGURED: u8 = 0x01;
const ASSOCIATION_STATE_NOT_ASSOCIATED: u16 = 0x00;
const DEVICE_PASSWORD_ID_PUSH_BUTTON: u16 = 0x0004;
const CONFIG_ERROR_NO_ERROR: u16 = 0x00;

/// Fixed per-device identity fields M1/M2 both carry (top-level spec
/// §4.5). Supplied by the platform layer, not derived from protocol state.
#[derive(Debug, Clone)]
pub struct WscIdentity {
    pub uuid: [u8; 16],
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub primary_device_type: [u8; 8],
    pub device_name: String,
    pub os_version: u32,
}

fn auth_mode_to_flags(mode: AuthMode) -> u16 {
    match mode {
        AuthMode::Open => AUTH_OPEN,
        AuthMode::Wpa2Psk => AUTH_WPA2PSK,
    }
}

fn encr_mode_to_flags(mode: EncrMode) -> u16 {
    match mode {
        EncrMode::None => ENCR_NONE,
        EncrMode::Aes => ENCR_AES,
    }
}

/// Builds a fresh M1 for `radio`, generating a new DH keypair and nonce.
/// Returns the message plus the `RadioWscState` the caller should store
/// keyed by the radio's UID (top-level spec §9: no "last built M1" global).
pub fn build_m1(
    al_mac: MacAddr,
    identity: &WscIdentity,
    rf_bands: u8,
    dh_random: &[u8],
    nonce: [u8; 16],
) -> (M1Message, RadioWscState) {
    let keypair = dh::generate_keypair(dh_random);
    let m1 = M1Message {
        version: 0x10,
        uuid_e: identity.uuid,
        mac_address: al_mac,
        enrollee_nonce: nonce,
        public_key: keypair.public_key_bytes.clone(),
        auth_type_flags: AUTH_OPEN | AUTH_WPA2PSK,
        encr_type_flags: ENCR_NONE | ENCR_AES,
        connection_type_flags: CONNECTION_TYPE_ESS,
        config_methods: CONFIG_METHODS_PUSH_BUTTON,
        wsc_state: WSC_STATE_NOT_CONFIGURED,
        manufacturer: identity.manufacturer.clone(),
        model_name: identity.model_name.clone(),
        model_number: identity.model_number.clone(),
        serial_number: identity.serial_number.clone(),
        primary_device_type: identity.primary_device_type,
        device_name: identity.device_name.clone(),
        rf_bands,
        association_state: ASSOCIATION_STATE_NOT_ASSOCIATED,
        device_password_id: DEVICE_PASSWORD_ID_PUSH_BUTTON,
        config_error: CONFIG_ERROR_NO_ERROR,
        os_version: identity.os_version,
        version2: 0x20,
    };
    let m1_bytes = m1.forge();
    let wsc_state = RadioWscState {
        state: crate::model::radio::EnrolleeState::AwaitingM2,
        dh_private_key: keypair.private_key.to_bytes_be(),
        dh_public_key: keypair.public_key_bytes,
        enrollee_nonce: nonce,
        m1_bytes,
        retries: 0,
        backoff_ms: 0,
    };
    (m1, wsc_state)
}

/// Outcome of successfully validating an M2 (top-level spec §4.5, step 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum M2Decision {
    Teardown,
    BackhaulStation { bssid: MacAddr },
    ApplyBss(BssInfo),
}

fn parse_encrypted_settings_plaintext(plaintext: &[u8]) -> Result<(WscAttributes, [u8; 8]), AlError> {
    let attrs = WscAttributes::parse(&mut al_core::ByteReader::new(plaintext))
        .map_err(AlError::Malformed)?;
    let kwa_bytes = attrs
        .get(al_pdus::wsc::AttrType::KeyWrapAuthenticator)
        .ok_or(AlError::Unauthenticated("encrypted settings missing key wrap authenticator"))?;
    if kwa_bytes.len() != 8 {
        return Err(AlError::Malformed(al_core::PduParseErr::InvalidLength { expected: 8, found: kwa_bytes.len() }));
    }
    let mut kwa = [0u8; 8];
    kwa.copy_from_slice(kwa_bytes);
    Ok((attrs, kwa))
}

/// Re-forges `attrs` without its trailing Key-Wrap-Authenticator, which is
/// exactly the byte range `compute_key_wrap_authenticator` was computed
/// over (top-level spec §4.5).
fn plaintext_before_kwa(attrs: &WscAttributes) -> Vec<u8> {
    let mut without_kwa = WscAttributes::new();
    for attr in [
        al_pdus::wsc::AttrType::Ssid,
        al_pdus::wsc::AttrType::AuthType,
        al_pdus::wsc::AttrType::EncrType,
        al_pdus::wsc::AttrType::NetworkKey,
        al_pdus::wsc::AttrType::MacAddress,
    ] {
        if let Some(v) = attrs.get(attr) {
            without_kwa.push(attr, v.to_vec());
        }
    }
    let mut w = al_core::ByteWriter::new();
    without_kwa.forge(&mut w);
    w.as_slice().to_vec()
}

/// Validates and interprets an M2 against this radio's in-flight WSC
/// state, following the exact order in top-level spec §4.5 step 6: required
/// attributes, Authenticator, decrypt + key-wrap-authenticator, plaintext
/// consistency, then teardown vs. station vs. AP-BSS dispatch.
pub fn validate_and_apply_m2(wsc_state: &RadioWscState, m2_bytes: &[u8]) -> Result<M2Decision, AlError> {
    let m2 = M2Message::parse(m2_bytes).map_err(AlError::Malformed)?;

    let private_key = num_bigint::BigUint::from_bytes_be(&wsc_state.dh_private_key);
    let z = dh::shared_secret(&private_key, &m2.public_key);
    let dh_key = kdf::dh_key(&z);

    let m1 = M1Message::parse(&wsc_state.m1_bytes).map_err(AlError::Malformed)?;
    let kdk = kdf::derivation_key(&dh_key, &wsc_state.enrollee_nonce, m1.mac_address.as_bytes(), &m2.registrar_nonce);
    let keys = kdf::derive_keys(&kdk);

    let m2_without_auth = m2.forge_without_authenticator();
    let expected_auth = kdf::compute_authenticator(&keys.auth_key, &wsc_state.m1_bytes, &m2_without_auth);
    if expected_auth != m2.authenticator {
        return Err(AlError::Unauthenticated("M2 authenticator mismatch"));
    }

    let plaintext = crypto::decrypt(&keys.key_wrap_key, &m2.encrypted_settings)
        .ok_or(AlError::Unauthenticated("encrypted settings failed to decrypt"))?;
    let (attrs, kwa) = parse_encrypted_settings_plaintext(&plaintext)?;
    let expected_kwa = kdf::compute_key_wrap_authenticator(&keys.auth_key, &plaintext_before_kwa(&attrs));
    if expected_kwa != kwa {
        return Err(AlError::Unauthenticated("key wrap authenticator mismatch"));
    }

    let ssid = attrs.get_string(al_pdus::wsc::AttrType::Ssid).unwrap_or_default();
    let auth_type = attrs.get_u16(al_pdus::wsc::AttrType::AuthType).unwrap_or(AUTH_OPEN);
    let encr_type = attrs.get_u16(al_pdus::wsc::AttrType::EncrType).unwrap_or(ENCR_NONE);
    let network_key = attrs.get_string(al_pdus::wsc::AttrType::NetworkKey).unwrap_or_default();
    let bssid = attrs
        .get_mac(al_pdus::wsc::AttrType::MacAddress)
        .ok_or(AlError::Malformed(al_core::PduParseErr::BufferEnded { field: Some("bssid") }))?;

    let auth_mode = match auth_type {
        AUTH_OPEN => AuthMode::Open,
        AUTH_WPA2PSK => AuthMode::Wpa2Psk,
        _ => return Err(AlError::Policy("unsupported auth type")),
    };
    let encr_mode = match encr_type {
        ENCR_NONE => EncrMode::None,
        ENCR_AES => EncrMode::Aes,
        _ => return Err(AlError::Policy("unsupported encryption type")),
    };
    if (auth_mode == AuthMode::Open) != (encr_mode == EncrMode::None) {
        return Err(AlError::Policy("auth mode and encryption mode are inconsistent"));
    }

    let multiap_bits = m2.multiap_extension.unwrap_or(0);
    if multiap_bits & al_pdus::tlv::MultiApExtension::TEARDOWN != 0 {
        return Ok(M2Decision::Teardown);
    }
    let multi_ap = MultiApRoles {
        fronthaul: multiap_bits & al_pdus::tlv::MultiApExtension::FRONTHAUL_BSS != 0,
        backhaul_bss: multiap_bits & al_pdus::tlv::MultiApExtension::BACKHAUL_BSS != 0,
        backhaul_sta: multiap_bits & al_pdus::tlv::MultiApExtension::BACKHAUL_STA != 0,
        backhaul_only: false,
    };
    if multi_ap.backhaul_sta {
        return Ok(M2Decision::BackhaulStation { bssid });
    }
    Ok(M2Decision::ApplyBss(BssInfo { bssid, ssid, auth_mode, encr_mode, network_key, multi_ap }))
}
