//! WSC key schedule (top-level spec §4.5): DH shared secret -> DHKey ->
//! KDK -> {AuthKey, KeyWrapKey, EMSK} via the WSC counter-mode KDF.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const PERSONALIZATION_STRING: &[u8] = b"Wi-Fi Easy and Secure Key Derivation";

pub fn dh_key(shared_secret: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(shared_secret);
    hasher.finalize().into()
}

pub fn derivation_key(dh_key: &[u8; 32], enrollee_nonce: &[u8; 16], enrollee_mac: &[u8; 6], registrar_nonce: &[u8; 16]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(dh_key).expect("HMAC accepts any key length");
    mac.update(enrollee_nonce);
    mac.update(enrollee_mac);
    mac.update(registrar_nonce);
    mac.finalize().into_bytes().into()
}

/// Counter-mode HMAC expansion to `total_bits / 8` bytes (top-level spec
/// §4.5: 32-bit MSB-first counter, fixed personalization string, 4-byte
/// MSB-first bit-length suffix).
fn kdf(kdk: &[u8; 32], total_bits: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((total_bits / 8) as usize);
    let mut counter: u32 = 0;
    while (out.len() as u32) * 8 < total_bits {
        counter += 1;
        let mut mac = HmacSha256::new_from_slice(kdk).expect("HMAC accepts any key length");
        mac.update(&counter.to_be_bytes());
        mac.update(PERSONALIZATION_STRING);
        mac.update(&total_bits.to_be_bytes());
        out.extend_from_slice(&mac.finalize().into_bytes());
    }
    out.truncate((total_bits / 8) as usize);
    out
}

/// The three keys the exchange derives: AuthKey (32 bytes), KeyWrapKey
/// (16 bytes), EMSK (32 bytes) — 80 bytes total (top-level spec §4.5).
pub struct WscKeys {
    pub auth_key: [u8; 32],
    pub key_wrap_key: [u8; 16],
    pub emsk: [u8; 32],
}

pub fn derive_keys(kdk: &[u8; 32]) -> WscKeys {
    let expanded = kdf(kdk, 80 * 8);
    let mut auth_key = [0u8; 32];
    let mut key_wrap_key = [0u8; 16];
    let mut emsk = [0u8; 32];
    auth_key.copy_from_slice(&expanded[0..32]);
    key_wrap_key.copy_from_slice(&expanded[32..48]);
    emsk.copy_from_slice(&expanded[48..80]);
    WscKeys { auth_key, key_wrap_key, emsk }
}

/// M2 Authenticator: first 8 bytes of HMAC-SHA-256(AuthKey, M1 || M2-sans-Authenticator).
pub fn compute_authenticator(auth_key: &[u8; 32], m1_bytes: &[u8], m2_bytes_without_authenticator: &[u8]) -> [u8; 8] {
    let mut mac = HmacSha256::new_from_slice(auth_key).expect("HMAC accepts any key length");
    mac.update(m1_bytes);
    mac.update(m2_bytes_without_authenticator);
    let full = mac.finalize().into_bytes();
    let mut out = [0u8; 8];
    out.copy_from_slice(&full[..8]);
    out
}

/// Key-Wrap-Authenticator embedded inside Encrypted Settings' plaintext:
/// first 8 bytes of HMAC-SHA-256(AuthKey, plaintext-before-KWA).
pub fn compute_key_wrap_authenticator(auth_key: &[u8; 32], plaintext_before_kwa: &[u8]) -> [u8; 8] {
    let mut mac = HmacSha256::new_from_slice(auth_key).expect("HMAC accepts any key length");
    mac.update(plaintext_before_kwa);
    let full = mac.finalize().into_bytes();
    let mut out = [0u8; 8];
    out.copy_from_slice(&full[..8]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_is_deterministic_and_sized() {
        let kdk = [0x42u8; 32];
        let keys1 = derive_keys(&kdk);
        let keys2 = derive_keys(&kdk);
        assert_eq!(keys1.auth_key, keys2.auth_key);
        assert_eq!(keys1.key_wrap_key, keys2.key_wrap_key);
        assert_eq!(keys1.emsk, keys2.emsk);
    }

    #[test]
    fn different_kdk_yields_different_auth_key() {
        let k1 = derive_keys(&[0x01; 32]);
        let k2 = derive_keys(&[0x02; 32]);
        assert_ne!(k1.auth_key, k2.auth_key);
    }

    #[test]
    fn authenticator_bit_flip_is_detected() {
        let auth_key = [0x09u8; 32];
        let m1 = b"m1-bytes-sample";
        let m2 = b"m2-bytes-sample";
        let a1 = compute_authenticator(&auth_key, m1, m2);
        let mut flipped = m2.to_vec();
        flipped[0] ^= 0x01;
        let a2 = compute_authenticator(&auth_key, m1, &flipped);
        assert_ne!(a1, a2);
    }

    #[test]
    fn key_wrap_authenticator_bit_flip_is_detected() {
        let auth_key = [0x0au8; 32];
        let plaintext = b"ssid-auth-encr-network-key-mac-sample";
        let kwa1 = compute_key_wrap_authenticator(&auth_key, plaintext);
        let mut flipped = plaintext.to_vec();
        let last = flipped.len() - 1;
        flipped[last] ^= 0x01;
        let kwa2 = compute_key_wrap_authenticator(&auth_key, &flipped);
        assert_ne!(kwa1, kwa2);
    }
}
