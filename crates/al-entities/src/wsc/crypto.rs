//! AES-128-CBC transport for the WSC Encrypted Settings attribute
//! (top-level spec §4.5: PKCS#5-v2 padding, fresh random IV prefixed to
//! the ciphertext).

use aes::Aes128;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use cbc::cipher::block_padding::Pkcs7;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

pub const IV_LEN: usize = 16;

/// Encrypts `plaintext` under `key_wrap_key`, PKCS#5-v2 padding it to a
/// 16-byte multiple first, and returns `iv || ciphertext`.
pub fn encrypt(key_wrap_key: &[u8; 16], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    let enc = Aes128CbcEnc::new(key_wrap_key.into(), iv.into());
    let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Inverse of `encrypt`: splits off the leading IV, decrypts and strips
/// padding. Returns `None` on a malformed block count or bad padding so
/// the caller can fold this into the same "Encrypted Settings failed to
/// decrypt" rejection path as a key-wrap-authenticator mismatch.
pub fn decrypt(key_wrap_key: &[u8; 16], iv_and_ciphertext: &[u8]) -> Option<Vec<u8>> {
    if iv_and_ciphertext.len() < IV_LEN || (iv_and_ciphertext.len() - IV_LEN) % 16 != 0 {
        return None;
    }
    let (iv, ciphertext) = iv_and_ciphertext.split_at(IV_LEN);
    let mut buf = ciphertext.to_vec();
    let dec = Aes128CbcDec::new(key_wrap_key.into(), iv.into());
    let unpadded_len = dec.decrypt_padded_mut::<Pkcs7>(&mut buf).ok()?.len();
    buf.truncate(unpadded_len);
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let key = [0x5au8; 16];
        let iv = [0x01u8; IV_LEN];
        let plaintext = b"WSC-FRAGMENT-01-SAMPLE-DATA-ZZZ";
        let wrapped = encrypt(&key, &iv, plaintext);
        let recovered = decrypt(&key, &wrapped).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn bad_key_fails_to_unpad() {
        let key = [0x5au8; 16];
        let wrong_key = [0x5bu8; 16];
        let iv = [0x01u8; IV_LEN];
        let wrapped = encrypt(&key, &iv, b"some plaintext bytes here");
        assert!(decrypt(&wrong_key, &wrapped).is_none() || decrypt(&wrong_key, &wrapped).unwrap() != b"some plaintext bytes here");
    }
}
