//! Diffie-Hellman over the RFC 3526 MODP group used by WSC key
//! establishment, g=2 (top-level spec §4.5). This rewrite performs the
//! modular exponentiation itself via `num-bigint` rather than delegating
//! it to the platform trait: the group is fixed by the standard, so there
//! is nothing platform-specific about it, unlike the true hardware-backed
//! entropy source the `InterfaceBackend` trait exposes for private-key
//! generation.

use num_bigint::BigUint;

const GROUP_PRIME_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC7",
    "4020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F14",
    "374FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B",
    "7EDEE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163",
    "BF0598DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356",
    "208552BB9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E46",
    "2E36CE3BE39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF",
    "6955817183995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFF",
    "FFFFFFFFFF",
);

const GENERATOR: u64 = 2;

/// One end of a fresh DH exchange: `private_key` never leaves the radio's
/// `RadioWscState`, `public_key` is what goes on the wire in the Public
/// Key attribute.
pub struct DhKeyPair {
    pub private_key: BigUint,
    pub public_key_bytes: Vec<u8>,
}

fn group_prime() -> BigUint {
    BigUint::parse_bytes(GROUP_PRIME_HEX.as_bytes(), 16)
        .expect("MODP group prime literal is well-formed hex")
}

fn group_byte_len() -> usize {
    group_prime().to_bytes_be().len()
}

/// Left-pads `v` with zero bytes to the group's fixed byte length
/// (top-level spec §4.5: "leading-zero-padded to group byte length").
fn pad_to_group_len(v: &[u8]) -> Vec<u8> {
    let len = group_byte_len();
    if v.len() >= len {
        return v[v.len() - len..].to_vec();
    }
    let mut out = vec![0u8; len - v.len()];
    out.extend_from_slice(v);
    out
}

/// Generates a fresh DH keypair using `random_bytes` (at least 192 bytes
/// of platform-sourced entropy) as the private exponent.
pub fn generate_keypair(random_bytes: &[u8]) -> DhKeyPair {
    let p = group_prime();
    let g = BigUint::from(GENERATOR);
    let private_key = BigUint::from_bytes_be(random_bytes) % &p;
    let public_key = g.modpow(&private_key, &p);
    DhKeyPair { private_key, public_key_bytes: pad_to_group_len(&public_key.to_bytes_be()) }
}

/// Computes `Z = peer_public^own_private mod p`, padded to the group's
/// fixed byte length (top-level spec §4.5).
pub fn shared_secret(own_private: &BigUint, peer_public_bytes: &[u8]) -> Vec<u8> {
    let p = group_prime();
    let peer_public = BigUint::from_bytes_be(peer_public_bytes);
    let z = peer_public.modpow(own_private, &p);
    pad_to_group_len(&z.to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_secret_matches_between_both_sides() {
        let enrollee = generate_keypair(&[0x11; 200]);
        let registrar = generate_keypair(&[0x22; 200]);

        let z1 = shared_secret(&enrollee.private_key, &registrar.public_key_bytes);
        let z2 = shared_secret(&registrar.private_key, &enrollee.public_key_bytes);
        assert_eq!(z1, z2);
    }

    #[test]
    fn public_key_is_padded_to_group_length() {
        let kp = generate_keypair(&[0x01; 200]);
        assert_eq!(kp.public_key_bytes.len(), group_byte_len());
    }
}
