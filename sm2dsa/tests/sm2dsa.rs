//! SM2DSA tests.

#![cfg(all(feature = "dsa", feature = "getrandom"))]

use elliptic_curve::ops::Reduce;
use hex_literal::hex;
use proptest::prelude::*;
use sm2dsa::{
    dsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    NonZeroScalar, Scalar, U256,
};

const PUBLIC_KEY: [u8; 65] = hex!(
    "0408D77AE04C01CC4C1104360DD8AF6B6F7DF334283D7C1A6AFD5652407B87BEE5014E2A57C36C150D16324DC664E31E6432359609C4E79847A5B161C8C7364C8A"
);
const IDENTITY: &str = "example@rustcrypto.org";
const MSG: &[u8] = b"testing";

// Created using:
// $ openssl pkeyutl -sign -in - -inkey pkcs8-private-key.pem -out sig -digest sm3 -pkeyopt distid:example@rustcrypto.org
const SIG: [u8; 64] = hex!(
    "d1dcccedd9fb785e0f67c16b7c52901625c0b69de9bca2144acc7be713cad2fc" // r
    "f7d1eae6e3a157b36c65f672f738ca8b46298bf149a6510072c431b49cd88b1c" // s
);

#[test]
fn verify_test_vector() {
    let vk = VerifyingKey::from_sec1_bytes(IDENTITY, &PUBLIC_KEY).unwrap();
    let sig = Signature::from_bytes(&SIG).expect("decoded Signature failed");
    assert!(vk.verify(MSG, &sig).is_ok());
}

#[test]
fn reject_wrong_identity() {
    let vk = VerifyingKey::from_sec1_bytes("someone-else@rustcrypto.org", &PUBLIC_KEY).unwrap();
    let sig = Signature::from_bytes(&SIG).expect("decoded Signature failed");
    assert!(vk.verify(MSG, &sig).is_err());
}

#[test]
fn reject_oversized_identity() {
    // ENTLA is a 16-bit count of bits, which caps identifiers at 8191 bytes.
    let identity = "a".repeat(8192);
    assert!(VerifyingKey::from_sec1_bytes(&identity, &PUBLIC_KEY).is_err());

    let identity = "a".repeat(8191);
    assert!(VerifyingKey::from_sec1_bytes(&identity, &PUBLIC_KEY).is_ok());
}

#[test]
fn reject_zero_signature_components() {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(&SIG[..32]);
    assert!(Signature::from_bytes(&bytes).is_err()); // s = 0

    let mut bytes = [0u8; 64];
    bytes[32..].copy_from_slice(&SIG[32..]);
    assert!(Signature::from_bytes(&bytes).is_err()); // r = 0
}

#[cfg(feature = "der")]
mod der {
    use super::*;

    const SIG_DER: [u8; 71] = hex!(
        "304502201d09df0f021b8c9aa7a437c713f11f9bc5ef49b5f053de912d6a3a8b68d49688022100c8acda282cb69bd4734b9c164925772f8f5cb23b273c222d69a4a49bb40a8701"
    );

    #[test]
    fn signature_decoding() {
        let sig = Signature::from_der(&SIG_DER).expect("decoded Signature failed");
        assert_eq!(sig.r().to_bytes().as_slice(), &SIG_DER[4..36]);
        assert_eq!(sig.s().to_bytes().as_slice(), &SIG_DER[39..71]);
    }

    #[test]
    fn signature_round_trip() {
        let sig = Signature::from_der(&SIG_DER).expect("decoded Signature failed");
        assert_eq!(sig.to_der().as_bytes(), &SIG_DER[..]);
    }

    #[test]
    fn reject_trailing_data() {
        let mut bytes = SIG_DER.to_vec();
        bytes.push(0x00);
        assert!(Signature::from_der(&bytes).is_err());
    }

    #[test]
    fn reject_padded_integer() {
        // Same signature with an unnecessary leading zero on `r`.
        let mut bytes = vec![0x30, 0x46, 0x02, 0x21, 0x00];
        bytes.extend_from_slice(&SIG_DER[4..36]); // r
        bytes.extend_from_slice(&SIG_DER[36..]); // s TLV
        assert!(Signature::from_der(&bytes).is_err());
    }

    #[test]
    fn reject_non_minimal_length() {
        // Outer SEQUENCE length in (non-minimal) long form.
        let mut bytes = vec![0x30, 0x81, 0x45];
        bytes.extend_from_slice(&SIG_DER[2..]);
        assert!(Signature::from_der(&bytes).is_err());
    }

    #[test]
    fn reject_truncated() {
        assert!(Signature::from_der(&SIG_DER[..SIG_DER.len() - 1]).is_err());
    }
}

prop_compose! {
    fn signing_key()(bytes in any::<[u8; 32]>()) -> SigningKey {
        loop {
            let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&bytes.into());
            if let Some(scalar) = Option::from(NonZeroScalar::new(scalar)) {
                return SigningKey::from_nonzero_scalar(IDENTITY, scalar).unwrap();
            }
        }
    }
}

proptest! {
    #[test]
    fn sign_and_verify(sk in signing_key()) {
        let signature = sk.sign(MSG);
        prop_assert!(sk.verifying_key().verify(MSG, &signature).is_ok());
    }

    #[test]
    #[cfg(feature = "der")]
    fn sign_and_verify_der(sk in signing_key()) {
        let signature = sk.sign(MSG);
        let signature_der_bytes = signature.to_der().to_vec();
        let signature = Signature::from_der(&signature_der_bytes).expect("decoded Signature failed");
        prop_assert!(sk.verifying_key().verify(MSG, &signature).is_ok());
    }

    #[test]
    fn reject_invalid_signature(sk in signing_key(), byte in 0usize..32, bit in 0usize..8) {
        let mut signature_bytes = sk.sign(MSG).to_bytes();

        // tweak signature to make it invalid
        signature_bytes[byte] ^= 1 << bit;

        // Flipping a bit may push a component out of range, in which case
        // parsing itself rejects the signature.
        if let Ok(signature) = Signature::from_bytes(&signature_bytes) {
            prop_assert!(sk.verifying_key().verify(MSG, &signature).is_err());
        }
    }
}
