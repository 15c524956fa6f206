#![cfg(all(feature = "dsa", feature = "getrandom"))]

use elliptic_curve::ops::Reduce;
use proptest::prelude::*;
use sm2dsa::{
    dsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey,
    },
    NonZeroScalar, Scalar, U256,
};

const IDENTITY: &str = "test@rustcrypto.org";

/// Helper function to create a signing key from test data
fn create_test_signing_key() -> SigningKey {
    // Use a fixed test key for deterministic testing
    let test_key = [42u8; 32];
    let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&test_key.into());
    let scalar = NonZeroScalar::new(scalar).unwrap();
    SigningKey::from_nonzero_scalar(IDENTITY, scalar).unwrap()
}

#[test]
fn test_varying_message_lengths() {
    let sk = create_test_signing_key();
    let test_messages = vec![
        vec![],          // Empty message
        vec![1u8; 1],    // 1 byte
        vec![2u8; 32],   // 32 bytes
        vec![3u8; 1024], // 1KB
    ];

    for msg in test_messages {
        let sig = sk.sign(&msg);
        assert!(sk.verifying_key().verify(&msg, &sig).is_ok());
    }
}

#[test]
fn test_signature_tampering() {
    let sk = create_test_signing_key();
    let msg = b"test message";
    let sig = sk.sign(msg);
    let mut tampered_sig = sig.to_bytes();

    // Modify each byte of signature
    for i in 0..64 {
        tampered_sig[i] ^= 1;
        if let Ok(invalid_sig) = Signature::from_bytes(&tampered_sig) {
            assert!(sk.verifying_key().verify(msg, &invalid_sig).is_err());
        }
        tampered_sig[i] ^= 1; // Restore
    }
}

#[test]
fn test_message_tampering() {
    let sk = create_test_signing_key();
    let msg = b"test message";
    let sig = sk.sign(msg);

    // Flip every bit of the message
    let mut tampered = *msg;
    for i in 0..tampered.len() {
        for bit in 0..8 {
            tampered[i] ^= 1 << bit;
            assert!(sk.verifying_key().verify(&tampered, &sig).is_err());
            tampered[i] ^= 1 << bit; // Restore
        }
    }
}

#[cfg(all(feature = "alloc", feature = "der"))]
#[test]
fn test_der_prehash_round_trip() {
    use rand_core::OsRng;

    let sk = create_test_signing_key();
    let prehash = [0x5au8; 32];

    let der = sk.sign_prehash_der(&mut OsRng, &prehash).unwrap();
    let vk = sk.verifying_key();
    assert!(vk.verify_prehash_der(&prehash, &der).is_ok());

    // Wrong digest and truncated encodings are rejected.
    assert!(vk.verify_prehash_der(&[0xa5u8; 32], &der).is_err());
    assert!(vk.verify_prehash_der(&prehash, &der[..der.len() - 1]).is_err());
}

#[test]
fn test_special_messages() {
    let sk = create_test_signing_key();
    let special_msgs = vec![
        vec![0u8; 32],      // All zeros
        vec![255u8; 32],    // All ones
        b"\n\r\t".to_vec(), // Control chars
    ];

    for msg in special_msgs {
        let sig = sk.sign(&msg);
        assert!(sk.verifying_key().verify(&msg, &sig).is_ok());
    }
}

#[test]
fn test_signatures_are_randomized() {
    let sk = create_test_signing_key();
    let msg = b"same message";

    // A fresh ephemeral scalar is drawn per signature, so repeat signatures
    // over the same message differ (but both verify).
    let sig1 = sk.sign(msg);
    let sig2 = sk.sign(msg);
    assert_ne!(sig1.to_bytes(), sig2.to_bytes());
    assert!(sk.verifying_key().verify(msg, &sig1).is_ok());
    assert!(sk.verifying_key().verify(msg, &sig2).is_ok());
}

#[cfg(feature = "alloc")]
#[test]
fn test_alternate_digest() {
    use rand_core::OsRng;
    use sha2::Sha256;
    use sm3::Sm3;

    let sk = create_test_signing_key();
    let msg = b"digest agility";

    // SM3 through the generic path matches the default path.
    let sig = sk.sign_with_digest::<Sm3>(&mut OsRng, msg).unwrap();
    assert!(sk.verifying_key().verify(msg, &sig).is_ok());

    // SHA-256 signatures only verify through the SHA-256 path.
    let sig = sk.sign_with_digest::<Sha256>(&mut OsRng, msg).unwrap();
    assert!(sk
        .verifying_key()
        .verify_with_digest::<Sha256>(msg, &sig)
        .is_ok());
    assert!(sk.verifying_key().verify(msg, &sig).is_err());
}

proptest! {
    #[test]
    fn test_signature_consistency(
        msg1 in any::<Vec<u8>>(),
        msg2 in any::<Vec<u8>>()
    ) {
        let sk = create_test_signing_key();
        let sig1 = sk.sign(&msg1);
        let sig2 = sk.sign(&msg1); // Same message
        let sig3 = sk.sign(&msg2); // Different message

        // Same message should verify with both signatures
        prop_assert!(sk.verifying_key().verify(&msg1, &sig1).is_ok());
        prop_assert!(sk.verifying_key().verify(&msg1, &sig2).is_ok());

        // Different messages should have different signatures
        if msg1 != msg2 {
            prop_assert_ne!(sig1.to_bytes(), sig3.to_bytes());
        }
    }
}
