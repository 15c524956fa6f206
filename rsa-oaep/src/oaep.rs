//! EME-OAEP encoding and decoding ([RFC 8017 § 7.1]).
//!
//! ```text
//!                      +----------+------+--+-------+
//!                 DB = |  lHash   |  PS  |01|   M   |
//!                      +----------+------+--+-------+
//!                                     |
//!           +----------+              |
//!           |   seed   |              |
//!           +----------+              |
//!                 |                   |
//!                 |-------> MGF ---> xor
//!                 |                   |
//!        +--+     V                   |
//!        |00|    xor <----- MGF <-----|
//!        +--+     |                   |
//!          |      |                   |
//!          V      V                   V
//!        +--+----------+----------------------------+
//!   EM = |00|maskedSeed|          maskedDB          |
//!        +--+----------+----------------------------+
//! ```
//!
//! [RFC 8017 § 7.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.1

use alloc::vec;
use alloc::vec::Vec;
use digest::{Digest, FixedOutputReset};
use rand_core::CryptoRngCore;
use sha1::Sha1;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::{mgf::mgf1_xor, Error, Result};

/// Encode `msg` into the encoded message buffer `em` using the default
/// SHA-1 digest for both the label hash and MGF1.
///
/// `em` must be the size of the RSA modulus in bytes; the first byte of the
/// result is always zero so the encoded message is below the modulus.
pub fn encode(
    rng: &mut impl CryptoRngCore,
    em: &mut [u8],
    msg: &[u8],
    label: &[u8],
) -> Result<()> {
    encode_mgf1::<Sha1, Sha1>(rng, em, msg, label)
}

/// Encode `msg` into `em` with label digest `D` and MGF1 digest `MGD`.
pub fn encode_mgf1<D, MGD>(
    rng: &mut impl CryptoRngCore,
    em: &mut [u8],
    msg: &[u8],
    label: &[u8],
) -> Result<()>
where
    D: Digest,
    MGD: Digest + FixedOutputReset,
{
    let hlen = <D as Digest>::output_size();

    // EM = 0x00 || maskedSeed || maskedDB needs room for both hash values,
    // the 0x01 separator and the leading zero byte.
    let emlen = em.len().checked_sub(1).ok_or(Error::KeySizeTooSmall)?;
    if emlen < 2 * hlen + 1 {
        return Err(Error::KeySizeTooSmall);
    }
    if msg.len() > emlen - 2 * hlen - 1 {
        return Err(Error::DataTooLarge);
    }

    em[0] = 0;
    let (seed, db) = em[1..].split_at_mut(hlen);

    rng.try_fill_bytes(seed).map_err(|_| Error::RandomGeneration)?;

    // DB = lHash || PS || 0x01 || M
    let lhash = D::new().chain_update(label).finalize();
    db[..hlen].copy_from_slice(&lhash);
    db[hlen..].fill(0);
    let sep = db.len() - msg.len() - 1;
    db[sep] = 0x01;
    db[sep + 1..].copy_from_slice(msg);

    let mut mgf_digest = MGD::new();

    // maskedDB = DB xor MGF1(seed), then maskedSeed = seed xor MGF1(maskedDB)
    mgf1_xor(db, &mut mgf_digest, seed);
    mgf1_xor(seed, &mut mgf_digest, db);

    Ok(())
}

/// Decode an OAEP encoded message using the default SHA-1 digest for both
/// the label hash and MGF1.
///
/// See [`decode_mgf1`] for the input contract.
pub fn decode(from: &[u8], num: usize, label: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    decode_mgf1::<Sha1, Sha1>(from, num, label)
}

/// Decode an OAEP encoded message with label digest `D` and MGF1 digest
/// `MGD`, returning the recovered message.
///
/// `from` is the big endian byte encoding of the integer an RSA private-key
/// operation produced, which may be shorter than the modulus when the
/// conversion stripped leading zeros; `num` is the modulus size in bytes and
/// the leading zeros are restored before decoding.
///
/// Every padding failure is reported as the same [`Error::Decoding`] value,
/// and the padding checks run in constant time with respect to the decrypted
/// contents to resist Manger's chosen-ciphertext attack.
pub fn decode_mgf1<D, MGD>(from: &[u8], num: usize, label: &[u8]) -> Result<Zeroizing<Vec<u8>>>
where
    D: Digest,
    MGD: Digest + FixedOutputReset,
{
    let hlen = <D as Digest>::output_size();

    // The modulus size is public, so this length check may branch.
    if num < 2 * hlen + 2 {
        return Err(Error::Decoding);
    }

    // An input longer than the modulus can never decode. Record the failure
    // and clamp rather than returning, so every input runs the same path.
    let input_too_long = Choice::from((from.len() > num) as u8);
    let from = &from[..from.len().min(num)];

    // Restore the zero padding the integer conversion stripped.
    let mut em = Zeroizing::new(vec![0u8; num]);
    em[num - from.len()..].copy_from_slice(from);

    let first_byte_is_zero = em[0].ct_eq(&0u8);

    let (seed, db) = em[1..].split_at_mut(hlen);

    let mut mgf_digest = MGD::new();
    mgf1_xor(seed, &mut mgf_digest, db);
    mgf1_xor(db, &mut mgf_digest, seed);

    let lhash = D::new().chain_update(label).finalize();
    let lhash_ok = db[..hlen].ct_eq(&lhash);

    // Scan for the 0x01 separator without branching: every padding byte
    // before it must be zero, and the scan must not reveal its position or
    // whether it was found.
    let mut looking_for_index = Choice::from(1u8);
    let mut index = 0u32;
    let mut invalid = Choice::from(0u8);

    for (i, el) in db.iter().skip(hlen).enumerate() {
        let equals0 = el.ct_eq(&0u8);
        let equals1 = el.ct_eq(&1u8);
        index.conditional_assign(&(i as u32), looking_for_index & equals1);
        looking_for_index &= !equals1;
        invalid |= looking_for_index & !equals0;
    }

    let valid = first_byte_is_zero & lhash_ok & !invalid & !looking_for_index & !input_too_long;

    // Single validity decision: the caller cannot distinguish a bad first
    // byte, a bad label hash or a missing separator.
    if valid.into() {
        Ok(Zeroizing::new(db[hlen + index as usize + 1..].to_vec()))
    } else {
        Err(Error::Decoding)
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::Error;
    use alloc::vec;
    use rand_core::OsRng;
    use sha1::Sha1;

    const NUM: usize = 128; // RSA-1024
    const HLEN: usize = 20; // SHA-1
    const MAX_MSG: usize = NUM - 2 * HLEN - 2;

    #[test]
    fn message_size_boundary() {
        let mut em = [0u8; NUM];
        assert!(encode(&mut OsRng, &mut em, &[0xaa; MAX_MSG], &[]).is_ok());
        assert_eq!(
            encode(&mut OsRng, &mut em, &[0xaa; MAX_MSG + 1], &[]),
            Err(Error::DataTooLarge)
        );
    }

    #[test]
    fn key_size_boundary() {
        // Smallest workable encoded message: 0x00 || seed || lHash || 0x01
        let mut em = vec![0u8; 2 * HLEN + 2];
        assert!(encode(&mut OsRng, &mut em, &[], &[]).is_ok());

        let mut em = vec![0u8; 2 * HLEN + 1];
        assert_eq!(
            encode(&mut OsRng, &mut em, &[], &[]),
            Err(Error::KeySizeTooSmall)
        );

        let mut em: [u8; 0] = [];
        assert_eq!(
            encode(&mut OsRng, &mut em, &[], &[]),
            Err(Error::KeySizeTooSmall)
        );
    }

    #[test]
    fn first_byte_is_always_zero() {
        let mut em = [0xffu8; NUM];
        encode(&mut OsRng, &mut em, b"msg", &[]).unwrap();
        assert_eq!(em[0], 0);
    }

    #[test]
    fn overlong_input_fails_even_with_valid_prefix() {
        // The first `NUM` bytes are a valid encoding on their own, so only
        // the length accounting can reject the input.
        let mut input = [0u8; NUM + 1];
        encode(&mut OsRng, &mut input[..NUM], b"msg", &[]).unwrap();
        assert_eq!(decode(&input, NUM, &[]), Err(Error::Decoding));
    }

    #[test]
    fn digest_substitution() {
        use super::{decode_mgf1, encode_mgf1};
        use sha2::Sha256;

        let mut em = [0u8; NUM];
        encode_mgf1::<Sha256, Sha256>(&mut OsRng, &mut em, b"msg", b"label").unwrap();
        let msg = decode_mgf1::<Sha256, Sha256>(&em, NUM, b"label").unwrap();
        assert_eq!(msg.as_slice(), b"msg");

        // SHA-1 decoding of a SHA-256 encoding fails.
        assert_eq!(decode(&em, NUM, b"label"), Err(Error::Decoding));
    }

    #[test]
    fn failing_rng() {
        struct FailingRng;

        impl rand_core::RngCore for FailingRng {
            fn next_u32(&mut self) -> u32 {
                0
            }

            fn next_u64(&mut self) -> u64 {
                0
            }

            fn fill_bytes(&mut self, _dest: &mut [u8]) {}

            fn try_fill_bytes(
                &mut self,
                _dest: &mut [u8],
            ) -> core::result::Result<(), rand_core::Error> {
                Err(rand_core::Error::from(
                    core::num::NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap(),
                ))
            }
        }

        impl rand_core::CryptoRng for FailingRng {}

        let mut em = [0u8; NUM];
        assert_eq!(
            encode(&mut FailingRng, &mut em, b"msg", &[]),
            Err(Error::RandomGeneration)
        );
    }

    #[test]
    fn sha1_is_default() {
        use super::{decode_mgf1, encode_mgf1};

        let mut em = [0u8; NUM];
        encode_mgf1::<Sha1, Sha1>(&mut OsRng, &mut em, b"msg", b"label").unwrap();
        let msg = decode(&em, NUM, b"label").unwrap();
        assert_eq!(msg.as_slice(), b"msg");
    }
}
