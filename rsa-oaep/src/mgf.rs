//! MGF1 mask generation function ([RFC 8017 Appendix B.2.1]).
//!
//! [RFC 8017 Appendix B.2.1]: https://datatracker.ietf.org/doc/html/rfc8017#appendix-B.2.1

use alloc::vec::Vec;
use digest::{Digest, FixedOutputReset};

/// XOR the MGF1 output for `seed` into `out`.
///
/// The mask is produced as `Hash(seed || counter)` blocks with a big endian
/// 32-bit block counter, truncating the final block to fit.
pub(crate) fn mgf1_xor<D>(out: &mut [u8], digest: &mut D, seed: &[u8])
where
    D: Digest + FixedOutputReset,
{
    let mut counter = [0u8; 4];
    let mut i = 0;

    while i < out.len() {
        Digest::update(digest, seed);
        Digest::update(digest, counter);
        let block = digest.finalize_reset();

        let mut j = 0;
        loop {
            if j >= block.len() || i >= out.len() {
                break;
            }

            out[i] ^= block[j];
            j += 1;
            i += 1;
        }

        inc_counter(&mut counter);
    }
}

/// Compute `len` bytes of MGF1 output for `seed`.
pub fn mgf1<D>(seed: &[u8], len: usize) -> Vec<u8>
where
    D: Digest + FixedOutputReset,
{
    let mut out = alloc::vec![0u8; len];
    let mut digest = D::new();
    mgf1_xor(&mut out, &mut digest, seed);
    out
}

fn inc_counter(counter: &mut [u8; 4]) {
    for i in (0..4).rev() {
        counter[i] = counter[i].wrapping_add(1);

        if counter[i] != 0 {
            // No overflow into the next byte.
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{inc_counter, mgf1};
    use hex_literal::hex;
    use sha1::Sha1;
    use sha2::Sha256;

    #[test]
    fn mgf1_sha1() {
        assert_eq!(
            mgf1::<Sha1>(b"bar", 50),
            hex!(
                "bc0c655e016bc2931d85a2e675181adcef7f581f76df2739da74faac41627be2f7f415c89e983fd0ce80ced9878641cb4876"
            )
        );
    }

    #[test]
    fn mgf1_sha256() {
        assert_eq!(
            mgf1::<Sha256>(b"bar", 50),
            hex!(
                "382576a7841021cc28fc4c0948753fb8312090cea942ea4c4e735d10dc724b155f9f6069f289d61daca0cb814502ef04eae1"
            )
        );
    }

    #[test]
    fn mgf1_truncates_final_block() {
        let long = mgf1::<Sha1>(b"seed", 40);
        let short = mgf1::<Sha1>(b"seed", 25);
        assert_eq!(&long[..25], short.as_slice());
    }

    #[test]
    fn mgf1_empty_output() {
        assert!(mgf1::<Sha1>(b"seed", 0).is_empty());
    }

    #[test]
    fn counter_carries() {
        let mut counter = [0, 0, 0, 255];
        inc_counter(&mut counter);
        assert_eq!(counter, [0, 0, 1, 0]);

        let mut counter = [255, 255, 255, 255];
        inc_counter(&mut counter);
        assert_eq!(counter, [0, 0, 0, 0]);
    }
}
