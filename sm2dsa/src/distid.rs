//! Distinguished identifier support.

use crate::{AffinePoint, Sm2};
use elliptic_curve::{
    sec1::{self, ToEncodedPoint},
    Error, Result,
};
use primeorder::PrimeCurveParams;
use sm3::digest::{Digest, Output};

/// Type which represents distinguishing identifiers.
pub(crate) type DistId = str;

/// Compute user information hash `Z` according to [draft-shen-sm2-ecdsa § 5.1.4.4].
///
/// ```text
/// ZA=H256(ENTLA || IDA || a || b || xG || yG || xA || yA)
/// ```
///
/// Generic over the hash function so callers can substitute another 256-bit
/// digest for SM3 where an application requires it.
///
/// [draft-shen-sm2-ecdsa § 5.1.4.4]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.1.4.4
pub(crate) fn hash_z<D: Digest>(
    distid: &DistId,
    public_key: &impl AsRef<AffinePoint>,
) -> Result<Output<D>> {
    // ENTLA is the identifier length in bits as a big endian 16-bit integer,
    // which caps identifiers at 8191 bytes.
    let entla: u16 = distid
        .len()
        .checked_mul(8)
        .and_then(|l| l.try_into().ok())
        .ok_or(Error)?;

    let mut digest = D::new();
    digest.update(entla.to_be_bytes());
    digest.update(distid);
    digest.update(Sm2::EQUATION_A.to_bytes());
    digest.update(Sm2::EQUATION_B.to_bytes());
    digest.update(Sm2::GENERATOR.0.to_bytes());
    digest.update(Sm2::GENERATOR.1.to_bytes());

    match public_key.as_ref().to_encoded_point(false).coordinates() {
        sec1::Coordinates::Uncompressed { x, y } => {
            digest.update(x);
            digest.update(y);
            Ok(digest.finalize())
        }
        _ => Err(Error),
    }
}
