use p384::ecdsa::{SigningKey, VerifyingKey};
use paseto_core::PasetoError;

use super::Curve;

/// Length of a SEC1 compressed P-384 point: a parity byte followed by the x-coordinate.
pub const COMPRESSED_POINT_LEN: usize = 49;

/// A compressed P-384 public key, as bound into every `v3.public` signature.
///
/// Construction checks the length and the `0x02`/`0x03` parity prefix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CompressedPoint([u8; COMPRESSED_POINT_LEN]);

impl CompressedPoint {
    /// Derive the compressed public point of a secret key.
    pub fn derive(curve: &impl Curve, key: &SigningKey) -> Result<Self, PasetoError> {
        Self::try_from(&*curve.compress_secret(key))
    }

    /// Read the compressed point of a public key.
    pub fn read(curve: &impl Curve, key: &VerifyingKey) -> Result<Self, PasetoError> {
        Self::try_from(&*curve.compress_public(key))
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_POINT_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for CompressedPoint {
    type Error = PasetoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let point: [u8; COMPRESSED_POINT_LEN] =
            bytes.try_into().map_err(|_| PasetoError::Length {
                field: "compressed public key",
                expected: COMPRESSED_POINT_LEN,
                actual: bytes.len(),
            })?;

        match point[0] {
            0x02 | 0x03 => Ok(Self(point)),
            _ => Err(PasetoError::Format(
                "compressed public key must start with 0x02 or 0x03",
            )),
        }
    }
}
