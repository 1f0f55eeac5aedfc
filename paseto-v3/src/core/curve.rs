use p384::ecdsa::{Signature, SigningKey, VerifyingKey};
use p384::elliptic_curve::sec1::ToEncodedPoint;
use p384::{AffinePoint, ProjectivePoint};
use paseto_core::PasetoError;
use sha2::Sha384;

use super::public::SIGNATURE_LEN;

/// The elliptic curve primitives that `v3.public` is built on.
///
/// [`P384`] is the implementation used by [`sign`](crate::sign) and [`verify`](crate::verify).
/// The pipeline checks every value coming out of a `Curve` (point and signature lengths), so an
/// implementation does not need to be trusted to uphold those invariants.
pub trait Curve {
    /// SEC1 compressed encoding of the public point of `key`.
    fn compress_secret(&self, key: &SigningKey) -> Box<[u8]>;

    /// SEC1 compressed encoding of `key`.
    fn compress_public(&self, key: &VerifyingKey) -> Box<[u8]>;

    /// ECDSA sign the SHA-384 `digest`, returning `r || s`.
    fn sign(&self, key: &SigningKey, digest: Sha384) -> Result<Box<[u8]>, PasetoError>;

    /// ECDSA verify `signature` (`r || s`) over the SHA-384 `digest`.
    fn verify(
        &self,
        key: &VerifyingKey,
        digest: Sha384,
        signature: &[u8; SIGNATURE_LEN],
    ) -> Result<(), PasetoError>;
}

/// NIST P-384 with SHA-384, backed by RustCrypto's `p384`.
#[derive(Clone, Copy, Debug, Default)]
pub struct P384;

impl Curve for P384 {
    fn compress_secret(&self, key: &SigningKey) -> Box<[u8]> {
        let scalar = key.as_nonzero_scalar();
        let point = AffinePoint::from(ProjectivePoint::GENERATOR * scalar.as_ref());
        point.to_encoded_point(true).to_bytes()
    }

    fn compress_public(&self, key: &VerifyingKey) -> Box<[u8]> {
        key.to_encoded_point(true).to_bytes()
    }

    #[cfg(feature = "signing")]
    fn sign(&self, key: &SigningKey, digest: Sha384) -> Result<Box<[u8]>, PasetoError> {
        use p384::ecdsa::signature::RandomizedDigestSigner;

        // RFC 6979 nonce, hedged with fresh randomness on every call.
        let signature: Signature = key
            .try_sign_digest_with_rng(&mut rand_core::OsRng, digest)
            .map_err(|_| PasetoError::Signature)?;
        let signature = signature.normalize_s().unwrap_or(signature);

        Ok(signature.to_bytes().to_vec().into_boxed_slice())
    }

    #[cfg(not(feature = "signing"))]
    fn sign(&self, _: &SigningKey, _: Sha384) -> Result<Box<[u8]>, PasetoError> {
        Err(PasetoError::Signature)
    }

    fn verify(
        &self,
        key: &VerifyingKey,
        digest: Sha384,
        signature: &[u8; SIGNATURE_LEN],
    ) -> Result<(), PasetoError> {
        use p384::ecdsa::signature::DigestVerifier;

        let signature =
            Signature::from_slice(signature).map_err(|_| PasetoError::Signature)?;
        DigestVerifier::<Sha384, Signature>::verify_digest(key, digest, &signature)
            .map_err(|_| PasetoError::Signature)
    }
}
