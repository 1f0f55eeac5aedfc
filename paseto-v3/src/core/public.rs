use digest::Digest;
use paseto_core::pae::{WriteBytes, pre_auth_encode};
use paseto_core::{Header, PasetoError, Purpose, Token, Version};
#[cfg(feature = "signing")]
use paseto_core::TokenOut;
use sha2::Sha384;
use subtle::ConstantTimeEq;

use super::{CompressedPoint, Curve, Key, KeyMaterial};

/// Length of an `r || s` P-384 signature.
pub const SIGNATURE_LEN: usize = 96;

/// `v3.public.`
pub const HEADER: Header = Header::new(Version::V3, Purpose::Public);

/// Sign `message` with the secret `key`, producing a `v3.public` token.
///
/// <https://github.com/paseto-standard/paseto-spec/blob/master/docs/01-Protocol-Versions/Version3.md#sign>
#[cfg(feature = "signing")]
pub fn sign_with(
    curve: &impl Curve,
    key: &Key,
    message: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Result<String, PasetoError> {
    let KeyMaterial::Secret(secret_key) = key.require(Version::V3, Purpose::Public)? else {
        tracing::debug!("v3.public tokens can only be signed with a secret key");
        return Err(PasetoError::KeyValidity);
    };

    tracing::trace!(
        message_len = message.len(),
        footer_len = footer.len(),
        "signing v3.public token"
    );

    let token = TokenOut::new(HEADER);

    let pk = CompressedPoint::derive(curve, secret_key)?;
    let digest = preauth_public(
        &pk,
        token.header(),
        message,
        footer,
        implicit_assertion,
        Hasher(Sha384::new()),
    );

    let signature = curve.sign(secret_key, digest.0)?;
    if signature.len() != SIGNATURE_LEN {
        return Err(PasetoError::Length {
            field: "signature",
            expected: SIGNATURE_LEN,
            actual: signature.len(),
        });
    }

    let mut payload = Vec::with_capacity(message.len() + SIGNATURE_LEN);
    payload.extend_from_slice(message);
    payload.extend_from_slice(&signature);

    Ok(token.payload(payload).footer(footer).to_string())
}

/// Verify a `v3.public` token with the public `key`, returning the signed message.
///
/// `footer` and `implicit_assertion` must be the values the token was signed with.
/// If the token carries a footer, it must equal `footer`.
///
/// <https://github.com/paseto-standard/paseto-spec/blob/master/docs/01-Protocol-Versions/Version3.md#verify>
pub fn verify_with(
    curve: &impl Curve,
    key: &Key,
    token: &str,
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Result<Vec<u8>, PasetoError> {
    let KeyMaterial::Public(public_key) = key.require(Version::V3, Purpose::Public)? else {
        tracing::debug!("v3.public tokens can only be verified with a public key");
        return Err(PasetoError::KeyValidity);
    };

    let token = Token::parse(token, HEADER)?;

    tracing::trace!(
        payload_len = token.payload().len(),
        footer_len = token.footer().len(),
        "verifying v3.public token"
    );

    if !token.footer().is_empty() && !bool::from(token.footer().ct_eq(footer)) {
        tracing::debug!("token footer does not match the expected footer");
        return Err(PasetoError::Signature);
    }

    let header = token.header();
    let (mut payload, _) = token.into_parts();

    let (message, signature) =
        payload
            .split_last_chunk::<SIGNATURE_LEN>()
            .ok_or(PasetoError::Length {
                field: "signed payload",
                expected: SIGNATURE_LEN,
                actual: payload.len(),
            })?;

    let pk = CompressedPoint::read(curve, public_key)?;
    let digest = preauth_public(
        &pk,
        header,
        message,
        footer,
        implicit_assertion,
        Hasher(Sha384::new()),
    );

    if let Err(err) = curve.verify(public_key, digest.0, signature) {
        tracing::debug!("v3.public signature verification failed");
        return Err(err);
    }

    let len = message.len();
    payload.truncate(len);
    Ok(payload)
}

/// `PAE(pk, header, message, footer, implicit_assertion)`, written into `out`.
pub fn preauth_public<W: WriteBytes>(
    pk: &CompressedPoint,
    header: Header,
    message: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
    mut out: W,
) -> W {
    pre_auth_encode(
        [
            &[&pk.as_bytes()[..]],
            &header.pieces(),
            &[message],
            &[footer],
            &[implicit_assertion],
        ],
        &mut out,
    );
    out
}

struct Hasher(Sha384);

impl WriteBytes for Hasher {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice)
    }
}

#[cfg(all(test, feature = "signing"))]
mod tests {
    use std::cell::RefCell;

    use p384::ecdsa::{SigningKey, VerifyingKey};
    use paseto_core::{PasetoError, Purpose, Token, TokenOut, Version};
    use sha2::Sha384;

    use super::{HEADER, SIGNATURE_LEN, preauth_public, sign_with, verify_with};
    use crate::core::{CompressedPoint, Curve, Key, KeyMaterial, P384, public_key};

    const SECRET: &str = "20347609607477aca8fbfbc5e6218455f3199669792ef8b466faa87bdc67798144c848dd03661eed5ac62461340cea96";

    fn secret_key() -> Key {
        KeyMaterial::secret_from_bytes(&hex::decode(SECRET).unwrap())
            .unwrap()
            .into_key()
    }

    /// Records every primitive call, optionally replacing outputs with bad values.
    #[derive(Default)]
    struct Spy {
        calls: RefCell<Vec<&'static str>>,
        point: Option<Vec<u8>>,
        signature: Option<Vec<u8>>,
    }

    impl Spy {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl Curve for Spy {
        fn compress_secret(&self, key: &SigningKey) -> Box<[u8]> {
            self.calls.borrow_mut().push("compress_secret");
            match &self.point {
                Some(point) => point.clone().into_boxed_slice(),
                None => P384.compress_secret(key),
            }
        }

        fn compress_public(&self, key: &VerifyingKey) -> Box<[u8]> {
            self.calls.borrow_mut().push("compress_public");
            match &self.point {
                Some(point) => point.clone().into_boxed_slice(),
                None => P384.compress_public(key),
            }
        }

        fn sign(&self, key: &SigningKey, digest: Sha384) -> Result<Box<[u8]>, PasetoError> {
            self.calls.borrow_mut().push("sign");
            match &self.signature {
                Some(signature) => Ok(signature.clone().into_boxed_slice()),
                None => P384.sign(key, digest),
            }
        }

        fn verify(
            &self,
            key: &VerifyingKey,
            digest: Sha384,
            signature: &[u8; SIGNATURE_LEN],
        ) -> Result<(), PasetoError> {
            self.calls.borrow_mut().push("verify");
            P384.verify(key, digest, signature)
        }
    }

    fn retag(key: &Key, purpose: Purpose) -> Key {
        let material = key.require(Version::V3, Purpose::Public).unwrap().clone();
        Key::new(material, Version::V3, purpose)
    }

    fn tamper_payload(token: &str, f: impl FnOnce(&mut Vec<u8>)) -> String {
        let (mut payload, footer) = Token::parse(token, HEADER).unwrap().into_parts();
        f(&mut payload);
        TokenOut::new(HEADER)
            .payload(payload)
            .footer(&footer)
            .to_string()
    }

    #[test]
    fn hello_world() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();

        let token = sign_with(&P384, &sk, b"Hello World", b"", b"").unwrap();
        assert!(token.starts_with("v3.public."));
        assert_eq!(token.split('.').count(), 3);

        let decoded = Token::parse(&token, HEADER).unwrap();
        assert_eq!(decoded.payload().len(), 11 + 96);

        let message = verify_with(&P384, &pk, &token, b"", b"").unwrap();
        assert_eq!(message, b"Hello World");
    }

    #[test]
    fn primitive_call_order() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();

        let spy = Spy::default();
        let token = sign_with(&spy, &sk, b"payload", b"footer", b"aad").unwrap();
        assert_eq!(spy.calls(), ["compress_secret", "sign"]);

        let spy = Spy::default();
        verify_with(&spy, &pk, &token, b"footer", b"aad").unwrap();
        assert_eq!(spy.calls(), ["compress_public", "verify"]);
    }

    #[test]
    fn key_validity_is_checked_before_any_crypto() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();
        let token = sign_with(&P384, &sk, b"payload", b"", b"").unwrap();

        let spy = Spy::default();
        let local_sk = retag(&sk, Purpose::Local);
        assert!(matches!(
            sign_with(&spy, &local_sk, b"payload", b"", b""),
            Err(PasetoError::KeyValidity)
        ));

        let local_pk = retag(&pk, Purpose::Local);
        assert!(matches!(
            verify_with(&spy, &local_pk, &token, b"", b""),
            Err(PasetoError::KeyValidity)
        ));

        // right tags, wrong kind of key
        assert!(matches!(
            sign_with(&spy, &pk, b"payload", b"", b""),
            Err(PasetoError::KeyValidity)
        ));
        assert!(matches!(
            verify_with(&spy, &sk, &token, b"", b""),
            Err(PasetoError::KeyValidity)
        ));

        let local = KeyMaterial::local_from_bytes([0; 32]).into_key();
        assert!(matches!(
            sign_with(&spy, &local, b"payload", b"", b""),
            Err(PasetoError::KeyValidity)
        ));

        assert!(spy.calls().is_empty());
    }

    #[test]
    fn format_and_length_are_checked_before_any_crypto() {
        let pk = public_key(&secret_key()).unwrap();
        let spy = Spy::default();

        let short = TokenOut::new(HEADER).payload(vec![0; 95]).to_string();
        assert!(matches!(
            verify_with(&spy, &pk, &short, b"", b""),
            Err(PasetoError::Length {
                expected: 96,
                actual: 95,
                ..
            })
        ));

        for token in ["v3.local.AAAA", "v4.public.AAAA", "v3.public", "v3.public.A"] {
            assert!(matches!(
                verify_with(&spy, &pk, token, b"", b""),
                Err(PasetoError::Format(_))
            ));
        }

        assert!(spy.calls().is_empty());
    }

    #[test]
    fn backend_outputs_are_checked() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();

        let spy = Spy {
            point: Some(vec![2; 48]),
            ..Spy::default()
        };
        assert!(matches!(
            sign_with(&spy, &sk, b"payload", b"", b""),
            Err(PasetoError::Length { actual: 48, .. })
        ));
        assert_eq!(spy.calls(), ["compress_secret"]);

        let spy = Spy {
            point: Some(vec![4; 49]),
            ..Spy::default()
        };
        assert!(matches!(
            sign_with(&spy, &sk, b"payload", b"", b""),
            Err(PasetoError::Format(_))
        ));

        let token = sign_with(&P384, &sk, b"payload", b"", b"").unwrap();
        assert!(matches!(
            verify_with(&spy, &pk, &token, b"", b""),
            Err(PasetoError::Format(_))
        ));
        assert_eq!(spy.calls(), ["compress_secret", "compress_public"]);

        let spy = Spy {
            signature: Some(vec![1; 95]),
            ..Spy::default()
        };
        assert!(matches!(
            sign_with(&spy, &sk, b"payload", b"", b""),
            Err(PasetoError::Length {
                expected: 96,
                actual: 95,
                ..
            })
        ));
    }

    #[test]
    fn footer_binding() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();
        let token = sign_with(&P384, &sk, b"payload", b"{\"kid\":1}", b"").unwrap();

        verify_with(&P384, &pk, &token, b"{\"kid\":1}", b"").unwrap();

        assert!(matches!(
            verify_with(&P384, &pk, &token, b"{\"kid\":2}", b""),
            Err(PasetoError::Signature)
        ));
        assert!(matches!(
            verify_with(&P384, &pk, &token, b"", b""),
            Err(PasetoError::Signature)
        ));

        // swapping the footer in the token keeps the signature bytes intact
        let (prefix, _) = token.rsplit_once('.').unwrap();
        let swapped = format!("{prefix}.eyJraWQiOjJ9");
        assert!(matches!(
            verify_with(&P384, &pk, &swapped, b"{\"kid\":2}", b""),
            Err(PasetoError::Signature)
        ));

        // a token stripped of its footer still verifies against the expected footer
        let (stripped, _) = token.rsplit_once('.').unwrap();
        let message = verify_with(&P384, &pk, stripped, b"{\"kid\":1}", b"").unwrap();
        assert_eq!(message, b"payload");
    }

    #[test]
    fn implicit_assertion_binding() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();
        let token = sign_with(&P384, &sk, b"payload", b"", b"tenant=1").unwrap();

        verify_with(&P384, &pk, &token, b"", b"tenant=1").unwrap();
        for aad in [&b""[..], b"tenant=2", b"tenant=1 "] {
            assert!(matches!(
                verify_with(&P384, &pk, &token, b"", aad),
                Err(PasetoError::Signature)
            ));
        }
    }

    #[test]
    fn tampering() {
        let sk = secret_key();
        let pk = public_key(&sk).unwrap();
        let token = sign_with(&P384, &sk, b"payload", b"", b"").unwrap();

        for index in [0, 6, 7, 50, 7 + 95] {
            let tampered = tamper_payload(&token, |payload| payload[index] ^= 0x01);
            assert!(
                matches!(
                    verify_with(&P384, &pk, &tampered, b"", b""),
                    Err(PasetoError::Signature)
                ),
                "{index}"
            );
        }

        let other = public_key(&KeyMaterial::random_secret().into_key()).unwrap();
        assert!(matches!(
            verify_with(&P384, &other, &token, b"", b""),
            Err(PasetoError::Signature)
        ));
    }

    #[test]
    fn signing_is_randomized() {
        let sk = secret_key();
        let a = sign_with(&P384, &sk, b"payload", b"", b"").unwrap();
        let b = sign_with(&P384, &sk, b"payload", b"", b"").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn preauth_layout() {
        let key = secret_key();
        let Ok(KeyMaterial::Secret(sk)) = key.require(Version::V3, Purpose::Public) else {
            panic!("expected a secret key");
        };
        let pk = CompressedPoint::derive(&P384, sk).unwrap();

        let m2 = preauth_public(&pk, HEADER, b"msg", b"ftr", b"", Vec::new());

        let mut expected = Vec::new();
        expected.extend_from_slice(&5u64.to_le_bytes());
        expected.extend_from_slice(&49u64.to_le_bytes());
        expected.extend_from_slice(pk.as_bytes());
        expected.extend_from_slice(&10u64.to_le_bytes());
        expected.extend_from_slice(b"v3.public.");
        expected.extend_from_slice(&3u64.to_le_bytes());
        expected.extend_from_slice(b"msg");
        expected.extend_from_slice(&3u64.to_le_bytes());
        expected.extend_from_slice(b"ftr");
        expected.extend_from_slice(&0u64.to_le_bytes());
        assert_eq!(m2, expected);
        assert_eq!(
            m2,
            paseto_core::pae::encode(&[&pk.as_bytes()[..], b"v3.public.", b"msg", b"ftr", b""])
        );
    }
}
