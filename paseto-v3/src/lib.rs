//! PASETO v3.public (RustCrypto)
//!
//! ```
//! use paseto_v3::{KeyMaterial, public_key, sign, verify};
//!
//! // create a new keypair
//! let secret_key = KeyMaterial::random_secret().into_key();
//! let public_key = public_key(&secret_key).unwrap();
//!
//! // sign a message, binding a footer and an implicit assertion
//! let token = sign(&secret_key, "Hello World", r#"{"kid":"1"}"#, "tenant=42").unwrap();
//! assert!(token.starts_with("v3.public."));
//!
//! // ...
//!
//! // the footer can be read before verification, eg to look up the key
//! let footer = paseto_v3::unverified_footer(&token).unwrap();
//! assert_eq!(footer, br#"{"kid":"1"}"#);
//!
//! // verify the token
//! let message = verify(&public_key, &token, &footer, "tenant=42").unwrap();
//! assert_eq!(message, b"Hello World");
//! ```

/// Low level implementation primitives.
pub mod core;

pub use paseto_core::{PasetoError, Purpose, Version};

pub use crate::core::{Key, KeyMaterial, public_key};

/// Sign `payload`, producing a `v3.public` token.
///
/// The `footer` is appended to the token in the clear, the `implicit_assertion` is not
/// transmitted at all. Both are authenticated by the signature, so pass `""` if unused.
#[cfg(feature = "signing")]
pub fn sign(
    key: &Key,
    payload: impl AsRef<[u8]>,
    footer: impl AsRef<[u8]>,
    implicit_assertion: impl AsRef<[u8]>,
) -> Result<String, PasetoError> {
    crate::core::sign_with(
        &crate::core::P384,
        key,
        payload.as_ref(),
        footer.as_ref(),
        implicit_assertion.as_ref(),
    )
}

/// Verify a `v3.public` token, returning the signed payload.
///
/// Fails with [`PasetoError::Signature`] if the token was tampered with, was signed by a
/// different key, or was signed with a different footer or implicit assertion.
pub fn verify(
    key: &Key,
    token: &str,
    footer: impl AsRef<[u8]>,
    implicit_assertion: impl AsRef<[u8]>,
) -> Result<Vec<u8>, PasetoError> {
    crate::core::verify_with(
        &crate::core::P384,
        key,
        token,
        footer.as_ref(),
        implicit_assertion.as_ref(),
    )
}

/// Like [`verify`], for payloads that are expected to be UTF-8 text.
pub fn verify_to_string(
    key: &Key,
    token: &str,
    footer: impl AsRef<[u8]>,
    implicit_assertion: impl AsRef<[u8]>,
) -> Result<String, PasetoError> {
    let message = verify(key, token, footer, implicit_assertion)?;
    String::from_utf8(message).map_err(|err| PasetoError::Payload(err.utf8_error()))
}

/// Read the footer of a `v3.public` token **without** verifying it.
///
/// Useful for finding which key to verify with. Nothing in the footer can be trusted
/// until [`verify`] succeeds.
pub fn unverified_footer(token: &str) -> Result<Vec<u8>, PasetoError> {
    let token = paseto_core::Token::parse(token, crate::core::HEADER)?;
    let (_, footer) = token.into_parts();
    Ok(footer)
}
