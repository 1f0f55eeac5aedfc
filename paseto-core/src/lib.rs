//! Version independent building blocks for PASETO.
//!
//! Concrete protocol versions (see `paseto-v3`) combine these pieces into
//! the `sign`/`verify` pipelines.

pub mod key;
pub mod pae;
pub mod tokens;
pub mod version;

pub use key::Key;
pub use tokens::{Header, Token, TokenOut};
pub use version::{Purpose, Version};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Error returned for all PASETO operations that can fail
pub enum PasetoError {
    /// The key is tagged for a different version or purpose, or is the wrong kind of key
    /// for the requested operation.
    #[error("key is not valid for purpose and version")]
    KeyValidity,
    /// The token was not of a valid form.
    #[error("could not parse the token: {0}")]
    Format(&'static str),
    /// A fixed length value had the wrong length.
    #[error("{field} must be {expected} bytes long, got {actual}")]
    Length {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Could not verify the token signature.
    #[error("token signature could not be validated")]
    Signature,
    /// Could not decode the provided key material.
    #[error("could not parse the key")]
    InvalidKey,
    /// The verified message was requested as text but is not UTF-8.
    #[error("the token message is not valid utf-8: {0}")]
    Payload(#[from] core::str::Utf8Error),
}
