//! The `version.purpose.payload[.footer]` wire format.

use core::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::PasetoError;
use crate::version::{Purpose, Version};

/// The `"<version>.<purpose>."` prefix of a token.
///
/// Besides prefixing the wire string, the header is fed unencoded into the
/// pre-auth encoding of every token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub version: Version,
    pub purpose: Purpose,
}

impl Header {
    pub const fn new(version: Version, purpose: Purpose) -> Self {
        Self { version, purpose }
    }

    /// The header bytes as slices to be written consecutively, eg `["v3", ".", "public", "."]`.
    pub fn pieces(&self) -> [&'static [u8]; 4] {
        [
            self.version.header().as_bytes(),
            b".",
            self.purpose.header().as_bytes(),
            b".",
        ]
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.", self.version, self.purpose)
    }
}

/// A parsed token that has not been verified.
///
/// The payload and footer are base64url decoded but otherwise untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    header: Header,
    payload: Vec<u8>,
    footer: Vec<u8>,
}

impl Token {
    /// Parse a token, requiring it to carry the expected `header`.
    ///
    /// An empty footer segment (`"v3.public.<payload>."`) and a missing footer segment
    /// both parse to an empty footer.
    pub fn parse(s: &str, header: Header) -> Result<Self, PasetoError> {
        let mut segments = s.split('.');
        let (Some(version), Some(purpose), Some(payload)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(PasetoError::Format("expected at least 3 segments"));
        };
        let footer = segments.next();
        if segments.next().is_some() {
            return Err(PasetoError::Format("expected at most 4 segments"));
        }

        if version != header.version.header() {
            tracing::debug!(version, expected = %header.version, "token version mismatch");
            return Err(PasetoError::Format("unexpected token version"));
        }
        if purpose != header.purpose.header() {
            tracing::debug!(purpose, expected = %header.purpose, "token purpose mismatch");
            return Err(PasetoError::Format("unexpected token purpose"));
        }

        let payload = decode(payload)?;
        let footer = footer.map(decode).transpose()?.unwrap_or_default();

        Ok(Self {
            header,
            payload,
            footer,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The footer, exactly as it was found in the token. It is **not** authenticated.
    pub fn footer(&self) -> &[u8] {
        &self.footer
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.payload, self.footer)
    }
}

/// Builds the wire string of a token.
///
/// Serialization is deterministic: the same header, payload and footer always
/// produce the same string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenOut {
    header: Header,
    payload: Vec<u8>,
    footer: Vec<u8>,
}

impl TokenOut {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            payload: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Set the footer. An empty footer is omitted from the wire string entirely.
    pub fn footer(mut self, footer: &[u8]) -> Self {
        self.footer = footer.to_vec();
        self
    }
}

impl fmt::Display for TokenOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.header, f)?;
        f.write_str(&Base64UrlUnpadded::encode_string(&self.payload))?;

        if !self.footer.is_empty() {
            f.write_str(".")?;
            f.write_str(&Base64UrlUnpadded::encode_string(&self.footer))?;
        }

        Ok(())
    }
}

fn decode(segment: &str) -> Result<Vec<u8>, PasetoError> {
    Base64UrlUnpadded::decode_vec(segment)
        .map_err(|_| PasetoError::Format("segment is not unpadded base64url"))
}
