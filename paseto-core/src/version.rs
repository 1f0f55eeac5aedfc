use core::fmt;
use core::str::FromStr;

use crate::PasetoError;

/// The PASETO protocol version a key or token is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Version {
    /// Version 3: P-384 ECDSA with SHA-384 for `public`, AES-256-CTR + HMAC-SHA384 for `local`.
    V3,
}

impl Version {
    /// Wire literal, eg `"v3"`
    pub const fn header(self) -> &'static str {
        match self {
            Version::V3 => "v3",
        }
    }
}

/// What a key or token is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Purpose {
    /// Asymmetric signatures.
    Public,
    /// Symmetric authenticated encryption.
    Local,
}

impl Purpose {
    /// Wire literal, eg `"public"`
    pub const fn header(self) -> &'static str {
        match self {
            Purpose::Public => "public",
            Purpose::Local => "local",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Version {
    type Err = PasetoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v3" => Ok(Version::V3),
            _ => Err(PasetoError::Format("unsupported version")),
        }
    }
}

impl FromStr for Purpose {
    type Err = PasetoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Purpose::Public),
            "local" => Ok(Purpose::Local),
            _ => Err(PasetoError::Format("unknown purpose")),
        }
    }
}
