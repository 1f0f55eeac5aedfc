//! Version and purpose tagged keys.

use core::fmt;

use crate::PasetoError;
use crate::version::{Purpose, Version};

/// Key material bound to a single PASETO version and purpose.
///
/// The tags are fixed when the key is constructed. Every operation checks them with
/// [`Key::require`] before touching the material, so a key can never be used outside
/// of the context it was created for.
#[derive(Clone)]
pub struct Key<M> {
    material: M,
    version: Version,
    purpose: Purpose,
}

impl<M> Key<M> {
    pub const fn new(material: M, version: Version, purpose: Purpose) -> Self {
        Self {
            material,
            version,
            purpose,
        }
    }

    /// Whether this key may be used for `version` tokens of the given `purpose`.
    pub fn is_valid_for(&self, version: Version, purpose: Purpose) -> bool {
        self.version == version && self.purpose == purpose
    }

    /// Access the key material, if the key is valid for this version and purpose.
    pub fn require(&self, version: Version, purpose: Purpose) -> Result<&M, PasetoError> {
        if self.is_valid_for(version, purpose) {
            Ok(&self.material)
        } else {
            tracing::debug!(
                key.version = %self.version,
                key.purpose = %self.purpose,
                %version,
                %purpose,
                "rejecting key tagged for another context"
            );
            Err(PasetoError::KeyValidity)
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }
}

impl<M> fmt::Debug for Key<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("version", &self.version)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}
