//! Four component versions as stored in manifests and archives.

use binrw::BinRead;
use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// A release version such as `0.0.1.155`
///
/// Stored as four bytes with the least significant component first, so the bytes `9B 01 00 00`
/// read as `0.0.1.155`.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[br(little, map = |raw: [u8; 4]| Version::from_bytes(raw))]
pub struct Version {
    components: [u8; 4],
}

impl Version {
    /// Build a version from its components, most significant first
    pub const fn new(major: u8, minor: u8, patch: u8, build: u8) -> Self {
        Self {
            components: [major, minor, patch, build],
        }
    }

    /// Build a version from the four bytes as they appear on disk
    pub const fn from_bytes(raw: [u8; 4]) -> Self {
        Self::new(raw[3], raw[2], raw[1], raw[0])
    }

    /// The four bytes as they appear on disk
    pub const fn to_bytes(self) -> [u8; 4] {
        let [major, minor, patch, build] = self.components;
        [build, patch, minor, major]
    }

    /// The components, most significant first
    pub const fn components(&self) -> [u8; 4] {
        self.components
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, build] = self.components;
        write!(f, "{major}.{minor}.{patch}.{build}")
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut components = [0u8; 4];
        let mut parts = s.split('.');
        for component in components.iter_mut() {
            *component = parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(|| Error::malformed("version", format!("{s:?} is not a dotted version")))?;
        }

        if parts.next().is_some() {
            return Err(Error::malformed(
                "version",
                format!("{s:?} has more than four components"),
            ));
        }

        Ok(Self { components })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
