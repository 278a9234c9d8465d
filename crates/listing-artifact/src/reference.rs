//! Artifact reference parsing (`name`, `name:latest`, `name:v<N>`).

use std::fmt;
use std::str::FromStr;

use crate::error::{ArtifactError, Result};

/// Which version of an artifact a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactVersion {
    Latest,
    Number(u32),
}

/// A parsed artifact reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub name: String,
    pub version: ArtifactVersion,
}

impl ArtifactReference {
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: ArtifactVersion::Latest,
        }
    }
}

impl FromStr for ArtifactReference {
    type Err = ArtifactError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| ArtifactError::InvalidReference {
            reference: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty reference"));
        }

        let (name, version) = match trimmed.rsplit_once(':') {
            None => (trimmed, ArtifactVersion::Latest),
            Some((name, "latest")) => (name, ArtifactVersion::Latest),
            Some((name, alias)) => {
                let number = alias
                    .strip_prefix('v')
                    .and_then(|digits| digits.parse::<u32>().ok())
                    .ok_or_else(|| invalid("version must be 'latest' or 'v<N>'"))?;
                (name, ArtifactVersion::Number(number))
            }
        };

        validate_name(name).map_err(|_| invalid("invalid artifact name"))?;
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            ArtifactVersion::Latest => write!(f, "{}:latest", self.name),
            ArtifactVersion::Number(n) => write!(f, "{}:v{n}", self.name),
        }
    }
}

/// Check that an artifact name is usable as a single directory component.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let usable = !name.is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control());
    if usable {
        Ok(())
    } else {
        Err(ArtifactError::InvalidName {
            name: name.to_string(),
        })
    }
}
