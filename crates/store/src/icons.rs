//! Service icon registry.
//!
//! Features name their icon with free-form strings. Those strings are mapped
//! onto the closed [`ServiceIconKey`] set; anything else falls back to
//! [`ServiceIconKey::Default`] but stays visible as
//! [`IconResolution::Unrecognized`] so bad data can be reported.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceIconKey {
    Water,
    Community,
    Parks,
    Default,
}

impl ServiceIconKey {
    pub const ALL: [ServiceIconKey; 4] = [
        ServiceIconKey::Water,
        ServiceIconKey::Community,
        ServiceIconKey::Parks,
        ServiceIconKey::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceIconKey::Water => "water",
            ServiceIconKey::Community => "community",
            ServiceIconKey::Parks => "parks",
            ServiceIconKey::Default => "default",
        }
    }
}

impl fmt::Display for ServiceIconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service icon key '{0}'")]
pub struct UnknownIconKey(pub String);

impl FromStr for ServiceIconKey {
    type Err = UnknownIconKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceIconKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownIconKey(s.to_string()))
    }
}

/// Outcome of mapping a raw icon string onto the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconResolution {
    Known(ServiceIconKey),
    /// No key was given; the default icon applies.
    Missing,
    /// A key was given but is not in the registry; the default icon applies.
    Unrecognized(String),
}

impl IconResolution {
    /// The icon to draw.
    pub fn key(&self) -> ServiceIconKey {
        match self {
            IconResolution::Known(key) => *key,
            IconResolution::Missing | IconResolution::Unrecognized(_) => ServiceIconKey::Default,
        }
    }
}

pub fn resolve_icon(raw: Option<&str>) -> IconResolution {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => IconResolution::Missing,
        Some(raw) => match raw.parse::<ServiceIconKey>() {
            Ok(key) => IconResolution::Known(key),
            Err(UnknownIconKey(raw)) => IconResolution::Unrecognized(raw),
        },
    }
}
