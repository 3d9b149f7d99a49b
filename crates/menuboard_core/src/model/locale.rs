//! Locale codes and per-locale display text.
//!
//! # Responsibility
//! - Define the fixed set of supported menu languages.
//! - Hold translated record text as struct fields, not string-keyed maps.
//!
//! # Invariants
//! - English is the fallback locale for every projection.
//! - Missing locale keys in persisted data decode as empty strings.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Supported display languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English, the fallback locale.
    #[default]
    En,
    /// Arabic.
    Ar,
    /// Kurdish (Sorani/Badini script).
    Ku,
}

impl Locale {
    /// All locales in display order.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ar, Locale::Ku];

    /// Stable code used in persisted snapshots and FFI payloads.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
            Self::Ku => "ku",
        }
    }

    /// Whether text in this locale is laid out right-to-left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Ar | Self::Ku)
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for unknown locale codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl Display for UnknownLocale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported locale `{}`; expected en|ar|ku", self.0)
    }
}

impl Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            "ku" => Ok(Self::Ku),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Translated text for one record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMap {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ar: String,
    #[serde(default)]
    pub ku: String,
}

impl LocaleMap {
    /// Builds a map from the three translations.
    pub fn new(en: impl Into<String>, ar: impl Into<String>, ku: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
            ku: ku.into(),
        }
    }

    /// Builds a map with only the English value set.
    pub fn english(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ..Self::default()
        }
    }

    /// Raw stored value for `locale`, without fallback.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
            Locale::Ku => &self.ku,
        }
    }

    /// Mutable access to the stored value for `locale`.
    pub fn get_mut(&mut self, locale: Locale) -> &mut String {
        match locale {
            Locale::En => &mut self.en,
            Locale::Ar => &mut self.ar,
            Locale::Ku => &mut self.ku,
        }
    }
}
