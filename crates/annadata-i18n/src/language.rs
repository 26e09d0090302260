use std::fmt;
use std::str::FromStr;

use annadata_core::error::AnnadataError;
use serde::{Deserialize, Serialize};

/// A supported UI language.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Bn,
    Ta,
    Te,
    Mr,
    Pa,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Hi,
        Language::Bn,
        Language::Ta,
        Language::Te,
        Language::Mr,
        Language::Pa,
    ];

    /// ISO 639-1 code, also the catalog file stem.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Bn => "bn",
            Self::Ta => "ta",
            Self::Te => "te",
            Self::Mr => "mr",
            Self::Pa => "pa",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hindi",
            Self::Bn => "Bengali",
            Self::Ta => "Tamil",
            Self::Te => "Telugu",
            Self::Mr => "Marathi",
            Self::Pa => "Punjabi",
        }
    }

    /// Name in the language itself, for the language picker.
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "\u{0939}\u{093f}\u{0928}\u{094d}\u{0926}\u{0940}",
            Self::Bn => "\u{09ac}\u{09be}\u{0982}\u{09b2}\u{09be}",
            Self::Ta => "\u{0ba4}\u{0bae}\u{0bbf}\u{0bb4}\u{0bcd}",
            Self::Te => "\u{0c24}\u{0c46}\u{0c32}\u{0c41}\u{0c17}\u{0c41}",
            Self::Mr => "\u{092e}\u{0930}\u{093e}\u{0920}\u{0940}",
            Self::Pa => "\u{0a2a}\u{0a70}\u{0a1c}\u{0a3e}\u{0a2c}\u{0a40}",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AnnadataError;

    /// Accepts a code (`"hi"`) or English name (`"Hindi"`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| {
                l.code().eq_ignore_ascii_case(wanted) || l.english_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                AnnadataError::Localization(format!("unsupported language code '{wanted}'"))
            })
    }
}
