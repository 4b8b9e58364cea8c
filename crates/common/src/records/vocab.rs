//! Known vocabularies for enumerated upstream fields
//!
//! Values outside a vocabulary are stored verbatim and reported as flags.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    Polarity,
    Rarity,
    Trigger,
    Noise,
    TargetType,
}

const POLARITIES: &[&str] = &[
    "madurai", "vazarin", "naramon", "zenurik", "unairu", "penjaga", "umbra", "universal",
    "any", "none",
];

const RARITIES: &[&str] = &["common", "uncommon", "rare", "legendary", "peculiar", "riven", "amalgam"];

const TRIGGERS: &[&str] = &[
    "auto", "semi", "semi auto", "burst", "auto burst", "charge", "held", "duplex", "active",
    "auto spool", "melee",
];

const NOISES: &[&str] = &["alarming", "silent"];

pub const TARGET_TYPES: &[&str] = &["warframe", "primary", "secondary", "melee", "companion"];

impl Vocabulary {
    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Vocabulary::Polarity => POLARITIES,
            Vocabulary::Rarity => RARITIES,
            Vocabulary::Trigger => TRIGGERS,
            Vocabulary::Noise => NOISES,
            Vocabulary::TargetType => TARGET_TYPES,
        }
    }

    /// Case-insensitive; `-` and `_` match a space
    pub fn contains(&self, value: &str) -> bool {
        let normalized = normalize(value);
        self.terms().iter().any(|term| *term == normalized)
    }

    /// A flag when `value` is outside the vocabulary
    pub fn check(&self, field: &str, value: &str) -> Option<VocabularyFlag> {
        if self.contains(value) {
            None
        } else {
            Some(VocabularyFlag {
                field: field.to_string(),
                vocabulary: *self,
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vocabulary::Polarity => "polarity",
            Vocabulary::Rarity => "rarity",
            Vocabulary::Trigger => "trigger",
            Vocabulary::Noise => "noise",
            Vocabulary::TargetType => "target type",
        };
        f.write_str(name)
    }
}

/// An enumerated field carrying a value no vocabulary knows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyFlag {
    pub field: String,
    pub vocabulary: Vocabulary,
    pub value: String,
}

impl fmt::Display for VocabularyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has unknown {} `{}`", self.field, self.vocabulary, self.value)
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_membership() {
        assert!(Vocabulary::Polarity.contains("Madurai"));
        assert!(Vocabulary::Rarity.contains("LEGENDARY"));
        assert!(Vocabulary::Trigger.contains("Semi-Auto"));
        assert!(Vocabulary::Trigger.contains("Auto-Spool"));
        assert!(!Vocabulary::Noise.contains("loud"));
    }

    #[test]
    fn test_unknown_value_is_flagged_verbatim() {
        let flag = Vocabulary::Polarity.check("aura_polarity", "Koneksi").unwrap();
        assert_eq!(flag.value, "Koneksi");
        assert_eq!(flag.to_string(), "aura_polarity has unknown polarity `Koneksi`");
        assert!(Vocabulary::Polarity.check("aura_polarity", "vazarin").is_none());
    }
}
