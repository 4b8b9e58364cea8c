//! Registry of parent natural keys known to a pipeline run

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Tables that other records reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Warframe,
    PrimaryWeapon,
    SecondaryWeapon,
    MeleeWeapon,
    Mod,
    Companion,
    Build,
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParentKind::Warframe => "warframe",
            ParentKind::PrimaryWeapon => "primary weapon",
            ParentKind::SecondaryWeapon => "secondary weapon",
            ParentKind::MeleeWeapon => "melee weapon",
            ParentKind::Mod => "mod",
            ParentKind::Companion => "companion",
            ParentKind::Build => "build",
        };
        f.write_str(name)
    }
}

/// Natural keys of parents already validated and persisted
#[derive(Debug, Clone, Default)]
pub struct KnownKeys {
    keys: HashMap<ParentKind, HashSet<String>>,
}

impl KnownKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ParentKind, key: impl Into<String>) {
        self.keys.entry(kind).or_default().insert(key.into());
    }

    pub fn contains(&self, kind: ParentKind, key: &str) -> bool {
        self.keys.get(&kind).is_some_and(|set| set.contains(key))
    }

    /// Reference error unless `key` is known
    pub fn require(&self, kind: ParentKind, key: &str, child: &str) -> Result<()> {
        if self.contains(kind, key) {
            Ok(())
        } else {
            Err(AppError::Reference {
                parent: kind.to_string(),
                key: key.to_string(),
                child: child.to_string(),
            })
        }
    }

    pub fn merge(&mut self, other: KnownKeys) {
        for (kind, keys) in other.keys {
            self.keys.entry(kind).or_default().extend(keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_unknown_parent() {
        let mut known = KnownKeys::new();
        let err = known
            .require(ParentKind::Warframe, "/Lotus/Powersuits/Excalibur/Excalibur", "ability")
            .unwrap_err();
        assert!(matches!(err, AppError::Reference { .. }));

        known.insert(ParentKind::Warframe, "/Lotus/Powersuits/Excalibur/Excalibur");
        assert!(known
            .require(ParentKind::Warframe, "/Lotus/Powersuits/Excalibur/Excalibur", "ability")
            .is_ok());
        // keys are scoped per parent kind
        assert!(!known.contains(ParentKind::Companion, "/Lotus/Powersuits/Excalibur/Excalibur"));
    }

    #[test]
    fn test_merge() {
        let mut a = KnownKeys::new();
        a.insert(ParentKind::Mod, "serration");
        let mut b = KnownKeys::new();
        b.insert(ParentKind::Mod, "split-chamber");
        b.insert(ParentKind::Mod, "serration");
        a.merge(b);
        assert!(a.contains(ParentKind::Mod, "serration"));
        assert!(a.contains(ParentKind::Mod, "split-chamber"));
        assert_eq!(a.keys[&ParentKind::Mod].len(), 2);
    }
}
