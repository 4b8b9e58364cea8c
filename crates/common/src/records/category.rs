//! Entity categories and record kinds

use super::keys::ParentKind;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level entity categories synchronised from the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Warframe,
    PrimaryWeapon,
    SecondaryWeapon,
    MeleeWeapon,
    Mod,
    Companion,
}

impl EntityCategory {
    /// Every category, parents of cross-table references first
    pub const ALL: [EntityCategory; 6] = [
        EntityCategory::Warframe,
        EntityCategory::PrimaryWeapon,
        EntityCategory::SecondaryWeapon,
        EntityCategory::MeleeWeapon,
        EntityCategory::Mod,
        EntityCategory::Companion,
    ];

    /// Values of the upstream `category` field belonging to this category
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            EntityCategory::Warframe => &["Warframes"],
            EntityCategory::PrimaryWeapon => &["Primary"],
            EntityCategory::SecondaryWeapon => &["Secondary"],
            EntityCategory::MeleeWeapon => &["Melee"],
            EntityCategory::Mod => &["Mods"],
            EntityCategory::Companion => &["Sentinels", "Pets"],
        }
    }

    /// Segment substituted for `{category}` in the detail path
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityCategory::Warframe => "warframes",
            EntityCategory::PrimaryWeapon
            | EntityCategory::SecondaryWeapon
            | EntityCategory::MeleeWeapon => "weapons",
            EntityCategory::Mod => "mods",
            EntityCategory::Companion => "items",
        }
    }

    pub fn record_kind(&self) -> RecordKind {
        match self {
            EntityCategory::Warframe => RecordKind::Warframe,
            EntityCategory::PrimaryWeapon => RecordKind::PrimaryWeapon,
            EntityCategory::SecondaryWeapon => RecordKind::SecondaryWeapon,
            EntityCategory::MeleeWeapon => RecordKind::MeleeWeapon,
            EntityCategory::Mod => RecordKind::Mod,
            EntityCategory::Companion => RecordKind::Companion,
        }
    }

    pub fn parent_kind(&self) -> ParentKind {
        match self {
            EntityCategory::Warframe => ParentKind::Warframe,
            EntityCategory::PrimaryWeapon => ParentKind::PrimaryWeapon,
            EntityCategory::SecondaryWeapon => ParentKind::SecondaryWeapon,
            EntityCategory::MeleeWeapon => ParentKind::MeleeWeapon,
            EntityCategory::Mod => ParentKind::Mod,
            EntityCategory::Companion => ParentKind::Companion,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Warframe => "warframe",
            EntityCategory::PrimaryWeapon => "primary_weapon",
            EntityCategory::SecondaryWeapon => "secondary_weapon",
            EntityCategory::MeleeWeapon => "melee_weapon",
            EntityCategory::Mod => "mod",
            EntityCategory::Companion => "companion",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityCategory {
    type Err = AppError;

    /// Accepts the snake_case name or any upstream label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EntityCategory::ALL
            .into_iter()
            .find(|category| {
                category.as_str().eq_ignore_ascii_case(wanted)
                    || category
                        .labels()
                        .iter()
                        .any(|label| label.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "category `{}` has no record mapping (known: warframe, primary_weapon, \
                     secondary_weapon, melee_weapon, mod, companion)",
                    wanted
                ))
            })
    }
}

/// Every validated record shape, including dependents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Warframe,
    PrimaryWeapon,
    SecondaryWeapon,
    MeleeWeapon,
    Mod,
    Companion,
    Ability,
    PassiveAbility,
    CompanionAbility,
    Build,
    BuildMod,
}

impl RecordKind {
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Warframe => "warframes",
            RecordKind::PrimaryWeapon => "primary_weapons",
            RecordKind::SecondaryWeapon => "secondary_weapons",
            RecordKind::MeleeWeapon => "melee_weapons",
            RecordKind::Mod => "mods",
            RecordKind::Companion => "companions",
            RecordKind::Ability => "abilities",
            RecordKind::PassiveAbility => "passive_abilities",
            RecordKind::CompanionAbility => "companion_abilities",
            RecordKind::Build => "builds",
            RecordKind::BuildMod => "build_mods",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Warframe => "warframe",
            RecordKind::PrimaryWeapon => "primary weapon",
            RecordKind::SecondaryWeapon => "secondary weapon",
            RecordKind::MeleeWeapon => "melee weapon",
            RecordKind::Mod => "mod",
            RecordKind::Companion => "companion",
            RecordKind::Ability => "ability",
            RecordKind::PassiveAbility => "passive ability",
            RecordKind::CompanionAbility => "companion ability",
            RecordKind::Build => "build",
            RecordKind::BuildMod => "build mod",
        };
        f.write_str(name)
    }
}
