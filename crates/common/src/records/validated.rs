//! Strictly typed records accepted by the persistence gateway
//!
//! Field constraints are declared with `validator`; the mapper builds these
//! structs and calls `validate()` before handing them on.

use super::category::RecordKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WarframeRecord {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub unique_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub health: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub shield: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub armor: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub power: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub sprint_speed: f64,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub mastery_rank: i32,
    pub polarities: Option<Value>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub aura_polarity: String,
    pub exilus_polarity: Option<String>,
    pub sex: Option<String>,
}

/// Shared shape of primary and secondary weapons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RangedWeaponRecord {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub unique_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub weapon_type: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub mastery_rank: i32,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub impact_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub puncture_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub slash_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub fire_rate: f64,
    /// May exceed 1 (tiered crits)
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub critical_chance: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub critical_multiplier: f64,
    /// May exceed 1 (multiple procs per hit)
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub status_chance: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub accuracy: f64,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub magazine_size: i32,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub max_ammo: i32,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub reload_time: f64,
    pub projectile: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub noise: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub trigger: String,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub riven_disposition: f64,
    pub polarities: Option<Value>,
    pub exilus_polarity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MeleeWeaponRecord {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub unique_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub weapon_type: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub mastery_rank: i32,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub impact_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub puncture_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub slash_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub attack_speed: f64,
    /// May exceed 1 (tiered crits)
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub critical_chance: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub critical_multiplier: f64,
    /// May exceed 1 (multiple procs per hit)
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub status_chance: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub range: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub slam_attack: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub slam_radial_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub slam_radius: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub slide_attack: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub heavy_attack_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub heavy_slam_attack: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub heavy_slam_radial_damage: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub heavy_slam_radius: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub wind_up: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub follow_through: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub combo_duration: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub riven_disposition: f64,
    pub polarities: Option<Value>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub stance_polarity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ModRecord {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub unique_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub mod_type: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub polarity: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub rarity: String,
    /// Negative for auras, which add capacity
    pub base_drain: i32,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub max_rank: i32,
    pub transmutable: bool,
    pub tradable: bool,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub fusion_limit: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CompanionRecord {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub unique_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub companion_type: String,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub health: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub shield: f64,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub armor: f64,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub mastery_rank: i32,
    pub polarities: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AbilityRecord {
    /// Owning warframe's unique_name
    #[validate(length(min = 1, message = "must not be empty"))]
    pub warframe: String,
    #[validate(range(min = 1, max = 4, message = "ability index must be within 1..=4"))]
    pub ability_index: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "must be non-negative"))]
    pub energy_cost: Option<f64>,
    pub can_helminth: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PassiveAbilityRecord {
    /// Owning warframe's unique_name
    #[validate(length(min = 1, message = "must not be empty"))]
    pub warframe: String,
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CompanionAbilityRecord {
    /// Owning companion's unique_name
    #[validate(length(min = 1, message = "must not be empty"))]
    pub companion: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,
}

/// Natural key of a build: its warframe plus its name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildKey {
    pub warframe: String,
    pub name: String,
}

impl BuildKey {
    pub fn as_string(&self) -> String {
        format!("{}::{}", self.warframe, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BuildRecord {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    /// Warframe unique_name
    #[validate(length(min = 1, message = "must not be empty"))]
    pub warframe: String,
    pub primary_weapon: Option<String>,
    pub secondary_weapon: Option<String>,
    pub melee_weapon: Option<String>,
    pub companion: Option<String>,
    /// Validated one by one by the mapper
    pub mods: Vec<BuildModRecord>,
}

impl BuildRecord {
    pub fn key(&self) -> BuildKey {
        BuildKey {
            warframe: self.warframe.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BuildModRecord {
    pub build: BuildKey,
    /// Mod unique_name
    #[validate(length(min = 1, message = "must not be empty"))]
    pub mod_unique_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub target_type: String,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub slot_index: i32,
    #[validate(range(min = 0, message = "must be non-negative"))]
    pub mod_rank: i32,
}

/// A record that passed mapping and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum ValidatedRecord {
    Warframe(WarframeRecord),
    PrimaryWeapon(RangedWeaponRecord),
    SecondaryWeapon(RangedWeaponRecord),
    MeleeWeapon(MeleeWeaponRecord),
    Mod(ModRecord),
    Companion(CompanionRecord),
    Ability(AbilityRecord),
    PassiveAbility(PassiveAbilityRecord),
    CompanionAbility(CompanionAbilityRecord),
    Build(BuildRecord),
    BuildMod(BuildModRecord),
}

impl ValidatedRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            ValidatedRecord::Warframe(_) => RecordKind::Warframe,
            ValidatedRecord::PrimaryWeapon(_) => RecordKind::PrimaryWeapon,
            ValidatedRecord::SecondaryWeapon(_) => RecordKind::SecondaryWeapon,
            ValidatedRecord::MeleeWeapon(_) => RecordKind::MeleeWeapon,
            ValidatedRecord::Mod(_) => RecordKind::Mod,
            ValidatedRecord::Companion(_) => RecordKind::Companion,
            ValidatedRecord::Ability(_) => RecordKind::Ability,
            ValidatedRecord::PassiveAbility(_) => RecordKind::PassiveAbility,
            ValidatedRecord::CompanionAbility(_) => RecordKind::CompanionAbility,
            ValidatedRecord::Build(_) => RecordKind::Build,
            ValidatedRecord::BuildMod(_) => RecordKind::BuildMod,
        }
    }

    /// Natural key rendered as a string (composite keys joined)
    pub fn natural_key(&self) -> String {
        match self {
            ValidatedRecord::Warframe(r) => r.unique_name.clone(),
            ValidatedRecord::PrimaryWeapon(r) | ValidatedRecord::SecondaryWeapon(r) => {
                r.unique_name.clone()
            }
            ValidatedRecord::MeleeWeapon(r) => r.unique_name.clone(),
            ValidatedRecord::Mod(r) => r.unique_name.clone(),
            ValidatedRecord::Companion(r) => r.unique_name.clone(),
            ValidatedRecord::Ability(r) => format!("{}#{}", r.warframe, r.ability_index),
            ValidatedRecord::PassiveAbility(r) => r.warframe.clone(),
            ValidatedRecord::CompanionAbility(r) => format!("{}::{}", r.companion, r.name),
            ValidatedRecord::Build(r) => r.key().as_string(),
            ValidatedRecord::BuildMod(r) => {
                format!("{}/{}#{}", r.build.as_string(), r.target_type, r.slot_index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ability(index: i32) -> AbilityRecord {
        AbilityRecord {
            warframe: "/Lotus/Powersuits/Excalibur/Excalibur".into(),
            ability_index: index,
            name: "Slash Dash".into(),
            description: "Dash between enemies".into(),
            energy_cost: Some(25.0),
            can_helminth: false,
        }
    }

    #[test]
    fn test_ability_index_range() {
        assert!(ability(1).validate().is_ok());
        assert!(ability(4).validate().is_ok());
        assert!(ability(0).validate().is_err());

        let errors = ability(5).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ability_index"));
    }

    #[test]
    fn test_negative_energy_cost_rejected() {
        let mut record = ability(2);
        record.energy_cost = Some(-1.0);
        assert!(record.validate().is_err());
        record.energy_cost = None;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_natural_keys() {
        let record = ValidatedRecord::Ability(ability(3));
        assert_eq!(record.kind(), RecordKind::Ability);
        assert_eq!(record.natural_key(), "/Lotus/Powersuits/Excalibur/Excalibur#3");
    }
}
