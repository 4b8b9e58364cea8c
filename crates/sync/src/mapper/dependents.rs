//! Records owned by a warframe or companion

use serde_json::Value;
use validator::Validate;
use wfsync_common::records::{
    AbilityRecord, CompanionAbilityRecord, ParentKind, PassiveAbilityRecord,
};
use wfsync_common::{KnownKeys, RawRecord, RecordKind, Result, ValidatedRecord};

/// A dependent raw record split out of its parent's payload
#[derive(Debug, Clone, PartialEq)]
pub struct Dependent {
    /// Report identity, e.g. `Excalibur/ability[2]`
    pub identity: String,
    pub kind: RecordKind,
    pub raw: RawRecord,
}

/// Dependents embedded in a persisted parent's raw record
///
/// Warframe `abilities` entries become abilities numbered from 1 and
/// `passiveDescription` becomes the passive; companion `abilities` entries
/// become companion abilities. Each carries the parent's unique name.
pub fn derive_dependents(parent: &ValidatedRecord, raw: &RawRecord) -> Vec<Dependent> {
    match parent {
        ValidatedRecord::Warframe(warframe) => {
            let mut out: Vec<Dependent> = raw
                .records("abilities")
                .into_iter()
                .enumerate()
                .map(|(i, mut ability)| {
                    let index = i + 1;
                    ability.insert("warframe", warframe.unique_name.as_str());
                    ability.insert("abilityIndex", index);
                    Dependent {
                        identity: format!("{}/ability[{}]", warframe.name, index),
                        kind: RecordKind::Ability,
                        raw: ability,
                    }
                })
                .collect();

            if let Some(Value::String(description)) = raw.get("passiveDescription") {
                let mut passive = RawRecord::default();
                passive.insert("warframe", warframe.unique_name.as_str());
                passive.insert("description", description.as_str());
                out.push(Dependent {
                    identity: format!("{}/passive", warframe.name),
                    kind: RecordKind::PassiveAbility,
                    raw: passive,
                });
            }
            out
        }
        ValidatedRecord::Companion(companion) => raw
            .records("abilities")
            .into_iter()
            .enumerate()
            .map(|(i, mut ability)| {
                ability.insert("companion", companion.unique_name.as_str());
                Dependent {
                    identity: format!("{}/ability[{}]", companion.name, i + 1),
                    kind: RecordKind::CompanionAbility,
                    raw: ability,
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub(super) fn ability(raw: &RawRecord, known: &KnownKeys) -> Result<AbilityRecord> {
    let record = AbilityRecord {
        warframe: raw.required_str("warframe")?,
        ability_index: raw.required_i32("abilityIndex")?,
        name: raw.required_str("name")?,
        description: raw.required_str("description")?,
        energy_cost: raw.optional_f64("energyCost|cost")?,
        can_helminth: raw.optional_bool("canHelminth|isHelminth")?.unwrap_or(false),
    };
    record.validate()?;
    known.require(ParentKind::Warframe, &record.warframe, "ability")?;
    Ok(record)
}

pub(super) fn passive(raw: &RawRecord, known: &KnownKeys) -> Result<PassiveAbilityRecord> {
    let record = PassiveAbilityRecord {
        warframe: raw.required_str("warframe")?,
        name: raw.optional_str("name")?,
        description: raw.required_str("description")?,
    };
    record.validate()?;
    known.require(ParentKind::Warframe, &record.warframe, "passive ability")?;
    Ok(record)
}

pub(super) fn companion_ability(
    raw: &RawRecord,
    known: &KnownKeys,
) -> Result<CompanionAbilityRecord> {
    let record = CompanionAbilityRecord {
        companion: raw.required_str("companion")?,
        name: raw.required_str("name")?,
        description: raw.required_str("description")?,
    };
    record.validate()?;
    known.require(ParentKind::Companion, &record.companion, "companion ability")?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wfsync_common::records::WarframeRecord;

    fn excalibur() -> ValidatedRecord {
        ValidatedRecord::Warframe(WarframeRecord {
            unique_name: "/Lotus/Powersuits/Excalibur/Excalibur".into(),
            name: "Excalibur".into(),
            description: None,
            health: 100.0,
            shield: 100.0,
            armor: 225.0,
            power: 100.0,
            sprint_speed: 1.0,
            mastery_rank: 0,
            polarities: None,
            aura_polarity: "madurai".into(),
            exilus_polarity: None,
            sex: None,
        })
    }

    #[test]
    fn test_warframe_dependents() {
        let raw = RawRecord::from_value(json!({
            "abilities": [
                {"name": "Slash Dash", "description": "Dash"},
                "not an object",
                {"name": "Radial Blind", "description": "Blind"}
            ],
            "passiveDescription": "+10% Melee Damage"
        }))
        .unwrap();

        let dependents = derive_dependents(&excalibur(), &raw);
        assert_eq!(dependents.len(), 3);
        assert_eq!(dependents[1].identity, "Excalibur/ability[2]");
        assert_eq!(dependents[1].raw.required_i32("abilityIndex").unwrap(), 2);
        assert_eq!(dependents[2].kind, RecordKind::PassiveAbility);

        let mut known = KnownKeys::new();
        known.insert(ParentKind::Warframe, "/Lotus/Powersuits/Excalibur/Excalibur");
        let record = ability(&dependents[0].raw, &known).unwrap();
        assert_eq!(record.ability_index, 1);
        assert!(!record.can_helminth);
        assert!(passive(&dependents[2].raw, &known).is_ok());
    }

    #[test]
    fn test_no_dependents_for_mods() {
        let raw = RawRecord::from_value(json!({"abilities": [{"name": "x"}]})).unwrap();
        let mod_record = ValidatedRecord::Mod(wfsync_common::records::ModRecord {
            unique_name: "m".into(),
            name: "m".into(),
            description: None,
            mod_type: "Mod".into(),
            polarity: "naramon".into(),
            rarity: "Common".into(),
            base_drain: 2,
            max_rank: 5,
            transmutable: true,
            tradable: true,
            fusion_limit: 5,
        });
        assert!(derive_dependents(&mod_record, &raw).is_empty());
    }
}
