//! Schema mapper / validator
//!
//! Maps loosely typed upstream records onto `ValidatedRecord` shapes:
//! 1. Reads fields through the `RawRecord` accessors (presence, coercion)
//! 2. Runs the `validator` constraints of the record type
//! 3. Checks enumerated fields against known vocabularies (flags only)
//! 4. Requires parents of dependent records to be known

mod builds;
mod dependents;
mod gear;

pub use dependents::{derive_dependents, Dependent};

use serde_json::Value;
use wfsync_common::records::{Vocabulary, VocabularyFlag};
use wfsync_common::{KnownKeys, RawRecord, RecordKind, Result, ValidatedRecord};

/// A validated record plus the vocabulary flags raised while mapping it
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped {
    pub record: ValidatedRecord,
    pub flags: Vec<VocabularyFlag>,
}

/// Map `raw` onto the record shape of `kind`
pub fn map(kind: RecordKind, raw: &RawRecord, known: &KnownKeys) -> Result<Mapped> {
    let mut flags = Flags::default();

    let record = match kind {
        RecordKind::Warframe => ValidatedRecord::Warframe(gear::warframe(raw, &mut flags)?),
        RecordKind::PrimaryWeapon => ValidatedRecord::PrimaryWeapon(gear::ranged(raw, &mut flags)?),
        RecordKind::SecondaryWeapon => {
            ValidatedRecord::SecondaryWeapon(gear::ranged(raw, &mut flags)?)
        }
        RecordKind::MeleeWeapon => ValidatedRecord::MeleeWeapon(gear::melee(raw, &mut flags)?),
        RecordKind::Mod => ValidatedRecord::Mod(gear::mod_card(raw, &mut flags)?),
        RecordKind::Companion => ValidatedRecord::Companion(gear::companion(raw, &mut flags)?),
        RecordKind::Ability => ValidatedRecord::Ability(dependents::ability(raw, known)?),
        RecordKind::PassiveAbility => {
            ValidatedRecord::PassiveAbility(dependents::passive(raw, known)?)
        }
        RecordKind::CompanionAbility => {
            ValidatedRecord::CompanionAbility(dependents::companion_ability(raw, known)?)
        }
        RecordKind::Build => ValidatedRecord::Build(builds::build(raw, known, &mut flags)?),
        RecordKind::BuildMod => {
            ValidatedRecord::BuildMod(builds::build_mod(raw, known, &mut flags)?)
        }
    };

    Ok(Mapped {
        record,
        flags: flags.0,
    })
}

/// Vocabulary flags collected for one record
#[derive(Debug, Default)]
pub(crate) struct Flags(Vec<VocabularyFlag>);

impl Flags {
    pub(crate) fn check(&mut self, vocabulary: Vocabulary, field: &str, value: &str) {
        if let Some(flag) = vocabulary.check(field, value) {
            self.0.push(flag);
        }
    }

    pub(crate) fn check_opt(&mut self, vocabulary: Vocabulary, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.check(vocabulary, field, value);
        }
    }

    /// Polarity lists: every string element is checked
    pub(crate) fn check_polarities(&mut self, field: &str, value: Option<&Value>) {
        if let Some(Value::Array(items)) = value {
            for polarity in items.iter().filter_map(Value::as_str) {
                self.check(Vocabulary::Polarity, field, polarity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wfsync_common::records::ParentKind;
    use wfsync_common::AppError;

    fn raw(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_serration() {
        let mapped = map(
            RecordKind::Mod,
            &raw(json!({
                "uniqueName": "/Lotus/Upgrades/Mods/Rifle/WeaponDamageAmountMod",
                "name": "Serration",
                "polarity": "madurai",
                "rarity": "Uncommon",
                "baseDrain": 4,
                "fusionLimit": 10,
                "tradable": true,
                "compatName": "RIFLE"
            })),
            &KnownKeys::new(),
        )
        .unwrap();

        let ValidatedRecord::Mod(serration) = mapped.record else {
            panic!("expected a mod");
        };
        assert_eq!(serration.base_drain, 4);
        assert_eq!(serration.fusion_limit, 10);
        assert_eq!(serration.max_rank, 10);
        assert_eq!(serration.mod_type, "Mod");
        assert!(serration.transmutable);
        assert!(mapped.flags.is_empty());
    }

    #[test]
    fn test_unknown_vocabulary_is_flagged_not_rejected() {
        let mapped = map(
            RecordKind::Mod,
            &raw(json!({
                "uniqueName": "/Lotus/Upgrades/Mods/Aura/Koneksi",
                "name": "Odd Aura",
                "type": "Aura",
                "polarity": "koneksi",
                "rarity": "Mythic",
                "baseDrain": -7,
                "fusionLimit": 5
            })),
            &KnownKeys::new(),
        )
        .unwrap();

        assert_eq!(mapped.flags.len(), 2);
        let ValidatedRecord::Mod(aura) = mapped.record else {
            panic!("expected a mod");
        };
        assert_eq!(aura.polarity, "koneksi");
        assert_eq!(aura.base_drain, -7);
    }

    #[test]
    fn test_ability_index_out_of_range() {
        let mut known = KnownKeys::new();
        known.insert(ParentKind::Warframe, "/Lotus/Powersuits/Excalibur/Excalibur");

        let err = map(
            RecordKind::Ability,
            &raw(json!({
                "warframe": "/Lotus/Powersuits/Excalibur/Excalibur",
                "abilityIndex": 5,
                "name": "Extra",
                "description": "One too many"
            })),
            &known,
        )
        .unwrap_err();

        match err {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "ability_index");
                assert!(reason.contains("1..=4"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dependent_requires_known_parent() {
        let ability = raw(json!({
            "warframe": "/Lotus/Powersuits/Excalibur/Excalibur",
            "abilityIndex": 1,
            "name": "Slash Dash",
            "description": "Dash between enemies"
        }));

        let mut known = KnownKeys::new();
        let err = map(RecordKind::Ability, &ability, &known).unwrap_err();
        assert!(matches!(err, AppError::Reference { .. }));

        known.insert(ParentKind::Warframe, "/Lotus/Powersuits/Excalibur/Excalibur");
        let mapped = map(RecordKind::Ability, &ability, &known).unwrap();
        assert_eq!(mapped.record.kind(), RecordKind::Ability);
    }

    #[test]
    fn test_missing_unique_name() {
        let err = map(
            RecordKind::Companion,
            &raw(json!({"name": "Carrier", "type": "Sentinel", "health": 1, "shield": 1, "armor": 1})),
            &KnownKeys::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "unique_name"));
    }
}
