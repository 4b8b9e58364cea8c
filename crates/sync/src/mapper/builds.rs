//! Loadout builds and their slotted mods

use super::Flags;
use std::collections::HashMap;
use validator::Validate;
use wfsync_common::records::{BuildKey, BuildModRecord, BuildRecord, ParentKind, Vocabulary};
use wfsync_common::{AppError, KnownKeys, RawRecord, Result};

pub(super) fn build(raw: &RawRecord, known: &KnownKeys, flags: &mut Flags) -> Result<BuildRecord> {
    let name = raw.required_str("name")?;
    let warframe = raw.required_str("warframe")?;
    let key = BuildKey {
        warframe: warframe.clone(),
        name: name.clone(),
    };

    let mut mods = Vec::new();
    let mut taken: HashMap<(String, i32), usize> = HashMap::new();
    for (i, slot) in raw.records("mods").iter().enumerate() {
        let record = slot_record(slot, key.clone(), flags)
            .map_err(|err| within(&format!("mods[{}]", i), err))?;
        let position = (record.target_type.clone(), record.slot_index);
        if let Some(first) = taken.insert(position, i) {
            return Err(AppError::validation(
                format!("mods[{}].slot_index", i),
                format!("slot already taken by mods[{}]", first),
            ));
        }
        mods.push(record);
    }

    let record = BuildRecord {
        name,
        description: raw.optional_str("description")?,
        author: raw.optional_str("author")?,
        warframe,
        primary_weapon: raw.optional_str("primaryWeapon")?,
        secondary_weapon: raw.optional_str("secondaryWeapon")?,
        melee_weapon: raw.optional_str("meleeWeapon")?,
        companion: raw.optional_str("companion")?,
        mods,
    };
    record.validate()?;

    known.require(ParentKind::Warframe, &record.warframe, "build")?;
    let optional = [
        (ParentKind::PrimaryWeapon, &record.primary_weapon),
        (ParentKind::SecondaryWeapon, &record.secondary_weapon),
        (ParentKind::MeleeWeapon, &record.melee_weapon),
        (ParentKind::Companion, &record.companion),
    ];
    for (kind, key) in optional {
        if let Some(key) = key {
            known.require(kind, key, "build")?;
        }
    }
    for slot in &record.mods {
        known.require(ParentKind::Mod, &slot.mod_unique_name, "build mod")?;
    }

    Ok(record)
}

/// A build mod on its own, keyed by `warframe` + `build`
pub(super) fn build_mod(
    raw: &RawRecord,
    known: &KnownKeys,
    flags: &mut Flags,
) -> Result<BuildModRecord> {
    let key = BuildKey {
        warframe: raw.required_str("warframe")?,
        name: raw.required_str("build")?,
    };
    let record = slot_record(raw, key, flags)?;

    known.require(ParentKind::Build, &record.build.as_string(), "build mod")?;
    known.require(ParentKind::Mod, &record.mod_unique_name, "build mod")?;
    Ok(record)
}

fn slot_record(raw: &RawRecord, build: BuildKey, flags: &mut Flags) -> Result<BuildModRecord> {
    let record = BuildModRecord {
        build,
        mod_unique_name: raw.required_str("mod")?,
        target_type: raw.required_str("targetType")?,
        slot_index: raw.required_i32("slotIndex")?,
        mod_rank: raw.optional_i32("rank|modRank")?.unwrap_or(0),
    };
    record.validate()?;

    flags.check(Vocabulary::TargetType, "target_type", &record.target_type);
    Ok(record)
}

/// Prefix a validation field with its position in the build
fn within(prefix: &str, err: AppError) -> AppError {
    match err {
        AppError::Validation { field, reason } => AppError::Validation {
            field: format!("{}.{}", prefix, field),
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXCALIBUR: &str = "/Lotus/Powersuits/Excalibur/Excalibur";
    const SERRATION: &str = "/Lotus/Upgrades/Mods/Rifle/WeaponDamageAmountMod";

    fn known() -> KnownKeys {
        let mut known = KnownKeys::new();
        known.insert(ParentKind::Warframe, EXCALIBUR);
        known.insert(ParentKind::Mod, SERRATION);
        known
    }

    fn raw_build(slot_index: i64, target: &str) -> RawRecord {
        RawRecord::from_value(json!({
            "name": "Exalted Blade",
            "author": "tenno",
            "warframe": EXCALIBUR,
            "mods": [{"mod": SERRATION, "targetType": target, "slotIndex": slot_index, "rank": 10}]
        }))
        .unwrap()
    }

    #[test]
    fn test_build_with_mods() {
        let mut flags = Flags::default();
        let record = build(&raw_build(0, "primary"), &known(), &mut flags).unwrap();
        assert_eq!(record.mods.len(), 1);
        assert_eq!(record.mods[0].build, record.key());
        assert!(flags.0.is_empty());
    }

    #[test]
    fn test_slot_errors_name_their_position() {
        let err = build(&raw_build(-1, "primary"), &known(), &mut Flags::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "mods[0].slot_index"));
    }

    #[test]
    fn test_shared_slot_rejected() {
        let mut raw = raw_build(0, "primary");
        let slot = json!({"mod": SERRATION, "targetType": "primary", "slotIndex": 0});
        raw.insert("mods", json!([slot.clone(), slot]));

        let err = build(&raw, &known(), &mut Flags::default()).unwrap_err();
        match err {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "mods[1].slot_index");
                assert!(reason.contains("mods[0]"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // Same index on a different target is a different slot
        let mut raw = raw_build(0, "primary");
        raw.insert(
            "mods",
            json!([
                {"mod": SERRATION, "targetType": "primary", "slotIndex": 0},
                {"mod": SERRATION, "targetType": "secondary", "slotIndex": 0}
            ]),
        );
        assert_eq!(build(&raw, &known(), &mut Flags::default()).unwrap().mods.len(), 2);
    }

    #[test]
    fn test_unknown_target_type_flagged() {
        let mut flags = Flags::default();
        build(&raw_build(1, "archwing"), &known(), &mut flags).unwrap();
        assert_eq!(flags.0.len(), 1);
    }

    #[test]
    fn test_unknown_weapon_reference() {
        let mut raw = raw_build(0, "primary");
        raw.insert("primaryWeapon", "/Lotus/Weapons/Tenno/Rifle/Missing");
        let err = build(&raw, &known(), &mut Flags::default()).unwrap_err();
        assert!(matches!(err, AppError::Reference { .. }));
    }

    #[test]
    fn test_standalone_build_mod_requires_build() {
        let raw = RawRecord::from_value(json!({
            "warframe": EXCALIBUR,
            "build": "Exalted Blade",
            "mod": SERRATION,
            "targetType": "primary",
            "slotIndex": 2
        }))
        .unwrap();

        let mut known = known();
        let err = build_mod(&raw, &known, &mut Flags::default()).unwrap_err();
        assert!(matches!(err, AppError::Reference { .. }));

        known.insert(ParentKind::Build, format!("{}::Exalted Blade", EXCALIBUR));
        let record = build_mod(&raw, &known, &mut Flags::default()).unwrap();
        assert_eq!(record.mod_rank, 0);
    }
}
