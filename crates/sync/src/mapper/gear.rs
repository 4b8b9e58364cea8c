//! Top-level entities: warframes, weapons, mods, companions

use super::Flags;
use validator::Validate;
use wfsync_common::records::{
    CompanionRecord, MeleeWeaponRecord, ModRecord, RangedWeaponRecord, Vocabulary,
    WarframeRecord,
};
use wfsync_common::{RawRecord, Result};

pub(super) fn warframe(raw: &RawRecord, flags: &mut Flags) -> Result<WarframeRecord> {
    let record = WarframeRecord {
        unique_name: raw.required_str("uniqueName")?,
        name: raw.required_str("name")?,
        description: raw.optional_str("description")?,
        health: raw.required_f64("health")?,
        shield: raw.required_f64("shield")?,
        armor: raw.required_f64("armor")?,
        power: raw.required_f64("power")?,
        sprint_speed: raw.optional_f64("sprintSpeed|sprint")?.unwrap_or(1.0),
        mastery_rank: raw.optional_i32("masteryReq")?.unwrap_or(0),
        polarities: raw.optional_json("polarities"),
        aura_polarity: raw.required_str("aura|auraPolarity")?,
        exilus_polarity: raw.optional_str("exilusPolarity")?,
        sex: raw.optional_str("sex")?,
    };
    record.validate()?;

    flags.check(Vocabulary::Polarity, "aura_polarity", &record.aura_polarity);
    flags.check_opt(Vocabulary::Polarity, "exilus_polarity", record.exilus_polarity.as_deref());
    flags.check_polarities("polarities", record.polarities.as_ref());
    Ok(record)
}

/// Impact, puncture and slash from the `damage` breakdown, 0 when absent
fn physical_damage(raw: &RawRecord) -> Result<(f64, f64, f64)> {
    let Some(damage) = raw.nested("damage|damageTypes") else {
        return Ok((0.0, 0.0, 0.0));
    };
    Ok((
        damage.optional_f64("impact")?.unwrap_or(0.0),
        damage.optional_f64("puncture")?.unwrap_or(0.0),
        damage.optional_f64("slash")?.unwrap_or(0.0),
    ))
}

/// Primary and secondary weapons share one shape
pub(super) fn ranged(raw: &RawRecord, flags: &mut Flags) -> Result<RangedWeaponRecord> {
    let (impact, puncture, slash) = physical_damage(raw)?;
    let record = RangedWeaponRecord {
        unique_name: raw.required_str("uniqueName")?,
        name: raw.required_str("name")?,
        description: raw.optional_str("description")?,
        weapon_type: raw.required_str("type")?,
        mastery_rank: raw.optional_i32("masteryReq")?.unwrap_or(0),
        impact_damage: impact,
        puncture_damage: puncture,
        slash_damage: slash,
        fire_rate: raw.required_f64("fireRate")?,
        critical_chance: raw.required_f64("criticalChance")?,
        critical_multiplier: raw.required_f64("criticalMultiplier")?,
        status_chance: raw.required_f64("procChance|statusChance")?,
        accuracy: raw.optional_f64("accuracy")?.unwrap_or(0.0),
        magazine_size: raw.optional_i32("magazineSize")?.unwrap_or(0),
        max_ammo: raw.optional_i32("ammo|maxAmmo")?.unwrap_or(0),
        reload_time: raw.optional_f64("reloadTime")?.unwrap_or(0.0),
        projectile: raw.optional_str("projectile")?,
        noise: raw.required_str("noise")?,
        trigger: raw.required_str("trigger")?,
        riven_disposition: raw.optional_f64("omegaAttenuation|disposition")?.unwrap_or(0.0),
        polarities: raw.optional_json("polarities"),
        exilus_polarity: raw.optional_str("exilusPolarity")?,
    };
    record.validate()?;

    flags.check(Vocabulary::Noise, "noise", &record.noise);
    flags.check(Vocabulary::Trigger, "trigger", &record.trigger);
    flags.check_opt(Vocabulary::Polarity, "exilus_polarity", record.exilus_polarity.as_deref());
    flags.check_polarities("polarities", record.polarities.as_ref());
    Ok(record)
}

pub(super) fn melee(raw: &RawRecord, flags: &mut Flags) -> Result<MeleeWeaponRecord> {
    let (impact, puncture, slash) = physical_damage(raw)?;
    let stat = |keys: &str| -> Result<f64> { Ok(raw.optional_f64(keys)?.unwrap_or(0.0)) };

    let record = MeleeWeaponRecord {
        unique_name: raw.required_str("uniqueName")?,
        name: raw.required_str("name")?,
        description: raw.optional_str("description")?,
        weapon_type: raw.required_str("type")?,
        mastery_rank: raw.optional_i32("masteryReq")?.unwrap_or(0),
        impact_damage: impact,
        puncture_damage: puncture,
        slash_damage: slash,
        attack_speed: raw.required_f64("attackSpeed|fireRate")?,
        critical_chance: raw.required_f64("criticalChance")?,
        critical_multiplier: raw.required_f64("criticalMultiplier")?,
        status_chance: raw.required_f64("procChance|statusChance")?,
        range: stat("range")?,
        slam_attack: stat("slamAttack")?,
        slam_radial_damage: stat("slamRadialDamage")?,
        slam_radius: stat("slamRadius")?,
        slide_attack: stat("slideAttack")?,
        heavy_attack_damage: stat("heavyAttackDamage")?,
        heavy_slam_attack: stat("heavySlamAttack")?,
        heavy_slam_radial_damage: stat("heavySlamRadialDamage")?,
        heavy_slam_radius: stat("heavySlamRadius")?,
        wind_up: stat("windUp")?,
        follow_through: stat("followThrough")?,
        combo_duration: stat("comboDuration|comboDur")?,
        riven_disposition: stat("omegaAttenuation|disposition")?,
        polarities: raw.optional_json("polarities"),
        stance_polarity: raw.required_str("stancePolarity")?,
    };
    record.validate()?;

    flags.check(Vocabulary::Polarity, "stance_polarity", &record.stance_polarity);
    flags.check_polarities("polarities", record.polarities.as_ref());
    Ok(record)
}

pub(super) fn mod_card(raw: &RawRecord, flags: &mut Flags) -> Result<ModRecord> {
    let fusion_limit = raw.required_i32("fusionLimit")?;
    let record = ModRecord {
        unique_name: raw.required_str("uniqueName")?,
        name: raw.required_str("name")?,
        description: raw.optional_str("description")?,
        mod_type: raw.optional_str("type")?.unwrap_or_else(|| "Mod".to_string()),
        polarity: raw.required_str("polarity")?,
        rarity: raw.required_str("rarity")?,
        base_drain: raw.required_i32("baseDrain")?,
        max_rank: raw.optional_i32("maxRank")?.unwrap_or(fusion_limit),
        transmutable: raw.optional_bool("transmutable")?.unwrap_or(true),
        tradable: raw.optional_bool("tradable")?.unwrap_or(true),
        fusion_limit,
    };
    record.validate()?;

    flags.check(Vocabulary::Polarity, "polarity", &record.polarity);
    flags.check(Vocabulary::Rarity, "rarity", &record.rarity);
    Ok(record)
}

pub(super) fn companion(raw: &RawRecord, flags: &mut Flags) -> Result<CompanionRecord> {
    let record = CompanionRecord {
        unique_name: raw.required_str("uniqueName")?,
        name: raw.required_str("name")?,
        description: raw.optional_str("description")?,
        companion_type: raw.required_str("type|category")?,
        health: raw.required_f64("health")?,
        shield: raw.required_f64("shield")?,
        armor: raw.required_f64("armor")?,
        mastery_rank: raw.optional_i32("masteryReq")?.unwrap_or(0),
        polarities: raw.optional_json("polarities"),
    };
    record.validate()?;

    flags.check_polarities("polarities", record.polarities.as_ref());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wfsync_common::AppError;

    fn raw(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    fn braton() -> Value {
        json!({
            "uniqueName": "/Lotus/Weapons/Tenno/Rifle/Rifle",
            "name": "Braton",
            "type": "Rifle",
            "category": "Primary",
            "damage": {"impact": 7.9, "puncture": 7.9, "slash": 8.2, "total": 24},
            "fireRate": "8.75",
            "criticalChance": 0.12,
            "criticalMultiplier": 1.6,
            "procChance": 0.06,
            "accuracy": 28.6,
            "magazineSize": 45,
            "ammo": 540,
            "reloadTime": 2,
            "noise": "Alarming",
            "trigger": "Auto",
            "omegaAttenuation": 1.35,
            "polarities": ["madurai"],
            "masteryReq": 0
        })
    }

    #[test]
    fn test_ranged_coercion_and_aliases() {
        let mut flags = Flags::default();
        let record = ranged(&raw(braton()), &mut flags).unwrap();
        assert_eq!(record.fire_rate, 8.75);
        assert_eq!(record.status_chance, 0.06);
        assert_eq!(record.max_ammo, 540);
        assert_eq!(record.riven_disposition, 1.35);
        assert_eq!(record.slash_damage, 8.2);
        assert!(flags.0.is_empty());
    }

    #[test]
    fn test_crit_chance_above_one_accepted() {
        let mut payload = braton();
        payload["criticalChance"] = json!(1.5);
        let record = ranged(&raw(payload), &mut Flags::default()).unwrap();
        assert_eq!(record.critical_chance, 1.5);
    }

    #[test]
    fn test_negative_stat_rejected() {
        let mut payload = braton();
        payload["procChance"] = json!(-0.1);
        let err = ranged(&raw(payload), &mut Flags::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "status_chance"));
    }

    #[test]
    fn test_warframe_defaults() {
        let mut flags = Flags::default();
        let record = warframe(
            &raw(json!({
                "uniqueName": "/Lotus/Powersuits/Excalibur/Excalibur",
                "name": "Excalibur",
                "health": 100,
                "shield": 100,
                "armor": 225,
                "power": 100,
                "aura": "madurai",
                "polarities": ["madurai", "penjaga"]
            })),
            &mut flags,
        )
        .unwrap();
        assert_eq!(record.sprint_speed, 1.0);
        assert_eq!(record.mastery_rank, 0);
        assert!(flags.0.is_empty());
    }

    #[test]
    fn test_melee_required_stance() {
        let err = melee(
            &raw(json!({
                "uniqueName": "/Lotus/Weapons/Tenno/Melee/LongSword/LongSword",
                "name": "Skana",
                "type": "Sword",
                "fireRate": 0.833,
                "criticalChance": 0.1,
                "criticalMultiplier": 1.5,
                "procChance": 0.1
            })),
            &mut Flags::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "stance_polarity"));
    }
}
