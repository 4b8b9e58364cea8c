//! Persistence gateway
//!
//! Idempotent upserts keyed on natural keys. Every upsert runs in its own
//! transaction; foreign references are resolved from parent natural keys
//! inside that transaction, and a build commits together with its mods.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::records::{
    AbilityRecord, BuildKey, BuildModRecord, BuildRecord, CompanionAbilityRecord,
    CompanionRecord, KnownKeys, MeleeWeaponRecord, ModRecord, ParentKind,
    PassiveAbilityRecord, RangedWeaponRecord, RecordKind, ValidatedRecord, WarframeRecord,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Whether an upsert created the row or matched an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// A persisted row as reported back to the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRow {
    pub table: String,
    pub id: i32,
    pub natural_key: String,
    pub outcome: UpsertOutcome,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Upsert
    // ========================================================================

    /// Insert or update `record` by its natural key
    pub async fn upsert(&self, record: &ValidatedRecord) -> Result<StoredRow> {
        let table = record.kind().table();
        let txn = self.conn().begin().await?;

        let written = match record {
            ValidatedRecord::Warframe(r) => upsert_warframe(&txn, r).await,
            ValidatedRecord::PrimaryWeapon(r) => upsert_primary(&txn, r).await,
            ValidatedRecord::SecondaryWeapon(r) => upsert_secondary(&txn, r).await,
            ValidatedRecord::MeleeWeapon(r) => upsert_melee(&txn, r).await,
            ValidatedRecord::Mod(r) => upsert_mod(&txn, r).await,
            ValidatedRecord::Companion(r) => upsert_companion(&txn, r).await,
            ValidatedRecord::Ability(r) => upsert_ability(&txn, r).await,
            ValidatedRecord::PassiveAbility(r) => upsert_passive(&txn, r).await,
            ValidatedRecord::CompanionAbility(r) => upsert_companion_ability(&txn, r).await,
            ValidatedRecord::Build(r) => upsert_build(&txn, r).await,
            ValidatedRecord::BuildMod(r) => upsert_build_mod(&txn, r).await,
        };

        let (id, outcome) = match written {
            Ok(written) => written,
            Err(err) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!(table, error = %rollback, "Rollback failed");
                }
                return Err(classify(table, err));
            }
        };

        txn.commit()
            .await
            .map_err(|e| classify(table, AppError::Database(e)))?;

        let natural_key = record.natural_key();
        debug!(table, id, key = %natural_key, ?outcome, "Row written");

        Ok(StoredRow {
            table: table.to_string(),
            id,
            natural_key,
            outcome,
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Natural keys of every persisted parent row
    pub async fn load_known_keys(&self) -> Result<KnownKeys> {
        let mut known = KnownKeys::new();

        let conn = self.conn();
        collect_keys::<WarframeEntity, _>(
            conn,
            WarframeColumn::UniqueName,
            ParentKind::Warframe,
            &mut known,
        )
        .await?;
        collect_keys::<PrimaryWeaponEntity, _>(
            conn,
            PrimaryWeaponColumn::UniqueName,
            ParentKind::PrimaryWeapon,
            &mut known,
        )
        .await?;
        collect_keys::<SecondaryWeaponEntity, _>(
            conn,
            SecondaryWeaponColumn::UniqueName,
            ParentKind::SecondaryWeapon,
            &mut known,
        )
        .await?;
        collect_keys::<MeleeWeaponEntity, _>(
            conn,
            MeleeWeaponColumn::UniqueName,
            ParentKind::MeleeWeapon,
            &mut known,
        )
        .await?;
        collect_keys::<ModEntity, _>(
            conn,
            ModColumn::UniqueName,
            ParentKind::Mod,
            &mut known,
        )
        .await?;
        collect_keys::<CompanionEntity, _>(
            conn,
            CompanionColumn::UniqueName,
            ParentKind::Companion,
            &mut known,
        )
        .await?;

        let builds = BuildEntity::find()
            .find_also_related(WarframeEntity)
            .all(conn)
            .await?;
        for (build, warframe) in builds {
            if let Some(warframe) = warframe {
                let key = BuildKey {
                    warframe: warframe.unique_name,
                    name: build.name,
                };
                known.insert(ParentKind::Build, key.as_string());
            }
        }

        Ok(known)
    }

    /// Number of rows in the table holding `kind`
    pub async fn count(&self, kind: RecordKind) -> Result<u64> {
        let conn = self.conn();
        let count = match kind {
            RecordKind::Warframe => WarframeEntity::find().count(conn).await?,
            RecordKind::PrimaryWeapon => PrimaryWeaponEntity::find().count(conn).await?,
            RecordKind::SecondaryWeapon => SecondaryWeaponEntity::find().count(conn).await?,
            RecordKind::MeleeWeapon => MeleeWeaponEntity::find().count(conn).await?,
            RecordKind::Mod => ModEntity::find().count(conn).await?,
            RecordKind::Companion => CompanionEntity::find().count(conn).await?,
            RecordKind::Ability => AbilityEntity::find().count(conn).await?,
            RecordKind::PassiveAbility => PassiveAbilityEntity::find().count(conn).await?,
            RecordKind::CompanionAbility => CompanionAbilityEntity::find().count(conn).await?,
            RecordKind::Build => BuildEntity::find().count(conn).await?,
            RecordKind::BuildMod => BuildModEntity::find().count(conn).await?,
        };
        Ok(count)
    }

    pub async fn find_warframe(&self, unique_name: &str) -> Result<Option<Warframe>> {
        WarframeEntity::find()
            .filter(WarframeColumn::UniqueName.eq(unique_name))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_mod(&self, unique_name: &str) -> Result<Option<ModCard>> {
        ModEntity::find()
            .filter(ModColumn::UniqueName.eq(unique_name))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Abilities of a warframe in slot order
    pub async fn abilities_of(&self, warframe: &str) -> Result<Vec<Ability>> {
        let Some(parent) = self.find_warframe(warframe).await? else {
            return Ok(Vec::new());
        };
        AbilityEntity::find()
            .filter(AbilityColumn::WarframeId.eq(parent.id))
            .order_by_asc(AbilityColumn::AbilityIndex)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// A build and its slotted mods
    pub async fn find_build(&self, key: &BuildKey) -> Result<Option<(Build, Vec<BuildMod>)>> {
        let Some(parent) = self.find_warframe(&key.warframe).await? else {
            return Ok(None);
        };
        let Some(build) = BuildEntity::find()
            .filter(BuildColumn::WarframeId.eq(parent.id))
            .filter(BuildColumn::Name.eq(key.name.as_str()))
            .one(self.conn())
            .await?
        else {
            return Ok(None);
        };
        let mods = BuildModEntity::find()
            .filter(BuildModColumn::BuildId.eq(build.id))
            .order_by_asc(BuildModColumn::TargetType)
            .order_by_asc(BuildModColumn::SlotIndex)
            .all(self.conn())
            .await?;
        Ok(Some((build, mods)))
    }
}

/// Foreign-key violations reported by the database become integrity errors
fn classify(table: &str, err: AppError) -> AppError {
    match err {
        AppError::Database(db) => match db.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                AppError::ReferentialIntegrity {
                    table: table.to_string(),
                    message,
                }
            }
            _ => AppError::Database(db),
        },
        other => other,
    }
}

fn missing_parent(table: &str, parent: &str, key: &str) -> AppError {
    AppError::ReferentialIntegrity {
        table: table.to_string(),
        message: format!("{} `{}` does not exist", parent, key),
    }
}

async fn collect_keys<E, C>(
    conn: &DatabaseConnection,
    column: C,
    kind: ParentKind,
    known: &mut KnownKeys,
) -> Result<()>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let names = E::find()
        .select_only()
        .column(column)
        .into_tuple::<String>()
        .all(conn)
        .await?;
    for name in names {
        known.insert(kind, name);
    }
    Ok(())
}

// ============================================================================
// Parent lookups (inside the transaction)
// ============================================================================

/// Id of the row whose `key_column` equals `key`
async fn find_id<E>(
    txn: &DatabaseTransaction,
    key_column: E::Column,
    id_column: E::Column,
    key: &str,
) -> Result<Option<i32>>
where
    E: EntityTrait,
{
    Ok(E::find()
        .filter(key_column.eq(key))
        .select_only()
        .column(id_column)
        .into_tuple::<i32>()
        .one(txn)
        .await?)
}

async fn warframe_id(txn: &DatabaseTransaction, unique_name: &str) -> Result<Option<i32>> {
    find_id::<WarframeEntity>(txn, WarframeColumn::UniqueName, WarframeColumn::Id, unique_name).await
}

async fn primary_id(txn: &DatabaseTransaction, unique_name: &str) -> Result<Option<i32>> {
    find_id::<PrimaryWeaponEntity>(
        txn,
        PrimaryWeaponColumn::UniqueName,
        PrimaryWeaponColumn::Id,
        unique_name,
    )
    .await
}

async fn secondary_id(txn: &DatabaseTransaction, unique_name: &str) -> Result<Option<i32>> {
    find_id::<SecondaryWeaponEntity>(
        txn,
        SecondaryWeaponColumn::UniqueName,
        SecondaryWeaponColumn::Id,
        unique_name,
    )
    .await
}

async fn melee_id(txn: &DatabaseTransaction, unique_name: &str) -> Result<Option<i32>> {
    find_id::<MeleeWeaponEntity>(
        txn,
        MeleeWeaponColumn::UniqueName,
        MeleeWeaponColumn::Id,
        unique_name,
    )
    .await
}

async fn mod_id(txn: &DatabaseTransaction, unique_name: &str) -> Result<Option<i32>> {
    find_id::<ModEntity>(txn, ModColumn::UniqueName, ModColumn::Id, unique_name).await
}

async fn companion_id(txn: &DatabaseTransaction, unique_name: &str) -> Result<Option<i32>> {
    find_id::<CompanionEntity>(txn, CompanionColumn::UniqueName, CompanionColumn::Id, unique_name)
        .await
}

async fn build_id(txn: &DatabaseTransaction, key: &BuildKey) -> Result<Option<i32>> {
    let Some(warframe) = warframe_id(txn, &key.warframe).await? else {
        return Ok(None);
    };
    Ok(BuildEntity::find()
        .filter(BuildColumn::WarframeId.eq(warframe))
        .filter(BuildColumn::Name.eq(key.name.as_str()))
        .one(txn)
        .await?
        .map(|m| m.id))
}

/// Resolve an optional reference, failing when it is named but missing
async fn optional_ref<'a, F, Fut>(
    table: &str,
    parent: &str,
    key: Option<&'a str>,
    lookup: F,
) -> Result<Option<i32>>
where
    F: FnOnce(&'a str) -> Fut,
    Fut: std::future::Future<Output = Result<Option<i32>>>,
{
    match key {
        None => Ok(None),
        Some(key) => lookup(key)
            .await?
            .map(Some)
            .ok_or_else(|| missing_parent(table, parent, key)),
    }
}

// ============================================================================
// Per-table upserts
// ============================================================================

async fn upsert_warframe(
    txn: &DatabaseTransaction,
    r: &WarframeRecord,
) -> Result<(i32, UpsertOutcome)> {
    let mut active = WarframeActiveModel {
        unique_name: Set(r.unique_name.clone()),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        health: Set(r.health),
        shield: Set(r.shield),
        armor: Set(r.armor),
        power: Set(r.power),
        sprint_speed: Set(r.sprint_speed),
        mastery_rank: Set(r.mastery_rank),
        polarities: Set(r.polarities.clone()),
        aura_polarity: Set(r.aura_polarity.clone()),
        exilus_polarity: Set(r.exilus_polarity.clone()),
        sex: Set(r.sex.clone()),
        ..Default::default()
    };

    match warframe_id(txn, &r.unique_name).await? {
        Some(id) => {
            active.id = Set(id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

/// Primary and secondary weapons share one column set
macro_rules! upsert_ranged {
    ($name:ident, $active:ident, $lookup:ident) => {
        async fn $name(
            txn: &DatabaseTransaction,
            r: &RangedWeaponRecord,
        ) -> Result<(i32, UpsertOutcome)> {
            let mut active = $active {
                unique_name: Set(r.unique_name.clone()),
                name: Set(r.name.clone()),
                description: Set(r.description.clone()),
                weapon_type: Set(r.weapon_type.clone()),
                mastery_rank: Set(r.mastery_rank),
                impact_damage: Set(r.impact_damage),
                puncture_damage: Set(r.puncture_damage),
                slash_damage: Set(r.slash_damage),
                fire_rate: Set(r.fire_rate),
                critical_chance: Set(r.critical_chance),
                critical_multiplier: Set(r.critical_multiplier),
                status_chance: Set(r.status_chance),
                accuracy: Set(r.accuracy),
                magazine_size: Set(r.magazine_size),
                max_ammo: Set(r.max_ammo),
                reload_time: Set(r.reload_time),
                projectile: Set(r.projectile.clone()),
                noise: Set(r.noise.clone()),
                trigger: Set(r.trigger.clone()),
                riven_disposition: Set(r.riven_disposition),
                polarities: Set(r.polarities.clone()),
                exilus_polarity: Set(r.exilus_polarity.clone()),
                ..Default::default()
            };

            match $lookup(txn, &r.unique_name).await? {
                Some(id) => {
                    active.id = Set(id);
                    Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
                }
                None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
            }
        }
    };
}

upsert_ranged!(upsert_primary, PrimaryWeaponActiveModel, primary_id);
upsert_ranged!(upsert_secondary, SecondaryWeaponActiveModel, secondary_id);

async fn upsert_melee(
    txn: &DatabaseTransaction,
    r: &MeleeWeaponRecord,
) -> Result<(i32, UpsertOutcome)> {
    let mut active = MeleeWeaponActiveModel {
        unique_name: Set(r.unique_name.clone()),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        weapon_type: Set(r.weapon_type.clone()),
        mastery_rank: Set(r.mastery_rank),
        impact_damage: Set(r.impact_damage),
        puncture_damage: Set(r.puncture_damage),
        slash_damage: Set(r.slash_damage),
        attack_speed: Set(r.attack_speed),
        critical_chance: Set(r.critical_chance),
        critical_multiplier: Set(r.critical_multiplier),
        status_chance: Set(r.status_chance),
        range: Set(r.range),
        slam_attack: Set(r.slam_attack),
        slam_radial_damage: Set(r.slam_radial_damage),
        slam_radius: Set(r.slam_radius),
        slide_attack: Set(r.slide_attack),
        heavy_attack_damage: Set(r.heavy_attack_damage),
        heavy_slam_attack: Set(r.heavy_slam_attack),
        heavy_slam_radial_damage: Set(r.heavy_slam_radial_damage),
        heavy_slam_radius: Set(r.heavy_slam_radius),
        wind_up: Set(r.wind_up),
        follow_through: Set(r.follow_through),
        combo_duration: Set(r.combo_duration),
        riven_disposition: Set(r.riven_disposition),
        polarities: Set(r.polarities.clone()),
        stance_polarity: Set(r.stance_polarity.clone()),
        ..Default::default()
    };

    match melee_id(txn, &r.unique_name).await? {
        Some(id) => {
            active.id = Set(id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

async fn upsert_mod(txn: &DatabaseTransaction, r: &ModRecord) -> Result<(i32, UpsertOutcome)> {
    let mut active = ModActiveModel {
        unique_name: Set(r.unique_name.clone()),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        mod_type: Set(r.mod_type.clone()),
        polarity: Set(r.polarity.clone()),
        rarity: Set(r.rarity.clone()),
        base_drain: Set(r.base_drain),
        max_rank: Set(r.max_rank),
        transmutable: Set(r.transmutable),
        tradable: Set(r.tradable),
        fusion_limit: Set(r.fusion_limit),
        ..Default::default()
    };

    match mod_id(txn, &r.unique_name).await? {
        Some(id) => {
            active.id = Set(id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

async fn upsert_companion(
    txn: &DatabaseTransaction,
    r: &CompanionRecord,
) -> Result<(i32, UpsertOutcome)> {
    let mut active = CompanionActiveModel {
        unique_name: Set(r.unique_name.clone()),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        companion_type: Set(r.companion_type.clone()),
        health: Set(r.health),
        shield: Set(r.shield),
        armor: Set(r.armor),
        mastery_rank: Set(r.mastery_rank),
        polarities: Set(r.polarities.clone()),
        ..Default::default()
    };

    match companion_id(txn, &r.unique_name).await? {
        Some(id) => {
            active.id = Set(id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

async fn upsert_ability(
    txn: &DatabaseTransaction,
    r: &AbilityRecord,
) -> Result<(i32, UpsertOutcome)> {
    let parent = warframe_id(txn, &r.warframe)
        .await?
        .ok_or_else(|| missing_parent("abilities", "warframe", &r.warframe))?;

    let existing = AbilityEntity::find()
        .filter(AbilityColumn::WarframeId.eq(parent))
        .filter(AbilityColumn::AbilityIndex.eq(r.ability_index))
        .one(txn)
        .await?;

    let mut active = AbilityActiveModel {
        warframe_id: Set(parent),
        ability_index: Set(r.ability_index),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        energy_cost: Set(r.energy_cost),
        can_helminth: Set(r.can_helminth),
        ..Default::default()
    };

    match existing {
        Some(row) => {
            active.id = Set(row.id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

async fn upsert_passive(
    txn: &DatabaseTransaction,
    r: &PassiveAbilityRecord,
) -> Result<(i32, UpsertOutcome)> {
    let parent = warframe_id(txn, &r.warframe)
        .await?
        .ok_or_else(|| missing_parent("passive_abilities", "warframe", &r.warframe))?;

    let existing = PassiveAbilityEntity::find()
        .filter(PassiveAbilityColumn::WarframeId.eq(parent))
        .one(txn)
        .await?;

    let mut active = PassiveAbilityActiveModel {
        warframe_id: Set(parent),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        ..Default::default()
    };

    match existing {
        Some(row) => {
            active.id = Set(row.id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

async fn upsert_companion_ability(
    txn: &DatabaseTransaction,
    r: &CompanionAbilityRecord,
) -> Result<(i32, UpsertOutcome)> {
    let parent = companion_id(txn, &r.companion)
        .await?
        .ok_or_else(|| missing_parent("companion_abilities", "companion", &r.companion))?;

    let existing = CompanionAbilityEntity::find()
        .filter(CompanionAbilityColumn::CompanionId.eq(parent))
        .filter(CompanionAbilityColumn::Name.eq(r.name.as_str()))
        .one(txn)
        .await?;

    let mut active = CompanionAbilityActiveModel {
        companion_id: Set(parent),
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        ..Default::default()
    };

    match existing {
        Some(row) => {
            active.id = Set(row.id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

async fn upsert_build(
    txn: &DatabaseTransaction,
    r: &BuildRecord,
) -> Result<(i32, UpsertOutcome)> {
    const TABLE: &str = "builds";

    let warframe = warframe_id(txn, &r.warframe)
        .await?
        .ok_or_else(|| missing_parent(TABLE, "warframe", &r.warframe))?;
    let primary = optional_ref(TABLE, "primary weapon", r.primary_weapon.as_deref(), |k| {
        primary_id(txn, k)
    })
    .await?;
    let secondary = optional_ref(TABLE, "secondary weapon", r.secondary_weapon.as_deref(), |k| {
        secondary_id(txn, k)
    })
    .await?;
    let melee = optional_ref(TABLE, "melee weapon", r.melee_weapon.as_deref(), |k| {
        melee_id(txn, k)
    })
    .await?;
    let companion = optional_ref(TABLE, "companion", r.companion.as_deref(), |k| {
        companion_id(txn, k)
    })
    .await?;

    let existing = BuildEntity::find()
        .filter(BuildColumn::WarframeId.eq(warframe))
        .filter(BuildColumn::Name.eq(r.name.as_str()))
        .one(txn)
        .await?;

    let now = Utc::now();
    let mut active = BuildActiveModel {
        name: Set(r.name.clone()),
        description: Set(r.description.clone()),
        author: Set(r.author.clone()),
        updated_at: Set(now),
        warframe_id: Set(warframe),
        primary_weapon_id: Set(primary),
        secondary_weapon_id: Set(secondary),
        melee_weapon_id: Set(melee),
        companion_id: Set(companion),
        ..Default::default()
    };

    let (id, outcome) = match existing {
        Some(row) => {
            active.id = Set(row.id);
            (active.update(txn).await?.id, UpsertOutcome::Updated)
        }
        None => {
            active.created_at = Set(now);
            (active.insert(txn).await?.id, UpsertOutcome::Inserted)
        }
    };

    for slot in &r.mods {
        write_build_mod(txn, id, slot).await?;
    }

    Ok((id, outcome))
}

async fn upsert_build_mod(
    txn: &DatabaseTransaction,
    r: &BuildModRecord,
) -> Result<(i32, UpsertOutcome)> {
    let build = build_id(txn, &r.build)
        .await?
        .ok_or_else(|| missing_parent("build_mods", "build", &r.build.as_string()))?;
    write_build_mod(txn, build, r).await
}

async fn write_build_mod(
    txn: &DatabaseTransaction,
    build: i32,
    r: &BuildModRecord,
) -> Result<(i32, UpsertOutcome)> {
    let module = mod_id(txn, &r.mod_unique_name)
        .await?
        .ok_or_else(|| missing_parent("build_mods", "mod", &r.mod_unique_name))?;

    let existing = BuildModEntity::find()
        .filter(BuildModColumn::BuildId.eq(build))
        .filter(BuildModColumn::TargetType.eq(r.target_type.as_str()))
        .filter(BuildModColumn::SlotIndex.eq(r.slot_index))
        .one(txn)
        .await?;

    let mut active = BuildModActiveModel {
        build_id: Set(build),
        mod_id: Set(module),
        target_type: Set(r.target_type.clone()),
        slot_index: Set(r.slot_index),
        mod_rank: Set(r.mod_rank),
        ..Default::default()
    };

    match existing {
        Some(row) => {
            active.id = Set(row.id);
            Ok((active.update(txn).await?.id, UpsertOutcome::Updated))
        }
        None => Ok((active.insert(txn).await?.id, UpsertOutcome::Inserted)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use tokio_test::assert_err;

    const EXCALIBUR: &str = "/Lotus/Powersuits/Excalibur/Excalibur";
    const SERRATION: &str = "/Lotus/Upgrades/Mods/Rifle/WeaponDamageAmountMod";

    async fn repository() -> Repository {
        let pool = DbPool::connect_url("sqlite::memory:").await.unwrap();
        ensure_schema(pool.conn()).await.unwrap();
        Repository::new(pool)
    }

    fn serration() -> ValidatedRecord {
        ValidatedRecord::Mod(ModRecord {
            unique_name: SERRATION.into(),
            name: "Serration".into(),
            description: Some("+165% Damage".into()),
            mod_type: "Primary Mod".into(),
            polarity: "madurai".into(),
            rarity: "Uncommon".into(),
            base_drain: 4,
            max_rank: 10,
            transmutable: true,
            tradable: true,
            fusion_limit: 10,
        })
    }

    fn excalibur() -> ValidatedRecord {
        ValidatedRecord::Warframe(WarframeRecord {
            unique_name: EXCALIBUR.into(),
            name: "Excalibur".into(),
            description: None,
            health: 100.0,
            shield: 100.0,
            armor: 225.0,
            power: 100.0,
            sprint_speed: 1.0,
            mastery_rank: 0,
            polarities: Some(serde_json::json!(["madurai", "vazarin"])),
            aura_polarity: "madurai".into(),
            exilus_polarity: None,
            sex: Some("Male".into()),
        })
    }

    fn slash_dash(index: i32) -> ValidatedRecord {
        ValidatedRecord::Ability(AbilityRecord {
            warframe: EXCALIBUR.into(),
            ability_index: index,
            name: "Slash Dash".into(),
            description: "Dash between enemies".into(),
            energy_cost: Some(25.0),
            can_helminth: false,
        })
    }

    fn build(mod_name: &str) -> ValidatedRecord {
        let key = BuildKey {
            warframe: EXCALIBUR.into(),
            name: "Exalted Blade".into(),
        };
        ValidatedRecord::Build(BuildRecord {
            name: key.name.clone(),
            description: None,
            author: Some("tenno".into()),
            warframe: EXCALIBUR.into(),
            primary_weapon: None,
            secondary_weapon: None,
            melee_weapon: None,
            companion: None,
            mods: vec![BuildModRecord {
                build: key,
                mod_unique_name: mod_name.into(),
                target_type: "primary".into(),
                slot_index: 0,
                mod_rank: 10,
            }],
        })
    }

    const LEX: &str = "/Lotus/Weapons/Tenno/Pistol/HeavyPistol";
    const SKANA: &str = "/Lotus/Weapons/Tenno/Melee/LongSword/LongSword";
    const CARRIER: &str = "/Lotus/Types/Sentinels/SentinelPowersuits/CarrierPowerSuit";

    fn lex() -> RangedWeaponRecord {
        RangedWeaponRecord {
            unique_name: LEX.into(),
            name: "Lex".into(),
            description: None,
            weapon_type: "Pistol".into(),
            mastery_rank: 2,
            impact_damage: 13.0,
            puncture_damage: 13.0,
            slash_damage: 104.0,
            fire_rate: 1.08,
            critical_chance: 0.2,
            critical_multiplier: 2.0,
            status_chance: 0.1,
            accuracy: 13.3,
            magazine_size: 6,
            max_ammo: 210,
            reload_time: 2.35,
            projectile: Some("Hit-Scan".into()),
            noise: "Alarming".into(),
            trigger: "Semi".into(),
            riven_disposition: 0.9,
            polarities: None,
            exilus_polarity: None,
        }
    }

    fn skana() -> ValidatedRecord {
        ValidatedRecord::MeleeWeapon(MeleeWeaponRecord {
            unique_name: SKANA.into(),
            name: "Skana".into(),
            description: None,
            weapon_type: "Sword".into(),
            mastery_rank: 0,
            impact_damage: 7.0,
            puncture_damage: 7.0,
            slash_damage: 56.0,
            attack_speed: 0.833,
            critical_chance: 0.05,
            critical_multiplier: 1.5,
            status_chance: 0.1,
            range: 2.5,
            slam_attack: 210.0,
            slam_radial_damage: 70.0,
            slam_radius: 5.0,
            slide_attack: 140.0,
            heavy_attack_damage: 420.0,
            heavy_slam_attack: 700.0,
            heavy_slam_radial_damage: 175.0,
            heavy_slam_radius: 7.0,
            wind_up: 0.6,
            follow_through: 0.6,
            combo_duration: 5.0,
            riven_disposition: 1.4,
            polarities: None,
            stance_polarity: "madurai".into(),
        })
    }

    fn carrier() -> ValidatedRecord {
        ValidatedRecord::Companion(CompanionRecord {
            unique_name: CARRIER.into(),
            name: "Carrier".into(),
            description: None,
            companion_type: "Sentinel".into(),
            health: 100.0,
            shield: 100.0,
            armor: 50.0,
            mastery_rank: 0,
            polarities: None,
        })
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = repository().await;

        let first = repo.upsert(&serration()).await.unwrap();
        assert_eq!(first.outcome, UpsertOutcome::Inserted);
        assert_eq!(first.table, "mods");

        let second = repo.upsert(&serration()).await.unwrap();
        assert_eq!(second.outcome, UpsertOutcome::Updated);
        assert_eq!(second.id, first.id);

        assert_eq!(repo.count(RecordKind::Mod).await.unwrap(), 1);
        let stored = repo.find_mod(SERRATION).await.unwrap().unwrap();
        assert_eq!(stored.base_drain, 4);
        assert_eq!(stored.fusion_limit, 10);
    }

    #[tokio::test]
    async fn test_update_keeps_surrogate_id() {
        let repo = repository().await;
        let first = repo.upsert(&excalibur()).await.unwrap();

        let ValidatedRecord::Warframe(mut changed) = excalibur() else {
            unreachable!()
        };
        changed.armor = 300.0;
        let second = repo.upsert(&ValidatedRecord::Warframe(changed)).await.unwrap();

        assert_eq!(second.id, first.id);
        let stored = repo.find_warframe(EXCALIBUR).await.unwrap().unwrap();
        assert_eq!(stored.armor, 300.0);
        assert_eq!(repo.count(RecordKind::Warframe).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_dependent_without_parent_is_rejected() {
        let repo = repository().await;

        let err = repo.upsert(&slash_dash(1)).await.unwrap_err();
        assert!(matches!(err, AppError::ReferentialIntegrity { .. }));
        assert_eq!(repo.count(RecordKind::Ability).await.unwrap(), 0);

        repo.upsert(&excalibur()).await.unwrap();
        repo.upsert(&slash_dash(1)).await.unwrap();
        repo.upsert(&slash_dash(1)).await.unwrap();
        assert_eq!(repo.abilities_of(EXCALIBUR).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_build_and_mods_commit_together() {
        let repo = repository().await;
        repo.upsert(&excalibur()).await.unwrap();

        // unknown mod rolls back the build row as well
        assert_err!(repo.upsert(&build("/Lotus/Upgrades/Mods/Missing")).await);
        assert_eq!(repo.count(RecordKind::Build).await.unwrap(), 0);

        repo.upsert(&serration()).await.unwrap();
        let stored = repo.upsert(&build(SERRATION)).await.unwrap();
        repo.upsert(&build(SERRATION)).await.unwrap();

        let key = BuildKey {
            warframe: EXCALIBUR.into(),
            name: "Exalted Blade".into(),
        };
        let (row, mods) = repo.find_build(&key).await.unwrap().unwrap();
        assert_eq!(row.id, stored.id);
        assert_eq!(mods.len(), 1);
        assert_eq!(repo.count(RecordKind::BuildMod).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_load_known_keys() {
        let repo = repository().await;
        repo.upsert(&excalibur()).await.unwrap();
        repo.upsert(&serration()).await.unwrap();
        repo.upsert(&build(SERRATION)).await.unwrap();

        let known = repo.load_known_keys().await.unwrap();
        assert!(known.contains(ParentKind::Warframe, EXCALIBUR));
        assert!(known.contains(ParentKind::Mod, SERRATION));
        assert!(known.contains(ParentKind::Build, &format!("{}::Exalted Blade", EXCALIBUR)));
        assert!(!known.contains(ParentKind::Companion, EXCALIBUR));
    }

    #[tokio::test]
    async fn test_weapon_slots_use_their_own_tables() {
        let repo = repository().await;

        let secondary = repo.upsert(&ValidatedRecord::SecondaryWeapon(lex())).await.unwrap();
        assert_eq!(secondary.table, "secondary_weapons");
        let again = repo.upsert(&ValidatedRecord::SecondaryWeapon(lex())).await.unwrap();
        assert_eq!(again.outcome, UpsertOutcome::Updated);
        assert_eq!(again.id, secondary.id);

        let melee = repo.upsert(&skana()).await.unwrap();
        assert_eq!(melee.table, "melee_weapons");
        assert_eq!(repo.upsert(&skana()).await.unwrap().outcome, UpsertOutcome::Updated);

        assert_eq!(repo.count(RecordKind::SecondaryWeapon).await.unwrap(), 1);
        assert_eq!(repo.count(RecordKind::PrimaryWeapon).await.unwrap(), 0);
        assert_eq!(repo.count(RecordKind::MeleeWeapon).await.unwrap(), 1);

        repo.upsert(&excalibur()).await.unwrap();
        repo.upsert(&serration()).await.unwrap();
        let ValidatedRecord::Build(mut loadout) = build(SERRATION) else {
            unreachable!()
        };
        loadout.secondary_weapon = Some(LEX.into());
        loadout.melee_weapon = Some(SKANA.into());
        repo.upsert(&ValidatedRecord::Build(loadout.clone())).await.unwrap();

        let (row, _) = repo.find_build(&loadout.key()).await.unwrap().unwrap();
        assert_eq!(row.secondary_weapon_id, Some(secondary.id));
        assert_eq!(row.melee_weapon_id, Some(melee.id));
        assert_eq!(row.primary_weapon_id, None);

        // a secondary is not found under the primary slot
        loadout.primary_weapon = Some(LEX.into());
        let err = repo.upsert(&ValidatedRecord::Build(loadout)).await.unwrap_err();
        assert!(matches!(err, AppError::ReferentialIntegrity { .. }));
    }

    #[tokio::test]
    async fn test_companion_ability_keyed_by_name() {
        let repo = repository().await;
        let ability = |description: &str| {
            ValidatedRecord::CompanionAbility(CompanionAbilityRecord {
                companion: CARRIER.into(),
                name: "Vacuum".into(),
                description: description.into(),
            })
        };

        let err = repo.upsert(&ability("Collects pickups")).await.unwrap_err();
        assert!(matches!(err, AppError::ReferentialIntegrity { .. }));

        repo.upsert(&carrier()).await.unwrap();
        let first = repo.upsert(&ability("Collects pickups")).await.unwrap();
        let second = repo.upsert(&ability("Collects nearby pickups")).await.unwrap();

        assert_eq!(first.outcome, UpsertOutcome::Inserted);
        assert_eq!(second.outcome, UpsertOutcome::Updated);
        assert_eq!(second.id, first.id);
        assert_eq!(repo.count(RecordKind::CompanionAbility).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_integrity_error() {
        let repo = repository().await;

        let orphan = BuildModActiveModel {
            build_id: Set(404),
            mod_id: Set(404),
            target_type: Set("primary".into()),
            slot_index: Set(0),
            mod_rank: Set(0),
            ..Default::default()
        };
        let err = orphan.insert(repo.conn()).await.unwrap_err();

        match classify("build_mods", AppError::Database(err)) {
            AppError::ReferentialIntegrity { table, .. } => assert_eq!(table, "build_mods"),
            other => panic!("expected integrity error, got {:?}", other),
        }
        assert_eq!(repo.count(RecordKind::BuildMod).await.unwrap(), 0);

        // other database errors pass through
        let other = classify("mods", AppError::Database(sea_orm::DbErr::RecordNotFound("x".into())));
        assert!(matches!(other, AppError::Database(_)));
    }
}
