//! Idempotent schema bootstrap
//!
//! Tables come from the entity definitions; composite unique keys and the
//! ability slot check are added on top.

use super::models::*;
use crate::errors::Result;
use sea_orm::sea_query::{Expr, Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, Schema};
use tracing::info;

/// Create every table and index that does not exist yet
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    let backend = db.get_database_backend();

    for mut table in tables(&Schema::new(backend)) {
        table.if_not_exists();
        db.execute(backend.build(&table)).await?;
    }

    for index in indexes() {
        db.execute(backend.build(&index)).await?;
    }

    info!("Schema is up to date");
    Ok(())
}

/// Parents before the tables referencing them
fn tables(schema: &Schema) -> Vec<TableCreateStatement> {
    let mut abilities = schema.create_table_from_entity(AbilityEntity);
    abilities.check(Expr::col(AbilityColumn::AbilityIndex).between(1, 4));

    vec![
        schema.create_table_from_entity(WarframeEntity),
        schema.create_table_from_entity(PrimaryWeaponEntity),
        schema.create_table_from_entity(SecondaryWeaponEntity),
        schema.create_table_from_entity(MeleeWeaponEntity),
        schema.create_table_from_entity(ModEntity),
        schema.create_table_from_entity(CompanionEntity),
        schema.create_table_from_entity(CompanionAbilityEntity),
        abilities,
        schema.create_table_from_entity(PassiveAbilityEntity),
        schema.create_table_from_entity(BuildEntity),
        schema.create_table_from_entity(BuildModEntity),
    ]
}

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("uq_abilities_warframe_slot")
            .table(AbilityEntity)
            .col(AbilityColumn::WarframeId)
            .col(AbilityColumn::AbilityIndex)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_companion_abilities_companion_name")
            .table(CompanionAbilityEntity)
            .col(CompanionAbilityColumn::CompanionId)
            .col(CompanionAbilityColumn::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_builds_warframe_name")
            .table(BuildEntity)
            .col(BuildColumn::WarframeId)
            .col(BuildColumn::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_build_mods_slot")
            .table(BuildModEntity)
            .col(BuildModColumn::BuildId)
            .col(BuildModColumn::TargetType)
            .col(BuildModColumn::SlotIndex)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}
