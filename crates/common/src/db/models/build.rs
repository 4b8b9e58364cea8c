//! Loadout build entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "builds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub author: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    pub warframe_id: i32,

    pub primary_weapon_id: Option<i32>,

    pub secondary_weapon_id: Option<i32>,

    pub melee_weapon_id: Option<i32>,

    pub companion_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warframe::Entity",
        from = "Column::WarframeId",
        to = "super::warframe::Column::Id"
    )]
    Warframe,

    #[sea_orm(
        belongs_to = "super::primary_weapon::Entity",
        from = "Column::PrimaryWeaponId",
        to = "super::primary_weapon::Column::Id"
    )]
    PrimaryWeapon,

    #[sea_orm(
        belongs_to = "super::secondary_weapon::Entity",
        from = "Column::SecondaryWeaponId",
        to = "super::secondary_weapon::Column::Id"
    )]
    SecondaryWeapon,

    #[sea_orm(
        belongs_to = "super::melee_weapon::Entity",
        from = "Column::MeleeWeaponId",
        to = "super::melee_weapon::Column::Id"
    )]
    MeleeWeapon,

    #[sea_orm(
        belongs_to = "super::companion::Entity",
        from = "Column::CompanionId",
        to = "super::companion::Column::Id"
    )]
    Companion,

    #[sea_orm(has_many = "super::build_mod::Entity")]
    BuildMods,
}

impl Related<super::warframe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warframe.def()
    }
}

impl Related<super::build_mod::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuildMods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
