//! Mod entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text", unique)]
    pub unique_name: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub mod_type: String,

    #[sea_orm(column_type = "Text")]
    pub polarity: String,

    #[sea_orm(column_type = "Text")]
    pub rarity: String,

    pub base_drain: i32,

    pub max_rank: i32,

    pub transmutable: bool,

    pub tradable: bool,

    pub fusion_limit: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::build_mod::Entity")]
    BuildMods,
}

impl Related<super::build_mod::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuildMods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
