//! Mod slotted into a build

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "build_mods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub build_id: i32,

    pub mod_id: i32,

    /// Which gear the slot belongs to (warframe, primary, ...)
    #[sea_orm(column_type = "Text")]
    pub target_type: String,

    pub slot_index: i32,

    pub mod_rank: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::build::Entity",
        from = "Column::BuildId",
        to = "super::build::Column::Id",
        on_delete = "Cascade"
    )]
    Build,

    #[sea_orm(
        belongs_to = "super::mod_card::Entity",
        from = "Column::ModId",
        to = "super::mod_card::Column::Id"
    )]
    Mod,
}

impl Related<super::build::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Build.def()
    }
}

impl Related<super::mod_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
