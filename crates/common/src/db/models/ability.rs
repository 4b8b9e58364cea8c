//! Warframe ability entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "abilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub warframe_id: i32,

    /// 1..=4, unique per warframe
    pub ability_index: i32,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Double", nullable)]
    pub energy_cost: Option<f64>,

    pub can_helminth: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warframe::Entity",
        from = "Column::WarframeId",
        to = "super::warframe::Column::Id",
        on_delete = "Cascade"
    )]
    Warframe,
}

impl Related<super::warframe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warframe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
