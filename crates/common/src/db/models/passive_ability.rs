//! Warframe passive entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "passive_abilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// One passive per warframe
    #[sea_orm(unique)]
    pub warframe_id: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub description: String,
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
