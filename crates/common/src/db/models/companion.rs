//! Companion entity (sentinels and pets)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companions")]
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
    pub companion_type: String,

    #[sea_orm(column_type = "Double")]
    pub health: f64,

    #[sea_orm(column_type = "Double")]
    pub shield: f64,

    #[sea_orm(column_type = "Double")]
    pub armor: f64,

    pub mastery_rank: i32,

    #[sea_orm(column_type = "Json", nullable)]
    pub polarities: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::companion_ability::Entity")]
    Abilities,
}

impl Related<super::companion_ability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Abilities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
