//! Warframe entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warframes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text", unique)]
    pub unique_name: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Double")]
    pub health: f64,

    #[sea_orm(column_type = "Double")]
    pub shield: f64,

    #[sea_orm(column_type = "Double")]
    pub armor: f64,

    /// Energy pool
    #[sea_orm(column_type = "Double")]
    pub power: f64,

    #[sea_orm(column_type = "Double")]
    pub sprint_speed: f64,

    pub mastery_rank: i32,

    #[sea_orm(column_type = "Json", nullable)]
    pub polarities: Option<Json>,

    #[sea_orm(column_type = "Text")]
    pub aura_polarity: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub exilus_polarity: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub sex: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ability::Entity")]
    Abilities,

    #[sea_orm(has_one = "super::passive_ability::Entity")]
    PassiveAbility,

    #[sea_orm(has_many = "super::build::Entity")]
    Builds,
}

impl Related<super::ability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Abilities.def()
    }
}

impl Related<super::passive_ability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PassiveAbility.def()
    }
}

impl Related<super::build::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Builds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
