//! Primary weapon entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "primary_weapons")]
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
    pub weapon_type: String,

    pub mastery_rank: i32,

    #[sea_orm(column_type = "Double")]
    pub impact_damage: f64,

    #[sea_orm(column_type = "Double")]
    pub puncture_damage: f64,

    #[sea_orm(column_type = "Double")]
    pub slash_damage: f64,

    #[sea_orm(column_type = "Double")]
    pub fire_rate: f64,

    #[sea_orm(column_type = "Double")]
    pub critical_chance: f64,

    #[sea_orm(column_type = "Double")]
    pub critical_multiplier: f64,

    #[sea_orm(column_type = "Double")]
    pub status_chance: f64,

    #[sea_orm(column_type = "Double")]
    pub accuracy: f64,

    pub magazine_size: i32,

    pub max_ammo: i32,

    #[sea_orm(column_type = "Double")]
    pub reload_time: f64,

    #[sea_orm(column_type = "Text", nullable)]
    pub projectile: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub noise: String,

    #[sea_orm(column_type = "Text")]
    pub trigger: String,

    #[sea_orm(column_type = "Double")]
    pub riven_disposition: f64,

    #[sea_orm(column_type = "Json", nullable)]
    pub polarities: Option<Json>,

    #[sea_orm(column_type = "Text", nullable)]
    pub exilus_polarity: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
