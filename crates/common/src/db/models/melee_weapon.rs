//! Melee weapon entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "melee_weapons")]
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
    pub attack_speed: f64,

    #[sea_orm(column_type = "Double")]
    pub critical_chance: f64,

    #[sea_orm(column_type = "Double")]
    pub critical_multiplier: f64,

    #[sea_orm(column_type = "Double")]
    pub status_chance: f64,

    #[sea_orm(column_type = "Double")]
    pub range: f64,

    #[sea_orm(column_type = "Double")]
    pub slam_attack: f64,

    #[sea_orm(column_type = "Double")]
    pub slam_radial_damage: f64,

    #[sea_orm(column_type = "Double")]
    pub slam_radius: f64,

    #[sea_orm(column_type = "Double")]
    pub slide_attack: f64,

    #[sea_orm(column_type = "Double")]
    pub heavy_attack_damage: f64,

    #[sea_orm(column_type = "Double")]
    pub heavy_slam_attack: f64,

    #[sea_orm(column_type = "Double")]
    pub heavy_slam_radial_damage: f64,

    #[sea_orm(column_type = "Double")]
    pub heavy_slam_radius: f64,

    #[sea_orm(column_type = "Double")]
    pub wind_up: f64,

    #[sea_orm(column_type = "Double")]
    pub follow_through: f64,

    #[sea_orm(column_type = "Double")]
    pub combo_duration: f64,

    #[sea_orm(column_type = "Double")]
    pub riven_disposition: f64,

    #[sea_orm(column_type = "Json", nullable)]
    pub polarities: Option<Json>,

    #[sea_orm(column_type = "Text")]
    pub stance_polarity: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
