//! Companion precept / ability entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companion_abilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub companion_id: i32,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companion::Entity",
        from = "Column::CompanionId",
        to = "super::companion::Column::Id",
        on_delete = "Cascade"
    )]
    Companion,
}

impl Related<super::companion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
