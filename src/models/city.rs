//! City entity model
//!
//! A named geographic point. Names are unique across all cities.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    /// Free-form notes about the city (optional, up to 1000 characters)
    pub additional_info: Option<String>,

    pub latitude: f64,

    pub longitude: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::temperature::Entity")]
    Temperatures,
}

impl Related<super::temperature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Temperatures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
