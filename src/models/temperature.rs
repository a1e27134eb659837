//! Temperature entity model
//!
//! A single reading for one city. Readings are never modified after insert.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "temperatures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// City this reading belongs to
    pub city_id: i32,

    /// When the reading was taken (stored with time zone, written as UTC)
    pub date_time: DateTimeWithTimeZone,

    /// Degrees Celsius
    pub temperature: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id",
        on_delete = "Cascade"
    )]
    City,
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
