//! Association between a fest and a selected cocktail.
//!
//! The primary key `(fest_date, cocktail_id)` keeps one row per pair, so a
//! repeated selection updates the row instead of appending a duplicate.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "fest_cocktails")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub fest_date: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cocktail_id: String,
    /// Sale price in cents.
    pub price: i64,
    /// Planned servings.
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fests::Entity",
        from = "Column::FestDate",
        to = "super::fests::Column::Date",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Fest,
    #[sea_orm(
        belongs_to = "super::cocktails::Entity",
        from = "Column::CocktailId",
        to = "super::cocktails::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cocktail,
}

impl Related<super::fests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fest.def()
    }
}

impl Related<super::cocktails::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cocktail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
