//! One row per (cocktail, ingredient): the quantity needed for a serving.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cocktail_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ingredient: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cocktails::Entity",
        from = "Column::CocktailId",
        to = "super::cocktails::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cocktail,
    #[sea_orm(
        belongs_to = "super::inventory::Entity",
        from = "Column::Ingredient",
        to = "super::inventory::Column::Name",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Ingredient,
}

impl Related<super::cocktails::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cocktail.def()
    }
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
