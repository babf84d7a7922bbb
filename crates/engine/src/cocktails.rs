//! The module contains `Cocktail` struct and its persistence model.

use std::collections::BTreeMap;

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    ResultEngine,
    util::{normalize_name, validate_serving},
};

/// A cocktail recipe.
///
/// `ingredients` maps an ingredient name to the quantity needed for one
/// serving, in liters. Names are ordered so listings are reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct Cocktail {
    /// Stable identifier, so the cocktail can be renamed without breaking
    /// fest selections.
    pub id: Uuid,
    pub name: String,
    pub ingredients: BTreeMap<String, f64>,
}

impl Cocktail {
    /// Liters of `ingredient` needed for one serving, if the recipe uses it.
    #[must_use]
    pub fn serving(&self, ingredient: &str) -> Option<f64> {
        self.ingredients.get(ingredient).copied()
    }
}

/// Input for creating a cocktail.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewCocktail {
    pub name: String,
    pub ingredients: BTreeMap<String, f64>,
}

impl NewCocktail {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: BTreeMap::new(),
        }
    }

    /// Add (or replace) an ingredient. The last quantity given for a name wins.
    #[must_use]
    pub fn ingredient(mut self, name: impl Into<String>, liters: f64) -> Self {
        self.set_ingredient(name, liters);
        self
    }

    pub fn set_ingredient(&mut self, name: impl Into<String>, liters: f64) {
        self.ingredients.insert(name.into(), liters);
    }

    /// Validate and normalize names and quantities.
    ///
    /// Ingredient names that collapse to the same normalized name keep the
    /// quantity of the later entry in name order.
    pub(crate) fn normalized(&self) -> ResultEngine<NewCocktail> {
        let name = normalize_name(&self.name, "cocktail")?;
        if self.ingredients.is_empty() {
            return Err(crate::EngineError::InvalidAmount(format!(
                "cocktail '{name}' needs at least one ingredient"
            )));
        }

        let mut ingredients = BTreeMap::new();
        for (ingredient, liters) in &self.ingredients {
            let ingredient = normalize_name(ingredient, "ingredient")?;
            validate_serving(&ingredient, *liters)?;
            ingredients.insert(ingredient, *liters);
        }

        Ok(NewCocktail { name, ingredients })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "cocktails")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_lines::Entity")]
    RecipeLines,
    #[sea_orm(has_many = "super::fest_cocktails::Entity")]
    FestCocktails,
}

impl Related<super::recipe_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeLines.def()
    }
}

impl Related<super::fest_cocktails::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FestCocktails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
