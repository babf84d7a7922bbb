//! The module contains the ingredient inventory and its persistence model.

use std::collections::BTreeMap;

use sea_orm::entity::prelude::*;

use crate::MoneyCents;

/// One ingredient in stock.
#[derive(Clone, Debug, PartialEq)]
pub struct InventoryLine {
    pub name: String,
    /// Liters currently available.
    pub available: f64,
    /// Price per liter.
    pub price: MoneyCents,
}

impl InventoryLine {
    /// Value of the stock in (fractional) cents.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.price.times_liters(self.available)
    }
}

/// All inventory lines, keyed and ordered by ingredient name.
///
/// Lookups of unknown ingredients behave like an empty line: nothing
/// available, price zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inventory {
    lines: BTreeMap<String, InventoryLine>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, line: InventoryLine) {
        self.lines.insert(line.name.clone(), line);
    }

    /// Liters available for `name`, 0 when unknown.
    #[must_use]
    pub fn available(&self, name: &str) -> f64 {
        self.lines.get(name).map_or(0.0, |line| line.available)
    }

    /// Price per liter for `name`, 0 when unknown.
    #[must_use]
    pub fn price(&self, name: &str) -> MoneyCents {
        self.lines.get(name).map_or(MoneyCents::ZERO, |line| line.price)
    }

    /// Lines in name order.
    pub fn lines(&self) -> impl Iterator<Item = &InventoryLine> {
        self.lines.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total value of the stock in (fractional) cents.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.lines.values().map(InventoryLine::value).sum()
    }
}

impl FromIterator<InventoryLine> for Inventory {
    fn from_iter<T: IntoIterator<Item = InventoryLine>>(iter: T) -> Self {
        let mut inventory = Inventory::new();
        for line in iter {
            inventory.insert(line);
        }
        inventory
    }
}

impl From<Model> for InventoryLine {
    fn from(model: Model) -> Self {
        Self {
            name: model.name,
            available: model.available,
            price: MoneyCents::new(model.price),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub available: f64,
    pub price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_lines::Entity")]
    RecipeLines,
}

impl Related<super::recipe_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
