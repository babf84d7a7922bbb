//! The module contains `Fest` struct and its persistence model.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::MoneyCents;

/// Planned servings per cocktail name.
pub type FestPlan = BTreeMap<String, u32>;

/// A cocktail selected for a fest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FestSelection {
    /// Servings planned.
    pub planned: u32,
    /// Sale price of one serving.
    pub price: MoneyCents,
}

/// A fest (event) and its cocktail selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Fest {
    pub date: NaiveDate,
    pub selections: BTreeMap<String, FestSelection>,
}

impl Fest {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            selections: BTreeMap::new(),
        }
    }

    /// Planned counts of every selected cocktail.
    #[must_use]
    pub fn plan(&self) -> FestPlan {
        self.selections
            .iter()
            .map(|(name, selection)| (name.clone(), selection.planned))
            .collect()
    }

    /// Total servings planned.
    #[must_use]
    pub fn total_planned(&self) -> u64 {
        self.selections
            .values()
            .map(|selection| u64::from(selection.planned))
            .sum()
    }

    /// Expected revenue in (fractional) cents if every planned serving is sold.
    #[must_use]
    pub fn expected_revenue(&self) -> f64 {
        self.selections
            .values()
            .map(|selection| selection.price.times_servings(selection.planned))
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "fests")]
pub struct Model {
    /// `YYYY-MM-DD`
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fest_cocktails::Entity")]
    FestCocktails,
}

impl Related<super::fest_cocktails::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FestCocktails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn fest() -> Fest {
        let mut fest = Fest::new(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        fest.selections.insert(
            "Mojito".to_string(),
            FestSelection {
                planned: 30,
                price: MoneyCents::new(650),
            },
        );
        fest.selections.insert(
            "Gin Tonic".to_string(),
            FestSelection {
                planned: 10,
                price: MoneyCents::new(500),
            },
        );
        fest
    }

    #[test]
    fn plan_lists_planned_counts() {
        let plan = fest().plan();
        assert_eq!(plan.get("Mojito"), Some(&30));
        assert_eq!(plan.get("Gin Tonic"), Some(&10));
    }

    #[test]
    fn totals() {
        let fest = fest();
        assert_eq!(fest.total_planned(), 40);
        assert_eq!(fest.expected_revenue(), f64::from(30 * 650 + 10 * 500));
    }

    #[test]
    fn revenue_of_huge_prices_does_not_overflow() {
        let mut fest = Fest::new(crate::parse_fest_date("2024-06-21").unwrap());
        fest.selections.insert(
            "Mojito".to_string(),
            FestSelection {
                planned: 1_000_000,
                price: "100000000000".parse().unwrap(),
            },
        );
        assert_eq!(fest.expected_revenue(), 1e19);
        assert_eq!(
            crate::format_cents(fest.expected_revenue()),
            "100000000000000000.00€"
        );
    }
}
