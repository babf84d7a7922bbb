//! Shopping-list derivation for a fest.
//!
//! Pure functions over already loaded recipes, inventory and fest plan; the
//! repository reads happen before (see `Engine::shopping_list_for`).

use std::{collections::BTreeMap, io};

use serde::Serialize;

use crate::{Cocktail, FestPlan, Inventory, ResultEngine, money::format_cents};

/// Ingredients to buy and what they cost.
///
/// `required` holds liters to buy, floored at 0; `cost` holds the estimated
/// cost in (fractional) cents. Both maps have the same keys: every ingredient
/// used by a planned cocktail.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShoppingList {
    pub required: BTreeMap<String, f64>,
    pub cost: BTreeMap<String, f64>,
}

/// One ingredient of a [`ShoppingList`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShoppingLine<'a> {
    pub ingredient: &'a str,
    pub liters: f64,
    pub cost_cents: f64,
}

impl ShoppingList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// `true` when ingredients are needed but the stock already covers them.
    #[must_use]
    pub fn covered_by_stock(&self) -> bool {
        !self.is_empty() && self.required.values().all(|need| *need == 0.0)
    }

    /// Lines in ingredient name order.
    pub fn lines(&self) -> impl Iterator<Item = ShoppingLine<'_>> {
        self.required.iter().map(|(ingredient, liters)| ShoppingLine {
            ingredient,
            liters: *liters,
            cost_cents: self.cost.get(ingredient).copied().unwrap_or(0.0),
        })
    }

    /// Sum of all costs in (fractional) cents.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.cost.values().sum()
    }

    /// Write the list as CSV with header `ingredient,liters,cost_cents`.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> ResultEngine<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for line in self.lines() {
            writer.serialize(line)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl std::fmt::Display for ShoppingLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.2} l, {}",
            self.ingredient,
            self.liters,
            format_cents(self.cost_cents)
        )
    }
}

/// Compute what has to be bought for `plan`.
///
/// 1. every cocktail planned `n > 0` times adds `n * per_serving` for each of
///    its ingredients;
/// 2. the stock in `inventory` is subtracted;
/// 3. requirements `<= 0` become exactly 0;
/// 4. cost is `required * price per liter`.
///
/// Plan entries naming a cocktail missing from `cocktails` are ignored.
#[must_use]
pub fn shopping_list(cocktails: &[Cocktail], inventory: &Inventory, plan: &FestPlan) -> ShoppingList {
    let mut required: BTreeMap<String, f64> = BTreeMap::new();

    for cocktail in cocktails {
        let planned = plan.get(&cocktail.name).copied().unwrap_or(0);
        if planned == 0 {
            continue;
        }
        for (ingredient, per_serving) in &cocktail.ingredients {
            *required.entry(ingredient.clone()).or_insert(0.0) += f64::from(planned) * per_serving;
        }
    }

    for (ingredient, need) in required.iter_mut() {
        *need -= inventory.available(ingredient);
        if *need <= 0.0 {
            *need = 0.0;
        }
    }

    let cost = required
        .iter()
        .map(|(ingredient, need)| {
            (
                ingredient.clone(),
                inventory.price(ingredient).times_liters(*need),
            )
        })
        .collect();

    ShoppingList { required, cost }
}
