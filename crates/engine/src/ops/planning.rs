use std::num::NonZeroU32;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::{RatioAdvice, ResultEngine, ShoppingList, advise_ratio, shopping_list};

use super::{Engine, with_tx};

impl Engine {
    /// Shopping list for the fest on `date`.
    ///
    /// Recipes, inventory and the fest are read first; if any read fails no
    /// list is computed.
    pub async fn shopping_list_for(&self, date: NaiveDate) -> ResultEngine<ShoppingList> {
        let cocktails = self.cocktails().await?;
        let inventory = self.inventory().await?;
        let fest = self.fest(date).await?;
        Ok(shopping_list(&cocktails, &inventory, &fest.plan()))
    }

    /// Cocktails-per-guest advice for the fest on `date`.
    pub async fn ratio_for(&self, date: NaiveDate, guests: NonZeroU32) -> ResultEngine<RatioAdvice> {
        let fest = self.fest(date).await?;
        Ok(advise_ratio(&fest.plan(), guests))
    }

    /// Runs a SQL script (e.g. a predefined recipe/inventory seed) in one
    /// transaction.
    pub async fn run_script(&self, sql: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            db_tx.execute_unprepared(sql).await?;
            Ok(())
        })
    }
}
