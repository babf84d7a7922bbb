use sea_orm::{ActiveValue, QueryOrder, QuerySelect, prelude::*};

use crate::{
    EngineError, Inventory, InventoryLine, MoneyCents, ResultEngine, inventory,
    util::{normalize_name, validate_stock},
};

use super::Engine;

impl Engine {
    /// Every inventory line.
    pub async fn inventory(&self) -> ResultEngine<Inventory> {
        Ok(inventory::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(InventoryLine::from)
            .collect())
    }

    /// Ingredient names sorted alphabetically, suitable for numbered choices.
    pub async fn ingredient_names(&self) -> ResultEngine<Vec<String>> {
        Ok(inventory::Entity::find()
            .select_only()
            .column(inventory::Column::Name)
            .order_by_asc(inventory::Column::Name)
            .into_tuple::<String>()
            .all(&self.database)
            .await?)
    }

    /// Adds a new ingredient to the inventory.
    pub async fn add_inventory(
        &self,
        name: &str,
        price: MoneyCents,
        available: f64,
    ) -> ResultEngine<()> {
        let name = normalize_name(name, "ingredient")?;
        validate_price(&name, price)?;
        validate_stock(&name, available)?;

        if inventory::Entity::find_by_id(name.clone())
            .one(&self.database)
            .await?
            .is_some()
        {
            return Err(EngineError::ExistingKey(name));
        }

        inventory::ActiveModel {
            name: ActiveValue::Set(name),
            available: ActiveValue::Set(available),
            price: ActiveValue::Set(price.cents()),
        }
        .insert(&self.database)
        .await?;
        Ok(())
    }

    /// Sets how many liters of an ingredient are in stock.
    pub async fn set_available(&self, name: &str, available: f64) -> ResultEngine<()> {
        let name = normalize_name(name, "ingredient")?;
        validate_stock(&name, available)?;
        let mut active: inventory::ActiveModel = self.require_line(&name).await?.into();
        active.available = ActiveValue::Set(available);
        active.update(&self.database).await?;
        Ok(())
    }

    /// Sets the price per liter of an ingredient.
    pub async fn set_price(&self, name: &str, price: MoneyCents) -> ResultEngine<()> {
        let name = normalize_name(name, "ingredient")?;
        validate_price(&name, price)?;
        let mut active: inventory::ActiveModel = self.require_line(&name).await?.into();
        active.price = ActiveValue::Set(price.cents());
        active.update(&self.database).await?;
        Ok(())
    }

    /// Value of the whole stock in (fractional) cents.
    pub async fn inventory_value(&self) -> ResultEngine<f64> {
        Ok(self.inventory().await?.value())
    }

    async fn require_line(&self, name: &str) -> ResultEngine<inventory::Model> {
        inventory::Entity::find_by_id(name.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))
    }
}

fn validate_price(name: &str, price: MoneyCents) -> ResultEngine<()> {
    if price.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "price of '{name}' must be >= 0"
        )));
    }
    Ok(())
}
