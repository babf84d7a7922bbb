use std::collections::{BTreeMap, HashMap};

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Cocktail, EngineError, NewCocktail, ResultEngine, cocktails, inventory, recipe_lines,
    util::{normalize_name, parse_uuid, validate_serving},
};

use super::{Engine, with_tx};

/// Outcome of [`Engine::import_cocktails`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Cocktails created, in input order.
    pub created: Vec<String>,
    /// Cocktails skipped because the name already exists.
    pub skipped: Vec<String>,
}

impl Engine {
    /// Create a cocktail with its recipe.
    ///
    /// Ingredients missing from the inventory are added with nothing available
    /// and price 0. The cocktail, the inventory lines and the recipe lines are
    /// written in one DB transaction.
    pub async fn create_cocktail(&self, cocktail: &NewCocktail) -> ResultEngine<Uuid> {
        let cocktail = cocktail.normalized()?;
        with_tx!(self, |db_tx| insert_cocktail(&db_tx, &cocktail).await)
    }

    /// All cocktails with their recipes, sorted by name.
    pub async fn cocktails(&self) -> ResultEngine<Vec<Cocktail>> {
        let models = cocktails::Entity::find()
            .order_by_asc(cocktails::Column::Name)
            .all(&self.database)
            .await?;

        let mut recipes: HashMap<String, BTreeMap<String, f64>> = HashMap::new();
        for line in recipe_lines::Entity::find().all(&self.database).await? {
            recipes
                .entry(line.cocktail_id)
                .or_default()
                .insert(line.ingredient, line.amount);
        }

        models
            .into_iter()
            .map(|model| -> ResultEngine<Cocktail> {
                let ingredients = recipes.remove(&model.id).unwrap_or_default();
                Ok(Cocktail {
                    id: parse_uuid(&model.id, "cocktail")?,
                    name: model.name,
                    ingredients,
                })
            })
            .collect()
    }

    /// A single cocktail by name.
    pub async fn cocktail(&self, name: &str) -> ResultEngine<Cocktail> {
        let name = normalize_name(name, "cocktail")?;
        let model = require_cocktail(&self.database, &name).await?;
        let ingredients = recipe_lines::Entity::find()
            .filter(recipe_lines::Column::CocktailId.eq(model.id.clone()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|line| (line.ingredient, line.amount))
            .collect();

        Ok(Cocktail {
            id: parse_uuid(&model.id, "cocktail")?,
            name: model.name,
            ingredients,
        })
    }

    /// Renames a cocktail. Fest selections follow the rename.
    pub async fn rename_cocktail(&self, old_name: &str, new_name: &str) -> ResultEngine<()> {
        let old_name = normalize_name(old_name, "cocktail")?;
        let new_name = normalize_name(new_name, "cocktail")?;
        with_tx!(self, |db_tx| {
            let model = require_cocktail(&db_tx, &old_name).await?;
            if model.name == new_name {
                return Ok(());
            }
            if find_cocktail(&db_tx, &new_name).await?.is_some() {
                return Err(EngineError::ExistingKey(new_name));
            }

            let active = cocktails::ActiveModel {
                id: ActiveValue::Set(model.id),
                name: ActiveValue::Set(new_name),
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Changes the quantity of an ingredient already in a recipe.
    pub async fn set_recipe_amount(
        &self,
        cocktail: &str,
        ingredient: &str,
        liters: f64,
    ) -> ResultEngine<()> {
        let cocktail = normalize_name(cocktail, "cocktail")?;
        let ingredient = normalize_name(ingredient, "ingredient")?;
        validate_serving(&ingredient, liters)?;
        with_tx!(self, |db_tx| {
            let model = require_cocktail(&db_tx, &cocktail).await?;
            let line = recipe_lines::Entity::find_by_id((model.id, ingredient.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound(format!("{ingredient} in {cocktail}"))
                })?;

            let mut active: recipe_lines::ActiveModel = line.into();
            active.amount = ActiveValue::Set(liters);
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Creates every cocktail whose name is not taken yet.
    ///
    /// Each cocktail is written in its own transaction; an invalid recipe stops
    /// the import, leaving the cocktails created before it in place.
    pub async fn import_cocktails(&self, cocktails: &[NewCocktail]) -> ResultEngine<ImportReport> {
        let mut report = ImportReport::default();
        for cocktail in cocktails {
            let cocktail = cocktail.normalized()?;
            if find_cocktail(&self.database, &cocktail.name).await?.is_some() {
                report.skipped.push(cocktail.name);
                continue;
            }
            with_tx!(self, |db_tx| insert_cocktail(&db_tx, &cocktail).await)?;
            report.created.push(cocktail.name);
        }
        Ok(report)
    }
}

async fn insert_cocktail<C: ConnectionTrait>(db: &C, cocktail: &NewCocktail) -> ResultEngine<Uuid> {
    if find_cocktail(db, &cocktail.name).await?.is_some() {
        return Err(EngineError::ExistingKey(cocktail.name.clone()));
    }

    let id = Uuid::new_v4();
    cocktails::ActiveModel {
        id: ActiveValue::Set(id.to_string()),
        name: ActiveValue::Set(cocktail.name.clone()),
    }
    .insert(db)
    .await?;

    for (ingredient, liters) in &cocktail.ingredients {
        if inventory::Entity::find_by_id(ingredient.clone())
            .one(db)
            .await?
            .is_none()
        {
            inventory::ActiveModel {
                name: ActiveValue::Set(ingredient.clone()),
                available: ActiveValue::Set(0.0),
                price: ActiveValue::Set(0),
            }
            .insert(db)
            .await?;
        }

        recipe_lines::ActiveModel {
            cocktail_id: ActiveValue::Set(id.to_string()),
            ingredient: ActiveValue::Set(ingredient.clone()),
            amount: ActiveValue::Set(*liters),
        }
        .insert(db)
        .await?;
    }

    Ok(id)
}

pub(super) async fn find_cocktail<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> ResultEngine<Option<cocktails::Model>> {
    Ok(cocktails::Entity::find()
        .filter(cocktails::Column::Name.eq(name))
        .one(db)
        .await?)
}

pub(super) async fn require_cocktail<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> ResultEngine<cocktails::Model> {
    find_cocktail(db, name)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))
}
