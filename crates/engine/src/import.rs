//! Recipe import from CSV.
//!
//! Expected columns: `cocktail,ingredient,amount` (liters per serving). Rows of
//! the same cocktail may be scattered; cocktails keep the order in which they
//! first appear. A repeated ingredient overwrites the earlier amount.

use std::{collections::HashMap, io};

use serde::Deserialize;

use crate::{
    EngineError, NewCocktail, ResultEngine,
    util::{normalize_name, validate_serving},
};

#[derive(Debug, Deserialize)]
struct RecipeRow {
    cocktail: String,
    ingredient: String,
    amount: f64,
}

/// Parse recipes from CSV.
pub fn parse_recipes_csv<R: io::Read>(reader: R) -> ResultEngine<Vec<NewCocktail>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cocktails: Vec<NewCocktail> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line, row) in reader.deserialize::<RecipeRow>().enumerate() {
        let row = row?;
        // header is line 1
        let line = line + 2;
        let cocktail = normalize_name(&row.cocktail, "cocktail")
            .map_err(|err| EngineError::Import(format!("line {line}: {err}")))?;
        let ingredient = normalize_name(&row.ingredient, "ingredient")
            .map_err(|err| EngineError::Import(format!("line {line}: {err}")))?;
        validate_serving(&ingredient, row.amount)
            .map_err(|err| EngineError::Import(format!("line {line}: {err}")))?;

        let slot = *index.entry(cocktail.clone()).or_insert_with(|| {
            cocktails.push(NewCocktail::new(cocktail));
            cocktails.len() - 1
        });
        cocktails[slot].set_ingredient(ingredient, row.amount);
    }

    Ok(cocktails)
}
