//! Initial schema migration.
//!
//! - `cocktails`: recipes by name
//! - `inventory`: ingredients with stock (liters) and price (cents per liter)
//! - `recipe_lines`: quantity per serving of each ingredient of a cocktail
//! - `fests`: events, identified by their `YYYY-MM-DD` date
//! - `fest_cocktails`: cocktails selected for a fest, one row per pair

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Cocktails {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Inventory {
    Table,
    Name,
    Available,
    Price,
}

#[derive(Iden)]
enum RecipeLines {
    Table,
    CocktailId,
    Ingredient,
    Amount,
}

#[derive(Iden)]
enum Fests {
    Table,
    Date,
}

#[derive(Iden)]
enum FestCocktails {
    Table,
    FestDate,
    CocktailId,
    Price,
    Amount,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Cocktails
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cocktails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cocktails::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cocktails::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Inventory
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Inventory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inventory::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Inventory::Available)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Inventory::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Recipe lines
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecipeLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeLines::CocktailId).string().not_null())
                    .col(ColumnDef::new(RecipeLines::Ingredient).string().not_null())
                    .col(ColumnDef::new(RecipeLines::Amount).double().not_null())
                    .primary_key(
                        Index::create()
                            .col(RecipeLines::CocktailId)
                            .col(RecipeLines::Ingredient),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_lines-cocktail_id")
                            .from(RecipeLines::Table, RecipeLines::CocktailId)
                            .to(Cocktails::Table, Cocktails::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_lines-ingredient")
                            .from(RecipeLines::Table, RecipeLines::Ingredient)
                            .to(Inventory::Table, Inventory::Name)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_lines-ingredient")
                    .table(RecipeLines::Table)
                    .col(RecipeLines::Ingredient)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Fests
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Fests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fests::Date)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Fest cocktails
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FestCocktails::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FestCocktails::FestDate).string().not_null())
                    .col(ColumnDef::new(FestCocktails::CocktailId).string().not_null())
                    .col(
                        ColumnDef::new(FestCocktails::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FestCocktails::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(FestCocktails::FestDate)
                            .col(FestCocktails::CocktailId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fest_cocktails-fest_date")
                            .from(FestCocktails::Table, FestCocktails::FestDate)
                            .to(Fests::Table, Fests::Date)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fest_cocktails-cocktail_id")
                            .from(FestCocktails::Table, FestCocktails::CocktailId)
                            .to(Cocktails::Table, Cocktails::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(FestCocktails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inventory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cocktails::Table).to_owned())
            .await?;
        Ok(())
    }
}
