//! The interactive menus.
//!
//! Every leaf action reads what it needs from the engine, asks its questions
//! and renders the result. A failing action is reported and the menu comes
//! back; only end of input or a broken terminal stop the loop.
use std::{
    io::{BufRead, Write},
    num::NonZeroU32,
};

use chrono::NaiveDate;
use crossterm::style::{Color, Stylize};
use engine::{Engine, Fest, MoneyCents, NewCocktail, Verdict, format_cents};

use crate::{
    error::{AppError, InputError, Result},
    prompt::{Prompter, parse_ingredient_choice},
    settings::Settings,
    table::Table,
};

const MAIN_MENU: &[(&str, &str)] = &[
    ("cocktails", "c"),
    ("inventory", "i"),
    ("fest", "f"),
    ("quit", "q"),
];

const COCKTAIL_MENU: &[(&str, &str)] = &[
    ("create cocktail", "c"),
    ("list cocktails", "l"),
    ("alter cocktail", "a"),
    ("main menu", "enter"),
];

const INVENTORY_MENU: &[(&str, &str)] = &[
    ("list inventory", "l"),
    ("inventory value", "v"),
    ("add item", "i"),
    ("change availability", "a"),
    ("change price", "p"),
    ("main menu", "enter"),
];

const FEST_MENU: &[(&str, &str)] = &[
    ("show current fest", "c"),
    ("alter current selection", "a"),
    ("generate shopping list", "g"),
    ("show past fests", "l"),
    ("main menu", "enter"),
];

enum Flow {
    Continue,
    Quit,
}

fn invalid_choice(choice: &str) -> AppError {
    InputError::Invalid(format!("\"{choice}\" is not a valid choice")).into()
}

pub struct Shell<'a, R, W> {
    engine: &'a Engine,
    current: NaiveDate,
    guests: NonZeroU32,
    prompt: Prompter<R, W>,
    color: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(engine: &'a Engine, settings: &Settings, input: R, output: W) -> Self {
        Self {
            engine,
            current: settings.current,
            guests: settings.guests,
            prompt: Prompter::new(input, output),
            color: false,
        }
    }

    /// Colour errors and ratio advice (only useful on a terminal).
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.prompt.into_output()
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.main_menu().await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(AppError::Input(InputError::EndOfInput)) => {
                    tracing::debug!("end of input, leaving");
                    self.prompt.say("")?;
                    return Ok(());
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(%err, "action aborted");
                    let message = self.paint(err.to_string(), Color::Red);
                    self.prompt.say(format!("\n{message}"))?;
                }
            }
        }
    }

    fn paint(&self, text: String, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text
        }
    }

    fn show_menu(&mut self, items: &[(&str, &str)]) -> Result<()> {
        self.prompt.say("")?;
        for (label, key) in items {
            self.prompt.say(format!("{label} [{key}]"))?;
        }
        Ok(())
    }

    async fn main_menu(&mut self) -> Result<Flow> {
        self.show_menu(MAIN_MENU)?;
        let choice = self.prompt.line("Choice: ")?;
        tracing::debug!(%choice, "main menu");
        match choice.as_str() {
            "c" => self.cocktail_menu().await?,
            "i" => self.inventory_menu().await?,
            "f" => self.fest_menu().await?,
            "q" => return Ok(Flow::Quit),
            other => return Err(invalid_choice(other)),
        }
        Ok(Flow::Continue)
    }

    async fn cocktail_menu(&mut self) -> Result<()> {
        self.show_menu(COCKTAIL_MENU)?;
        match self.prompt.line("Choice: ")?.as_str() {
            "c" => self.create_cocktail().await,
            "l" => self.list_cocktails().await,
            "a" => self.alter_cocktail().await,
            "" => Ok(()),
            other => Err(invalid_choice(other)),
        }
    }

    async fn inventory_menu(&mut self) -> Result<()> {
        self.show_menu(INVENTORY_MENU)?;
        match self.prompt.line("Choice: ")?.as_str() {
            "l" => self.list_inventory().await,
            "v" => self.inventory_value().await,
            "i" => self.add_inventory().await,
            "a" => self.update_availability().await,
            "p" => self.update_price().await,
            "" => Ok(()),
            other => Err(invalid_choice(other)),
        }
    }

    async fn fest_menu(&mut self) -> Result<()> {
        self.show_menu(FEST_MENU)?;
        match self.prompt.line("Choice: ")?.as_str() {
            "c" => self.current_fest().await,
            "a" => self.alter_selection().await,
            "g" => self.shopping_list().await,
            "l" => self.past_fests().await,
            "" => Ok(()),
            other => Err(invalid_choice(other)),
        }
    }

    // cocktails

    async fn create_cocktail(&mut self) -> Result<()> {
        let name = self.prompt.text("Name: ")?;

        let known = self.engine.ingredient_names().await?;
        if !known.is_empty() {
            self.prompt.say("Currently available ingredients:")?;
            let mut table = Table::new(["#", "ingredient"]).right(&[0]);
            for (i, ingredient) in known.iter().enumerate() {
                table.row([i.to_string(), ingredient.clone()]);
            }
            self.prompt.say(&table)?;
        }

        let answer = self.prompt.line(&format!(
            "Ingredients of {name} [numbers or new names, separated by ',']: "
        ))?;
        let chosen = parse_ingredient_choice(&answer, &known)?;

        let mut cocktail = NewCocktail::new(name);
        for ingredient in chosen {
            let liters = self
                .prompt
                .liters(&format!("Amount of {ingredient} per serving [l]: "))?;
            cocktail.set_ingredient(ingredient, liters);
        }

        self.engine.create_cocktail(&cocktail).await?;
        tracing::debug!(cocktail = %cocktail.name, "cocktail created");
        self.prompt.say(format!("Created {}.", cocktail.name.trim()))
    }

    async fn list_cocktails(&mut self) -> Result<()> {
        let cocktails = self.engine.cocktails().await?;
        if cocktails.is_empty() {
            return self.prompt.say("No cocktails yet.");
        }

        let mut table = Table::new(["#", "cocktail", "ingredients"]).right(&[0, 2]);
        for (i, cocktail) in cocktails.iter().enumerate() {
            table.row([
                i.to_string(),
                cocktail.name.clone(),
                cocktail.ingredients.len().to_string(),
            ]);
        }
        self.prompt.say(&table)?;

        let answer = self
            .prompt
            .line("Show the recipe of [number, enter to skip]: ")?;
        if answer.is_empty() {
            return Ok(());
        }
        let index: usize = answer
            .parse()
            .map_err(|_| InputError::NotANumber(answer.clone()))?;
        let cocktail = cocktails
            .get(index)
            .ok_or(InputError::OutOfRange(index))?;

        let mut table = Table::new(["ingredient", "per serving [l]"]).right(&[1]);
        for (ingredient, liters) in &cocktail.ingredients {
            table.row([ingredient.clone(), format!("{liters:.3}")]);
        }
        self.prompt.say(format!("Ingredients for {}:", cocktail.name))?;
        self.prompt.say(&table)
    }

    async fn alter_cocktail(&mut self) -> Result<()> {
        let cocktails = self.engine.cocktails().await?;
        if cocktails.is_empty() {
            return self.prompt.say("No cocktails yet.");
        }

        let mut table = Table::new(["#", "cocktail"]).right(&[0]);
        for (i, cocktail) in cocktails.iter().enumerate() {
            table.row([i.to_string(), cocktail.name.clone()]);
        }
        self.prompt.say(&table)?;
        let cocktail = &cocktails[self
            .prompt
            .pick("Which one would you like to alter? ", cocktails.len())?];

        match self
            .prompt
            .line("Alter [n]ame or [i]ngredient amount? ")?
            .as_str()
        {
            "n" => {
                let new_name = self
                    .prompt
                    .text(&format!("What is {} actually called? ", cocktail.name))?;
                self.engine.rename_cocktail(&cocktail.name, &new_name).await?;
                tracing::debug!(from = %cocktail.name, to = %new_name, "cocktail renamed");
                Ok(())
            }
            "i" => {
                let ingredients: Vec<&String> = cocktail.ingredients.keys().collect();
                let mut table = Table::new(["#", "ingredient", "per serving [l]"]).right(&[0, 2]);
                for (i, (ingredient, liters)) in cocktail.ingredients.iter().enumerate() {
                    table.row([i.to_string(), ingredient.clone(), format!("{liters:.3}")]);
                }
                self.prompt
                    .say(format!("Current ingredients for {}:", cocktail.name))?;
                self.prompt.say(&table)?;

                let ingredient = ingredients[self
                    .prompt
                    .pick("Which ingredient do you want to alter? ", ingredients.len())?];
                let liters = self.prompt.liters(&format!(
                    "How much {ingredient} is actually needed [l]? "
                ))?;
                self.engine
                    .set_recipe_amount(&cocktail.name, ingredient, liters)
                    .await?;
                tracing::debug!(cocktail = %cocktail.name, %ingredient, liters, "recipe changed");
                Ok(())
            }
            other => Err(invalid_choice(other)),
        }
    }

    // inventory

    /// Numbered inventory listing; returns the names in listing order.
    async fn show_inventory(&mut self) -> Result<Vec<String>> {
        let inventory = self.engine.inventory().await?;
        if inventory.is_empty() {
            self.prompt.say("The inventory is empty.")?;
            return Ok(Vec::new());
        }

        let mut table =
            Table::new(["#", "ingredient", "available [l]", "price [per l]"]).right(&[0, 2, 3]);
        for (i, line) in inventory.lines().enumerate() {
            table.row([
                i.to_string(),
                line.name.clone(),
                format!("{:.2}", line.available),
                line.price.to_string(),
            ]);
        }
        self.prompt.say(&table)?;
        Ok(inventory.lines().map(|line| line.name.clone()).collect())
    }

    async fn list_inventory(&mut self) -> Result<()> {
        self.show_inventory().await.map(|_| ())
    }

    async fn inventory_value(&mut self) -> Result<()> {
        let value = self.engine.inventory_value().await?;
        self.prompt
            .say(format!("Current inventory value: {}", format_cents(value)))
    }

    async fn add_inventory(&mut self) -> Result<()> {
        let name = self.prompt.text("Name: ")?;
        let price = self.prompt.money("Price per liter [€]: ")?;
        let available = self.prompt.liters("Available [l]: ")?;
        self.engine.add_inventory(&name, price, available).await?;
        tracing::debug!(ingredient = %name, "inventory line added");
        Ok(())
    }

    async fn update_availability(&mut self) -> Result<()> {
        let names = self.show_inventory().await?;
        if names.is_empty() {
            return Ok(());
        }
        let name = &names[self
            .prompt
            .pick("Which item do you want to update? ", names.len())?];
        let available = self.prompt.liters("How much is available? [l]: ")?;
        self.engine.set_available(name, available).await?;
        tracing::debug!(ingredient = %name, available, "stock updated");
        Ok(())
    }

    async fn update_price(&mut self) -> Result<()> {
        let names = self.show_inventory().await?;
        if names.is_empty() {
            return Ok(());
        }
        let name = &names[self
            .prompt
            .pick("Which item do you want to update? ", names.len())?];
        let price = self
            .prompt
            .money("What is the current price per liter? [€]: ")?;
        self.engine.set_price(name, price).await?;
        tracing::debug!(ingredient = %name, %price, "price updated");
        Ok(())
    }

    // fest

    /// Numbered selection of `fest`; returns the cocktails in listing order.
    fn show_selection(&mut self, fest: &Fest) -> Result<Vec<String>> {
        if fest.selections.is_empty() {
            self.prompt
                .say(format!("Nothing selected for {} yet.", fest.date))?;
            return Ok(Vec::new());
        }

        let mut table = Table::new(["#", "cocktail", "planned", "price"]).right(&[0, 2, 3]);
        for (i, (name, selection)) in fest.selections.iter().enumerate() {
            table.row([
                i.to_string(),
                name.clone(),
                selection.planned.to_string(),
                selection.price.to_string(),
            ]);
        }
        self.prompt.say(&table)?;
        Ok(fest.selections.keys().cloned().collect())
    }

    async fn current_fest(&mut self) -> Result<()> {
        let fest = self.engine.fest(self.current).await?;
        self.prompt.say(format!("Current selection ({}):", fest.date))?;
        self.show_selection(&fest)?;
        self.prompt
            .say(format!("Expected revenue: {}", format_cents(fest.expected_revenue())))?;

        let advice = engine::advise_ratio(&fest.plan(), self.guests);
        let color = match advice.verdict {
            Verdict::Ok => Color::Green,
            Verdict::Low | Verdict::High => Color::Yellow,
        };
        let text = self.paint(advice.verdict.advice().to_string(), color);
        self.prompt.say(&advice)?;
        self.prompt.say(text)
    }

    async fn alter_selection(&mut self) -> Result<()> {
        let fest = self.engine.fest(self.current).await?;
        self.prompt.say("Current selection:")?;
        let selected = self.show_selection(&fest)?;

        match self
            .prompt
            .line("Do you want to [a]dd, [c]hange or [d]eselect a cocktail? ")?
            .as_str()
        {
            "a" => self.add_to_selection(&fest).await,
            "c" => {
                let name = self.pick_selected(&selected, "change")?;
                let planned = self.ask_planned(&name)?;
                let price = self.ask_price(&name)?;
                self.engine
                    .set_fest_cocktail(self.current, &name, price, planned, false)
                    .await?;
                tracing::debug!(cocktail = %name, planned, %price, "selection changed");
                Ok(())
            }
            "d" => {
                let name = self.pick_selected(&selected, "deselect")?;
                self.engine
                    .set_fest_cocktail(self.current, &name, MoneyCents::ZERO, 0, true)
                    .await?;
                tracing::debug!(cocktail = %name, "cocktail deselected");
                Ok(())
            }
            other => Err(invalid_choice(other)),
        }
    }

    fn pick_selected(&mut self, selected: &[String], verb: &str) -> Result<String> {
        if selected.is_empty() {
            return Err(InputError::Invalid("nothing is selected for this fest yet".to_string()).into());
        }
        let index = self.prompt.pick(
            &format!("Which cocktail do you want to {verb}? "),
            selected.len(),
        )?;
        Ok(selected[index].clone())
    }

    fn ask_planned(&mut self, name: &str) -> Result<u32> {
        self.prompt
            .number(&format!("How many {name} are you planning for? "))
    }

    fn ask_price(&mut self, name: &str) -> Result<MoneyCents> {
        self.prompt
            .money(&format!("What's the price for a {name} [€]? "))
    }

    async fn add_to_selection(&mut self, fest: &Fest) -> Result<()> {
        let candidates: Vec<String> = self
            .engine
            .cocktails()
            .await?
            .into_iter()
            .map(|cocktail| cocktail.name)
            .filter(|name| !fest.selections.contains_key(name))
            .collect();
        if candidates.is_empty() {
            return self.prompt.say("Every cocktail is already selected.");
        }

        self.prompt.say("Choose cocktails. Available:")?;
        let mut table = Table::new(["#", "cocktail"]).right(&[0]);
        for (i, name) in candidates.iter().enumerate() {
            table.row([i.to_string(), name.clone()]);
        }
        self.prompt.say(&table)?;

        let picked = self
            .prompt
            .pick_many("Separate choices with ',': ", candidates.len())?;
        for index in picked {
            let name = &candidates[index];
            let planned = self.ask_planned(name)?;
            let price = self.ask_price(name)?;
            self.engine
                .set_fest_cocktail(self.current, name, price, planned, false)
                .await?;
            tracing::debug!(cocktail = %name, planned, %price, "cocktail selected");
        }
        Ok(())
    }

    async fn shopping_list(&mut self) -> Result<()> {
        let list = self.engine.shopping_list_for(self.current).await?;
        if list.is_empty() {
            return self
                .prompt
                .say(format!("Nothing planned for {} yet.", self.current));
        }
        if list.covered_by_stock() {
            return self.prompt.say("Nothing to buy, the stock covers the plan.");
        }

        let mut table = Table::new(["ingredient", "amount [l]", "cost"]).right(&[1, 2]);
        for line in list.lines() {
            table.row([
                line.ingredient.to_string(),
                format!("{:.2}", line.liters),
                format_cents(line.cost_cents),
            ]);
        }
        self.prompt.say(&table)?;
        self.prompt
            .say(format!("Total: {}", format_cents(list.total_cost())))
    }

    async fn past_fests(&mut self) -> Result<()> {
        let dates = self.engine.fest_dates().await?;
        if dates.is_empty() {
            return self.prompt.say("No fests yet.");
        }

        self.prompt.say("Select a fest. Currently available:")?;
        let mut table = Table::new(["#", "date"]).right(&[0]);
        for (i, date) in dates.iter().enumerate() {
            table.row([i.to_string(), date.to_string()]);
        }
        self.prompt.say(&table)?;

        let date = dates[self
            .prompt
            .pick("Which fest do you want to see? ", dates.len())?];
        let fest = self.engine.fest(date).await?;
        self.show_selection(&fest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use migration::{Migrator, MigratorTrait};
    use tracing::level_filters::LevelFilter;

    use crate::settings::Database;

    use super::*;

    async fn engine_with_db() -> Engine {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    fn fest_day() -> NaiveDate {
        engine::parse_fest_date("2024-06-21").unwrap()
    }

    fn settings(guests: u32) -> Settings {
        Settings {
            guests: NonZeroU32::new(guests).unwrap(),
            schema: None,
            current: fest_day(),
            database: Database::Memory,
            log_level: LevelFilter::INFO,
        }
    }

    async fn run(engine: &Engine, guests: u32, input: &str) -> String {
        let mut shell = Shell::new(
            engine,
            &settings(guests),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        );
        shell.run().await.unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    async fn with_recipes(engine: &Engine) {
        engine
            .add_inventory("rum", MoneyCents::new(1500), 1.0)
            .await
            .unwrap();
        engine
            .add_inventory("mint", MoneyCents::new(2000), 0.0)
            .await
            .unwrap();
        engine
            .create_cocktail(
                &NewCocktail::new("Mojito")
                    .ingredient("rum", 0.04)
                    .ingredient("mint", 0.01),
            )
            .await
            .unwrap();
        engine
            .create_cocktail(
                &NewCocktail::new("Gin Tonic")
                    .ingredient("gin", 0.04)
                    .ingredient("tonic", 0.2),
            )
            .await
            .unwrap();
        engine.ensure_fest(fest_day()).await.unwrap();
    }

    #[tokio::test]
    async fn quit_and_end_of_input_leave_cleanly() {
        let engine = engine_with_db().await;
        let out = run(&engine, 10, "q\n").await;
        assert!(out.contains("cocktails [c]"));
        assert!(out.ends_with("Choice: "));

        run(&engine, 10, "").await;
        run(&engine, 10, "c\nc\nMojito\n").await;
    }

    #[tokio::test]
    async fn unknown_choice_is_reported_and_menu_returns() {
        let engine = engine_with_db().await;
        let out = run(&engine, 10, "x\nq\n").await;
        assert!(out.contains("\"x\" is not a valid choice"));
        assert_eq!(out.matches("quit [q]").count(), 2);
    }

    #[tokio::test]
    async fn create_cocktail_from_menu() {
        let engine = engine_with_db().await;
        engine
            .add_inventory("rum", MoneyCents::new(1500), 1.0)
            .await
            .unwrap();

        // "0" picks rum from the listing, mint is new
        let out = run(&engine, 10, "c\nc\nMojito\n0, mint\n0,04\n0.01\nq\n").await;
        assert!(out.contains("Created Mojito."));

        let mojito = engine.cocktail("Mojito").await.unwrap();
        assert_eq!(mojito.serving("rum"), Some(0.04));
        assert_eq!(mojito.serving("mint"), Some(0.01));
        assert_eq!(engine.inventory().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn bad_number_aborts_the_action_only() {
        let engine = engine_with_db().await;
        engine
            .add_inventory("rum", MoneyCents::new(1500), 1.0)
            .await
            .unwrap();

        let out = run(&engine, 10, "i\na\n0\nlots\ni\nv\nq\n").await;
        assert!(out.contains("\"lots\" is not a number"));
        assert!(out.contains("Current inventory value: 15.00€"));
        assert_eq!(engine.inventory().await.unwrap().available("rum"), 1.0);
    }

    #[tokio::test]
    async fn add_selection_and_show_ratio() {
        let engine = engine_with_db().await;
        with_recipes(&engine).await;

        // listing is Gin Tonic, Mojito
        let out = run(
            &engine,
            10,
            "f\na\na\n0,1\n8\n5.50\n8\n6,50\nf\nc\nq\n",
        )
        .await;

        let fest = engine.fest(fest_day()).await.unwrap();
        assert_eq!(fest.selections["Gin Tonic"].planned, 8);
        assert_eq!(fest.selections["Mojito"].price, MoneyCents::new(650));
        assert!(out.contains("You are currently planning for 16 cocktails and 10 guests"));
        assert!(out.contains("1.60 cocktails/guest"));
        assert!(out.contains("it is a bit low"));
        assert!(out.contains("Expected revenue: 96.00€"));
    }

    #[tokio::test]
    async fn change_and_deselect() {
        let engine = engine_with_db().await;
        with_recipes(&engine).await;
        engine
            .set_fest_cocktail(fest_day(), "Mojito", MoneyCents::new(600), 20, false)
            .await
            .unwrap();
        engine
            .set_fest_cocktail(fest_day(), "Gin Tonic", MoneyCents::new(500), 10, false)
            .await
            .unwrap();

        // selection listing is Gin Tonic, Mojito
        run(&engine, 10, "f\na\nc\n1\n30\n6.50\nf\na\nd\n0\nq\n").await;

        let fest = engine.fest(fest_day()).await.unwrap();
        assert_eq!(fest.selections.len(), 1);
        assert_eq!(fest.selections["Mojito"].planned, 30);
        assert_eq!(fest.selections["Mojito"].price, MoneyCents::new(650));
    }

    #[tokio::test]
    async fn shopping_list_from_menu() {
        let engine = engine_with_db().await;
        with_recipes(&engine).await;
        engine
            .set_fest_cocktail(fest_day(), "Mojito", MoneyCents::new(650), 30, false)
            .await
            .unwrap();

        let out = run(&engine, 10, "f\ng\nq\n").await;
        assert!(out.contains("mint"));
        assert!(out.contains("0.30"));
        assert!(out.contains("6.00€"));
        assert!(out.contains("Total: 9.00€"));
        assert!(!out.contains("tonic"));
    }

    #[tokio::test]
    async fn past_fests_are_listed_newest_first() {
        let engine = engine_with_db().await;
        with_recipes(&engine).await;
        let last_year = engine::parse_fest_date("2023-06-23").unwrap();
        engine
            .set_fest_cocktail(last_year, "Mojito", MoneyCents::new(500), 50, false)
            .await
            .unwrap();

        let out = run(&engine, 10, "f\nl\n1\nq\n").await;
        let newest = out.find("2024-06-21").unwrap();
        let oldest = out.find("2023-06-23").unwrap();
        assert!(newest < oldest);
        assert!(out.contains("5.00€"));
    }

    #[tokio::test]
    async fn shopping_list_tells_empty_plan_from_covered_stock() {
        let engine = engine_with_db().await;
        with_recipes(&engine).await;

        let out = run(&engine, 10, "f\ng\nq\n").await;
        assert!(out.contains("Nothing planned for 2024-06-21 yet."));
        assert!(!out.contains("Nothing to buy"));

        engine.set_available("mint", 1.0).await.unwrap();
        engine
            .set_fest_cocktail(fest_day(), "Mojito", MoneyCents::new(650), 10, false)
            .await
            .unwrap();
        let out = run(&engine, 10, "f\ng\nq\n").await;
        assert!(out.contains("Nothing to buy, the stock covers the plan."));
        assert!(!out.contains("Total:"));
    }
}
