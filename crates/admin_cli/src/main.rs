use std::{
    error::Error,
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "barfest_admin")]
#[command(about = "Admin utilities for Barfest (fests, recipe import, shopping export)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./fest.sqlite?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Fest(Fest),
    Recipes(Recipes),
    Shopping(Shopping),
}

#[derive(Args, Debug)]
struct Fest {
    #[command(subcommand)]
    command: FestCommand,
}

#[derive(Subcommand, Debug)]
enum FestCommand {
    /// Create a fest (no-op when it already exists).
    Create(FestCreateArgs),
}

#[derive(Args, Debug)]
struct FestCreateArgs {
    /// Fest date, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
}

#[derive(Args, Debug)]
struct Recipes {
    #[command(subcommand)]
    command: RecipesCommand,
}

#[derive(Subcommand, Debug)]
enum RecipesCommand {
    /// Import recipes from a `cocktail,ingredient,amount` CSV file.
    Import(RecipesImportArgs),
}

#[derive(Args, Debug)]
struct RecipesImportArgs {
    #[arg(long)]
    file: PathBuf,
}

#[derive(Args, Debug)]
struct Shopping {
    #[command(subcommand)]
    command: ShoppingCommand,
}

#[derive(Subcommand, Debug)]
enum ShoppingCommand {
    /// Write the shopping list of a fest as CSV.
    Export(ShoppingExportArgs),
}

#[derive(Args, Debug)]
struct ShoppingExportArgs {
    #[arg(long, value_parser = parse_date)]
    fest: NaiveDate,
    /// Output file, stdout when missing.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    engine::parse_fest_date(raw).map_err(|err| err.to_string())
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, BoxError> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn execute(engine: &Engine, command: Command, stdout: &mut impl Write) -> Result<(), BoxError> {
    match command {
        Command::Fest(Fest {
            command: FestCommand::Create(args),
        }) => {
            engine.ensure_fest(args.date).await?;
            writeln!(stdout, "fest ready: {}", args.date)?;
        }
        Command::Recipes(Recipes {
            command: RecipesCommand::Import(args),
        }) => {
            let file = File::open(&args.file)?;
            let recipes = engine::parse_recipes_csv(BufReader::new(file))?;
            let report = engine.import_cocktails(&recipes).await?;
            for name in &report.skipped {
                tracing::warn!(cocktail = %name, "already present, skipped");
            }
            writeln!(
                stdout,
                "imported {} cocktails, skipped {}",
                report.created.len(),
                report.skipped.len()
            )?;
        }
        Command::Shopping(Shopping {
            command: ShoppingCommand::Export(args),
        }) => {
            let list = engine.shopping_list_for(args.fest).await?;
            match args.output {
                Some(path) => {
                    list.write_csv(File::create(&path)?)?;
                    tracing::info!(path = %path.display(), lines = list.required.len(), "shopping list written");
                }
                None => list.write_csv(&mut *stdout)?,
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("barfest_admin=info,engine=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    let mut stdout = io::stdout().lock();
    if let Err(err) = execute(&engine, cli.command, &mut stdout).await {
        tracing::error!("{err}");
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine::{MoneyCents, NewCocktail};
    use tempfile::NamedTempFile;

    use super::*;

    async fn engine_with_db() -> Engine {
        let db = connect_db("sqlite::memory:").await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    fn command(args: &[&str]) -> Command {
        Cli::try_parse_from(["barfest_admin"].iter().chain(args))
            .unwrap()
            .command
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from(["barfest_admin", "fest", "create", "--date", "June"]).is_err());
    }

    #[tokio::test]
    async fn fest_create_is_idempotent() {
        let engine = engine_with_db().await;
        let mut out = Vec::new();
        for _ in 0..2 {
            execute(&engine, command(&["fest", "create", "--date", "2024-06-21"]), &mut out)
                .await
                .unwrap();
        }
        assert_eq!(engine.fest_dates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn import_then_export() {
        let engine = engine_with_db().await;
        let mut recipes = NamedTempFile::new().unwrap();
        write!(
            recipes,
            "cocktail,ingredient,amount\nMojito,rum,0.04\nMojito,mint,0.01\n"
        )
        .unwrap();

        let mut out = Vec::new();
        let file = recipes.path().to_string_lossy().to_string();
        execute(&engine, command(&["recipes", "import", "--file", &file]), &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "imported 1 cocktails, skipped 0\n"
        );

        let date = engine::parse_fest_date("2024-06-21").unwrap();
        engine.set_price("mint", MoneyCents::new(2000)).await.unwrap();
        engine
            .set_fest_cocktail(date, "Mojito", MoneyCents::new(650), 10, false)
            .await
            .unwrap();

        let mut out = Vec::new();
        execute(&engine, command(&["shopping", "export", "--fest", "2024-06-21"]), &mut out)
            .await
            .unwrap();
        let csv = String::from_utf8(out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ingredient,liters,cost_cents"));
        assert!(lines.next().unwrap().starts_with("mint,0.1"));
        assert!(lines.next().unwrap().starts_with("rum,0.4"));
    }

    #[tokio::test]
    async fn export_of_missing_fest_fails() {
        let engine = engine_with_db().await;
        engine
            .create_cocktail(&NewCocktail::new("Mojito").ingredient("rum", 0.04))
            .await
            .unwrap();
        let mut out = Vec::new();
        assert!(
            execute(&engine, command(&["shopping", "export", "--fest", "2024-06-21"]), &mut out)
                .await
                .is_err()
        );
        assert!(out.is_empty());
    }
}
