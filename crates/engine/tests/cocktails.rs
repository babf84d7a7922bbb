use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, MoneyCents, NewCocktail, parse_fest_date};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

fn mojito() -> NewCocktail {
    NewCocktail::new("Mojito")
        .ingredient("rum", 0.04)
        .ingredient("mint", 0.01)
}

#[tokio::test]
async fn create_cocktail_adds_missing_inventory_lines() {
    let (engine, _db) = engine_with_db().await;
    engine
        .add_inventory("rum", MoneyCents::new(1500), 2.0)
        .await
        .unwrap();

    engine.create_cocktail(&mojito()).await.unwrap();

    let inventory = engine.inventory().await.unwrap();
    assert_eq!(inventory.len(), 2);
    // existing line untouched, new line empty
    assert_eq!(inventory.available("rum"), 2.0);
    assert_eq!(inventory.price("rum"), MoneyCents::new(1500));
    assert_eq!(inventory.available("mint"), 0.0);
    assert_eq!(inventory.price("mint"), MoneyCents::ZERO);

    let cocktail = engine.cocktail("Mojito").await.unwrap();
    assert_eq!(cocktail.serving("rum"), Some(0.04));
    assert_eq!(cocktail.serving("mint"), Some(0.01));
}

#[tokio::test]
async fn duplicate_cocktail_name_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    engine.create_cocktail(&mojito()).await.unwrap();

    let again = NewCocktail::new(" Mojito ").ingredient("lime", 0.02);
    let err = engine.create_cocktail(&again).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Mojito".to_string()));

    assert_eq!(count(&db, "cocktails").await, 1);
    assert_eq!(count(&db, "recipe_lines").await, 2);
    // no inventory line for "lime"
    assert_eq!(count(&db, "inventory").await, 2);
}

#[tokio::test]
async fn invalid_recipe_is_rejected_before_writing() {
    let (engine, db) = engine_with_db().await;
    let bad = NewCocktail::new("Zombie")
        .ingredient("rum", 0.04)
        .ingredient("absinthe", -0.01);

    let err = engine.create_cocktail(&bad).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(count(&db, "cocktails").await, 0);
    assert_eq!(count(&db, "inventory").await, 0);
}

#[tokio::test]
async fn cocktails_are_listed_by_name() {
    let (engine, _db) = engine_with_db().await;
    for name in ["Zombie", "Caipirinha", "Mojito"] {
        engine
            .create_cocktail(&NewCocktail::new(name).ingredient("rum", 0.04))
            .await
            .unwrap();
    }

    let names: Vec<String> = engine
        .cocktails()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Caipirinha", "Mojito", "Zombie"]);
}

#[tokio::test]
async fn unknown_cocktail_is_key_not_found() {
    let (engine, _db) = engine_with_db().await;
    assert_eq!(
        engine.cocktail("Zombie").await.unwrap_err(),
        EngineError::KeyNotFound("Zombie".to_string())
    );
}

#[tokio::test]
async fn rename_keeps_fest_selection() {
    let (engine, _db) = engine_with_db().await;
    let date = parse_fest_date("2024-06-21").unwrap();
    engine.create_cocktail(&mojito()).await.unwrap();
    engine
        .set_fest_cocktail(date, "Mojito", MoneyCents::new(650), 30, false)
        .await
        .unwrap();

    engine.rename_cocktail("Mojito", "Mojito Royal").await.unwrap();

    let fest = engine.fest(date).await.unwrap();
    assert_eq!(fest.selections["Mojito Royal"].planned, 30);
    assert!(!fest.selections.contains_key("Mojito"));
}

#[tokio::test]
async fn rename_to_existing_name_fails() {
    let (engine, _db) = engine_with_db().await;
    engine.create_cocktail(&mojito()).await.unwrap();
    engine
        .create_cocktail(&NewCocktail::new("Daiquiri").ingredient("rum", 0.05))
        .await
        .unwrap();

    let err = engine.rename_cocktail("Daiquiri", "Mojito").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Mojito".to_string()));
}

#[tokio::test]
async fn set_recipe_amount_updates_one_line() {
    let (engine, _db) = engine_with_db().await;
    engine.create_cocktail(&mojito()).await.unwrap();

    engine.set_recipe_amount("Mojito", "rum", 0.05).await.unwrap();

    let cocktail = engine.cocktail("Mojito").await.unwrap();
    assert_eq!(cocktail.serving("rum"), Some(0.05));
    assert_eq!(cocktail.serving("mint"), Some(0.01));

    assert!(matches!(
        engine.set_recipe_amount("Mojito", "gin", 0.05).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.set_recipe_amount("Mojito", "rum", 0.0).await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn import_skips_existing_cocktails() {
    let (engine, _db) = engine_with_db().await;
    engine.create_cocktail(&mojito()).await.unwrap();

    let csv = "\
cocktail,ingredient,amount
Mojito,rum,0.09
Gin Tonic,gin,0.04
Gin Tonic,tonic,0.2
";
    let recipes = engine::parse_recipes_csv(csv.as_bytes()).unwrap();
    let report = engine.import_cocktails(&recipes).await.unwrap();

    assert_eq!(report.created, vec!["Gin Tonic".to_string()]);
    assert_eq!(report.skipped, vec!["Mojito".to_string()]);
    // existing recipe untouched
    assert_eq!(
        engine.cocktail("Mojito").await.unwrap().serving("rum"),
        Some(0.04)
    );
    assert_eq!(
        engine.cocktail("Gin Tonic").await.unwrap().ingredients.len(),
        2
    );
}
