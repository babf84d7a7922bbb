use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, MoneyCents, NewCocktail, parse_fest_date};
use migration::MigratorTrait;

const EPS: f64 = 1e-9;

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

fn fest_day() -> NaiveDate {
    parse_fest_date("2024-06-21").unwrap()
}

#[tokio::test]
async fn mojito_scenario_from_database() {
    let (engine, _db) = engine_with_db().await;
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
        .set_fest_cocktail(fest_day(), "Mojito", MoneyCents::new(650), 30, false)
        .await
        .unwrap();

    let list = engine.shopping_list_for(fest_day()).await.unwrap();

    assert_eq!(list.required.len(), 2);
    assert!((list.required["rum"] - 0.2).abs() < EPS);
    assert!((list.required["mint"] - 0.3).abs() < EPS);
    for (ingredient, need) in &list.required {
        let price = if ingredient == "rum" { 1500.0 } else { 2000.0 };
        assert_eq!(list.cost[ingredient], need * price);
    }
}

#[tokio::test]
async fn shopping_list_fails_without_fest() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_cocktail(&NewCocktail::new("Mojito").ingredient("rum", 0.04))
        .await
        .unwrap();

    assert!(matches!(
        engine.shopping_list_for(fest_day()).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn empty_fest_needs_nothing() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_cocktail(&NewCocktail::new("Mojito").ingredient("rum", 0.04))
        .await
        .unwrap();
    engine.ensure_fest(fest_day()).await.unwrap();

    let list = engine.shopping_list_for(fest_day()).await.unwrap();
    assert!(list.is_empty());
    assert_eq!(list.total_cost(), 0.0);
}

#[tokio::test]
async fn run_script_seeds_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planning.db");
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    engine
        .run_script(
            "INSERT INTO inventory (name, available, price) VALUES ('rum', 3.0, 1500);
             INSERT INTO inventory (name, available, price) VALUES ('cola', 6.0, 150);
             INSERT INTO fests (date) VALUES ('2024-06-21');",
        )
        .await
        .unwrap();

    let inventory = engine.inventory().await.unwrap();
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory.available("cola"), 6.0);
    assert_eq!(engine.fest_dates().await.unwrap(), vec![fest_day()]);
}

#[tokio::test]
async fn failing_script_leaves_nothing_behind() {
    let (engine, _db) = engine_with_db().await;
    let result = engine
        .run_script(
            "INSERT INTO inventory (name, available, price) VALUES ('rum', 3.0, 1500);
             INSERT INTO no_such_table VALUES (1);",
        )
        .await;
    assert!(matches!(result, Err(EngineError::Database(_))));
    assert!(engine.inventory().await.unwrap().is_empty());
}
