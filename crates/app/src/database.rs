use engine::Engine;
use migration::{Migrator, MigratorTrait};

use crate::{
    error::Result,
    settings::{Database, Settings},
};

/// Open (or create) the database, migrate it and make sure the current fest
/// exists.
///
/// A brand new database is seeded with the `schema` script when one is
/// configured. The script is read before anything is created so a missing
/// file leaves no empty database behind.
pub async fn open_engine(settings: &Settings) -> Result<Engine> {
    let fresh = match &settings.database {
        Database::Memory => true,
        Database::Sqlite(path) => !path.exists(),
    };

    let seed = match (&settings.schema, fresh) {
        (Some(path), true) => Some(std::fs::read_to_string(path)?),
        _ => None,
    };

    if fresh {
        tracing::info!(database = %settings.database, "database not found, creating a new one");
    }
    let db = sea_orm::Database::connect(settings.database.url()).await?;
    Migrator::up(&db, None).await?;

    let engine = Engine::builder().database(db).build().await?;
    if let Some(script) = seed {
        tracing::info!(schema = ?settings.schema, "seeding new database");
        engine.run_script(&script).await?;
    }

    engine.ensure_fest(settings.current).await?;
    tracing::info!(database = %settings.database, current = %settings.current, "database ready");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use std::{io::Write, num::NonZeroU32, path::PathBuf};

    use tempfile::NamedTempFile;
    use tracing::level_filters::LevelFilter;

    use crate::error::AppError;

    use super::*;

    fn memory_settings(schema: Option<PathBuf>) -> Settings {
        Settings {
            guests: NonZeroU32::new(10).unwrap(),
            schema,
            current: engine::parse_fest_date("2024-06-21").unwrap(),
            database: Database::Memory,
            log_level: LevelFilter::INFO,
        }
    }

    #[tokio::test]
    async fn new_database_gets_current_fest() {
        let engine = open_engine(&memory_settings(None)).await.unwrap();
        let fest = engine
            .fest(engine::parse_fest_date("2024-06-21").unwrap())
            .await
            .unwrap();
        assert!(fest.selections.is_empty());
    }

    #[tokio::test]
    async fn new_database_is_seeded() {
        let mut seed = NamedTempFile::new().unwrap();
        writeln!(
            seed,
            "INSERT INTO inventory (name, available, price) VALUES ('rum', 2.0, 1500);"
        )
        .unwrap();

        let engine = open_engine(&memory_settings(Some(seed.path().to_path_buf())))
            .await
            .unwrap();

        assert_eq!(engine.inventory().await.unwrap().available("rum"), 2.0);
    }

    #[tokio::test]
    async fn missing_schema_is_fatal() {
        let path = PathBuf::from("definitely/not/here/schema.sql");
        assert!(matches!(
            open_engine(&memory_settings(Some(path))).await,
            Err(AppError::Io(_))
        ));
    }
}
