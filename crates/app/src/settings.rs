//! Settings for the shell, read from `config.toml` (or `--config`), then
//! `BARFEST_*` environment variables, then command line flags.
//!
//! ```toml
//! guests = 120
//! current = "2024-06-21"
//! database = "fest.sqlite"
//! schema = "schema.sql"
//! log_level = "info"
//! ```
use std::{fmt, num::NonZeroU32, path::PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_DATABASE: &str = "fest.sqlite";
const ENV_PREFIX: &str = "BARFEST";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Memory,
    Sqlite(PathBuf),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path.display()),
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Database::Memory => f.write_str("memory"),
            Database::Sqlite(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Expected guests of the current fest.
    pub guests: NonZeroU32,
    /// SQL script run once on a freshly created database.
    pub schema: Option<PathBuf>,
    /// Fest the shell plans for.
    pub current: NaiveDate,
    pub database: Database,
    pub log_level: LevelFilter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    #[serde(alias = "awaited")]
    guests: Option<i64>,
    schema: Option<String>,
    current: Option<String>,
    database: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Parser)]
#[command(name = "barfest", about = "Plan recipes, stock and shopping for a cocktail fest")]
struct Args {
    /// Config file path (TOML).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Override the database (`memory` or a SQLite file).
    #[arg(long)]
    database: Option<String>,
    /// Override the current fest date (YYYY-MM-DD).
    #[arg(long)]
    current: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let args = Args::parse();
        let config = Self::sources(&args)?;
        Self::resolve(config, args)
    }

    /// The config file must exist; `BARFEST_*` variables are layered on top.
    fn sources(args: &Args) -> Result<config::Config> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&args.config).required(true))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(config)
    }

    fn resolve(config: config::Config, args: Args) -> Result<Self> {
        let mut raw: RawSettings = config.try_deserialize()?;
        if let Some(database) = args.database {
            raw.database = Some(database);
        }
        if let Some(current) = args.current {
            raw.current = Some(current);
        }
        raw.validate()
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings> {
        let guests = self
            .guests
            .ok_or_else(|| AppError::Settings("`guests` is missing".to_string()))?;
        let guests = u32::try_from(guests)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                AppError::Settings(format!("`guests` must be greater than 0, got {guests}"))
            })?;

        let current = match self.current {
            Some(raw) => engine::parse_fest_date(&raw)
                .map_err(|err| AppError::Settings(format!("`current`: {err}")))?,
            None => chrono::Local::now().date_naive(),
        };

        let database = match self.database.as_deref().map(str::trim) {
            None => Database::Sqlite(PathBuf::from(DEFAULT_DATABASE)),
            Some("") => return Err(AppError::Settings("`database` is empty".to_string())),
            Some("memory") => Database::Memory,
            Some(path) => Database::Sqlite(PathBuf::from(path)),
        };

        let schema = self
            .schema
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let log_level = match self.log_level {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| AppError::Settings(format!("`log_level`: unknown level \"{raw}\"")))?,
            None => LevelFilter::INFO,
        };

        Ok(Settings {
            guests,
            schema,
            current,
            database,
            log_level,
        })
    }
}
