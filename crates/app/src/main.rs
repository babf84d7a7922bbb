use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

mod database;
mod error;
mod prompt;
mod settings;
mod shell;
mod table;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "barfest={level},engine={level},migration={level}",
            level = settings.log_level
        )))
        .with_writer(io::stderr)
        .init();

    let engine = match database::open_engine(&settings).await {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("failed to open database {}: {err}", settings.database);
            return Err(err.into());
        }
    };

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut shell = shell::Shell::new(&engine, &settings, io::stdin().lock(), stdout.lock())
        .with_color(color);
    shell.run().await?;

    tracing::info!("bye");
    Ok(())
}
