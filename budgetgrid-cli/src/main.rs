mod args;
mod demo;
mod paths;

use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use budgetgrid_lib::DataTable;
use budgetgrid_lib::error::SettingsError;
use budgetgrid_lib::settings::{KvLayoutRepository, LayoutConfig, LayoutStore, SqliteBackend};
use budgetgrid_lib::table::{TextRenderConfig, render_text};
use clap::Parser;
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

use args::Cli;

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("warning: logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("warning: cannot create log file {}: {}", path.display(), e),
    }
}

fn settings_path(cli: &Cli) -> Result<PathBuf, SettingsError> {
    let path = match &cli.db {
        Some(path) => path.clone(),
        None => paths::settings_db()
            .ok_or_else(|| SettingsError::backend("no home directory for the settings database"))?,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| SettingsError::backend(e.to_string()))?;
    }
    Ok(path)
}

fn report(applied: bool, what: String) {
    if applied {
        info!("{}", what);
    } else {
        warn!("not applied: {}", what);
        eprintln!("warning: not applied: {}", what);
    }
}

async fn run(cli: Cli) -> budgetgrid_lib::Result<()> {
    let path = settings_path(&cli)?;
    info!("using settings database {}", path.display());
    let backend = SqliteBackend::open(&path).await?;
    let repository = KvLayoutRepository::new(backend, format!("user:{}", cli.user));

    let store = Arc::new(
        LayoutStore::load(
            Arc::new(repository),
            demo::schema()?,
            demo::TABLE,
            !cli.readonly,
            LayoutConfig::default(),
        )
        .await,
    );
    let mut table = DataTable::new(store.clone())
        .with_records(demo::records())
        .with_totals(demo::totals());

    if cli.reset {
        report(store.reset(), "reset layout".to_string());
    }
    for key in &cli.hide {
        report(store.set_visibility(key, false), format!("hide '{}'", key));
    }
    for key in &cli.show {
        report(store.set_visibility(key, true), format!("show '{}'", key));
    }
    for (from, to) in &cli.moves {
        let before = store.column_order();
        table.drag_start(*from);
        table.drop_at(*to);
        let moved = from == to || store.column_order() != before;
        report(moved, format!("move column {} to {}", from, to));
    }
    for (key, px) in &cli.resize {
        report(store.update_width(key, *px), format!("resize '{}' to {}px", key, px));
    }
    for id in &cli.select {
        table.select_row(id, true);
    }

    store.flush().await?;

    let config = TextRenderConfig::default().with_px_per_char(cli.px_per_char);
    println!("{}", render_text(&table.view(cli.width), &config));
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
