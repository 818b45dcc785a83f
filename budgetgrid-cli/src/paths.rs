//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "budgetgrid";
const APPLICATION: &str = "budgetgrid";

/// Log file currently being written.
const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Data directory for persistent application data.
///
/// - Linux: `$XDG_DATA_HOME/budgetgrid` or `~/.local/share/budgetgrid`
/// - macOS: `~/Library/Application Support/dev.budgetgrid.budgetgrid`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/budgetgrid` or `~/.cache/budgetgrid`
/// - macOS: `~/Library/Caches/dev.budgetgrid.budgetgrid`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default location of the layout settings database.
pub fn settings_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive the previous log under a timestamped name and prune old ones.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{}.log", timestamp)));
    }

    prune_logs(&cache);
}

fn prune_logs(cache_dir: &Path) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    let excess = logs.len().saturating_sub(MAX_OLD_LOGS);
    for entry in logs.iter().take(excess) {
        let _ = fs::remove_file(entry.path());
    }
}
