use std::path::PathBuf;

use clap::Parser;

/// budgetgrid - Budget programs table with per-user layouts
#[derive(Parser, Debug)]
#[command(name = "budgetgrid")]
#[command(version)]
#[command(about = "Render the budget programs table with your saved layout", long_about = None)]
pub struct Cli {
    /// Container width in pixels
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f64,

    /// Whose layout to load and change
    #[arg(short = 'u', long = "user", default_value = "local")]
    pub user: String,

    /// View only; layout changes are refused
    #[arg(long = "readonly")]
    pub readonly: bool,

    /// Hide a column (repeatable)
    #[arg(long = "hide", value_name = "KEY")]
    pub hide: Vec<String>,

    /// Show a hidden column (repeatable)
    #[arg(long = "show", value_name = "KEY")]
    pub show: Vec<String>,

    /// Drag the displayed column at FROM to TO (0-based)
    #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
    pub moves: Vec<(usize, usize)>,

    /// Set a column width in pixels
    #[arg(long = "resize", value_name = "KEY=PX", value_parser = parse_resize)]
    pub resize: Vec<(String, f64)>,

    /// Select rows by id (repeatable)
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Restore the default layout before applying other changes
    #[arg(long = "reset")]
    pub reset: bool,

    /// Settings database (default: platform data directory)
    #[arg(long = "db")]
    pub db: Option<PathBuf>,

    /// Pixels per terminal column
    #[arg(long = "px-per-char", default_value_t = 8.0)]
    pub px_per_char: f64,
}

fn parse_move(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{}'", s))?;
    let from = from.trim().parse().map_err(|e| format!("invalid FROM '{}': {}", from, e))?;
    let to = to.trim().parse().map_err(|e| format!("invalid TO '{}': {}", to, e))?;
    Ok((from, to))
}

fn parse_resize(s: &str) -> Result<(String, f64), String> {
    let (key, px) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PX, got '{}'", s))?;
    let px: f64 = px.trim().parse().map_err(|e| format!("invalid width '{}': {}", px, e))?;
    Ok((key.trim().to_string(), px))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("0:3"), Ok((0, 3)));
        assert!(parse_move("0-3").is_err());
        assert!(parse_move("a:1").is_err());
    }

    #[test]
    fn test_parse_resize() {
        assert_eq!(parse_resize("name=240"), Ok(("name".to_string(), 240.0)));
        assert!(parse_resize("name").is_err());
        assert!(parse_resize("name=wide").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "budgetgrid",
            "--user",
            "ada",
            "--hide",
            "code",
            "--hide",
            "spent",
            "--move",
            "0:2",
            "--resize",
            "name=300",
            "--readonly",
        ])
        .unwrap();

        assert_eq!(cli.user, "ada");
        assert_eq!(cli.hide, vec!["code", "spent"]);
        assert_eq!(cli.moves, vec![(0, 2)]);
        assert_eq!(cli.resize, vec![("name".to_string(), 300.0)]);
        assert!(cli.readonly);
        assert_eq!(cli.width, 1200.0);
    }
}
