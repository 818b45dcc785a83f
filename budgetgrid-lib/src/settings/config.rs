//! Layout configuration

use std::time::Duration;

use crate::layout::ChromeWidths;

/// Tunables for a table's layout store and gestures.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use budgetgrid_lib::settings::LayoutConfig;
///
/// let config = LayoutConfig::default()
///     .with_debounce(Duration::from_millis(500))
///     .with_min_row_height(30.0);
/// assert_eq!(config.default_row_height, 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Quiet period before a layout change is written back.
    ///
    /// Default: 300ms
    pub debounce: Duration,

    /// Height of rows without a custom height.
    ///
    /// Default: 42px
    pub default_row_height: f64,

    /// Lower bound for resized rows.
    ///
    /// Default: 24px
    pub min_row_height: f64,

    /// Fixed chrome reserved before columns are sized.
    pub chrome: ChromeWidths,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            default_row_height: 42.0,
            min_row_height: 24.0,
            chrome: ChromeWidths::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_default_row_height(mut self, height: f64) -> Self {
        self.default_row_height = height;
        self
    }

    pub fn with_min_row_height(mut self, height: f64) -> Self {
        self.min_row_height = height;
        self
    }

    pub fn with_chrome(mut self, chrome: ChromeWidths) -> Self {
        self.chrome = chrome;
        self
    }
}
