//! Adaptive table layout and aggregation engine
//!
//! Computes column widths for record tables, persists each user's column
//! order, widths, visibility and row heights through a pluggable settings
//! store, and renders cells, selection state and a totals row.

pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod schema;
pub mod selection;
pub mod settings;
pub mod table;
pub mod totals;

pub use error::{Error, Result};
pub use table::{DataTable, GridView};
