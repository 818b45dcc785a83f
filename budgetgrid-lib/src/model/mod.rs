//! Domain records fed into tables

mod money;
mod record;
mod value;

pub use money::*;
pub use record::*;
pub use value::*;
