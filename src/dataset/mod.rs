//! Static soil dataset.

mod table;

pub use table::{SoilTable, REQUIRED_COLUMNS};
