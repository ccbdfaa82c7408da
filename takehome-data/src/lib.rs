//! File loaders for the calculation engine's lookup tables.
//!
//! - [`CityDataLoader`] reads city parameter files (JSON or CSV) into a
//!   [`CityTable`](takehome_core::CityTable).
//! - [`TaxBracketLoader`] reads a bracket CSV into validated
//!   [`TaxTables`](takehome_core::TaxTables).

mod bracket_loader;
mod city_loader;

pub use bracket_loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
pub use city_loader::{CityDataError, CityDataLoader, CityRow};
