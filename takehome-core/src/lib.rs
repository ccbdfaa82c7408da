pub mod calculations;
pub mod models;
pub mod parse;
pub mod source;

pub use models::*;
pub use source::{CityDataSource, CityTable};
