pub mod coverage;
pub mod dates;
pub mod enums;
pub mod error;
pub mod need;
pub mod stock;

pub use coverage::CoverageRecord;
pub use enums::CoverageState;
pub use error::{ModelError, Result};
pub use need::{Material, Need};
pub use stock::{ReceptionLine, RepatriationLine, StockLine};
