pub mod analyst;
pub mod calc;
pub mod cpi;
pub mod engine;

pub use crate::domain::model::{CalcBreakdown, CalcRequest, CalcResponse, CpiResult, PropertyType};
pub use crate::domain::ports::{Analyst, CpiProvider};
pub use crate::utils::error::Result;
