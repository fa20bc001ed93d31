pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{CalculationConfig, CliConfig, Settings};
pub use crate::core::analyst::OpenAiAnalyst;
pub use crate::core::calc::CalcService;
pub use crate::core::cpi::CpiResolver;
pub use crate::core::engine::ValuationEngine;
pub use crate::domain::model::{CalcBreakdown, CalcRequest, CalcResponse, CpiResult, PropertyType};
pub use crate::domain::ports::{Analyst, CpiProvider};
pub use crate::utils::error::{KpaError, Result};
