use crate::domain::model::{CalcBreakdown, CpiResult, PropertyType};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the prior-October CPI value. The production implementation
/// talks to GENESIS; tests substitute canned values.
#[async_trait]
pub trait CpiProvider: Send + Sync {
    /// Resolve the CPI of October of the year before `target_year`.
    async fn resolve(&self, target_year: i32) -> Result<CpiResult>;
}

/// Optional narration of an already-computed result. Failures here must
/// never affect the numeric outcome.
#[async_trait]
pub trait Analyst: Send + Sync {
    async fn narrate(
        &self,
        property_type: PropertyType,
        cpi_index: f64,
        index_factor: f64,
        calc: &CalcBreakdown,
    ) -> Result<String>;
}
