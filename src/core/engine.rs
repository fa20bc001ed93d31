use chrono::Datelike;

use crate::config::CalculationConfig;
use crate::core::calc::CalcService;
use crate::domain::model::{CalcRequest, CalcResponse, CpiResult};
use crate::domain::ports::{Analyst, CpiProvider};
use crate::utils::error::Result;

/// Orchestrates one valuation: resolve the prior-October CPI, run the
/// income-capitalization calculation, then optionally narrate the result.
///
/// The analyst is a side channel; its failure downgrades to a placeholder
/// string and never touches the numbers.
pub struct ValuationEngine<P: CpiProvider, A: Analyst> {
    provider: P,
    analyst: Option<A>,
    calc: CalcService,
    cpi_base_oct_2001: f64,
}

impl<P: CpiProvider, A: Analyst> ValuationEngine<P, A> {
    pub fn new(provider: P, analyst: Option<A>, config: CalculationConfig) -> Self {
        let cpi_base_oct_2001 = config.cpi_base_oct_2001;
        Self {
            provider,
            analyst,
            calc: CalcService::new(config),
            cpi_base_oct_2001,
        }
    }

    pub async fn run(&self, request: &CalcRequest) -> Result<CalcResponse> {
        let purchase_year = request.purchase_date.year();
        tracing::info!("📡 Resolving CPI for purchase year {}", purchase_year);
        let cpi = self.provider.resolve(purchase_year).await?;
        let index_factor = cpi.index_factor(self.cpi_base_oct_2001);

        tracing::info!(
            "🧮 Calculating allocation with CPI {} (index factor {:.4})",
            cpi.value,
            index_factor
        );
        let breakdown = self.calc.calculate(request, index_factor);

        let analysis_text = if request.with_analysis {
            Some(self.narrate(request, &cpi, index_factor, &breakdown).await)
        } else {
            None
        };

        Ok(CalcResponse {
            breakdown,
            cpi_index: cpi.value,
            cpi_year: cpi.source_year,
            cpi_month: CpiResult::MONTH,
            index_factor,
            analysis_text,
        })
    }

    async fn narrate(
        &self,
        request: &CalcRequest,
        cpi: &CpiResult,
        index_factor: f64,
        breakdown: &crate::domain::model::CalcBreakdown,
    ) -> String {
        let Some(analyst) = &self.analyst else {
            tracing::warn!("Analysis requested but no analyst is configured");
            return "AI analysis unavailable: no OPENAI_API_KEY configured".to_string();
        };

        match analyst
            .narrate(request.property_type, cpi.value, index_factor, breakdown)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("AI analysis failed, numeric result unaffected: {}", e);
                format!("AI analysis unavailable: {}", e)
            }
        }
    }
}
