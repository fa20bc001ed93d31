use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::error::{KpaError, Result};
use crate::utils::validation::{
    validate_min_count, validate_positive, validate_required_field, Validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::Residential => write!(f, "residential"),
            PropertyType::Commercial => write!(f, "commercial"),
        }
    }
}

/// Inputs for one purchase-price allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcRequest {
    pub property_type: PropertyType,
    pub purchase_date: NaiveDate,
    pub actual_purchase_price: f64,

    /// Net cold rent per month in EUR.
    pub monthly_net_cold_rent: f64,
    /// Living/usable area in m².
    pub living_area_sqm: f64,

    /// Number of residential units; required for residential properties.
    pub num_residential_units: Option<u32>,
    /// Number of garage/parking units.
    #[serde(default)]
    pub num_parking_units: u32,

    /// Bodenrichtwert in EUR/m².
    pub standard_land_value_per_sqm: f64,
    pub plot_area_sqm: f64,

    /// Restnutzungsdauer in years.
    pub remaining_useful_life_years: u32,
    /// Liegenschaftszins in % p.a.
    pub property_yield_percent: f64,

    /// If true, attach the AI analyst narration to the response.
    #[serde(default)]
    pub with_analysis: bool,
}

impl Validate for CalcRequest {
    fn validate(&self) -> Result<()> {
        validate_positive("actual_purchase_price", self.actual_purchase_price)?;
        validate_positive("monthly_net_cold_rent", self.monthly_net_cold_rent)?;
        validate_positive("living_area_sqm", self.living_area_sqm)?;
        validate_positive("standard_land_value_per_sqm", self.standard_land_value_per_sqm)?;
        validate_positive("plot_area_sqm", self.plot_area_sqm)?;
        validate_positive("property_yield_percent", self.property_yield_percent)?;
        validate_min_count(
            "remaining_useful_life_years",
            self.remaining_useful_life_years,
            1,
        )?;

        if self.property_type == PropertyType::Residential {
            let units = validate_required_field("num_residential_units", &self.num_residential_units)?;
            validate_min_count("num_residential_units", *units, 1)?;
        }

        // Any plausible calendar year; the CPI lookup subtracts one.
        if self.purchase_date.year() <= 1 {
            return Err(KpaError::InvalidConfigValueError {
                field: "purchase_date".to_string(),
                value: self.purchase_date.to_string(),
                reason: "Purchase year must be greater than 1".to_string(),
            });
        }

        Ok(())
    }
}

/// One CPI observation (always October of the lookup year) plus where it
/// came from. Immutable once returned by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpiResult {
    pub value: f64,
    pub source_year: i32,
}

impl CpiResult {
    pub const MONTH: u32 = 10;

    /// Index factor relative to the October 2001 base used by the
    /// cost tables.
    pub fn index_factor(&self, base_oct_2001: f64) -> f64 {
        self.value / base_oct_2001
    }
}

/// Full breakdown of the income-capitalization calculation, in EUR unless
/// noted. Field names follow the German valuation terms where there is no
/// crisp English equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcBreakdown {
    pub land_value: f64,

    pub annual_gross_income: f64,
    pub admin_costs: f64,
    pub maintenance_costs: f64,
    pub rent_loss_risk: f64,
    pub total_management_costs: f64,
    pub annual_net_income: f64,

    pub land_interest: f64,
    pub building_net_income: f64,

    pub multiplier_barwertfaktor: f64,
    pub theoretical_building_value: f64,
    pub theoretical_total_value: f64,

    pub building_share_percent: f64,
    pub land_share_percent: f64,

    pub building_value_from_purchase_price: f64,
    pub land_value_from_purchase_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcResponse {
    #[serde(flatten)]
    pub breakdown: CalcBreakdown,

    pub cpi_index: f64,
    pub cpi_year: i32,
    pub cpi_month: u32,
    pub index_factor: f64,

    pub analysis_text: Option<String>,
}
