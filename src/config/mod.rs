pub mod cli;

use std::env;

use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};

pub use cli::CliConfig;

/// Provider credentials and endpoints, read from the environment once at
/// startup and injected into the services (never read again downstream).
#[derive(Debug, Clone)]
pub struct Settings {
    pub genesis_username: String,
    pub genesis_password: String,
    /// GENESIS table code for CPI; 61111-0002 is the monthly table.
    pub genesis_cpi_code: String,
    pub genesis_language: String,
    pub genesis_base_url: String,

    pub openai_api_key: Option<String>,
    pub openai_model: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            genesis_username: env::var("GENESIS_USERNAME").unwrap_or_default(),
            genesis_password: env::var("GENESIS_PASSWORD").unwrap_or_default(),
            genesis_cpi_code: env::var("GENESIS_CPI_CODE")
                .unwrap_or_else(|_| "61111-0002".to_string()),
            genesis_language: env::var("GENESIS_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            genesis_base_url: env::var("GENESIS_BASE_URL").unwrap_or_else(|_| {
                "https://www-genesis.destatis.de/genesisWS/rest/2020".to_string()
            }),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("genesis_base_url", &self.genesis_base_url)?;
        Ok(())
    }
}

/// Constants of the income-capitalization calculation. The cost rates are
/// the Oct-2001 table values; the index factor scales them to the lookup
/// year.
#[derive(Debug, Clone)]
pub struct CalculationConfig {
    pub cpi_base_oct_2001: f64,

    pub admin_residential_eur_per_unit: f64,
    pub admin_residential_eur_per_parking: f64,
    pub admin_commercial_share: f64,

    pub maintenance_eur_per_sqm: f64,
    pub maintenance_eur_per_parking: f64,

    pub rent_loss_risk_residential: f64,
    pub rent_loss_risk_commercial: f64,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            cpi_base_oct_2001: 84.5,

            admin_residential_eur_per_unit: 250.0,
            admin_residential_eur_per_parking: 30.0,
            admin_commercial_share: 0.03,

            maintenance_eur_per_sqm: 9.5,
            maintenance_eur_per_parking: 75.0,

            rent_loss_risk_residential: 0.02,
            rent_loss_risk_commercial: 0.04,
        }
    }
}
