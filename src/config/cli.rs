use chrono::NaiveDate;
use clap::Parser;

use crate::domain::model::{CalcRequest, PropertyType};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

#[derive(Debug, Clone, Parser)]
#[command(name = "kpa-tool")]
#[command(about = "Purchase-price allocation via the income capitalization approach")]
pub struct CliConfig {
    #[arg(long, value_enum)]
    pub property_type: PropertyType,

    /// Purchase date (YYYY-MM-DD); the CPI lookup uses October of the
    /// preceding year.
    #[arg(long)]
    pub purchase_date: NaiveDate,

    /// Agreed purchase price in EUR.
    #[arg(long)]
    pub purchase_price: f64,

    /// Net cold rent per month in EUR.
    #[arg(long)]
    pub monthly_rent: f64,

    /// Living/usable area in m².
    #[arg(long)]
    pub living_area: f64,

    /// Number of residential units (required for residential properties).
    #[arg(long)]
    pub residential_units: Option<u32>,

    /// Number of garage/parking units.
    #[arg(long, default_value = "0")]
    pub parking_units: u32,

    /// Standard land value (Bodenrichtwert) in EUR/m².
    #[arg(long)]
    pub land_value_per_sqm: f64,

    /// Plot area in m².
    #[arg(long)]
    pub plot_area: f64,

    /// Remaining useful life (Restnutzungsdauer) in years.
    #[arg(long)]
    pub useful_life_years: u32,

    /// Property yield (Liegenschaftszins) in % p.a.
    #[arg(long)]
    pub yield_percent: f64,

    /// Ask the AI analyst for a narration of the result.
    #[arg(long)]
    pub with_analysis: bool,

    /// Print the full response as JSON instead of the breakdown table.
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON response to this path.
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn to_request(&self) -> CalcRequest {
        CalcRequest {
            property_type: self.property_type,
            purchase_date: self.purchase_date,
            actual_purchase_price: self.purchase_price,
            monthly_net_cold_rent: self.monthly_rent,
            living_area_sqm: self.living_area,
            num_residential_units: self.residential_units,
            num_parking_units: self.parking_units,
            standard_land_value_per_sqm: self.land_value_per_sqm,
            plot_area_sqm: self.plot_area,
            remaining_useful_life_years: self.useful_life_years,
            property_yield_percent: self.yield_percent,
            with_analysis: self.with_analysis,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.to_request().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(
            std::iter::once("kpa-tool").chain(args.iter().copied()),
        )
    }

    #[test]
    fn test_parses_full_residential_invocation() {
        let config = parse(&[
            "--property-type", "residential",
            "--purchase-date", "2023-06-15",
            "--purchase-price", "450000",
            "--monthly-rent", "1400",
            "--living-area", "120",
            "--residential-units", "2",
            "--parking-units", "1",
            "--land-value-per-sqm", "400",
            "--plot-area", "300",
            "--useful-life-years", "45",
            "--yield-percent", "3.5",
        ]);

        assert!(config.validate().is_ok());
        let request = config.to_request();
        assert_eq!(request.property_type, PropertyType::Residential);
        assert_eq!(request.num_residential_units, Some(2));
        assert_eq!(request.num_parking_units, 1);
        assert!(!request.with_analysis);
    }

    #[test]
    fn test_residential_without_units_fails_validation() {
        let config = parse(&[
            "--property-type", "residential",
            "--purchase-date", "2023-06-15",
            "--purchase-price", "450000",
            "--monthly-rent", "1400",
            "--living-area", "120",
            "--land-value-per-sqm", "400",
            "--plot-area", "300",
            "--useful-life-years", "45",
            "--yield-percent", "3.5",
        ]);
        assert!(config.validate().is_err());
    }
}
