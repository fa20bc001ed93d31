use crate::config::CalculationConfig;
use crate::domain::model::{CalcBreakdown, CalcRequest, PropertyType};

/// Standard Income Capitalization Approach (Ertragswertverfahren).
///
/// Pure arithmetic over one request; the CPI index factor scales the
/// Oct-2001 cost-table rates to the lookup year. Intermediate amounts are
/// rounded to whole euros (rates to one decimal) the way the official
/// worksheets do.
pub struct CalcService {
    config: CalculationConfig,
}

fn round_eur(value: f64) -> f64 {
    value.round()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl CalcService {
    pub fn new(config: CalculationConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, request: &CalcRequest, index_factor: f64) -> CalcBreakdown {
        let land_value = round_eur(request.standard_land_value_per_sqm * request.plot_area_sqm);
        let annual_gross_income = round_eur(request.monthly_net_cold_rent * 12.0);

        let admin_costs = self.admin_costs(
            request.property_type,
            index_factor,
            annual_gross_income,
            request.num_residential_units.unwrap_or(0),
            request.num_parking_units,
        );
        let maintenance_costs = self.maintenance_costs(
            index_factor,
            request.living_area_sqm,
            request.num_parking_units,
        );
        let rent_loss_risk = self.rent_loss_risk(request.property_type, annual_gross_income);

        let total_management_costs = round_eur(admin_costs + maintenance_costs + rent_loss_risk);
        let annual_net_income = round_eur(annual_gross_income - total_management_costs);

        let yield_decimal = request.property_yield_percent / 100.0;
        let land_interest = round_eur(land_value * yield_decimal);
        let building_net_income = round_eur(annual_net_income - land_interest);

        // Present-value multiplier (Barwertfaktor) over the remaining
        // useful life; degenerates to n when the yield is zero.
        let n = request.remaining_useful_life_years;
        let multiplier = if yield_decimal > 0.0 {
            (1.0 - (1.0 + yield_decimal).powi(-(n as i32))) / yield_decimal
        } else {
            n as f64
        };

        let theoretical_building_value = round_eur(building_net_income * multiplier);
        let theoretical_total_value = round_eur(theoretical_building_value + land_value);

        let (
            building_share_percent,
            land_share_percent,
            building_value_from_purchase_price,
            land_value_from_purchase_price,
        ) = if theoretical_total_value <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let building_share = theoretical_building_value / theoretical_total_value * 100.0;
            let land_share = land_value / theoretical_total_value * 100.0;
            (
                building_share,
                land_share,
                round_eur(request.actual_purchase_price * building_share / 100.0),
                round_eur(request.actual_purchase_price * land_share / 100.0),
            )
        };

        CalcBreakdown {
            land_value,
            annual_gross_income,
            admin_costs,
            maintenance_costs,
            rent_loss_risk,
            total_management_costs,
            annual_net_income,
            land_interest,
            building_net_income,
            multiplier_barwertfaktor: multiplier,
            theoretical_building_value,
            theoretical_total_value,
            building_share_percent,
            land_share_percent,
            building_value_from_purchase_price,
            land_value_from_purchase_price,
        }
    }

    fn admin_costs(
        &self,
        property_type: PropertyType,
        index_factor: f64,
        annual_gross_income: f64,
        num_residential_units: u32,
        num_parking_units: u32,
    ) -> f64 {
        match property_type {
            PropertyType::Residential => {
                let total = (self.config.admin_residential_eur_per_unit
                    * num_residential_units as f64
                    + self.config.admin_residential_eur_per_parking * num_parking_units as f64)
                    * index_factor;
                round_eur(total)
            }
            PropertyType::Commercial => {
                round_eur(self.config.admin_commercial_share * annual_gross_income)
            }
        }
    }

    fn maintenance_costs(
        &self,
        index_factor: f64,
        living_area_sqm: f64,
        num_parking_units: u32,
    ) -> f64 {
        let per_sqm = round_one_decimal(self.config.maintenance_eur_per_sqm * index_factor);
        let area_part = per_sqm * living_area_sqm;
        let parking_per_unit = round_eur(self.config.maintenance_eur_per_parking * index_factor);
        let parking_part = parking_per_unit * num_parking_units as f64;
        round_eur(area_part + parking_part)
    }

    fn rent_loss_risk(&self, property_type: PropertyType, annual_gross_income: f64) -> f64 {
        let factor = match property_type {
            PropertyType::Residential => self.config.rent_loss_risk_residential,
            PropertyType::Commercial => self.config.rent_loss_risk_commercial,
        };
        round_eur(annual_gross_income * factor)
    }
}
