use clap::Parser;
use kpa_tool::utils::{logger, validation::Validate};
use kpa_tool::{
    CalcResponse, CalculationConfig, CliConfig, CpiResolver, KpaError, OpenAiAnalyst, Settings,
    ValuationEngine,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting kpa-tool");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        report_and_exit(e);
    }

    let settings = Settings::from_env();
    if let Err(e) = settings.validate() {
        report_and_exit(e);
    }

    let resolver = match CpiResolver::from_settings(&settings) {
        Ok(resolver) => resolver,
        Err(e) => report_and_exit(e),
    };

    let analyst = match OpenAiAnalyst::from_settings(&settings) {
        Ok(analyst) => analyst,
        Err(e) => report_and_exit(e),
    };

    let engine = ValuationEngine::new(resolver, analyst, CalculationConfig::default());
    let request = config.to_request();

    match engine.run(&request).await {
        Ok(response) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_breakdown(&response);
            }

            if let Some(path) = &config.output {
                std::fs::write(path, serde_json::to_string_pretty(&response)?)?;
                tracing::info!("📁 Report saved to: {}", path);
                println!("📁 Report saved to: {}", path);
            }

            tracing::info!("✅ Purchase-price allocation completed");
        }
        Err(e) => report_and_exit(e),
    }

    Ok(())
}

fn report_and_exit(e: KpaError) -> ! {
    tracing::error!("❌ kpa-tool failed: {}", e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

fn print_breakdown(response: &CalcResponse) {
    let calc = &response.breakdown;

    println!("Purchase-price allocation (income capitalization approach)");
    println!("----------------------------------------------------------");
    println!(
        "CPI October {}: {} (index factor vs. Oct 2001: {:.4})",
        response.cpi_year, response.cpi_index, response.index_factor
    );
    println!();
    println!("Land value:                    {:>12.0} EUR", calc.land_value);
    println!("Annual gross income:           {:>12.0} EUR", calc.annual_gross_income);
    println!("  Administration costs:        {:>12.0} EUR", calc.admin_costs);
    println!("  Maintenance costs:           {:>12.0} EUR", calc.maintenance_costs);
    println!("  Rent-loss risk:              {:>12.0} EUR", calc.rent_loss_risk);
    println!("Total management costs:        {:>12.0} EUR", calc.total_management_costs);
    println!("Annual net income:             {:>12.0} EUR", calc.annual_net_income);
    println!("Land interest:                 {:>12.0} EUR", calc.land_interest);
    println!("Building net income:           {:>12.0} EUR", calc.building_net_income);
    println!();
    println!("Barwertfaktor:                 {:>12.4}", calc.multiplier_barwertfaktor);
    println!("Theoretical building value:    {:>12.0} EUR", calc.theoretical_building_value);
    println!("Theoretical total value:       {:>12.0} EUR", calc.theoretical_total_value);
    println!();
    println!(
        "Allocation: building {:.1} % / land {:.1} %",
        calc.building_share_percent, calc.land_share_percent
    );
    println!("Building share of price:       {:>12.0} EUR", calc.building_value_from_purchase_price);
    println!("Land share of price:           {:>12.0} EUR", calc.land_value_from_purchase_price);

    if let Some(text) = &response.analysis_text {
        println!();
        println!("AI Analyst Insight");
        println!("------------------");
        println!("{}", text);
    }
}
