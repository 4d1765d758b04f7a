use chrono::NaiveDate;
use price_forecast::analytics::{uncertainty_bands, PriceSummary};
use price_forecast::drivers::input_cost_drivers;
use price_forecast::history::PriceHistoryGenerator;
use price_forecast::metrics::evaluate_holdout;
use price_forecast::models::{advanced_forecast, simple_forecast, LinearTrendForecaster};
use price_forecast::should_cost::{preset_components, should_cost_model, DEFAULT_TARGET_DISCOUNT};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Procurement Price Report: Steel");
    println!("===============================\n");

    let end = NaiveDate::from_ymd_opt(2025, 6, 30).ok_or("invalid end date")?;
    let generator = PriceHistoryGenerator::default();
    let history = generator.generate("Raw Materials", "Steel", end)?;
    println!(
        "History: {} months from {} to {}\n",
        history.len(),
        history.first().map(|p| p.date.to_string()).unwrap_or_default(),
        history.last().map(|p| p.date.to_string()).unwrap_or_default()
    );

    // Compare both forecasters over the next six months
    let simple = simple_forecast(&history, 6)?;
    let advanced = advanced_forecast(&history, 6)?;
    println!("{:<12} {:>12} {:>12}", "Month", simple.model(), "Forest");
    for (s, a) in simple.forecast().iter().zip(advanced.forecast()) {
        println!("{:<12} {:>12.2} {:>12.2}", s.date, s.price, a.price);
    }

    let summary = PriceSummary::new(&history, &advanced)?;
    println!(
        "\nPrices show a {} with {}; the outlook is {}.",
        summary.historical_trend().trend_label(),
        summary.volatility().label(),
        summary.forecast_outlook().outlook_label()
    );
    for recommendation in summary.recommendations() {
        println!("  - {}", recommendation);
    }

    println!("\nUncertainty bands:");
    for band in uncertainty_bands(&advanced) {
        println!("  {}: {:.2} .. {:.2}", band.date, band.lower, band.upper);
    }

    let accuracy = evaluate_holdout(&LinearTrendForecaster::new(), &history, 3)?;
    println!("\nLinear trend on a 3-month holdout:\n{}", accuracy);

    // Should-cost breakdown and negotiation position
    let model = should_cost_model("Steel", &preset_components("Steel"));
    println!("Should-cost ({}):", model.unit());
    for (line, cost) in model.ranked_lines() {
        println!("  {:<14} {:>8.2}", line, cost);
    }
    println!("  {:<14} {:>8.2}", "total", model.total_cost());
    println!(
        "  target price   {:>8.2}",
        model.target_price(DEFAULT_TARGET_DISCOUNT)
    );

    let market = history.last().map(|p| p.price).ok_or("empty history")?;
    let assessment = model.negotiation_assessment(market)?;
    println!(
        "\nMarket price {:.2} is {} should-cost ({:+.1}%), {} opportunity:",
        market,
        assessment.position.label(),
        assessment.gap_pct,
        assessment.opportunity()
    );
    for tactic in assessment.tactics() {
        println!("  - {}", tactic);
    }

    let ore = generator.generate("Raw Materials", "Iron Ore", end)?;
    let energy = generator.generate("Energy", "Natural Gas", end)?;
    println!("\nInput cost drivers:");
    for driver in input_cost_drivers(
        &history,
        &[("Iron Ore".to_string(), ore), ("Natural Gas".to_string(), energy)],
    ) {
        println!(
            "  {:<12} correlation {:>6} strength {:?}",
            driver.input,
            driver
                .correlation
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "n/a".to_string()),
            driver.strength
        );
    }

    Ok(())
}
