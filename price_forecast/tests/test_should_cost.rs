use approx::assert_relative_eq;
use price_forecast::should_cost::{
    preset_components, should_cost_model, should_cost_model_with_rng, CostComponent, PricePosition,
    DEFAULT_TARGET_DISCOUNT, MARKUP_COMPONENT_KEY, MARKUP_KEY,
};
use price_forecast::ForecastError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;
use std::collections::BTreeMap;

fn steel_components() -> Vec<CostComponent> {
    vec![
        CostComponent::new("raw_material", 0.6),
        CostComponent::new("labor", 0.2),
        CostComponent::new("overhead", 0.2),
    ]
}

#[test]
fn test_steel_breakdown() {
    let model = should_cost_model("Steel", &steel_components());
    let breakdown = model.breakdown();

    let keys: Vec<&str> = breakdown.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["labor", "markup", "overhead", "raw_material"]);
    assert!(model.total_cost() > 0.0);
    assert_eq!(model.material(), "Steel");
    assert_eq!(model.unit(), "per kg");

    let share = breakdown["raw_material"] / model.total_cost();
    assert!(share > 0.0 && share < 1.0 / (1.0 + model.markup_pct()));
}

#[rstest]
#[case("Steel")]
#[case("PCBs")]
#[case("Cardboard")]
#[case("Lithium")]
fn test_total_is_sum_of_positive_lines(#[case] material: &str) {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let model = should_cost_model_with_rng(material, &preset_components(material), &mut rng);

        let sum: f64 = model.breakdown().values().sum();
        assert_relative_eq!(model.total_cost(), sum, epsilon = 1e-9);
        assert!(model.breakdown().values().all(|&cost| cost > 0.0));
        assert!(model.total_cost() > 0.0);
    }
}

#[test]
fn test_unknown_component_uses_generic_range() {
    let mut rng = StdRng::seed_from_u64(5);
    let model = should_cost_model_with_rng(
        "Widget",
        &[CostComponent::new("tooling", 1.0)],
        &mut rng,
    );

    let tooling = model.cost_of("tooling").unwrap();
    assert!((5.0..30.0).contains(&tooling));
    assert_eq!(model.breakdown().len(), 2);
}

#[test]
fn test_seeded_models_match() {
    let a = should_cost_model_with_rng("Steel", &steel_components(), &mut StdRng::seed_from_u64(9));
    let b = should_cost_model_with_rng("Steel", &steel_components(), &mut StdRng::seed_from_u64(9));
    assert_eq!(a, b);
}

#[test]
fn test_empty_components_leave_zero_markup() {
    let model = should_cost_model_with_rng("Air", &[], &mut StdRng::seed_from_u64(1));
    assert_eq!(model.cost_of(MARKUP_KEY), Some(0.0));
    assert_eq!(model.total_cost(), 0.0);
}

#[test]
fn test_zero_total_has_no_gap_or_change() {
    let model = should_cost_model_with_rng("Air", &[], &mut StdRng::seed_from_u64(1));

    assert!(matches!(
        model.negotiation_assessment(10.0),
        Err(ForecastError::DataError(_))
    ));

    let mut adjustments = BTreeMap::new();
    adjustments.insert("labor".to_string(), 20.0);
    let outcome = model.what_if(&adjustments);
    assert_eq!(outcome.percent_change, 0.0);
    assert_eq!(outcome.adjusted_total, 0.0);
}

#[test]
fn test_component_named_markup_keeps_own_line() {
    let mut rng = StdRng::seed_from_u64(12);
    let model = should_cost_model_with_rng(
        "Widget",
        &[CostComponent::new("markup", 1.0), CostComponent::new("labor", 0.5)],
        &mut rng,
    );

    let keys: Vec<&str> = model.breakdown().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["labor", MARKUP_KEY, MARKUP_COMPONENT_KEY]);

    let subtotal = model.cost_of("labor").unwrap() + model.cost_of(MARKUP_COMPONENT_KEY).unwrap();
    assert_relative_eq!(
        model.cost_of(MARKUP_KEY).unwrap(),
        subtotal * model.markup_pct(),
        epsilon = 1e-9
    );
}

#[test]
fn test_target_price() {
    let model = should_cost_model_with_rng("Steel", &steel_components(), &mut StdRng::seed_from_u64(2));
    assert_relative_eq!(
        model.target_price(DEFAULT_TARGET_DISCOUNT),
        model.total_cost() * 0.85,
        epsilon = 1e-9
    );
}

#[test]
fn test_what_if_adjustments() {
    let model = should_cost_model_with_rng("Steel", &steel_components(), &mut StdRng::seed_from_u64(3));

    let mut adjustments = BTreeMap::new();
    adjustments.insert("raw_material".to_string(), 10.0);
    adjustments.insert("labor".to_string(), -80.0);
    adjustments.insert("markup".to_string(), 25.0);
    adjustments.insert("freight".to_string(), 40.0);

    let outcome = model.what_if(&adjustments);

    assert_relative_eq!(
        outcome.adjusted["raw_material"],
        model.cost_of("raw_material").unwrap() * 1.1,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        outcome.adjusted["labor"],
        model.cost_of("labor").unwrap() * 0.5,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        outcome.adjusted[MARKUP_KEY],
        model.cost_of(MARKUP_KEY).unwrap(),
        epsilon = 1e-9
    );
    assert!(!outcome.adjusted.contains_key("freight"));

    let sum: f64 = outcome.adjusted.values().sum();
    assert_relative_eq!(outcome.adjusted_total, sum, epsilon = 1e-9);
    assert_relative_eq!(
        outcome.difference,
        outcome.adjusted_total - outcome.original_total,
        epsilon = 1e-9
    );
}

#[test]
fn test_what_if_without_adjustments_keeps_total() {
    let model = should_cost_model_with_rng("Copper", &preset_components("Copper"), &mut StdRng::seed_from_u64(6));
    let outcome = model.what_if(&BTreeMap::new());

    assert_relative_eq!(outcome.adjusted_total, model.total_cost(), epsilon = 1e-9);
    assert_relative_eq!(outcome.percent_change, 0.0, epsilon = 1e-9);

    let mut adjustments = BTreeMap::new();
    adjustments.insert("energy".to_string(), 60.0);
    let outcome = model.what_if(&adjustments);
    assert_relative_eq!(
        outcome.adjusted["energy"],
        model.cost_of("energy").unwrap() * 1.5,
        epsilon = 1e-9
    );
}

#[rstest]
#[case(1.20, PricePosition::SignificantlyAbove, "high")]
#[case(1.10, PricePosition::ModeratelyAbove, "moderate")]
#[case(1.00, PricePosition::Aligned, "some")]
#[case(0.90, PricePosition::Below, "limited")]
fn test_negotiation_assessment(
    #[case] ratio: f64,
    #[case] position: PricePosition,
    #[case] opportunity: &str,
) {
    let model = should_cost_model_with_rng("Steel", &steel_components(), &mut StdRng::seed_from_u64(4));
    let assessment = model.negotiation_assessment(model.total_cost() * ratio).unwrap();

    assert_relative_eq!(assessment.gap_pct, (ratio - 1.0) * 100.0, epsilon = 1e-6);
    assert_eq!(assessment.position, position);
    assert_eq!(assessment.opportunity(), opportunity);
    assert_eq!(assessment.tactics().len(), 4);
}

#[rstest]
#[case(15.0, PricePosition::ModeratelyAbove)]
#[case(15.000001, PricePosition::SignificantlyAbove)]
#[case(5.0, PricePosition::Aligned)]
#[case(5.000001, PricePosition::ModeratelyAbove)]
#[case(-5.0, PricePosition::Aligned)]
#[case(-5.000001, PricePosition::Below)]
#[case(0.0, PricePosition::Aligned)]
fn test_position_thresholds(#[case] gap_pct: f64, #[case] expected: PricePosition) {
    assert_eq!(PricePosition::from_gap(gap_pct), expected);
}
