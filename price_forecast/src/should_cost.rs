//! Should-cost modeling
//!
//! A should-cost model splits a material's price into weighted cost
//! components priced from illustrative per-kg ranges, then adds a supplier
//! markup. Every call draws fresh costs unless the caller passes a seeded RNG.

use crate::error::{ForecastError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Breakdown key for the markup line
pub const MARKUP_KEY: &str = "markup";

/// Breakdown key for a caller component labelled `"markup"`
pub const MARKUP_COMPONENT_KEY: &str = "markup_component";

/// Unit every should-cost figure is quoted in
pub const COST_UNIT: &str = "per kg";

/// Default discount from should-cost to a negotiation target
pub const DEFAULT_TARGET_DISCOUNT: f64 = 0.15;

/// Largest what-if adjustment applied to a single component, in percent
pub const MAX_ADJUSTMENT_PCT: f64 = 50.0;

const MARKUP_RANGE: (f64, f64) = (0.10, 0.30);

/// Cost component categories with known cost ranges
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Labor,
    Overhead,
    RawMaterial,
    Packaging,
    Logistics,
    Energy,
    Additives,
    /// Any other label; priced from the generic range
    Other(String),
}

impl ComponentKind {
    /// Categories with a dedicated cost range, in draw order
    pub const KNOWN: [ComponentKind; 7] = [
        ComponentKind::Labor,
        ComponentKind::Overhead,
        ComponentKind::RawMaterial,
        ComponentKind::Packaging,
        ComponentKind::Logistics,
        ComponentKind::Energy,
        ComponentKind::Additives,
    ];

    /// Parse a component label such as `"raw_material"` or `"Raw Material"`
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "labor" => Self::Labor,
            "overhead" => Self::Overhead,
            "raw_material" => Self::RawMaterial,
            "packaging" => Self::Packaging,
            "logistics" => Self::Logistics,
            "energy" => Self::Energy,
            "additives" => Self::Additives,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    /// Breakdown label
    pub fn name(&self) -> &str {
        match self {
            Self::Labor => "labor",
            Self::Overhead => "overhead",
            Self::RawMaterial => "raw_material",
            Self::Packaging => "packaging",
            Self::Logistics => "logistics",
            Self::Energy => "energy",
            Self::Additives => "additives",
            Self::Other(name) => name,
        }
    }

    /// Range of the base cost draw in $/kg
    pub fn base_cost_range(&self) -> (f64, f64) {
        match self {
            Self::Labor => (20.0, 50.0),
            Self::Overhead => (10.0, 30.0),
            Self::RawMaterial => (5.0, 30.0),
            Self::Packaging => (1.0, 10.0),
            Self::Logistics => (2.0, 15.0),
            Self::Energy => (2.0, 10.0),
            Self::Additives => (8.0, 25.0),
            Self::Other(_) => (5.0, 30.0),
        }
    }
}

impl From<&str> for ComponentKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cost component and its share of the total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComponent {
    pub kind: ComponentKind,
    /// Fraction of the total, conventionally summing to 1.0 across components
    pub weight: f64,
}

impl CostComponent {
    /// Create a component from a label and weight
    pub fn new(name: &str, weight: f64) -> Self {
        Self {
            kind: ComponentKind::from_name(name),
            weight,
        }
    }
}

/// Material families with representative component mixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialFamily {
    Metals,
    Electronics,
    Packaging,
    General,
}

impl MaterialFamily {
    /// Family a material name belongs to
    pub fn for_material(material: &str) -> Self {
        match material.trim() {
            "Steel" | "Aluminum" | "Copper" | "Zinc" => Self::Metals,
            "Semiconductors" | "PCBs" | "Displays" => Self::Electronics,
            "Cardboard" | "PET" | "HDPE" | "Plastic Film" | "Paper" => Self::Packaging,
            _ => Self::General,
        }
    }

    /// Representative component weights
    pub fn components(&self) -> Vec<CostComponent> {
        let weights: &[(&str, f64)] = match self {
            Self::Metals => &[
                ("raw_material", 0.6),
                ("energy", 0.15),
                ("labor", 0.1),
                ("overhead", 0.05),
                ("logistics", 0.05),
            ],
            Self::Electronics => &[
                ("raw_material", 0.4),
                ("labor", 0.2),
                ("overhead", 0.15),
                ("energy", 0.05),
                ("additives", 0.15),
            ],
            Self::Packaging => &[
                ("raw_material", 0.5),
                ("labor", 0.15),
                ("energy", 0.1),
                ("overhead", 0.1),
                ("packaging", 0.05),
            ],
            Self::General => &[
                ("raw_material", 0.45),
                ("labor", 0.25),
                ("overhead", 0.15),
                ("energy", 0.1),
                ("logistics", 0.05),
            ],
        };

        weights
            .iter()
            .map(|&(name, weight)| CostComponent::new(name, weight))
            .collect()
    }
}

/// Component mix for a material, chosen by its family
pub fn preset_components(material: &str) -> Vec<CostComponent> {
    MaterialFamily::for_material(material).components()
}

/// Base costs drawn once per model for every known category
#[derive(Debug, Clone)]
struct BaseCostTable {
    known: BTreeMap<ComponentKind, f64>,
}

impl BaseCostTable {
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let known = ComponentKind::KNOWN
            .iter()
            .map(|kind| {
                let (low, high) = kind.base_cost_range();
                (kind.clone(), rng.gen_range(low..high))
            })
            .collect();
        Self { known }
    }

    fn cost_for<R: Rng + ?Sized>(&self, kind: &ComponentKind, rng: &mut R) -> f64 {
        match self.known.get(kind) {
            Some(&cost) => cost,
            None => {
                let (low, high) = kind.base_cost_range();
                rng.gen_range(low..high)
            }
        }
    }
}

/// Illustrative cost breakdown of a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShouldCostModel {
    material: String,
    breakdown: BTreeMap<String, f64>,
    total_cost: f64,
    markup_pct: f64,
    unit: String,
}

/// Build a should-cost model using the thread-local RNG
pub fn should_cost_model(material: &str, components: &[CostComponent]) -> ShouldCostModel {
    should_cost_model_with_rng(material, components, &mut rand::thread_rng())
}

/// Build a should-cost model drawing all randomness from `rng`
pub fn should_cost_model_with_rng<R: Rng + ?Sized>(
    material: &str,
    components: &[CostComponent],
    rng: &mut R,
) -> ShouldCostModel {
    let table = BaseCostTable::draw(rng);

    let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
    for component in components {
        let cost = table.cost_for(&component.kind, rng) * component.weight;
        let label = match component.kind.name() {
            MARKUP_KEY => MARKUP_COMPONENT_KEY,
            name => name,
        };
        *breakdown.entry(label.to_string()).or_insert(0.0) += cost;
    }

    let subtotal: f64 = breakdown.values().sum();
    let markup_pct = rng.gen_range(MARKUP_RANGE.0..MARKUP_RANGE.1);
    *breakdown.entry(MARKUP_KEY.to_string()).or_insert(0.0) += subtotal * markup_pct;

    let total_cost = breakdown.values().sum();
    debug!(material, subtotal, markup_pct, total_cost, "built should-cost model");

    ShouldCostModel {
        material: material.to_string(),
        breakdown,
        total_cost,
        markup_pct,
        unit: COST_UNIT.to_string(),
    }
}

impl ShouldCostModel {
    /// Material the model describes
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Cost per component label, including `"markup"`; a component labelled `"markup"` is listed as `"markup_component"`
    pub fn breakdown(&self) -> &BTreeMap<String, f64> {
        &self.breakdown
    }

    /// Cost of one breakdown line
    pub fn cost_of(&self, name: &str) -> Option<f64> {
        self.breakdown.get(name).copied()
    }

    /// Sum of every breakdown line
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Markup as a fraction of the component subtotal
    pub fn markup_pct(&self) -> f64 {
        self.markup_pct
    }

    /// Display unit
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Breakdown lines sorted by cost, largest first
    pub fn ranked_lines(&self) -> Vec<(&str, f64)> {
        let mut lines: Vec<(&str, f64)> = self
            .breakdown
            .iter()
            .map(|(name, &cost)| (name.as_str(), cost))
            .collect();
        lines.sort_by(|a, b| b.1.total_cmp(&a.1));
        lines
    }

    /// Negotiation target `discount` below the should-cost total
    pub fn target_price(&self, discount: f64) -> f64 {
        self.total_cost * (1.0 - discount)
    }

    /// Re-price the model with per-component percentage adjustments.
    ///
    /// Adjustments are clamped to ±50 %; the markup line and labels that are
    /// not in the breakdown are left alone.
    pub fn what_if(&self, adjustments: &BTreeMap<String, f64>) -> WhatIfOutcome {
        let adjusted: BTreeMap<String, f64> = self
            .breakdown
            .iter()
            .map(|(name, &cost)| {
                let pct = if name == MARKUP_KEY {
                    0.0
                } else {
                    adjustments
                        .get(name)
                        .copied()
                        .unwrap_or(0.0)
                        .clamp(-MAX_ADJUSTMENT_PCT, MAX_ADJUSTMENT_PCT)
                };
                (name.clone(), cost * (1.0 + pct / 100.0))
            })
            .collect();

        let adjusted_total: f64 = adjusted.values().sum();
        let difference = adjusted_total - self.total_cost;

        WhatIfOutcome {
            adjusted,
            original_total: self.total_cost,
            adjusted_total,
            difference,
            percent_change: if self.total_cost > 0.0 {
                difference / self.total_cost * 100.0
            } else {
                0.0
            },
        }
    }

    /// Compare the current market price against this model.
    ///
    /// Fails when the model has no positive should-cost to compare against.
    pub fn negotiation_assessment(&self, market_price: f64) -> Result<NegotiationAssessment> {
        if self.total_cost <= 0.0 {
            return Err(ForecastError::DataError(format!(
                "Should-cost for {} is {}; no gap can be measured",
                self.material, self.total_cost
            )));
        }

        let gap_pct = (market_price - self.total_cost) / self.total_cost * 100.0;
        Ok(NegotiationAssessment {
            market_price,
            should_cost: self.total_cost,
            gap_pct,
            position: PricePosition::from_gap(gap_pct),
        })
    }
}

/// Result of a what-if re-pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOutcome {
    pub adjusted: BTreeMap<String, f64>,
    pub original_total: f64,
    pub adjusted_total: f64,
    pub difference: f64,
    pub percent_change: f64,
}

/// Where the market price sits relative to should-cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricePosition {
    SignificantlyAbove,
    ModeratelyAbove,
    Aligned,
    Below,
}

impl PricePosition {
    /// Classify a market-over-should-cost gap in percent
    pub fn from_gap(gap_pct: f64) -> Self {
        if gap_pct > 15.0 {
            Self::SignificantlyAbove
        } else if gap_pct > 5.0 {
            Self::ModeratelyAbove
        } else if gap_pct < -5.0 {
            Self::Below
        } else {
            Self::Aligned
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SignificantlyAbove => "significantly above",
            Self::ModeratelyAbove => "moderately above",
            Self::Aligned => "reasonably aligned with",
            Self::Below => "below",
        }
    }

    /// Size of the negotiation opportunity
    pub fn opportunity(&self) -> &'static str {
        match self {
            Self::SignificantlyAbove => "high",
            Self::ModeratelyAbove => "moderate",
            Self::Aligned => "some",
            Self::Below => "limited",
        }
    }

    pub fn tactics(&self) -> &'static [&'static str] {
        match self {
            Self::SignificantlyAbove => &[
                "Request detailed cost breakdown from suppliers",
                "Highlight component cost insights during negotiations",
                "Consider alternative sourcing options",
                "Request tiered pricing based on volume commitments",
            ],
            Self::ModeratelyAbove => &[
                "Conduct competitive benchmarking",
                "Negotiate targeted cost reductions on key components",
                "Explore specification optimization opportunities",
                "Consider longer-term agreements with cost reduction targets",
            ],
            Self::Aligned => &[
                "Focus on non-price value improvements",
                "Negotiate performance incentives",
                "Explore order frequency and inventory management optimization",
                "Consider joint product development initiatives",
            ],
            Self::Below => &[
                "Focus on supply assurance and quality improvements",
                "Consider longer-term agreements to lock in favorable pricing",
                "Invest in supplier relationship development",
                "Explore joint cost reduction initiatives for mutual benefit",
            ],
        }
    }
}

/// Market price compared with a should-cost model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationAssessment {
    pub market_price: f64,
    pub should_cost: f64,
    /// `(market - should_cost) / should_cost`, in percent
    pub gap_pct: f64,
    pub position: PricePosition,
}

impl NegotiationAssessment {
    pub fn opportunity(&self) -> &'static str {
        self.position.opportunity()
    }

    pub fn tactics(&self) -> &'static [&'static str] {
        self.position.tactics()
    }
}
