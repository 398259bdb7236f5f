//! # Reinforcement Selection
//!
//! Turns required steel areas into bars and stirrups that can be placed.
//!
//! - [`choose_bars`]: every standard diameter in range gets the smallest bar
//!   count covering the requirement; layouts wider than the section are
//!   dropped and the smallest over-provision wins (ties go to the smaller
//!   diameter). When nothing fits, the largest diameter is returned with a
//!   warning instead of an error.
//! - [`choose_stirrups`]: the raw spacing is rounded down to the standard
//!   ladder and capped by the code's maximum spacing. More legs are used
//!   before the ladder runs out.
//! - [`plan_reinforcement`]: bottom bars, constructive top bars and stirrups
//!   for one element, with a one-line summary and an estimated steel weight.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::reinforcement::{choose_bars, choose_stirrups, BarConstraints};
//!
//! let bars = choose_bars(5.0, 300.0, &BarConstraints::default());
//! assert_eq!(bars.designation, "3HA16");
//! assert!(bars.warning.is_none());
//!
//! let stirrups = choose_stirrups(3.0, 300.0, 500.0, 8, 337.0);
//! assert_eq!(stirrups.spacing_mm, 300.0);
//! assert!(stirrups.provided_area_cm2_m >= 3.0);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::materials::rebar::{bar_area_mm2, diameters_in_range, linear_mass_kg_m};
use crate::units::{cm2, mm2};

/// Side cover assumed when checking that a bar layer fits (mm per side)
pub const EDGE_COVER_MM: f64 = 30.0;

/// Standard stirrup spacings (mm), descending
pub const STIRRUP_SPACING_LADDER_MM: [f64; 9] = [300.0, 250.0, 200.0, 175.0, 150.0, 125.0, 100.0, 75.0, 50.0];

/// Leg counts tried in order when spacing gets too tight
const STIRRUP_LEGS: [u32; 3] = [2, 4, 6];

/// Used when the diameter range matches no standard bar
const FALLBACK_BAR: (u32, f64) = (25, 490.9);

/// Constructive top steel: a share of the bottom steel, never below a floor
const TOP_BAR_RATIO: f64 = 0.2;
const TOP_BAR_MIN_CM2: f64 = 1.0;

// ============================================================================
// Longitudinal bars
// ============================================================================

/// Limits on a longitudinal bar layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarConstraints {
    pub min_diameter_mm: u32,
    pub max_diameter_mm: u32,
    /// Clear gap between adjacent bars (mm)
    pub min_clear_spacing_mm: f64,
}

impl Default for BarConstraints {
    fn default() -> Self {
        BarConstraints {
            min_diameter_mm: 8,
            max_diameter_mm: 25,
            min_clear_spacing_mm: 50.0,
        }
    }
}

impl BarConstraints {
    pub fn with_diameters(min_diameter_mm: u32, max_diameter_mm: u32) -> Self {
        BarConstraints {
            min_diameter_mm,
            max_diameter_mm,
            ..Self::default()
        }
    }

    /// Width taken by `count` bars, their gaps and both edge covers
    pub fn layout_width_mm(&self, count: u32, diameter_mm: u32) -> f64 {
        let n = count as f64;
        n * diameter_mm as f64 + (n - 1.0).max(0.0) * self.min_clear_spacing_mm + 2.0 * EDGE_COVER_MM
    }
}

/// A bar layer: `count` bars of one diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSelection {
    pub diameter_mm: u32,
    pub count: u32,
    /// e.g. "3HA16"
    pub designation: String,
    pub required_area_cm2: f64,
    pub provided_area_mm2: f64,
    pub provided_area_cm2: f64,
    /// Over-provision relative to the requirement (%)
    pub surplus_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl BarSelection {
    fn new(required_cm2: f64, diameter_mm: u32, count: u32, bar_area: f64) -> Self {
        let required = mm2(required_cm2);
        let provided = count as f64 * bar_area;
        let surplus_pct = if required > 0.0 {
            (provided - required) / required * 100.0
        } else {
            0.0
        };
        BarSelection {
            diameter_mm,
            count,
            designation: format!("{}HA{}", count, diameter_mm),
            required_area_cm2: required_cm2,
            provided_area_mm2: provided,
            provided_area_cm2: cm2(provided),
            surplus_pct,
            warning: None,
        }
    }
}

fn bars_needed(required_mm2: f64, bar_area: f64) -> u32 {
    ((required_mm2 / bar_area).ceil() as u32).max(1)
}

/// Pick the bar layer with the smallest over-provision that fits `width_mm`.
///
/// Never fails: without a fitting layout the largest permitted diameter is
/// returned with a "tight layout" warning.
pub fn choose_bars(required_cm2: f64, width_mm: f64, constraints: &BarConstraints) -> BarSelection {
    let required = mm2(required_cm2.max(0.0));
    let mut best: Option<BarSelection> = None;

    for (diameter, area) in diameters_in_range(constraints.min_diameter_mm, constraints.max_diameter_mm) {
        let count = bars_needed(required, area);
        if constraints.layout_width_mm(count, diameter) > width_mm {
            continue;
        }
        let candidate = BarSelection::new(required_cm2, diameter, count, area);
        // Strict comparison keeps the smaller diameter on a tie
        let better = best
            .as_ref()
            .map_or(true, |b| candidate.provided_area_mm2 < b.provided_area_mm2);
        if better {
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| {
        let (diameter, area) = diameters_in_range(constraints.min_diameter_mm, constraints.max_diameter_mm)
            .last()
            .unwrap_or(FALLBACK_BAR);
        let count = bars_needed(required, area);
        let mut selection = BarSelection::new(required_cm2, diameter, count, area);
        log::warn!(
            "no bar layout for {:.2} cm² fits in {} mm, falling back to {}",
            required_cm2,
            width_mm,
            selection.designation
        );
        selection.warning = Some(format!(
            "Tight layout: {} needs {:.0} mm but only {:.0} mm is available. Check bar spacing.",
            selection.designation,
            constraints.layout_width_mm(count, diameter),
            width_mm
        ));
        selection
    })
}

// ============================================================================
// Stirrups
// ============================================================================

/// Transverse reinforcement: closed stirrups at a constant spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupSelection {
    pub diameter_mm: u32,
    /// Vertical legs per section (2 per closed stirrup)
    pub legs: u32,
    pub spacing_mm: f64,
    /// e.g. "HA8@150"
    pub designation: String,
    pub required_area_cm2_m: f64,
    pub provided_area_cm2_m: f64,
    /// Steel length of one set of stirrups (mm)
    pub set_length_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Nominal area of a stirrup bar, computed for non-standard diameters
fn stirrup_bar_area(diameter_mm: u32) -> f64 {
    bar_area_mm2(diameter_mm).unwrap_or_else(|| PI * (diameter_mm as f64).powi(2) / 4.0)
}

/// Largest ladder spacing not above `limit_mm`
fn ladder_spacing(limit_mm: f64) -> Option<f64> {
    STIRRUP_SPACING_LADDER_MM.iter().copied().find(|s| *s <= limit_mm)
}

/// Choose stirrup legs and spacing for a required area per metre.
///
/// The spacing is rounded down so the provided area never falls below the
/// requirement, then capped by `max_spacing_mm`. Only when six legs at 50 mm
/// still fall short is an under-provided layout returned, with a warning.
pub fn choose_stirrups(
    required_cm2_m: f64,
    width_mm: f64,
    depth_mm: f64,
    diameter_mm: u32,
    max_spacing_mm: f64,
) -> StirrupSelection {
    let bar_area = stirrup_bar_area(diameter_mm);
    let required = mm2(required_cm2_m.max(0.0));
    let cap = if max_spacing_mm > 0.0 { max_spacing_mm } else { f64::INFINITY };
    let loop_length = 2.0 * ((width_mm - 2.0 * EDGE_COVER_MM).max(0.0) + (depth_mm - 2.0 * EDGE_COVER_MM).max(0.0));

    let build = |legs: u32, spacing: f64, warning: Option<String>| {
        let provided = legs as f64 * bar_area / spacing * 1000.0;
        let designation = if legs == 2 {
            format!("HA{}@{}", diameter_mm, spacing)
        } else {
            format!("HA{}@{} ({} legs)", diameter_mm, spacing, legs)
        };
        StirrupSelection {
            diameter_mm,
            legs,
            spacing_mm: spacing,
            designation,
            required_area_cm2_m: required_cm2_m,
            provided_area_cm2_m: cm2(provided),
            set_length_mm: loop_length * legs as f64 / 2.0,
            warning,
        }
    };

    for legs in STIRRUP_LEGS {
        let raw = if required > 0.0 {
            legs as f64 * bar_area / required * 1000.0
        } else {
            f64::INFINITY
        };
        if let Some(spacing) = ladder_spacing(raw.min(cap)) {
            if legs > 2 {
                log::debug!("stirrups need {} legs for {:.2} cm²/m", legs, required_cm2_m);
            }
            return build(legs, spacing, None);
        }
        // A cap below the ladder cannot be fixed with more legs
        if cap < raw {
            break;
        }
    }

    let legs = STIRRUP_LEGS[STIRRUP_LEGS.len() - 1];
    let spacing = STIRRUP_SPACING_LADDER_MM[STIRRUP_SPACING_LADDER_MM.len() - 1];
    let mut selection = build(legs, spacing, None);
    let under_provided = selection.provided_area_cm2_m < required_cm2_m;
    let message = if under_provided {
        format!(
            "Stirrups under-provided: {:.2} cm²/m required, {:.2} cm²/m at the tightest layout. Use a larger diameter.",
            required_cm2_m, selection.provided_area_cm2_m
        )
    } else {
        format!(
            "Maximum spacing {:.0} mm is below the {} mm ladder minimum",
            max_spacing_mm, spacing
        )
    };
    log::warn!("{}", message);
    selection.warning = Some(message);
    selection
}

// ============================================================================
// Element plan
// ============================================================================

/// Areas and dimensions to reinforce one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementInput {
    /// Bottom (tension) steel from flexure (cm²), 0 when none is needed
    pub flexure_area_cm2: f64,
    /// Transverse steel (cm²/m), 0 when no stirrups are wanted
    pub stirrup_area_cm2_m: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Smallest bottom bar allowed for the product (mm)
    pub min_bottom_diameter_mm: u32,
    pub stirrup_diameter_mm: u32,
    pub max_stirrup_spacing_mm: f64,
}

/// Complete reinforcement of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementPlan {
    pub bottom: Option<BarSelection>,
    /// Constructive top bars
    pub top: BarSelection,
    pub stirrups: Option<StirrupSelection>,
    /// "Bottom: 3HA16 | Top: 2HA10 | Stirrups: HA8@200"
    pub summary: String,
    /// Estimated steel per metre of element (kg/m)
    pub steel_weight_kg_m: f64,
}

impl ReinforcementPlan {
    /// Warnings raised by any of the selections
    pub fn warnings(&self) -> Vec<&str> {
        self.bottom
            .iter()
            .filter_map(|b| b.warning.as_deref())
            .chain(self.top.warning.as_deref())
            .chain(self.stirrups.iter().filter_map(|s| s.warning.as_deref()))
            .collect()
    }
}

/// Choose bottom bars, top bars and stirrups for an element.
pub fn plan_reinforcement(input: &ReinforcementInput) -> ReinforcementPlan {
    let bottom = (input.flexure_area_cm2 > 0.0).then(|| {
        let constraints = BarConstraints {
            min_diameter_mm: input.min_bottom_diameter_mm,
            ..BarConstraints::default()
        };
        choose_bars(input.flexure_area_cm2, input.width_mm, &constraints)
    });

    let top_area = (TOP_BAR_RATIO * input.flexure_area_cm2).max(TOP_BAR_MIN_CM2);
    let top = choose_bars(top_area, input.width_mm, &BarConstraints::with_diameters(8, 16));

    let stirrups = (input.stirrup_area_cm2_m > 0.0).then(|| {
        choose_stirrups(
            input.stirrup_area_cm2_m,
            input.width_mm,
            input.height_mm,
            input.stirrup_diameter_mm,
            input.max_stirrup_spacing_mm,
        )
    });

    let designation = |d: Option<&str>| d.unwrap_or("-").to_string();
    let summary = format!(
        "Bottom: {} | Top: {} | Stirrups: {}",
        designation(bottom.as_ref().map(|b| b.designation.as_str())),
        top.designation,
        designation(stirrups.as_ref().map(|s| s.designation.as_str())),
    );

    let longitudinal_mm2 = bottom.as_ref().map_or(0.0, |b| b.provided_area_mm2) + top.provided_area_mm2;
    let transverse_mm2 = stirrups.as_ref().map_or(0.0, |s| {
        // Steel volume per metre smeared over the length
        stirrup_bar_area(s.diameter_mm) * s.set_length_mm / s.spacing_mm
    });

    ReinforcementPlan {
        bottom,
        top,
        stirrups,
        summary,
        steel_weight_kg_m: linear_mass_kg_m(longitudinal_mm2 + transverse_mm2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_least_surplus_wins() {
        // 4HA14 = 615.6, 3HA16 = 603.3, 2HA20 = 628.4; smaller layouts too wide
        let bars = choose_bars(5.0, 300.0, &BarConstraints::default());
        assert_eq!(bars.diameter_mm, 16);
        assert_eq!(bars.count, 3);
        assert_relative_eq!(bars.provided_area_cm2, 6.033, max_relative = 1e-9);
        assert_relative_eq!(bars.surplus_pct, 20.66, max_relative = 1e-9);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let constraints = BarConstraints::with_diameters(10, 25);
        let first = choose_bars(7.3, 400.0, &constraints);
        for _ in 0..10 {
            assert_eq!(choose_bars(7.3, 400.0, &constraints), first);
        }
    }

    #[test]
    fn test_never_under_provides_bars() {
        for required in [0.5, 1.0, 2.26, 4.02, 6.5, 9.8, 14.0] {
            let bars = choose_bars(required, 400.0, &BarConstraints::default());
            assert!(bars.provided_area_cm2 >= required - 1e-9, "{}", required);
        }
    }

    #[test]
    fn test_tight_layout_falls_back() {
        let bars = choose_bars(20.0, 200.0, &BarConstraints::default());
        assert_eq!(bars.diameter_mm, 25);
        assert_eq!(bars.count, 5);
        assert!(bars.warning.as_deref().unwrap().contains("Tight layout"));
    }

    #[test]
    fn test_layout_width() {
        let constraints = BarConstraints::default();
        // 3 x 16 + 2 x 50 + 2 x 30
        assert_eq!(constraints.layout_width_mm(3, 16), 208.0);
        assert_eq!(constraints.layout_width_mm(1, 16), 76.0);
    }

    #[test]
    fn test_stirrup_spacing_rounds_down() {
        // 2 x 50.3 / 300 mm²/m -> 335 mm raw
        let stirrups = choose_stirrups(3.0, 300.0, 500.0, 8, 1000.0);
        assert_eq!(stirrups.legs, 2);
        assert_eq!(stirrups.spacing_mm, 300.0);
        assert_eq!(stirrups.designation, "HA8@300");

        let tighter = choose_stirrups(6.0, 300.0, 500.0, 8, 1000.0);
        assert_eq!(tighter.spacing_mm, 150.0);
    }

    #[test]
    fn test_stirrup_spacing_capped() {
        let stirrups = choose_stirrups(3.0, 300.0, 500.0, 8, 230.0);
        assert_eq!(stirrups.spacing_mm, 200.0);
    }

    #[test]
    fn test_more_legs_before_warning() {
        // 2 legs would need 40 mm
        let stirrups = choose_stirrups(25.0, 400.0, 600.0, 8, 1000.0);
        assert_eq!(stirrups.legs, 4);
        assert_eq!(stirrups.spacing_mm, 75.0);
        assert!(stirrups.warning.is_none());
    }

    #[test]
    fn test_stirrups_report_required_area() {
        let stirrups = choose_stirrups(3.0, 300.0, 500.0, 8, 1000.0);
        assert_eq!(stirrups.required_area_cm2_m, 3.0);

        // 6 legs of HA8 at 50 mm give about 60 cm²/m
        let short = choose_stirrups(80.0, 400.0, 600.0, 8, 1000.0);
        assert_eq!(short.required_area_cm2_m, 80.0);
        assert!(short.provided_area_cm2_m < short.required_area_cm2_m);
        assert!(short.warning.as_deref().unwrap().contains("under-provided"));
    }

    #[test]
    fn test_stirrups_never_under_provide() {
        for required in [0.0, 0.8, 2.5, 4.0, 7.7, 12.0, 19.5, 30.0] {
            for max_spacing in [600.0, 337.0, 225.0, 90.0] {
                let s = choose_stirrups(required, 300.0, 500.0, 8, max_spacing);
                assert!(s.provided_area_cm2_m >= required, "{} @ {}", required, max_spacing);
                assert!(s.spacing_mm <= max_spacing);
            }
        }
    }

    #[test]
    fn test_plan_summary_and_top_bars() {
        let plan = plan_reinforcement(&ReinforcementInput {
            flexure_area_cm2: 5.0,
            stirrup_area_cm2_m: 3.0,
            width_mm: 300.0,
            height_mm: 500.0,
            min_bottom_diameter_mm: 10,
            stirrup_diameter_mm: 8,
            max_stirrup_spacing_mm: 337.0,
        });
        // Top: max(0.2 x 5, 1) = 1 cm² -> 2HA8 (1.006 cm²)
        assert_eq!(plan.top.designation, "2HA8");
        assert_eq!(plan.summary, "Bottom: 3HA16 | Top: 2HA8 | Stirrups: HA8@300");
        assert!(plan.steel_weight_kg_m > linear_mass_kg_m(603.3 + 100.6));
        assert!(plan.warnings().is_empty());
    }

    #[test]
    fn test_plan_without_flexure_steel() {
        let plan = plan_reinforcement(&ReinforcementInput {
            flexure_area_cm2: 0.0,
            stirrup_area_cm2_m: 0.0,
            width_mm: 1200.0,
            height_mm: 200.0,
            min_bottom_diameter_mm: 8,
            stirrup_diameter_mm: 8,
            max_stirrup_spacing_mm: 300.0,
        });
        assert!(plan.bottom.is_none());
        assert!(plan.stirrups.is_none());
        assert!(plan.summary.starts_with("Bottom: - |"));
    }
}
