//! Load combinations for a simply-supported element
//!
//! Only permanent (G) and live (Q) actions exist in this engine. The ultimate
//! combination carries each code's γG/γQ; the characteristic service load is
//! always G + Q and lives on [`DesignCode::combine_service`].

use serde::{Deserialize, Serialize};

use super::LoadSet;
use crate::codes::DesignCode;

/// A named combination `γG·G + γQ·Q`.
///
/// # Example
/// ```
/// use concrete_core::codes::Eurocode2;
/// use concrete_core::loads::{ultimate_combination, LoadSet};
///
/// let combo = ultimate_combination(&Eurocode2::default());
/// assert_eq!(combo.equation, "1.35G + 1.5Q");
/// assert!((combo.apply(&LoadSet::per_area(2.0, 2.0)) - 5.7).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "EC2-ULS", "ACI318-SLS")
    pub name: String,

    /// Human-readable equation for display
    pub equation: String,

    pub permanent_factor: f64,
    pub live_factor: f64,
}

impl LoadCombination {
    pub fn new(name: impl Into<String>, permanent_factor: f64, live_factor: f64) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation(permanent_factor, live_factor),
            permanent_factor,
            live_factor,
        }
    }

    /// Factored load in the set's own unit
    pub fn apply(&self, loads: &LoadSet) -> f64 {
        self.permanent_factor * loads.permanent + self.live_factor * loads.live
    }
}

fn equation(permanent_factor: f64, live_factor: f64) -> String {
    let term = |factor: f64, symbol: &str| {
        if factor == 1.0 {
            symbol.to_string()
        } else {
            format!("{}{}", factor, symbol)
        }
    };
    format!("{} + {}", term(permanent_factor, "G"), term(live_factor, "Q"))
}

/// Ultimate limit state combination of a code
pub fn ultimate_combination(code: &dyn DesignCode) -> LoadCombination {
    LoadCombination::new(format!("{}-ULS", code.id()), code.gamma_g(), code.gamma_q())
}
