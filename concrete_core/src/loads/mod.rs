//! Loads and their combination under a design code
//!
//! # Overview
//!
//! - [`LoadSet`] - permanent `g` and live `q`, per area or per length
//! - [`CombinedLoads`] - ultimate and service line loads for one element
//! - [`LoadCombination`] - the factors each code applies
//!
//! Element solvers work on line loads (kN/m). Surface loads (kN/m²) are
//! multiplied by the element width before combination.
//!
//! # Example
//!
//! ```
//! use concrete_core::codes::Eurocode2;
//! use concrete_core::loads::{CombinedLoads, LoadSet};
//!
//! // 1.2 m wide slab, g = 5 kN/m², q = 2.5 kN/m²
//! let loads = LoadSet::per_area(5.0, 2.5);
//! let combined = CombinedLoads::from_code(&Eurocode2::default(), &loads, 1.2).unwrap();
//!
//! assert!((combined.ultimate_kn_m - 12.6).abs() < 1e-9);
//! assert!((combined.service_kn_m - 9.0).abs() < 1e-9);
//! ```

pub mod combinations;

pub use combinations::{ultimate_combination, LoadCombination};

use serde::{Deserialize, Serialize};

use crate::codes::DesignCode;
use crate::errors::{ensure_non_negative, ensure_positive, CalcResult};

/// How the values of a [`LoadSet`] are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBasis {
    /// kN/m², spread over the element width
    #[default]
    PerArea,
    /// kN/m along the span
    PerLength,
}

/// Characteristic actions on an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSet {
    /// Permanent load g (self-weight, finishes, partitions)
    pub permanent: f64,
    /// Live (imposed) load q
    pub live: f64,
    #[serde(default)]
    pub basis: LoadBasis,
}

impl LoadSet {
    /// Surface loads in kN/m²
    pub fn per_area(permanent: f64, live: f64) -> Self {
        LoadSet {
            permanent,
            live,
            basis: LoadBasis::PerArea,
        }
    }

    /// Line loads in kN/m
    pub fn per_length(permanent: f64, live: f64) -> Self {
        LoadSet {
            permanent,
            live,
            basis: LoadBasis::PerLength,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        ensure_non_negative("permanent", self.permanent)?;
        ensure_non_negative("live", self.live)?;
        Ok(())
    }

    /// Same actions as line loads on an element of the given width
    pub fn to_line_loads(&self, width_m: f64) -> LoadSet {
        match self.basis {
            LoadBasis::PerLength => *self,
            LoadBasis::PerArea => LoadSet::per_length(self.permanent * width_m, self.live * width_m),
        }
    }
}

/// Ultimate and service line loads of one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedLoads {
    /// Factored load for strength checks (kN/m)
    pub ultimate_kn_m: f64,
    /// Characteristic load for deflection (kN/m)
    pub service_kn_m: f64,
}

impl CombinedLoads {
    /// Combine with the code's own factors.
    pub fn from_code(code: &dyn DesignCode, loads: &LoadSet, width_m: f64) -> CalcResult<Self> {
        loads.validate()?;
        ensure_positive("width_m", width_m)?;
        let line = loads.to_line_loads(width_m);
        Ok(CombinedLoads {
            ultimate_kn_m: code.combine_ultimate(line.permanent, line.live),
            service_kn_m: code.combine_service(line.permanent, line.live),
        })
    }
}
