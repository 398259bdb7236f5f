//! # Materials Database
//!
//! Concrete and reinforcing steel grades per design code, plus the standard
//! bar table used by the reinforcement selector.
//!
//! Each design code owns one [`GradeCatalog`]. Catalogs are process-wide
//! static data and are never mutated.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::materials::EUROCODE2_CATALOG;
//!
//! let c30 = EUROCODE2_CATALOG.concrete("C30/37").unwrap();
//! let s500 = EUROCODE2_CATALOG.steel("S500").unwrap();
//! println!("fck = {} MPa, fy = {} MPa", c30.fck_mpa, s500.fy_mpa);
//!
//! assert!(EUROCODE2_CATALOG.concrete("B30").is_err());
//! ```

pub mod concrete;
pub mod rebar;
pub mod steel;

pub use concrete::{ConcreteGrade, ACI318_CONCRETE, BAEL91_CONCRETE, EUROCODE2_CONCRETE};
pub use rebar::{bar_area_mm2, diameters_in_range, linear_mass_kg_m, BAR_AREAS_MM2};
pub use steel::{SteelGrade, ACI318_STEEL, BAEL91_STEEL, EUROCODE2_STEEL};

use crate::errors::{CalcError, CalcResult};

/// The concrete and steel grades recognized by one design code.
#[derive(Debug, Clone, Copy)]
pub struct GradeCatalog {
    /// Short code name used in error messages (e.g. "EC2")
    pub code: &'static str,
    pub concrete: &'static [ConcreteGrade],
    pub steel: &'static [SteelGrade],
}

pub static EUROCODE2_CATALOG: GradeCatalog = GradeCatalog {
    code: "EC2",
    concrete: EUROCODE2_CONCRETE,
    steel: EUROCODE2_STEEL,
};

pub static ACI318_CATALOG: GradeCatalog = GradeCatalog {
    code: "ACI318",
    concrete: ACI318_CONCRETE,
    steel: ACI318_STEEL,
};

pub static BAEL91_CATALOG: GradeCatalog = GradeCatalog {
    code: "BAEL91",
    concrete: BAEL91_CONCRETE,
    steel: BAEL91_STEEL,
};

impl GradeCatalog {
    /// Look up a concrete grade by its exact catalog name.
    ///
    /// The error lists every valid name for this code.
    pub fn concrete(&self, name: &str) -> CalcResult<&'static ConcreteGrade> {
        self.concrete
            .iter()
            .find(|g| g.name == name.trim())
            .ok_or_else(|| {
                CalcError::unknown_grade("concrete", name, self.code, &self.concrete_names())
            })
    }

    /// Look up a steel grade by its exact catalog name.
    pub fn steel(&self, name: &str) -> CalcResult<&'static SteelGrade> {
        self.steel
            .iter()
            .find(|g| g.name == name.trim())
            .ok_or_else(|| CalcError::unknown_grade("steel", name, self.code, &self.steel_names()))
    }

    /// Concrete grade names in catalog order
    pub fn concrete_names(&self) -> Vec<&'static str> {
        self.concrete.iter().map(|g| g.name).collect()
    }

    /// Steel grade names in catalog order
    pub fn steel_names(&self) -> Vec<&'static str> {
        self.steel.iter().map(|g| g.name).collect()
    }
}
