//! # Design Codes
//!
//! One strategy per supported design code behind the [`DesignCode`] trait.
//! The orchestrator never branches on the code: each implementation supplies
//! its safety factors, its exposure/cover table and the coefficient sets the
//! generic solvers need.
//!
//! | | EC2 | ACI 318 | BAEL 91 |
//! |---|---|---|---|
//! | γc / γs | 1.5 / 1.15 | 1.0 / 1.0 | 1.5 / 1.15 |
//! | γg / γq | 1.35 / 1.5 | 1.2 / 1.6 | 1.35 / 1.5 |
//! | φ flexure / shear | 1.0 / 1.0 | 0.90 / 0.75 | 1.0 / 1.0 |
//! | deflection limit | L/250 | L/240 | max(L/500, 5 mm) |
//!
//! ACI keeps its material factors at 1.0 and reduces resistance through φ
//! instead. Both styles coexist: the solvers take the reduced strengths and φ
//! as separate parameters.
//!
//! Strategy instances are immutable. Changing a grade builds a new instance.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::codes::{DesignCode, Eurocode2};
//!
//! let code = Eurocode2::default().with_concrete("C25/30").unwrap();
//! assert_eq!(code.materials().concrete.name, "C25/30");
//!
//! let flexure = code.compute_flexure(80.0, 0.3, 0.5, 0.03).unwrap();
//! assert!(flexure.ok);
//! assert_eq!(code.deflection_limit(5.0), 20.0);
//!
//! // Unknown grades list the valid ones
//! let err = code.with_steel("Grade60").unwrap_err();
//! assert!(err.to_string().contains("S500"));
//! ```

pub mod aci318;
pub mod bael91;
pub mod eurocode2;
pub mod registry;

pub use aci318::Aci318;
pub use bael91::Bael91;
pub use eurocode2::Eurocode2;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::materials::{ConcreteGrade, GradeCatalog, SteelGrade};
use crate::solvers::{
    deflection, flexure, shear, DeflectionInput, DeflectionParams, DeflectionResult,
    FlexureInput, FlexureParams, FlexureResult, ShearInput, ShearParams, ShearResult,
};
use crate::units::mm;

/// Closed set of design codes known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeId {
    #[serde(rename = "EC2")]
    Ec2,
    #[serde(rename = "ACI318")]
    Aci318,
    #[serde(rename = "BAEL91")]
    Bael91,
    #[serde(rename = "BS8110")]
    Bs8110,
    #[serde(rename = "CSA_A23")]
    CsaA23,
}

impl CodeId {
    /// All known codes, implemented first
    pub const ALL: [CodeId; 5] = [
        CodeId::Ec2,
        CodeId::Aci318,
        CodeId::Bael91,
        CodeId::Bs8110,
        CodeId::CsaA23,
    ];

    /// Codes with a working strategy
    pub const IMPLEMENTED: [CodeId; 3] = [CodeId::Ec2, CodeId::Aci318, CodeId::Bael91];

    /// Canonical identifier ("EC2", "ACI318", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeId::Ec2 => "EC2",
            CodeId::Aci318 => "ACI318",
            CodeId::Bael91 => "BAEL91",
            CodeId::Bs8110 => "BS8110",
            CodeId::CsaA23 => "CSA_A23",
        }
    }

    /// Full name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            CodeId::Ec2 => "Eurocode 2 (EN 1992-1-1)",
            CodeId::Aci318 => "ACI 318 (USA)",
            CodeId::Bael91 => "BAEL 91 (France)",
            CodeId::Bs8110 => "BS 8110 (UK)",
            CodeId::CsaA23 => "CSA A23.3 (Canada)",
        }
    }

    pub fn region(&self) -> &'static str {
        match self {
            CodeId::Ec2 => "Europe",
            CodeId::Aci318 => "USA",
            CodeId::Bael91 => "France",
            CodeId::Bs8110 => "United Kingdom",
            CodeId::CsaA23 => "Canada",
        }
    }

    pub fn is_implemented(&self) -> bool {
        CodeId::IMPLEMENTED.contains(self)
    }
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The concrete/steel pair bound to one strategy instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignMaterials {
    pub concrete: &'static ConcreteGrade,
    pub steel: &'static SteelGrade,
}

impl DesignMaterials {
    /// Look both grades up in a catalog.
    pub fn from_catalog(catalog: &GradeCatalog, concrete: &str, steel: &str) -> CalcResult<Self> {
        Ok(Self {
            concrete: catalog.concrete(concrete)?,
            steel: catalog.steel(steel)?,
        })
    }
}

/// Strength reduction factors applied to resistance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistanceFactors {
    pub flexure: f64,
    pub shear: f64,
}

impl ResistanceFactors {
    /// Partial-factor codes reduce materials, not resistance
    pub const NONE: ResistanceFactors = ResistanceFactors {
        flexure: 1.0,
        shear: 1.0,
    };
}

/// Safety and reduction factors of a code, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeCoefficients {
    pub gamma_c: f64,
    pub gamma_s: f64,
    pub gamma_g: f64,
    pub gamma_q: f64,
    pub phi_flexure: f64,
    pub phi_shear: f64,
}

/// A design code strategy.
///
/// Object safe so the registry can hand out `Box<dyn DesignCode>`. The
/// `compute_*` methods have default bodies that feed the code's coefficient
/// sets to the generic solvers; implementors only supply constants.
pub trait DesignCode: Send + Sync + fmt::Debug {
    fn id(&self) -> CodeId;

    fn full_name(&self) -> &'static str {
        self.id().display_name()
    }

    fn region(&self) -> &'static str {
        self.id().region()
    }

    /// Grades this code accepts
    fn catalog(&self) -> &'static GradeCatalog;

    /// Grades bound to this instance
    fn materials(&self) -> DesignMaterials;

    fn gamma_c(&self) -> f64;
    fn gamma_s(&self) -> f64;
    fn gamma_g(&self) -> f64;
    fn gamma_q(&self) -> f64;

    fn resistance_factors(&self) -> ResistanceFactors {
        ResistanceFactors::NONE
    }

    fn coefficients(&self) -> CodeCoefficients {
        let phi = self.resistance_factors();
        CodeCoefficients {
            gamma_c: self.gamma_c(),
            gamma_s: self.gamma_s(),
            gamma_g: self.gamma_g(),
            gamma_q: self.gamma_q(),
            phi_flexure: phi.flexure,
            phi_shear: phi.shear,
        }
    }

    /// Ultimate combination γg·g + γq·q
    fn combine_ultimate(&self, permanent: f64, live: f64) -> f64 {
        self.gamma_g() * permanent + self.gamma_q() * live
    }

    /// Characteristic service combination g + q
    fn combine_service(&self, permanent: f64, live: f64) -> f64 {
        permanent + live
    }

    /// Same code with another concrete grade
    fn with_concrete(&self, name: &str) -> CalcResult<Box<dyn DesignCode>>;

    /// Same code with another steel grade
    fn with_steel(&self, name: &str) -> CalcResult<Box<dyn DesignCode>>;

    /// Nominal cover (mm) for an exposure class. Unknown classes use the
    /// code's fallback value instead of failing.
    fn minimum_cover(&self, exposure_class: &str, bar_diameter_mm: f64) -> f64;

    fn flexure_params(&self) -> FlexureParams;
    fn shear_params(&self) -> ShearParams;
    fn deflection_params(&self) -> DeflectionParams;

    fn compute_flexure(
        &self,
        moment_knm: f64,
        width_m: f64,
        height_m: f64,
        cover_m: f64,
    ) -> CalcResult<FlexureResult> {
        let input = FlexureInput {
            moment_knm,
            width_m,
            height_m,
            cover_m,
        };
        flexure::calculate(&input, &self.flexure_params())
    }

    /// Design moment capacity (kN·m) of a given tension steel area (cm²)
    fn resisting_moment(
        &self,
        steel_area_cm2: f64,
        width_m: f64,
        height_m: f64,
        cover_m: f64,
    ) -> CalcResult<f64> {
        flexure::resisting_moment(steel_area_cm2, width_m, height_m, cover_m, &self.flexure_params())
    }

    fn compute_shear(
        &self,
        shear_kn: f64,
        width_m: f64,
        height_m: f64,
        cover_m: f64,
        tension_steel_cm2: f64,
    ) -> CalcResult<ShearResult> {
        let input = ShearInput {
            shear_kn,
            width_m,
            height_m,
            cover_m,
            tension_steel_cm2,
        };
        shear::calculate(&input, &self.shear_params())
    }

    fn compute_deflection(
        &self,
        span_m: f64,
        service_moment_knm: f64,
        width_m: f64,
        height_m: f64,
        steel_area_cm2: f64,
        cover_m: f64,
    ) -> CalcResult<DeflectionResult> {
        let input = DeflectionInput {
            span_m,
            service_moment_knm,
            width_m,
            height_m,
            steel_area_cm2,
            cover_m,
        };
        deflection::calculate(&input, &self.deflection_params())
    }

    /// Admissible deflection (mm) for a span in metres
    fn deflection_limit(&self, span_m: f64) -> f64 {
        self.deflection_params().limit.limit_mm(mm(span_m))
    }

    fn concrete_grades(&self) -> Vec<&'static str> {
        self.catalog().concrete_names()
    }

    fn steel_grades(&self) -> Vec<&'static str> {
        self.catalog().steel_names()
    }
}

/// Uppercase and trim an exposure class for table lookup
pub(crate) fn normalize_exposure(exposure_class: &str) -> String {
    exposure_class.trim().to_uppercase()
}
