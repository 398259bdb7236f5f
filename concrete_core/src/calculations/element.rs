//! # Element Calculation
//!
//! Verifies a simply-supported, uniformly loaded precast element (beam, slab,
//! plank, hollow-core unit, prestressed joist) under one design code:
//!
//! 1. combine `g` and `q` with the code's factors (surface loads times width)
//! 2. flexure at midspan, `M = wL²/8`
//! 3. shear at the supports, `V = wL/2`, with the flexural steel as `Asl`
//! 4. deflection under the service load, with the same steel
//! 5. bars and stirrups for the flexure and shear requirements
//!
//! A failed check is a normal result: `summary.ok` is false and the
//! individual results explain why. Only malformed parameters and unknown
//! codes or grades are errors.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::calculations::element::{calculate, CalculationParameters, Geometry};
//! use concrete_core::calculations::ProductType;
//! use concrete_core::codes::Eurocode2;
//! use concrete_core::loads::LoadSet;
//!
//! let params = CalculationParameters::new(
//!     Geometry::new(6.0, 0.3, 0.5),
//!     LoadSet::per_length(12.0, 8.0),
//! );
//! let result = calculate(ProductType::Beam, &params, &Eurocode2::default()).unwrap();
//!
//! assert!(result.summary.flexure_ok);
//! assert!(result.flexure.steel_area_cm2 > 0.0);
//! println!("{}", result.reinforcement.summary);
//! ```

use serde::{Deserialize, Serialize};

use super::joist_floor::SelectionPolicy;
use super::ProductType;
use crate::codes::{CodeCoefficients, CodeId, DesignCode};
use crate::equations::{uniform_load_max_moment, uniform_load_max_shear, HALF_BAR_ESTIMATE_MM};
use crate::errors::{ensure_non_negative, ensure_positive, CalcResult};
use crate::loads::{ultimate_combination, CombinedLoads, LoadBasis, LoadSet};
use crate::reinforcement::{plan_reinforcement, ReinforcementInput, ReinforcementPlan};
use crate::solvers::{DeflectionResult, FlexureResult, ShearResult};
use crate::units::mm;

/// Stirrup diameter when the parameters do not name one (mm)
pub const DEFAULT_STIRRUP_DIAMETER_MM: u32 = 8;

fn default_exposure() -> String {
    "XC1".to_string()
}

fn default_stirrup_diameter() -> u32 {
    DEFAULT_STIRRUP_DIAMETER_MM
}

// ============================================================================
// Parameters
// ============================================================================

/// Element dimensions. Lengths in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub span_m: f64,
    pub width_m: f64,
    pub height_m: f64,

    /// Concrete cover to the bars. Derived from the exposure class when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_m: Option<f64>,

    /// Joist floors only: required joist spacing (cm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_cm: Option<u32>,

    /// Joist floors only: required filler block height (cm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height_cm: Option<u32>,
}

impl Geometry {
    pub fn new(span_m: f64, width_m: f64, height_m: f64) -> Self {
        Geometry {
            span_m,
            width_m,
            height_m,
            cover_m: None,
            spacing_cm: None,
            block_height_cm: None,
        }
    }

    pub fn with_cover(mut self, cover_m: f64) -> Self {
        self.cover_m = Some(cover_m);
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        ensure_positive("span_m", self.span_m)?;
        ensure_positive("width_m", self.width_m)?;
        ensure_positive("height_m", self.height_m)?;
        if let Some(cover) = self.cover_m {
            ensure_non_negative("cover_m", cover)?;
        }
        Ok(())
    }
}

/// Grade names; `None` selects the code's default grade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialNames {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concrete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steel: Option<String>,
}

/// Environment and selection preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    /// Exposure class driving the nominal cover (e.g. "XC1")
    #[serde(default = "default_exposure")]
    pub exposure_class: String,

    /// Ranking policy for joist-floor selection
    #[serde(default)]
    pub policy: SelectionPolicy,

    #[serde(default = "default_stirrup_diameter")]
    pub stirrup_diameter_mm: u32,
}

impl Default for Conditions {
    fn default() -> Self {
        Conditions {
            exposure_class: default_exposure(),
            policy: SelectionPolicy::default(),
            stirrup_diameter_mm: DEFAULT_STIRRUP_DIAMETER_MM,
        }
    }
}

/// Parameter bundle of one calculation, as received from callers (JSON).
///
/// ```rust
/// use concrete_core::calculations::element::CalculationParameters;
///
/// let json = r#"{
///     "geometry": { "span_m": 5.0, "width_m": 1.2, "height_m": 0.2 },
///     "loads": { "permanent": 5.0, "live": 2.5 },
///     "materials": { "concrete": "C35/45" }
/// }"#;
/// let params: CalculationParameters = serde_json::from_str(json).unwrap();
/// assert_eq!(params.conditions.exposure_class, "XC1");
/// assert!(params.materials.steel.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationParameters {
    pub geometry: Geometry,
    pub loads: LoadSet,
    #[serde(default)]
    pub materials: MaterialNames,
    #[serde(default)]
    pub conditions: Conditions,
}

impl CalculationParameters {
    pub fn new(geometry: Geometry, loads: LoadSet) -> Self {
        CalculationParameters {
            geometry,
            loads,
            materials: MaterialNames::default(),
            conditions: Conditions::default(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.geometry.validate()?;
        self.loads.validate()
    }
}

// ============================================================================
// Results
// ============================================================================

/// Echo of the resolved inputs, for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub product: ProductType,
    pub code: CodeId,
    pub code_name: String,
    pub span_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub cover_m: f64,
    pub exposure_class: String,
    pub concrete: String,
    pub steel: String,
    pub permanent: f64,
    pub live: f64,
    pub load_basis: LoadBasis,
    /// e.g. "1.35G + 1.5Q"
    pub ultimate_combination: String,
    pub ultimate_load_kn_m: f64,
    pub service_load_kn_m: f64,
    pub ultimate_moment_knm: f64,
    pub service_moment_knm: f64,
    pub ultimate_shear_kn: f64,
    pub coefficients: CodeCoefficients,
}

/// Overall outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOT_COMPLIANT")]
    NotCompliant,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::NotCompliant => "NOT COMPLIANT",
        }
    }
}

/// Pass/fail block consumed verbatim by reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub verdict: Verdict,
    pub ok: bool,
    pub code: CodeId,
    pub flexure_ok: bool,
    pub shear_ok: bool,
    pub deflection_ok: bool,
    pub message: String,
    /// Reinforcement caveats (tight layouts, under-provided stirrups)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Summary {
    fn new(code: &dyn DesignCode, flexure_ok: bool, shear_ok: bool, deflection_ok: bool) -> Self {
        let ok = flexure_ok && shear_ok && deflection_ok;
        let message = if ok {
            format!("All checks pass under {}.", code.full_name())
        } else {
            let failed: Vec<&str> = [
                (flexure_ok, "flexure"),
                (shear_ok, "shear"),
                (deflection_ok, "deflection"),
            ]
            .iter()
            .filter(|(passed, _)| !passed)
            .map(|(_, name)| *name)
            .collect();
            format!(
                "Checks failing under {}: {}. See details.",
                code.full_name(),
                failed.join(", ")
            )
        };
        Summary {
            verdict: if ok { Verdict::Ok } else { Verdict::NotCompliant },
            ok,
            code: code.id(),
            flexure_ok,
            shear_ok,
            deflection_ok,
            message,
            warnings: Vec::new(),
        }
    }
}

/// Full result of an element calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    pub input_summary: InputSummary,
    pub flexure: FlexureResult,
    pub shear: ShearResult,
    pub deflection: DeflectionResult,
    pub reinforcement: ReinforcementPlan,
    pub summary: Summary,
}

// ============================================================================
// Calculation
// ============================================================================

/// Cover (m): the given one, else the code's nominal cover for the exposure
/// class with a bar of twice the half-bar estimate.
pub fn resolve_cover_m(geometry: &Geometry, conditions: &Conditions, code: &dyn DesignCode) -> f64 {
    geometry.cover_m.unwrap_or_else(|| {
        code.minimum_cover(&conditions.exposure_class, 2.0 * HALF_BAR_ESTIMATE_MM) / 1000.0
    })
}

/// Run the flexure, shear, deflection and reinforcement sequence.
pub fn calculate(
    product: ProductType,
    params: &CalculationParameters,
    code: &dyn DesignCode,
) -> CalcResult<ElementResult> {
    params.validate()?;
    let geometry = &params.geometry;
    let (span, width, height) = (geometry.span_m, geometry.width_m, geometry.height_m);
    let cover = resolve_cover_m(geometry, &params.conditions, code);

    let combined = CombinedLoads::from_code(code, &params.loads, width)?;
    let ultimate_moment = uniform_load_max_moment(combined.ultimate_kn_m, span);
    let service_moment = uniform_load_max_moment(combined.service_kn_m, span);
    let ultimate_shear = uniform_load_max_shear(combined.ultimate_kn_m, span);

    log::info!(
        "{} under {}: L = {} m, b x h = {} x {} m, wu = {:.2} kN/m",
        product,
        code.id(),
        span,
        width,
        height,
        combined.ultimate_kn_m
    );

    let flexure = code.compute_flexure(ultimate_moment, width, height, cover)?;
    let steel_area = flexure.steel_area_cm2;
    let shear = code.compute_shear(ultimate_shear, width, height, cover, steel_area)?;
    let deflection = code.compute_deflection(span, service_moment, width, height, steel_area, cover)?;

    let reinforcement = plan_reinforcement(&ReinforcementInput {
        flexure_area_cm2: steel_area,
        stirrup_area_cm2_m: shear.design_area_cm2_m(),
        width_mm: mm(width),
        height_mm: mm(height),
        min_bottom_diameter_mm: product.min_bottom_bar_mm(),
        stirrup_diameter_mm: params.conditions.stirrup_diameter_mm,
        max_stirrup_spacing_mm: shear.max_spacing_mm,
    });

    let mut summary = Summary::new(code, flexure.ok, shear.ok, deflection.ok);
    summary.warnings = reinforcement.warnings().into_iter().map(String::from).collect();
    if summary.ok {
        log::info!("{}: {}", product, summary.message);
    } else {
        log::warn!("{}: {}", product, summary.message);
    }

    let materials = code.materials();
    let input_summary = InputSummary {
        product,
        code: code.id(),
        code_name: code.full_name().to_string(),
        span_m: span,
        width_m: width,
        height_m: height,
        cover_m: cover,
        exposure_class: params.conditions.exposure_class.clone(),
        concrete: materials.concrete.name.to_string(),
        steel: materials.steel.name.to_string(),
        permanent: params.loads.permanent,
        live: params.loads.live,
        load_basis: params.loads.basis,
        ultimate_combination: ultimate_combination(code).equation,
        ultimate_load_kn_m: combined.ultimate_kn_m,
        service_load_kn_m: combined.service_kn_m,
        ultimate_moment_knm: ultimate_moment,
        service_moment_knm: service_moment,
        ultimate_shear_kn: ultimate_shear,
        coefficients: code.coefficients(),
    };

    Ok(ElementResult {
        input_summary,
        flexure,
        shear,
        deflection,
        reinforcement,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{Aci318, Bael91, Eurocode2};
    use approx::assert_relative_eq;

    fn beam_params() -> CalculationParameters {
        CalculationParameters::new(Geometry::new(6.0, 0.3, 0.5), LoadSet::per_length(12.0, 8.0))
    }

    #[test]
    fn test_beam_passes_under_ec2() {
        let result = calculate(ProductType::Beam, &beam_params(), &Eurocode2::default()).unwrap();
        // wu = 1.35 x 12 + 1.5 x 8 = 28.2 kN/m, Mu = 126.9 kN.m
        assert_relative_eq!(result.input_summary.ultimate_load_kn_m, 28.2, max_relative = 1e-9);
        assert_relative_eq!(result.input_summary.ultimate_moment_knm, 126.9, max_relative = 1e-9);
        assert_relative_eq!(result.input_summary.ultimate_shear_kn, 84.6, max_relative = 1e-9);
        assert!(result.summary.flexure_ok);
        assert!(result.summary.shear_ok);
        assert_eq!(result.summary.code, CodeId::Ec2);
        assert_eq!(result.input_summary.ultimate_combination, "1.35G + 1.5Q");
        // Beam bottom bars are at least 10 mm
        assert!(result.reinforcement.bottom.as_ref().unwrap().diameter_mm >= 10);
        assert!(result.reinforcement.stirrups.is_some());
    }

    #[test]
    fn test_verdict_is_and_of_checks() {
        for code in [
            Box::new(Eurocode2::default()) as Box<dyn DesignCode>,
            Box::new(Aci318::default()),
            Box::new(Bael91::default()),
        ] {
            let result = calculate(ProductType::Beam, &beam_params(), code.as_ref()).unwrap();
            let s = &result.summary;
            assert_eq!(s.ok, s.flexure_ok && s.shear_ok && s.deflection_ok);
            assert_eq!(s.verdict == Verdict::Ok, s.ok);
        }
    }

    #[test]
    fn test_undersized_section_is_not_an_error() {
        let params = CalculationParameters::new(Geometry::new(8.0, 0.2, 0.3), LoadSet::per_length(25.0, 15.0));
        let result = calculate(ProductType::Beam, &params, &Eurocode2::default()).unwrap();
        assert!(!result.flexure.ok);
        assert_eq!(result.flexure.steel_area_cm2, 0.0);
        assert!(!result.summary.ok);
        assert_eq!(result.summary.verdict, Verdict::NotCompliant);
        assert!(result.summary.message.contains("flexure"));
    }

    #[test]
    fn test_surface_loads_use_width() {
        let params = CalculationParameters::new(Geometry::new(5.0, 1.2, 0.2), LoadSet::per_area(5.0, 2.5));
        let result = calculate(ProductType::SolidSlab, &params, &Eurocode2::default()).unwrap();
        assert_relative_eq!(result.input_summary.ultimate_load_kn_m, 12.6, max_relative = 1e-9);
        assert_relative_eq!(result.input_summary.service_load_kn_m, 9.0, max_relative = 1e-9);
    }

    #[test]
    fn test_cover_from_exposure() {
        let params = beam_params();
        // EC2 XC1 with a 20 mm bar: max(20, 15, 10) + 10
        assert_relative_eq!(
            resolve_cover_m(&params.geometry, &params.conditions, &Eurocode2::default()),
            0.030,
            max_relative = 1e-9
        );
        let explicit = params.geometry.clone().with_cover(0.045);
        assert_eq!(resolve_cover_m(&explicit, &params.conditions, &Aci318::default()), 0.045);
    }

    #[test]
    fn test_invalid_geometry() {
        let params = CalculationParameters::new(Geometry::new(0.0, 0.3, 0.5), LoadSet::per_length(1.0, 1.0));
        let err = calculate(ProductType::Beam, &params, &Eurocode2::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_result_serializes_with_summary_block() {
        let result = calculate(ProductType::Beam, &beam_params(), &Bael91::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["summary"]["verdict"].is_string());
        assert_eq!(json["input_summary"]["code"], "BAEL91");
        assert_eq!(json["input_summary"]["concrete"], "B30");
    }
}
