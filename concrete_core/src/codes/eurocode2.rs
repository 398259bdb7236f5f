//! # Eurocode 2 (EN 1992-1-1)
//!
//! Partial factors γc = 1.5 and γs = 1.15 on materials, load factors
//! γG = 1.35 and γQ = 1.5 (6.10).
//!
//! - Flexure: fcd = αcc·fck/γc with αcc = 1.0, μlim = 0.372 (pivot B,
//!   εcu = 3.5 ‰, S500)
//! - Shear: VRd,c per 6.2.2 (CRd,c = 0.18/γc), variable strut inclination
//!   per 6.2.3, cot θ = 2.5 then 1.0
//! - Deflection: Ecm from the grade, fctm for cracking, ζ with β = 1 and
//!   exponent 2 (7.19), long-term increment 1.25 × instantaneous
//! - Cover: cnom = max(Ø, cmin,dur, 10) + Δcdev with Δcdev = 10 mm

use crate::codes::{normalize_exposure, CodeId, DesignCode, DesignMaterials};
use crate::errors::CalcResult;
use crate::materials::{GradeCatalog, EUROCODE2_CATALOG, EUROCODE2_CONCRETE, EUROCODE2_STEEL};
use crate::solvers::{
    ConcreteShear, DeflectionLimit, DeflectionParams, FlexureParams, InertiaRule, MaximumSteel,
    MinimumSteel, ShearParams, SpacingRule, SpanDepthRule, StrutLimit,
};

const GAMMA_C: f64 = 1.5;
const GAMMA_S: f64 = 1.15;
const ALPHA_CC: f64 = 1.0;
const MU_LIMIT: f64 = 0.372;
const COT_THETA: &[f64] = &[2.5, 1.0];
const CREEP_MULTIPLIER: f64 = 2.5 * 0.5;
const CDEV_MM: f64 = 10.0;
const FALLBACK_CDUR_MM: f64 = 25.0;

/// Structural class S4 durability cover cmin,dur (mm), Table 4.4N
const DURABILITY_COVER_MM: &[(&str, f64)] = &[
    ("XC1", 15.0),
    ("XC2", 25.0),
    ("XC3", 25.0),
    ("XC4", 30.0),
    ("XD1", 35.0),
    ("XD2", 40.0),
    ("XD3", 45.0),
    ("XS1", 35.0),
    ("XS2", 40.0),
    ("XS3", 45.0),
];

/// Eurocode 2 strategy bound to one concrete/steel pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eurocode2 {
    materials: DesignMaterials,
}

impl Eurocode2 {
    /// Build with catalog grade names, e.g. `("C30/37", "S500")`
    pub fn new(concrete: &str, steel: &str) -> CalcResult<Self> {
        Ok(Self {
            materials: DesignMaterials::from_catalog(&EUROCODE2_CATALOG, concrete, steel)?,
        })
    }

    /// Design compression strength fcd (MPa)
    pub fn fcd(&self) -> f64 {
        ALPHA_CC * self.materials.concrete.fck_mpa / GAMMA_C
    }

    /// Design yield strength fyd (MPa)
    pub fn fyd(&self) -> f64 {
        self.materials.steel.fy_mpa / GAMMA_S
    }
}

impl Default for Eurocode2 {
    /// C30/37 + S500
    fn default() -> Self {
        Self {
            materials: DesignMaterials {
                concrete: &EUROCODE2_CONCRETE[2],
                steel: &EUROCODE2_STEEL[1],
            },
        }
    }
}

impl DesignCode for Eurocode2 {
    fn id(&self) -> CodeId {
        CodeId::Ec2
    }

    fn catalog(&self) -> &'static GradeCatalog {
        &EUROCODE2_CATALOG
    }

    fn materials(&self) -> DesignMaterials {
        self.materials
    }

    fn gamma_c(&self) -> f64 {
        GAMMA_C
    }

    fn gamma_s(&self) -> f64 {
        GAMMA_S
    }

    fn gamma_g(&self) -> f64 {
        1.35
    }

    fn gamma_q(&self) -> f64 {
        1.5
    }

    fn with_concrete(&self, name: &str) -> CalcResult<Box<dyn DesignCode>> {
        let concrete = EUROCODE2_CATALOG.concrete(name)?;
        Ok(Box::new(Self {
            materials: DesignMaterials {
                concrete,
                ..self.materials
            },
        }))
    }

    fn with_steel(&self, name: &str) -> CalcResult<Box<dyn DesignCode>> {
        let steel = EUROCODE2_CATALOG.steel(name)?;
        Ok(Box::new(Self {
            materials: DesignMaterials {
                steel,
                ..self.materials
            },
        }))
    }

    fn minimum_cover(&self, exposure_class: &str, bar_diameter_mm: f64) -> f64 {
        let exposure = normalize_exposure(exposure_class);
        let c_dur = DURABILITY_COVER_MM
            .iter()
            .find(|(class, _)| *class == exposure)
            .map(|(_, cover)| *cover)
            .unwrap_or_else(|| {
                log::warn!(
                    "unknown EC2 exposure class '{}', using cmin,dur = {} mm",
                    exposure_class,
                    FALLBACK_CDUR_MM
                );
                FALLBACK_CDUR_MM
            });
        bar_diameter_mm.max(c_dur).max(10.0) + CDEV_MM
    }

    fn flexure_params(&self) -> FlexureParams {
        FlexureParams {
            compression_strength_mpa: self.fcd(),
            yield_strength_mpa: self.fyd(),
            mu_limit: MU_LIMIT,
            phi: 1.0,
            minimum: MinimumSteel::Eurocode {
                fctm_mpa: self.materials.concrete.fctm_mpa,
                fyk_mpa: self.materials.steel.fy_mpa,
            },
            maximum: MaximumSteel::GrossFraction(0.04),
        }
    }

    fn shear_params(&self) -> ShearParams {
        let fck = self.materials.concrete.fck_mpa;
        let nu_1 = 0.6 * (1.0 - fck / 250.0);
        ShearParams {
            concrete: ConcreteShear::Eurocode {
                fck_mpa: fck,
                gamma_c: GAMMA_C,
            },
            phi: 1.0,
            concrete_contributes: false,
            transverse_yield_mpa: self.fyd(),
            lever_arm_factor: 0.9,
            cot_theta: COT_THETA,
            strut: StrutLimit::Inclined {
                nu_fcd_mpa: nu_1 * self.fcd(),
            },
            minimum_ratio: 0.08 * fck.sqrt() / self.materials.steel.fy_mpa,
            spacing: SpacingRule::Eurocode,
        }
    }

    fn deflection_params(&self) -> DeflectionParams {
        DeflectionParams {
            concrete_modulus_mpa: self.materials.concrete.ecm_mpa(),
            steel_modulus_mpa: self.materials.steel.es_mpa(),
            cracking_stress_mpa: self.materials.concrete.fctm_mpa,
            inertia: InertiaRule::Interpolated {
                beta: 1.0,
                exponent: 2.0,
            },
            creep_multiplier: CREEP_MULTIPLIER,
            limit: DeflectionLimit::SpanFraction(250.0),
            span_depth: SpanDepthRule::Eurocode {
                fck_mpa: self.materials.concrete.fck_mpa,
            },
        }
    }
}
