//! # BAEL 91 (France)
//!
//! Limit-state rules in French notation: γb = 1.5, γs = 1.15, loads
//! 1.35G + 1.5Q.
//!
//! - Flexure: fbu = 0.85·fc28/(θ·γb) with θ = 1, σs = fe/γs, pivot B limit
//!   αAB = 3.5/(3.5 + 10), μlim = 0.8·αAB·(1 − 0.4·αAB)
//! - Shear: τu0 = 0.07·fc28/γb without stirrups, τu ≤ min(0.2·fc28/γb, 5 MPa)
//!   (non-harmful cracking), stirrup fe capped at 400 MPa
//! - Deflection: Ei = 11000·fc28^(1/3), ft28 = 0.6 + 0.06·fc28, fictitious
//!   inertia 1.1·I0/(1 + λ·μ) (B.6.5.2), long-term increment
//!   2.0 × instantaneous, limit max(L/500, 5 mm)

use crate::codes::{normalize_exposure, CodeId, DesignCode, DesignMaterials};
use crate::errors::CalcResult;
use crate::materials::{GradeCatalog, BAEL91_CATALOG, BAEL91_CONCRETE, BAEL91_STEEL};
use crate::solvers::{
    ConcreteShear, DeflectionLimit, DeflectionParams, FlexureParams, InertiaRule, MaximumSteel,
    MinimumSteel, ShearParams, SpacingRule, SpanDepthRule, StrutLimit,
};

const GAMMA_B: f64 = 1.5;
const GAMMA_S: f64 = 1.15;
const THETA: f64 = 1.0;
/// Concrete strain at pivot B (‰)
const EPSILON_BC: f64 = 3.5;
/// Steel strain at pivot A (‰)
const EPSILON_S: f64 = 10.0;
const STIRRUP_YIELD_CAP_MPA: f64 = 400.0;
const COT_THETA: &[f64] = &[1.0];
const CREEP_MULTIPLIER: f64 = 2.0;
const FALLBACK_COVER_MM: f64 = 30.0;

/// Cover (mm) per exposure class, also accepting the BAEL environment
/// numbers 1 (sheltered) to 4 (marine)
const COVER_MM: &[(&str, f64)] = &[
    ("XC1", 20.0),
    ("XC2", 30.0),
    ("XC3", 30.0),
    ("XC4", 40.0),
    ("XD1", 40.0),
    ("XD2", 50.0),
    ("XS1", 40.0),
    ("XS2", 50.0),
    ("1", 20.0),
    ("2", 30.0),
    ("3", 40.0),
    ("4", 50.0),
];

/// BAEL 91 strategy bound to one concrete/steel pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bael91 {
    materials: DesignMaterials,
}

impl Bael91 {
    /// Build with catalog grade names, e.g. `("B30", "HA500")`
    pub fn new(concrete: &str, steel: &str) -> CalcResult<Self> {
        Ok(Self {
            materials: DesignMaterials::from_catalog(&BAEL91_CATALOG, concrete, steel)?,
        })
    }

    /// Ultimate concrete stress fbu (MPa)
    pub fn fbu(&self) -> f64 {
        0.85 * self.materials.concrete.fck_mpa / (THETA * GAMMA_B)
    }

    /// Ultimate steel stress σs (MPa)
    pub fn sigma_s(&self) -> f64 {
        self.materials.steel.fy_mpa / GAMMA_S
    }

    /// Tensile strength ft28 = 0.6 + 0.06·fc28 (MPa)
    pub fn ft28(&self) -> f64 {
        0.6 + 0.06 * self.materials.concrete.fck_mpa
    }

    /// Instantaneous modulus Ei = 11000·fc28^(1/3) (MPa)
    pub fn ei_mpa(&self) -> f64 {
        11_000.0 * self.materials.concrete.fck_mpa.cbrt()
    }

    /// Limiting reduced moment at pivot B
    pub fn mu_limit() -> f64 {
        let alpha_ab = EPSILON_BC / (EPSILON_BC + EPSILON_S);
        0.8 * alpha_ab * (1.0 - 0.4 * alpha_ab)
    }
}

impl Default for Bael91 {
    /// B30 + HA500
    fn default() -> Self {
        Self {
            materials: DesignMaterials {
                concrete: &BAEL91_CONCRETE[2],
                steel: &BAEL91_STEEL[3],
            },
        }
    }
}

impl DesignCode for Bael91 {
    fn id(&self) -> CodeId {
        CodeId::Bael91
    }

    fn catalog(&self) -> &'static GradeCatalog {
        &BAEL91_CATALOG
    }

    fn materials(&self) -> DesignMaterials {
        self.materials
    }

    fn gamma_c(&self) -> f64 {
        GAMMA_B
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
        let concrete = BAEL91_CATALOG.concrete(name)?;
        Ok(Box::new(Self {
            materials: DesignMaterials {
                concrete,
                ..self.materials
            },
        }))
    }

    fn with_steel(&self, name: &str) -> CalcResult<Box<dyn DesignCode>> {
        let steel = BAEL91_CATALOG.steel(name)?;
        Ok(Box::new(Self {
            materials: DesignMaterials {
                steel,
                ..self.materials
            },
        }))
    }

    fn minimum_cover(&self, exposure_class: &str, bar_diameter_mm: f64) -> f64 {
        let exposure = normalize_exposure(exposure_class);
        let table = COVER_MM
            .iter()
            .find(|(class, _)| *class == exposure)
            .map(|(_, cover)| *cover)
            .unwrap_or_else(|| {
                log::warn!(
                    "unknown BAEL exposure class '{}', using {} mm cover",
                    exposure_class,
                    FALLBACK_COVER_MM
                );
                FALLBACK_COVER_MM
            });
        bar_diameter_mm.max(10.0).max(table)
    }

    fn flexure_params(&self) -> FlexureParams {
        FlexureParams {
            compression_strength_mpa: self.fbu(),
            yield_strength_mpa: self.sigma_s(),
            mu_limit: Self::mu_limit(),
            phi: 1.0,
            minimum: MinimumSteel::Bael {
                ft28_mpa: self.ft28(),
                fe_mpa: self.materials.steel.fy_mpa,
            },
            maximum: MaximumSteel::GrossFraction(0.04),
        }
    }

    fn shear_params(&self) -> ShearParams {
        let fc28 = self.materials.concrete.fck_mpa;
        let fe_stirrups = self.materials.steel.fy_mpa.min(STIRRUP_YIELD_CAP_MPA);
        ShearParams {
            concrete: ConcreteShear::Bael {
                fc28_mpa: fc28,
                gamma_b: GAMMA_B,
            },
            phi: 1.0,
            concrete_contributes: true,
            transverse_yield_mpa: fe_stirrups / GAMMA_S,
            lever_arm_factor: 0.9,
            cot_theta: COT_THETA,
            strut: StrutLimit::ShearStress {
                max_stress_mpa: (0.2 * fc28 / GAMMA_B).min(5.0),
            },
            // At·fe/(b0·st) ≥ 0.4 MPa
            minimum_ratio: 0.4 / fe_stirrups,
            spacing: SpacingRule::Bael,
        }
    }

    fn deflection_params(&self) -> DeflectionParams {
        DeflectionParams {
            concrete_modulus_mpa: self.ei_mpa(),
            steel_modulus_mpa: self.materials.steel.es_mpa(),
            cracking_stress_mpa: self.ft28(),
            inertia: InertiaRule::Bael,
            creep_multiplier: CREEP_MULTIPLIER,
            limit: DeflectionLimit::SpanFractionWithFloor {
                divisor: 500.0,
                floor_mm: 5.0,
            },
            span_depth: SpanDepthRule::Bael {
                fe_mpa: self.materials.steel.fy_mpa,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_materials() {
        let code = Bael91::default();
        assert_eq!(code.materials().concrete.name, "B30");
        assert_eq!(code.materials().steel.name, "HA500");
    }

    #[test]
    fn test_design_stresses() {
        let code = Bael91::default();
        assert_relative_eq!(code.fbu(), 17.0, max_relative = 1e-9);
        assert_relative_eq!(code.ft28(), 2.4, max_relative = 1e-9);
        assert_relative_eq!(Bael91::mu_limit(), 0.186, max_relative = 2e-3);
    }

    #[test]
    fn test_shear_stress_cap() {
        // tau_lim = min(0.2 * 30 / 1.5, 5) = 4 MPa; 300 x 460 section carries 552 kN
        let code = Bael91::default();
        let ok = code.compute_shear(500.0, 0.3, 0.5, 0.03, 8.0).unwrap();
        assert!(ok.ok);
        assert_eq!(ok.cot_theta, Some(1.0));
        let too_much = code.compute_shear(600.0, 0.3, 0.5, 0.03, 8.0).unwrap();
        assert!(!too_much.ok);
    }

    #[test]
    fn test_cover_uses_bar_diameter() {
        let code = Bael91::default();
        assert_eq!(code.minimum_cover("XC1", 25.0), 25.0);
        assert_eq!(code.minimum_cover("2", 12.0), 30.0);
        assert_eq!(code.minimum_cover("", 12.0), 30.0);
    }

    #[test]
    fn test_low_mu_limit_fails_earlier_than_ec2() {
        use crate::codes::Eurocode2;
        // Same section and moment, BAEL limit 0.186 vs EC2 0.372
        let bael = Bael91::default().compute_flexure(150.0, 0.25, 0.4, 0.03).unwrap();
        let ec2 = Eurocode2::default().compute_flexure(150.0, 0.25, 0.4, 0.03).unwrap();
        assert!(!bael.ok);
        assert_eq!(bael.steel_area_cm2, 0.0);
        assert!(ec2.ok);
    }

    #[test]
    fn test_mu_limit_includes_block_factor() {
        // 0.25 x 0.40, d = 360, fbu = 17: mu = 0.1997 at 110 kN·m, 0.1725 at 95
        let code = Bael91::default();
        let over = code.compute_flexure(110.0, 0.25, 0.4, 0.03).unwrap();
        assert_relative_eq!(over.mu, 0.1997, max_relative = 1e-3);
        assert!(!over.ok);
        assert_eq!(over.steel_area_cm2, 0.0);

        let under = code.compute_flexure(95.0, 0.25, 0.4, 0.03).unwrap();
        assert!(under.ok);
        assert!(under.steel_area_cm2 > 0.0);
    }

    #[test]
    fn test_deflection_uses_fictitious_inertia() {
        let code = Bael91::default();
        assert_eq!(code.deflection_params().inertia, InertiaRule::Bael);

        // Mcr = 2.4 * 3.125e9 / 250 = 30 kN·m
        let result = code.compute_deflection(6.0, 80.0, 0.3, 0.5, 6.0, 0.03).unwrap();
        assert!(result.distribution_coefficient > 0.0);
        assert!(result.effective_inertia_mm4 < 3.125e9);
        assert_relative_eq!(result.long_term_mm, 2.0 * result.instantaneous_mm);
    }
}
