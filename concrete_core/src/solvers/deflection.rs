//! # Deflection Solver
//!
//! Serviceability check of a simply-supported, uniformly loaded section.
//! Two checks are computed and both are kept:
//!
//! - **Span/depth** (simplified): actual L/d against the code's allowable
//!   ratio. Informational only, it never decides the verdict.
//! - **Detailed**: effective inertia between the gross and the fully cracked
//!   section, following the code's [`InertiaRule`] (the section is uncracked
//!   when `M ≤ Mcr`), instantaneous deflection `5·M·L²/(48·Ec·Ieff)` and a
//!   long-term increment `creep × instantaneous`.
//!
//! The verdict is `total ≤ limit`.

use serde::{Deserialize, Serialize};

use crate::equations::beam::uniform_load_deflection_from_moment;
use crate::equations::section::{
    cracked_inertia, cracked_neutral_axis_ratio, cracking_moment, effective_depth, gross_inertia,
};
use crate::errors::{ensure_non_negative, ensure_positive, CalcError, CalcResult};
use crate::units::{mm, mm2, KnM, NMm};

/// Service state of one section (boundary units).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeflectionInput {
    pub span_m: f64,
    /// Service (characteristic) moment at midspan (kN·m)
    pub service_moment_knm: f64,
    pub width_m: f64,
    pub height_m: f64,
    /// Tension steel (cm²)
    pub steel_area_cm2: f64,
    pub cover_m: f64,
}

impl DeflectionInput {
    pub fn validate(&self) -> CalcResult<()> {
        ensure_positive("span_m", self.span_m)?;
        ensure_non_negative("service_moment_knm", self.service_moment_knm)?;
        ensure_positive("width_m", self.width_m)?;
        ensure_positive("height_m", self.height_m)?;
        ensure_non_negative("steel_area_cm2", self.steel_area_cm2)?;
        ensure_non_negative("cover_m", self.cover_m)?;
        if effective_depth(mm(self.height_m), mm(self.cover_m)) <= 0.0 {
            return Err(CalcError::invalid_input(
                "cover_m",
                self.cover_m.to_string(),
                "Cover leaves no effective depth in the section",
            ));
        }
        Ok(())
    }
}

/// Admissible deflection as a function of span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeflectionLimit {
    /// L / divisor
    SpanFraction(f64),
    /// max(L / divisor, floor)
    SpanFractionWithFloor { divisor: f64, floor_mm: f64 },
}

impl DeflectionLimit {
    /// Limit in mm for a span in mm
    pub fn limit_mm(&self, span_mm: f64) -> f64 {
        match *self {
            DeflectionLimit::SpanFraction(divisor) => span_mm / divisor,
            DeflectionLimit::SpanFractionWithFloor { divisor, floor_mm } => {
                (span_mm / divisor).max(floor_mm)
            }
        }
    }

    /// Short label such as "L/250"
    pub fn label(&self) -> String {
        match *self {
            DeflectionLimit::SpanFraction(divisor) => format!("L/{}", divisor),
            DeflectionLimit::SpanFractionWithFloor { divisor, floor_mm } => {
                format!("max(L/{}, {} mm)", divisor, floor_mm)
            }
        }
    }
}

/// Code rule for the allowable span/effective-depth ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpanDepthRule {
    /// EN 1992-1-1 (7.16), K = 1, no compression steel
    Eurocode { fck_mpa: f64 },
    /// 16 for a simply supported beam, scaled by (0.4 + fy/700)
    Aci { fy_mpa: f64 },
    /// 16, reduced in proportion when ρ exceeds 4.2/fe
    Bael { fe_mpa: f64 },
}

impl SpanDepthRule {
    /// Allowable L/d for a tension steel ratio ρ = As/(b·d)
    pub fn allowable_ratio(&self, rho: f64) -> f64 {
        if rho <= 0.0 {
            return 0.0;
        }
        match *self {
            SpanDepthRule::Eurocode { fck_mpa } => {
                let sqrt_fck = fck_mpa.sqrt();
                let rho_0 = sqrt_fck * 1.0e-3;
                if rho <= rho_0 {
                    11.0 + 1.5 * sqrt_fck * rho_0 / rho
                        + 3.2 * sqrt_fck * (rho_0 / rho - 1.0).powf(1.5)
                } else {
                    11.0 + 1.5 * sqrt_fck * rho_0 / rho
                }
            }
            SpanDepthRule::Aci { fy_mpa } => 16.0 * (0.4 + fy_mpa / 700.0),
            SpanDepthRule::Bael { fe_mpa } => {
                let rho_lim = 4.2 / fe_mpa;
                if rho <= rho_lim {
                    16.0
                } else {
                    16.0 * rho_lim / rho
                }
            }
        }
    }
}

/// How a cracked section's effective inertia is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InertiaRule {
    /// `1/Ieff = ζ/Icr + (1 − ζ)/Ig` with `ζ = 1 − β·(Mcr/M)^k`
    Interpolated { beta: f64, exponent: f64 },
    /// BAEL B.6.5.2: `Ifi = 1.1·I0 / (1 + λ·μ)` with `λ = 1.1·I0/Icr − 1`
    /// and `μ = 1 − 1.75·ft28 / (4·ρ·σs + ft28)`, σs the cracked steel stress
    Bael,
}

/// State of a section loaded past its cracking moment (N, mm).
#[derive(Debug, Clone, Copy)]
struct CrackedSection {
    moment: f64,
    cracking_moment: f64,
    gross_inertia: f64,
    cracked_inertia: f64,
    rho: f64,
    steel_stress: f64,
    tensile_strength: f64,
}

impl InertiaRule {
    /// Distribution coefficient and effective inertia
    fn effective(&self, section: &CrackedSection) -> (f64, f64) {
        match *self {
            InertiaRule::Interpolated { beta, exponent } => {
                let zeta = (1.0 - beta * (section.cracking_moment / section.moment).powf(exponent))
                    .clamp(0.0, 1.0);
                let inertia =
                    1.0 / (zeta / section.cracked_inertia + (1.0 - zeta) / section.gross_inertia);
                (zeta, inertia)
            }
            InertiaRule::Bael => {
                let ft = section.tensile_strength;
                let mu = (1.0 - 1.75 * ft / (4.0 * section.rho * section.steel_stress + ft)).max(0.0);
                let upper = 1.1 * section.gross_inertia;
                let lambda = upper / section.cracked_inertia - 1.0;
                (mu, upper / (1.0 + lambda * mu))
            }
        }
    }
}

/// Code coefficients for the deflection solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeflectionParams {
    /// Short-term concrete modulus (MPa)
    pub concrete_modulus_mpa: f64,
    /// Steel modulus (MPa)
    pub steel_modulus_mpa: f64,
    /// Flexural tensile strength used for Mcr (MPa)
    pub cracking_stress_mpa: f64,
    pub inertia: InertiaRule,
    /// Long-term deflection as a multiple of the instantaneous one
    pub creep_multiplier: f64,
    pub limit: DeflectionLimit,
    pub span_depth: SpanDepthRule,
}

/// Outcome of the simplified span/depth check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanDepthCheck {
    pub actual_ratio: f64,
    pub allowable_ratio: f64,
    pub ok: bool,
}

/// Result of a deflection check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionResult {
    pub instantaneous_mm: f64,
    pub long_term_mm: f64,
    pub total_mm: f64,
    pub limit_mm: f64,
    pub cracking_moment_knm: f64,
    /// Distribution coefficient, ζ or the BAEL μ (0 = uncracked)
    pub distribution_coefficient: f64,
    pub effective_inertia_mm4: f64,
    /// Informational span/depth check
    pub span_depth: SpanDepthCheck,
    pub ok: bool,
    pub message: String,
}

/// Deflection of a simply-supported section under its service moment.
///
/// # Example
///
/// ```rust
/// use concrete_core::codes::{DesignCode, Eurocode2};
/// use concrete_core::solvers::deflection::{calculate, DeflectionInput};
///
/// let code = Eurocode2::default();
/// let input = DeflectionInput {
///     span_m: 6.0,
///     service_moment_knm: 60.0,
///     width_m: 0.3,
///     height_m: 0.5,
///     steel_area_cm2: 6.0,
///     cover_m: 0.03,
/// };
/// let result = calculate(&input, &code.deflection_params()).unwrap();
/// assert!(result.total_mm > result.instantaneous_mm);
/// assert_eq!(result.limit_mm, 24.0);
/// ```
pub fn calculate(input: &DeflectionInput, params: &DeflectionParams) -> CalcResult<DeflectionResult> {
    input.validate()?;

    let l = mm(input.span_m);
    let b = mm(input.width_m);
    let h = mm(input.height_m);
    let d = effective_depth(h, mm(input.cover_m));
    let area_steel = mm2(input.steel_area_cm2);
    let moment = NMm::from(KnM(input.service_moment_knm)).value();

    let limit_mm = params.limit.limit_mm(l);
    let i_gross = gross_inertia(b, h);
    let m_cr = cracking_moment(params.cracking_stress_mpa, b, h);

    let rho = area_steel / (b * d);
    let allowable_ratio = params.span_depth.allowable_ratio(rho);
    let actual_ratio = l / d;
    let span_depth = SpanDepthCheck {
        actual_ratio,
        allowable_ratio,
        ok: allowable_ratio > 0.0 && actual_ratio <= allowable_ratio,
    };

    let mut result = DeflectionResult {
        instantaneous_mm: 0.0,
        long_term_mm: 0.0,
        total_mm: 0.0,
        limit_mm,
        cracking_moment_knm: KnM::from(NMm(m_cr)).value(),
        distribution_coefficient: 0.0,
        effective_inertia_mm4: i_gross,
        span_depth,
        ok: true,
        message: String::new(),
    };

    if moment <= 0.0 {
        result.message = "No service moment applied".to_string();
        return Ok(result);
    }

    let (coefficient, i_eff) = if moment <= m_cr {
        (0.0, i_gross)
    } else {
        if area_steel <= 0.0 {
            result.ok = false;
            result.message =
                "Section cracks under service load and has no tension steel".to_string();
            return Ok(result);
        }
        let n = params.steel_modulus_mpa / params.concrete_modulus_mpa;
        let i_cracked = cracked_inertia(b, d, area_steel, n);
        let x = cracked_neutral_axis_ratio(rho, n) * d;
        params.inertia.effective(&CrackedSection {
            moment,
            cracking_moment: m_cr,
            gross_inertia: i_gross,
            cracked_inertia: i_cracked,
            rho,
            steel_stress: n * moment * (d - x) / i_cracked,
            tensile_strength: params.cracking_stress_mpa,
        })
    };

    let instantaneous =
        uniform_load_deflection_from_moment(moment, l, params.concrete_modulus_mpa, i_eff);
    let long_term = params.creep_multiplier * instantaneous;
    let total = instantaneous + long_term;

    result.instantaneous_mm = instantaneous;
    result.long_term_mm = long_term;
    result.total_mm = total;
    result.distribution_coefficient = coefficient;
    result.effective_inertia_mm4 = i_eff;
    result.ok = total <= limit_mm;
    result.message = format!(
        "Total deflection {:.1} mm {} {} = {:.1} mm",
        total,
        if result.ok { "<=" } else { ">" },
        params.limit.label(),
        limit_mm
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ec2_params() -> DeflectionParams {
        DeflectionParams {
            concrete_modulus_mpa: 33_000.0,
            steel_modulus_mpa: 200_000.0,
            cracking_stress_mpa: 2.9,
            inertia: InertiaRule::Interpolated {
                beta: 1.0,
                exponent: 2.0,
            },
            creep_multiplier: 1.25,
            limit: DeflectionLimit::SpanFraction(250.0),
            span_depth: SpanDepthRule::Eurocode { fck_mpa: 30.0 },
        }
    }

    fn section(service_moment_knm: f64, steel_area_cm2: f64) -> DeflectionInput {
        DeflectionInput {
            span_m: 6.0,
            service_moment_knm,
            width_m: 0.3,
            height_m: 0.5,
            steel_area_cm2,
            cover_m: 0.03,
        }
    }

    #[test]
    fn test_uncracked_section_uses_gross_inertia() {
        // Mcr = 2.9 * 300 * 500² / 6 = 36.25 kN·m
        let result = calculate(&section(20.0, 6.0), &ec2_params()).unwrap();
        assert_eq!(result.distribution_coefficient, 0.0);
        assert_relative_eq!(result.effective_inertia_mm4, 3.125e9);
        // 5 * 20e6 * 6000² / (48 * 33000 * 3.125e9) = 0.727 mm
        assert_relative_eq!(result.instantaneous_mm, 0.7273, max_relative = 1e-3);
        assert_relative_eq!(result.total_mm, 0.7273 * 2.25, max_relative = 1e-3);
        assert!(result.ok);
    }

    #[test]
    fn test_cracked_section_interpolates() {
        let result = calculate(&section(80.0, 6.0), &ec2_params()).unwrap();
        // zeta = 1 - (36.25/80)² = 0.7947
        assert_relative_eq!(result.distribution_coefficient, 0.7947, max_relative = 1e-3);
        assert!(result.effective_inertia_mm4 < 3.125e9);
        assert!(result.total_mm > result.instantaneous_mm);
    }

    #[test]
    fn test_bael_inertia_between_cracked_and_gross() {
        let params = DeflectionParams {
            concrete_modulus_mpa: 11_000.0 * 30.0_f64.cbrt(),
            cracking_stress_mpa: 2.4,
            inertia: InertiaRule::Bael,
            creep_multiplier: 2.0,
            ..ec2_params()
        };
        // Mcr = 2.4 * 3.125e9 / 250 = 30 kN·m
        let result = calculate(&section(80.0, 6.0), &params).unwrap();
        assert_relative_eq!(result.cracking_moment_knm, 30.0, max_relative = 1e-9);

        let (b, d, area) = (300.0, 460.0, 600.0);
        let n = params.steel_modulus_mpa / params.concrete_modulus_mpa;
        let rho = area / (b * d);
        let i_cracked = cracked_inertia(b, d, area, n);
        let x = cracked_neutral_axis_ratio(rho, n) * d;
        let sigma_s = n * 80.0e6 * (d - x) / i_cracked;
        let mu = 1.0 - 1.75 * 2.4 / (4.0 * rho * sigma_s + 2.4);
        let expected = 1.1 * 3.125e9 / (1.0 + (1.1 * 3.125e9 / i_cracked - 1.0) * mu);

        assert_relative_eq!(result.distribution_coefficient, mu, max_relative = 1e-9);
        assert_relative_eq!(result.effective_inertia_mm4, expected, max_relative = 1e-9);
        assert!(mu > 0.0 && mu < 1.0);
        assert!(result.effective_inertia_mm4 > i_cracked);
        assert!(result.effective_inertia_mm4 < 3.125e9);
        assert_relative_eq!(result.long_term_mm, 2.0 * result.instantaneous_mm);
    }

    #[test]
    fn test_bael_uncracked_uses_gross_inertia() {
        let params = DeflectionParams {
            cracking_stress_mpa: 2.4,
            inertia: InertiaRule::Bael,
            ..ec2_params()
        };
        let result = calculate(&section(20.0, 6.0), &params).unwrap();
        assert_eq!(result.distribution_coefficient, 0.0);
        assert_relative_eq!(result.effective_inertia_mm4, 3.125e9);
    }

    #[test]
    fn test_zero_moment() {
        let result = calculate(&section(0.0, 6.0), &ec2_params()).unwrap();
        assert!(result.ok);
        assert_eq!(result.total_mm, 0.0);
    }

    #[test]
    fn test_cracked_without_steel_fails() {
        let result = calculate(&section(80.0, 0.0), &ec2_params()).unwrap();
        assert!(!result.ok);
        assert!(!result.span_depth.ok);
        assert_eq!(result.span_depth.allowable_ratio, 0.0);
    }

    #[test]
    fn test_limit_exceeded() {
        let long = DeflectionInput {
            span_m: 12.0,
            height_m: 0.3,
            ..section(90.0, 8.0)
        };
        let result = calculate(&long, &ec2_params()).unwrap();
        assert!(!result.ok);
        assert!(result.message.contains("L/250"));
    }

    #[test]
    fn test_limit_with_floor() {
        let limit = DeflectionLimit::SpanFractionWithFloor {
            divisor: 500.0,
            floor_mm: 5.0,
        };
        assert_eq!(limit.limit_mm(6000.0), 12.0);
        assert_eq!(limit.limit_mm(2000.0), 5.0);
    }

    #[test]
    fn test_span_depth_rules() {
        // Lightly reinforced EC2 section gets a generous ratio
        let ec2 = SpanDepthRule::Eurocode { fck_mpa: 30.0 };
        assert!(ec2.allowable_ratio(0.003) > ec2.allowable_ratio(0.01));
        let aci = SpanDepthRule::Aci { fy_mpa: 420.0 };
        assert_relative_eq!(aci.allowable_ratio(0.01), 16.0);
        let bael = SpanDepthRule::Bael { fe_mpa: 500.0 };
        assert_eq!(bael.allowable_ratio(0.005), 16.0);
        assert!(bael.allowable_ratio(0.02) < 16.0);
    }
}
