//! # Shear Solver
//!
//! Transverse reinforcement for a rectangular section by the truss analogy.
//!
//! ## Method
//!
//! 1. Concrete-only resistance from the code's empirical formula
//! 2. At or below it: pass, no calculated steel, constructive minimum reported
//! 3. Above it: the strut angles are tried in order (shallowest first). The
//!    first angle whose compression-strut limit holds gives
//!    `Asw/s = Vs / (z·fywd·cotθ)`
//! 4. No admissible angle: the section is insufficient, geometry must change
//!
//! Results are reported per unit length, in cm²/m.

use serde::{Deserialize, Serialize};

use crate::equations::section::effective_depth;
use crate::errors::{ensure_non_negative, ensure_positive, CalcError, CalcResult};
use crate::units::{cm2, mm, mm2, KiloNewtons, Newtons};

/// Loads on one shear check (boundary units).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShearInput {
    /// Ultimate design shear (kN)
    pub shear_kn: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub cover_m: f64,
    /// Longitudinal tension steel anchored past the section (cm²)
    pub tension_steel_cm2: f64,
}

impl ShearInput {
    pub fn validate(&self) -> CalcResult<()> {
        ensure_non_negative("shear_kn", self.shear_kn)?;
        ensure_positive("width_m", self.width_m)?;
        ensure_positive("height_m", self.height_m)?;
        ensure_non_negative("cover_m", self.cover_m)?;
        ensure_non_negative("tension_steel_cm2", self.tension_steel_cm2)?;
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

/// Empirical shear strength of the concrete alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ConcreteShear {
    /// VRd,c = max(0.18/γc·k·(100·ρl·fck)^(1/3), 0.035·k^1.5·√fck)·bw·d
    Eurocode { fck_mpa: f64, gamma_c: f64 },
    /// Vc = 0.17·λ·√f'c·bw·d
    Aci { fc_mpa: f64, lambda: f64 },
    /// Vu0 = τu0·b0·d with τu0 = 0.07·fc28/γb
    Bael { fc28_mpa: f64, gamma_b: f64 },
}

impl ConcreteShear {
    /// Nominal resistance (N) for width `b`, depth `d` (mm) and tension steel (mm²)
    pub fn resistance_n(&self, b: f64, d: f64, area_steel: f64) -> f64 {
        match *self {
            ConcreteShear::Eurocode { fck_mpa, gamma_c } => {
                let k = (1.0 + (200.0 / d).sqrt()).min(2.0);
                let rho_l = (area_steel / (b * d)).min(0.02);
                let v_rdc = 0.18 / gamma_c * k * (100.0 * rho_l * fck_mpa).cbrt();
                let v_min = 0.035 * k.powf(1.5) * fck_mpa.sqrt();
                v_rdc.max(v_min) * b * d
            }
            ConcreteShear::Aci { fc_mpa, lambda } => 0.17 * lambda * fc_mpa.sqrt() * b * d,
            ConcreteShear::Bael { fc28_mpa, gamma_b } => 0.07 * fc28_mpa / gamma_b * b * d,
        }
    }
}

/// Compression-strut (web crushing) limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StrutLimit {
    /// VRd,max = bw·z·ν1·fcd / (cotθ + tanθ)
    Inclined { nu_fcd_mpa: f64 },
    /// Steel share capped: Vs ≤ v_max·bw·d
    SteelShear { max_stress_mpa: f64 },
    /// Conventional shear stress capped: V/(b·d) ≤ τ_lim
    ShearStress { max_stress_mpa: f64 },
}

/// Code rule for the maximum stirrup spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpacingRule {
    /// min(0.75·d, 600)
    Eurocode,
    /// min(d/2, 600), tightened to min(d/4, 300) when Vs > threshold·bw·d
    Aci { threshold_stress_mpa: f64 },
    /// min(0.9·d, 400)
    Bael,
}

impl SpacingRule {
    /// Maximum spacing (mm) given d (mm) and the nominal steel shear Vs (N)
    pub fn max_spacing_mm(&self, b: f64, d: f64, steel_shear_n: f64) -> f64 {
        match *self {
            SpacingRule::Eurocode => (0.75 * d).min(600.0),
            SpacingRule::Aci {
                threshold_stress_mpa,
            } => {
                if steel_shear_n > threshold_stress_mpa * b * d {
                    (d / 4.0).min(300.0)
                } else {
                    (d / 2.0).min(600.0)
                }
            }
            SpacingRule::Bael => (0.9 * d).min(400.0),
        }
    }
}

/// Code coefficients for the shear solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShearParams {
    pub concrete: ConcreteShear,
    /// Strength reduction factor (1.0 for partial-factor codes)
    pub phi: f64,
    /// Whether the concrete share is deducted from the steel demand
    pub concrete_contributes: bool,
    /// Design yield strength of the stirrups (MPa)
    pub transverse_yield_mpa: f64,
    /// Internal lever arm as a fraction of d
    pub lever_arm_factor: f64,
    /// Strut inclinations to try, shallowest first
    pub cot_theta: &'static [f64],
    pub strut: StrutLimit,
    /// Minimum transverse ratio Asw/(s·bw)
    pub minimum_ratio: f64,
    pub spacing: SpacingRule,
}

impl ShearParams {
    /// Design strut capacity (N) at a given inclination
    fn strut_capacity_n(&self, b: f64, d: f64, cot_theta: f64, concrete_n: f64) -> f64 {
        let z = self.lever_arm_factor * d;
        match self.strut {
            StrutLimit::Inclined { nu_fcd_mpa } => {
                self.phi * b * z * nu_fcd_mpa / (cot_theta + 1.0 / cot_theta)
            }
            StrutLimit::SteelShear { max_stress_mpa } => {
                let base = if self.concrete_contributes { concrete_n } else { 0.0 };
                self.phi * (base + max_stress_mpa * b * d)
            }
            StrutLimit::ShearStress { max_stress_mpa } => self.phi * max_stress_mpa * b * d,
        }
    }
}

/// Result of a shear check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Applied ultimate shear (kN)
    pub shear_kn: f64,
    pub effective_depth_mm: f64,
    /// Design resistance of the concrete alone (kN)
    pub concrete_resistance_kn: f64,
    /// Design resistance of the calculated stirrups (kN)
    pub steel_resistance_kn: f64,
    /// Design strut resistance at the angle used, or the best angle tried (kN)
    pub strut_resistance_kn: f64,
    /// Strut inclination used, `None` when no stirrups are calculated
    pub cot_theta: Option<f64>,
    /// Calculated transverse steel (cm²/m)
    pub required_area_cm2_m: f64,
    /// Constructive minimum (cm²/m), always reported
    pub minimum_area_cm2_m: f64,
    /// Maximum stirrup spacing (mm)
    pub max_spacing_mm: f64,
    pub ok: bool,
    pub message: String,
}

impl ShearResult {
    /// Area per length the stirrups must provide: never below the minimum
    pub fn design_area_cm2_m(&self) -> f64 {
        self.required_area_cm2_m.max(self.minimum_area_cm2_m)
    }
}

/// Check a section in shear and size its transverse reinforcement.
///
/// # Example
///
/// ```rust
/// use concrete_core::codes::{DesignCode, Eurocode2};
/// use concrete_core::solvers::shear::{calculate, ShearInput};
///
/// let code = Eurocode2::default();
/// let input = ShearInput {
///     shear_kn: 150.0,
///     width_m: 0.3,
///     height_m: 0.5,
///     cover_m: 0.03,
///     tension_steel_cm2: 5.2,
/// };
/// let result = calculate(&input, &code.shear_params()).unwrap();
/// assert!(result.ok);
/// assert_eq!(result.cot_theta, Some(2.5));
/// ```
pub fn calculate(input: &ShearInput, params: &ShearParams) -> CalcResult<ShearResult> {
    input.validate()?;

    let b = mm(input.width_m);
    let d = effective_depth(mm(input.height_m), mm(input.cover_m));
    let v_ed = Newtons::from(KiloNewtons(input.shear_kn)).value();
    let z = params.lever_arm_factor * d;
    let fyw = params.transverse_yield_mpa;

    let concrete_n = params.concrete.resistance_n(b, d, mm2(input.tension_steel_cm2));
    let concrete_design_n = params.phi * concrete_n;
    let minimum_area = cm2(params.minimum_ratio * b * 1000.0);

    let mut result = ShearResult {
        shear_kn: input.shear_kn,
        effective_depth_mm: d,
        concrete_resistance_kn: kn(concrete_design_n),
        steel_resistance_kn: 0.0,
        strut_resistance_kn: 0.0,
        cot_theta: None,
        required_area_cm2_m: 0.0,
        minimum_area_cm2_m: minimum_area,
        max_spacing_mm: params.spacing.max_spacing_mm(b, d, 0.0),
        ok: false,
        message: String::new(),
    };

    if v_ed <= concrete_design_n {
        if let Some(&cot) = params.cot_theta.first() {
            result.strut_resistance_kn = kn(params.strut_capacity_n(b, d, cot, concrete_n));
        }
        result.ok = true;
        result.message = format!(
            "Shear carried by concrete: V = {:.1} kN <= {:.1} kN, minimum stirrups {:.2} cm²/m",
            input.shear_kn, result.concrete_resistance_kn, minimum_area
        );
        return Ok(result);
    }

    let steel_shear_n = v_ed / params.phi
        - if params.concrete_contributes {
            concrete_n
        } else {
            0.0
        };

    let mut best_strut_n: f64 = 0.0;
    for &cot in params.cot_theta {
        let strut_n = params.strut_capacity_n(b, d, cot, concrete_n);
        best_strut_n = best_strut_n.max(strut_n);
        if v_ed > strut_n {
            log::debug!(
                "strut check fails at cot(theta) = {}: {:.1} kN > {:.1} kN",
                cot,
                input.shear_kn,
                kn(strut_n)
            );
            continue;
        }

        // mm²/mm -> mm² per metre
        let area_per_mm = steel_shear_n / (z * fyw * cot);
        result.cot_theta = Some(cot);
        result.strut_resistance_kn = kn(strut_n);
        result.required_area_cm2_m = cm2(area_per_mm * 1000.0);
        result.steel_resistance_kn = kn(params.phi * steel_shear_n);
        result.max_spacing_mm = params.spacing.max_spacing_mm(b, d, steel_shear_n);
        result.ok = true;
        result.message = format!(
            "Shear verified with stirrups: V = {:.1} kN, cot(theta) = {}, Asw/s = {:.2} cm²/m",
            input.shear_kn,
            cot,
            result.design_area_cm2_m()
        );
        return Ok(result);
    }

    result.strut_resistance_kn = kn(best_strut_n);
    result.message = format!(
        "Compression strut insufficient: V = {:.1} kN > {:.1} kN. Increase the section dimensions.",
        input.shear_kn,
        kn(best_strut_n)
    );
    Ok(result)
}

fn kn(newtons: f64) -> f64 {
    KiloNewtons::from(Newtons(newtons)).value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ec2_params() -> ShearParams {
        ShearParams {
            concrete: ConcreteShear::Eurocode {
                fck_mpa: 30.0,
                gamma_c: 1.5,
            },
            phi: 1.0,
            concrete_contributes: false,
            transverse_yield_mpa: 500.0 / 1.15,
            lever_arm_factor: 0.9,
            cot_theta: &[2.5, 1.0],
            strut: StrutLimit::Inclined {
                nu_fcd_mpa: 0.6 * (1.0 - 30.0 / 250.0) * 20.0,
            },
            minimum_ratio: 0.08 * 30.0_f64.sqrt() / 500.0,
            spacing: SpacingRule::Eurocode,
        }
    }

    fn section(shear_kn: f64) -> ShearInput {
        ShearInput {
            shear_kn,
            width_m: 0.3,
            height_m: 0.5,
            cover_m: 0.03,
            tension_steel_cm2: 5.21,
        }
    }

    #[test]
    fn test_concrete_resistance_hand_value() {
        // k = 1.659, rho_l = 0.003775, VRd,c = 0.447 MPa * 300 * 460 = 61.7 kN
        let result = calculate(&section(10.0), &ec2_params()).unwrap();
        assert_relative_eq!(result.concrete_resistance_kn, 61.7, max_relative = 5e-3);
    }

    #[test]
    fn test_low_shear_reports_minimum() {
        let result = calculate(&section(50.0), &ec2_params()).unwrap();
        assert!(result.ok);
        assert_eq!(result.required_area_cm2_m, 0.0);
        assert!(result.minimum_area_cm2_m > 0.0);
        assert_eq!(result.design_area_cm2_m(), result.minimum_area_cm2_m);
        assert_eq!(result.cot_theta, None);
    }

    #[test]
    fn test_shallow_strut_used_first() {
        // Asw/s = 150e3 / (414 * 434.8 * 2.5) = 0.3333 mm²/mm = 3.33 cm²/m
        let result = calculate(&section(150.0), &ec2_params()).unwrap();
        assert!(result.ok);
        assert_eq!(result.cot_theta, Some(2.5));
        assert_relative_eq!(result.required_area_cm2_m, 3.333, max_relative = 2e-3);
        assert_relative_eq!(result.max_spacing_mm, 345.0);
    }

    #[test]
    fn test_falls_back_to_steeper_strut() {
        // VRd,max(2.5) = 452 kN, VRd,max(1.0) = 656 kN
        let result = calculate(&section(500.0), &ec2_params()).unwrap();
        assert!(result.ok);
        assert_eq!(result.cot_theta, Some(1.0));
    }

    #[test]
    fn test_strut_failure_is_a_result() {
        let result = calculate(&section(700.0), &ec2_params()).unwrap();
        assert!(!result.ok);
        assert_eq!(result.cot_theta, None);
        assert!(result.message.contains("Increase the section dimensions"));
        assert_relative_eq!(result.strut_resistance_kn, 655.8, max_relative = 1e-3);
    }

    #[test]
    fn test_aci_spacing_tightens() {
        let rule = SpacingRule::Aci {
            threshold_stress_mpa: 0.33 * 28.0_f64.sqrt(),
        };
        assert_eq!(rule.max_spacing_mm(300.0, 460.0, 0.0), 230.0);
        assert_eq!(rule.max_spacing_mm(300.0, 460.0, 400_000.0), 115.0);
    }

    #[test]
    fn test_negative_shear_rejected() {
        assert!(calculate(&section(-1.0), &ec2_params()).is_err());
    }
}
