//! # Flexure Solver
//!
//! Required tension steel for a singly reinforced rectangular section under
//! an ultimate bending moment, using the simplified rectangular stress block.
//!
//! ## Method
//!
//! 1. `d = h − c − 10 mm`
//! 2. `μ = M / (b·d²·f_c)` with `M = Mu/φ`
//! 3. If `μ > μ_lim` the section is insufficient: no compression steel is
//!    designed, the result carries zero steel and zero capacity
//! 4. `α = 1.25·(1 − √(1 − 2μ))`, `z = d·(1 − 0.4α)`, `As = M/(z·f_y)`
//! 5. `As` is raised to the code minimum; above the code maximum the section
//!    fails
//!
//! The parameters carry the already-reduced design strengths, so the same
//! routine serves every code.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::solvers::flexure::{calculate, FlexureInput, FlexureParams, MaximumSteel, MinimumSteel};
//!
//! // C30/37 + S500 per EN 1992-1-1
//! let params = FlexureParams {
//!     compression_strength_mpa: 20.0,
//!     yield_strength_mpa: 434.8,
//!     mu_limit: 0.372,
//!     phi: 1.0,
//!     minimum: MinimumSteel::Eurocode { fctm_mpa: 2.9, fyk_mpa: 500.0 },
//!     maximum: MaximumSteel::GrossFraction(0.04),
//! };
//! let input = FlexureInput { moment_knm: 100.0, width_m: 0.3, height_m: 0.5, cover_m: 0.03 };
//!
//! let result = calculate(&input, &params).unwrap();
//! assert!(result.ok);
//! assert!(result.steel_area_cm2 > 5.0 && result.steel_area_cm2 < 6.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::section::effective_depth;
use crate::errors::{ensure_non_negative, ensure_positive, CalcError, CalcResult};
use crate::units::{cm2, mm, mm2, KnM, NMm};

/// Loads on one flexure check (boundary units).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlexureInput {
    /// Ultimate design moment (kN·m)
    pub moment_knm: f64,
    /// Section width (m)
    pub width_m: f64,
    /// Total section height (m)
    pub height_m: f64,
    /// Concrete cover to the tension reinforcement (m)
    pub cover_m: f64,
}

impl FlexureInput {
    pub fn validate(&self) -> CalcResult<()> {
        ensure_non_negative("moment_knm", self.moment_knm)?;
        ensure_positive("width_m", self.width_m)?;
        ensure_positive("height_m", self.height_m)?;
        ensure_non_negative("cover_m", self.cover_m)?;
        let d = effective_depth(mm(self.height_m), mm(self.cover_m));
        if d <= 0.0 {
            return Err(CalcError::invalid_input(
                "cover_m",
                self.cover_m.to_string(),
                "Cover leaves no effective depth in the section",
            ));
        }
        Ok(())
    }
}

/// Code rule for the minimum tension steel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MinimumSteel {
    /// As,min = max(0.26·fctm/fyk, 0.0013)·b·d
    Eurocode { fctm_mpa: f64, fyk_mpa: f64 },
    /// As,min = max(0.25·√f'c, 1.4)/fy·b·d
    Aci { fc_mpa: f64, fy_mpa: f64 },
    /// Non-fragility: As,min = 0.23·ft28/fe·b·d
    Bael { ft28_mpa: f64, fe_mpa: f64 },
}

impl MinimumSteel {
    /// Minimum area (mm²) for width `b` and effective depth `d` (mm)
    pub fn area_mm2(&self, b: f64, d: f64) -> f64 {
        let ratio = match *self {
            MinimumSteel::Eurocode { fctm_mpa, fyk_mpa } => {
                (0.26 * fctm_mpa / fyk_mpa).max(0.0013)
            }
            MinimumSteel::Aci { fc_mpa, fy_mpa } => (0.25 * fc_mpa.sqrt()).max(1.4) / fy_mpa,
            MinimumSteel::Bael { ft28_mpa, fe_mpa } => 0.23 * ft28_mpa / fe_mpa,
        };
        ratio * b * d
    }
}

/// Code rule for the maximum tension steel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaximumSteel {
    /// Fraction of the gross concrete area b·h
    GrossFraction(f64),
    /// Fraction of the effective area b·d
    EffectiveFraction(f64),
}

impl MaximumSteel {
    /// Maximum area (mm²)
    pub fn area_mm2(&self, b: f64, h: f64, d: f64) -> f64 {
        match *self {
            MaximumSteel::GrossFraction(ratio) => ratio * b * h,
            MaximumSteel::EffectiveFraction(ratio) => ratio * b * d,
        }
    }
}

/// Code coefficients for the flexure solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexureParams {
    /// Design compression strength of the stress block (fcd, 0.85·f'c, fbu) in MPa
    pub compression_strength_mpa: f64,
    /// Design yield strength of the tension steel (fyd, fy, σs) in MPa
    pub yield_strength_mpa: f64,
    /// Limiting reduced moment (ductile / compression failure boundary)
    pub mu_limit: f64,
    /// Strength reduction factor applied to resistance (1.0 for partial-factor codes)
    pub phi: f64,
    pub minimum: MinimumSteel,
    pub maximum: MaximumSteel,
}

/// Result of a flexure check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureResult {
    /// Design moment used (kN·m)
    pub moment_knm: f64,
    /// Effective depth d (mm)
    pub effective_depth_mm: f64,
    /// Reduced moment μ
    pub mu: f64,
    /// Limiting reduced moment
    pub mu_limit: f64,
    /// Neutral-axis depth α·d (mm)
    pub neutral_axis_mm: f64,
    /// Lever arm z (mm)
    pub lever_arm_mm: f64,
    /// Tension steel area to provide (cm²), zero when the section is insufficient
    pub steel_area_cm2: f64,
    /// Minimum steel area (cm²)
    pub minimum_area_cm2: f64,
    /// Maximum steel area (cm²)
    pub maximum_area_cm2: f64,
    /// Design moment capacity φ·Mr with the provided steel (kN·m)
    pub moment_capacity_knm: f64,
    pub ok: bool,
    pub message: String,
}

impl FlexureResult {
    /// Demand / capacity ratio, infinite when there is no capacity
    pub fn utilization(&self) -> f64 {
        if self.moment_capacity_knm > 0.0 {
            self.moment_knm / self.moment_capacity_knm
        } else {
            f64::INFINITY
        }
    }
}

/// Size the tension steel of a rectangular section.
///
/// Malformed input (negative moment, non-positive dimensions) is an error;
/// an insufficient section is an ordinary result with `ok = false`.
pub fn calculate(input: &FlexureInput, params: &FlexureParams) -> CalcResult<FlexureResult> {
    input.validate()?;

    let b = mm(input.width_m);
    let h = mm(input.height_m);
    let d = effective_depth(h, mm(input.cover_m));
    let fc = params.compression_strength_mpa;
    let fy = params.yield_strength_mpa;

    let moment_nmm = NMm::from(KnM(input.moment_knm)).value() / params.phi;
    let mu = moment_nmm / (b * d * d * fc);

    let as_min = params.minimum.area_mm2(b, d);
    let as_max = params.maximum.area_mm2(b, h, d);

    let mut result = FlexureResult {
        moment_knm: input.moment_knm,
        effective_depth_mm: d,
        mu,
        mu_limit: params.mu_limit,
        neutral_axis_mm: 0.0,
        lever_arm_mm: 0.0,
        steel_area_cm2: 0.0,
        minimum_area_cm2: cm2(as_min),
        maximum_area_cm2: cm2(as_max),
        moment_capacity_knm: 0.0,
        ok: false,
        message: String::new(),
    };

    if mu > params.mu_limit {
        result.message = format!(
            "Section insufficient: mu = {:.3} > mu_lim = {:.3}. Increase the section dimensions or add compression steel.",
            mu, params.mu_limit
        );
        return Ok(result);
    }

    let alpha = 1.25 * (1.0 - (1.0 - 2.0 * mu).sqrt());
    let z = d * (1.0 - 0.4 * alpha);
    let as_required = moment_nmm / (z * fy);
    let as_final = as_required.max(as_min);

    result.neutral_axis_mm = alpha * d;
    result.lever_arm_mm = z;

    if as_final > as_max {
        result.steel_area_cm2 = cm2(as_final);
        result.message = format!(
            "Required steel {:.2} cm² exceeds the maximum {:.2} cm². Increase the section dimensions.",
            cm2(as_final),
            cm2(as_max)
        );
        return Ok(result);
    }

    result.steel_area_cm2 = cm2(as_final);
    result.moment_capacity_knm = resisting_moment_knm(as_final, b, d, params);
    result.ok = true;
    result.message = if as_final > as_required {
        format!(
            "Flexure verified: mu = {:.3} <= mu_lim = {:.3}, minimum steel governs ({:.2} cm²)",
            mu,
            params.mu_limit,
            cm2(as_final)
        )
    } else {
        format!(
            "Flexure verified: mu = {:.3} <= mu_lim = {:.3}, As = {:.2} cm²",
            mu,
            params.mu_limit,
            cm2(as_final)
        )
    };
    Ok(result)
}

/// Design moment capacity (kN·m) of a given steel area (cm²).
///
/// Equilibrium of the stress block: `x = As·fy/(0.8·b·fc)`, `z = d − 0.4x`,
/// `Mr = φ·As·fy·z`. A compression zone deeper than the section gives zero.
pub fn resisting_moment(
    steel_area_cm2: f64,
    width_m: f64,
    height_m: f64,
    cover_m: f64,
    params: &FlexureParams,
) -> CalcResult<f64> {
    ensure_non_negative("steel_area_cm2", steel_area_cm2)?;
    let input = FlexureInput {
        moment_knm: 0.0,
        width_m,
        height_m,
        cover_m,
    };
    input.validate()?;
    let d = effective_depth(mm(height_m), mm(cover_m));
    Ok(resisting_moment_knm(mm2(steel_area_cm2), mm(width_m), d, params))
}

fn resisting_moment_knm(area_mm2: f64, b: f64, d: f64, params: &FlexureParams) -> f64 {
    let fy = params.yield_strength_mpa;
    let x = area_mm2 * fy / (0.8 * b * params.compression_strength_mpa);
    let z = d - 0.4 * x;
    if z <= 0.0 {
        return 0.0;
    }
    params.phi * KnM::from(NMm(area_mm2 * fy * z)).value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ec2_params() -> FlexureParams {
        FlexureParams {
            compression_strength_mpa: 20.0,
            yield_strength_mpa: 500.0 / 1.15,
            mu_limit: 0.372,
            phi: 1.0,
            minimum: MinimumSteel::Eurocode {
                fctm_mpa: 2.9,
                fyk_mpa: 500.0,
            },
            maximum: MaximumSteel::GrossFraction(0.04),
        }
    }

    fn section(moment_knm: f64) -> FlexureInput {
        FlexureInput {
            moment_knm,
            width_m: 0.3,
            height_m: 0.5,
            cover_m: 0.03,
        }
    }

    #[test]
    fn test_hand_calculation() {
        // d = 460, mu = 100e6 / (300 * 460² * 20) = 0.0788
        let result = calculate(&section(100.0), &ec2_params()).unwrap();
        assert_relative_eq!(result.effective_depth_mm, 460.0, max_relative = 1e-9);
        assert_relative_eq!(result.mu, 0.07876, max_relative = 1e-3);
        // alpha = 0.1026, z = 441.1, As = 100e6 / (441.1 * 434.8) = 521 mm²
        assert_relative_eq!(result.steel_area_cm2, 5.21, max_relative = 5e-3);
        assert!(result.ok);
        assert!(result.moment_capacity_knm >= 100.0 * 0.999);
    }

    #[test]
    fn test_steel_increases_with_moment() {
        let params = ec2_params();
        let mut previous = 0.0;
        for m in [60.0, 90.0, 120.0, 150.0, 180.0, 210.0] {
            let result = calculate(&section(m), &params).unwrap();
            assert!(result.ok);
            assert!(result.steel_area_cm2 > previous, "As not increasing at M = {}", m);
            previous = result.steel_area_cm2;
        }
    }

    #[test]
    fn test_mu_above_limit_returns_zero_steel() {
        // mu = 600e6 / (300 * 460² * 20) = 0.473 > 0.372
        let result = calculate(&section(600.0), &ec2_params()).unwrap();
        assert!(!result.ok);
        assert_eq!(result.steel_area_cm2, 0.0);
        assert_eq!(result.moment_capacity_knm, 0.0);
        assert!(result.message.contains("Increase the section dimensions"));
    }

    #[test]
    fn test_minimum_steel_clamp() {
        // Tiny moment: minimum 0.26 * 2.9/500 = 0.001508 * 300 * 460 = 208 mm²
        let result = calculate(&section(1.0), &ec2_params()).unwrap();
        assert!(result.ok);
        assert_relative_eq!(result.steel_area_cm2, 2.081, max_relative = 1e-3);
        assert_eq!(result.steel_area_cm2, result.minimum_area_cm2);
    }

    #[test]
    fn test_maximum_steel_fails() {
        let params = FlexureParams {
            maximum: MaximumSteel::GrossFraction(0.005),
            ..ec2_params()
        };
        let result = calculate(&section(200.0), &params).unwrap();
        assert!(!result.ok);
        assert!(result.steel_area_cm2 > result.maximum_area_cm2);
        assert_eq!(result.moment_capacity_knm, 0.0);
    }

    #[test]
    fn test_phi_reduces_capacity() {
        let params = FlexureParams {
            phi: 0.9,
            ..ec2_params()
        };
        let plain = calculate(&section(100.0), &ec2_params()).unwrap();
        let reduced = calculate(&section(100.0), &params).unwrap();
        assert!(reduced.steel_area_cm2 > plain.steel_area_cm2);
        assert!(reduced.moment_capacity_knm >= 100.0 * 0.999);
    }

    #[test]
    fn test_resisting_moment_consistent() {
        let params = ec2_params();
        let result = calculate(&section(100.0), &params).unwrap();
        let mr = resisting_moment(result.steel_area_cm2, 0.3, 0.5, 0.03, &params).unwrap();
        assert_relative_eq!(mr, result.moment_capacity_knm, max_relative = 1e-9);
        assert_eq!(resisting_moment(0.0, 0.3, 0.5, 0.03, &params).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_input() {
        let params = ec2_params();
        assert!(calculate(&section(-5.0), &params).is_err());
        let bad = FlexureInput {
            cover_m: 0.6,
            ..section(50.0)
        };
        assert_eq!(calculate(&bad, &params).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
