//! # Simply-Supported Beam Formulas
//!
//! Closed-form demand for a simply-supported span under a uniform line
//! load. These are the only static cases the engine handles: no continuity,
//! no point loads.
//!
//! Units are whatever the caller passes in, as long as they are consistent
//! (kN/m and m give kN and kN·m; N/mm and mm give N and N·mm).

// =============================================================================
// UNIFORM LOAD FORMULAS
// =============================================================================

/// Maximum shear (at the supports)
///
/// ```text
///    ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ w
///    ═════════════════
///    △                △
///  V_max ←────L────→ V_max
/// ```
///
/// # Formula
/// V_max = wL/2
#[inline]
pub fn uniform_load_max_shear(w: f64, l: f64) -> f64 {
    w * l / 2.0
}

/// Maximum moment (at midspan)
///
/// # Formula
/// M_max = wL²/8
///
/// # Example
/// ```rust
/// use concrete_core::equations::beam::uniform_load_max_moment;
///
/// // 10 kN/m over 6 m
/// assert!((uniform_load_max_moment(10.0, 6.0) - 45.0).abs() < 1e-9);
/// ```
#[inline]
pub fn uniform_load_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Midspan deflection expressed through the midspan moment
///
/// Substituting w = 8M/L² into 5wL⁴/(384EI):
///
/// # Formula
/// δ_max = 5ML² / (48EI)
#[inline]
pub fn uniform_load_deflection_from_moment(m: f64, l: f64, e: f64, i: f64) -> f64 {
    5.0 * m * l * l / (48.0 * e * i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_shear_is_half_the_load() {
        // 12 kN/m over 5 m carries 60 kN, half at each support
        assert!((uniform_load_max_shear(12.0, 5.0) - 30.0).abs() < 1e-9);
        assert_eq!(uniform_load_max_shear(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_deflection_matches_load_form() {
        // 5wL⁴/(384EI) with w = 8M/L²
        let (w, l, e, i) = (10.0, 6000.0, 30_000.0, 1.0e9);
        let m = uniform_load_max_moment(w, l);
        let direct = 5.0 * w * l.powi(4) / (384.0 * e * i);
        let via_moment = uniform_load_deflection_from_moment(m, l, e, i);
        assert!((direct - via_moment).abs() / direct < 1e-12);
    }
}
