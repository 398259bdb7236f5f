//! # Reinforced Concrete Section Properties
//!
//! Geometric properties of a solid rectangular concrete section, gross and
//! cracked-transformed. All functions work in millimetres.
//!
//! ## Notation
//!
//! - `b` = width of section
//! - `h` = total height
//! - `d` = effective depth (compression fibre to tension steel centroid)
//! - `n` = modular ratio Es/Ec
//! - `As` = tension steel area

/// Half-diameter allowance between the cover face and the bar centroid (mm)
///
/// The bar is unknown when the section is first checked, so a 20 mm bar is
/// assumed.
pub const HALF_BAR_ESTIMATE_MM: f64 = 10.0;

/// Effective depth d = h − c − Ø/2 (mm)
///
/// # Example
/// ```rust
/// use concrete_core::equations::section::effective_depth;
///
/// // 500 mm deep beam, 30 mm cover
/// assert!((effective_depth(500.0, 30.0) - 460.0).abs() < 1e-9);
/// ```
#[inline]
pub fn effective_depth(h: f64, cover: f64) -> f64 {
    h - cover - HALF_BAR_ESTIMATE_MM
}

/// Gross second moment of area about the centroid
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │ ════════│ ← centroid at h/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// Ig = bh³/12
#[inline]
pub fn gross_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

/// Elastic section modulus
///
/// # Formula
/// W = bh²/6
#[inline]
pub fn section_modulus(b: f64, h: f64) -> f64 {
    b * h.powi(2) / 6.0
}

/// Cracking moment Mcr = fr·W (N·mm for MPa and mm)
#[inline]
pub fn cracking_moment(fr: f64, b: f64, h: f64) -> f64 {
    fr * section_modulus(b, h)
}

/// Relative depth k = x/d of the cracked elastic neutral axis
///
/// Concrete in tension is ignored and steel is transformed by n.
///
/// # Formula
/// k = √(2ρn + (ρn)²) − ρn, with ρ = As/(bd)
#[inline]
pub fn cracked_neutral_axis_ratio(rho: f64, n: f64) -> f64 {
    let rn = rho * n;
    (2.0 * rn + rn * rn).sqrt() - rn
}

/// Fully cracked transformed inertia
///
/// # Formula
/// Icr = b·x³/3 + n·As·(d − x)², with x = k·d
///
/// # Example
/// ```rust
/// use concrete_core::equations::section::{cracked_inertia, gross_inertia};
///
/// let icr = cracked_inertia(300.0, 460.0, 942.0, 6.06);
/// assert!(icr > 0.0 && icr < gross_inertia(300.0, 500.0));
/// ```
pub fn cracked_inertia(b: f64, d: f64, area_steel: f64, n: f64) -> f64 {
    let rho = area_steel / (b * d);
    let x = cracked_neutral_axis_ratio(rho, n) * d;
    b * x.powi(3) / 3.0 + n * area_steel * (d - x).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.01;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON || (a - b).abs() / b.abs().max(1.0) < 0.001
    }

    #[test]
    fn test_gross_properties() {
        let i = gross_inertia(300.0, 500.0);
        assert!(approx_eq(i, 3.125e9), "Ig = {}", i);
        // W = I / (h/2)
        assert!(approx_eq(section_modulus(300.0, 500.0), i / 250.0));
    }

    #[test]
    fn test_neutral_axis_ratio_bounds() {
        let k = cracked_neutral_axis_ratio(0.01, 6.0);
        // k = sqrt(0.12 + 0.0036) - 0.06 = 0.2916
        assert!(approx_eq(k, 0.2916), "k = {}", k);
        assert_eq!(cracked_neutral_axis_ratio(0.0, 6.0), 0.0);
    }

    #[test]
    fn test_cracked_inertia_increases_with_steel() {
        let low = cracked_inertia(300.0, 460.0, 400.0, 6.0);
        let high = cracked_inertia(300.0, 460.0, 1200.0, 6.0);
        assert!(high > low);
    }

    #[test]
    fn test_cracking_moment() {
        // fr = 2.9 MPa, 300x500: W = 12.5e6 mm³
        assert!(approx_eq(cracking_moment(2.9, 300.0, 500.0), 36.25e6));
    }
}
